//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Normalize a category name for display: trim and collapse inner runs of
/// whitespace.
pub(crate) fn normalize_category_display(value: &str) -> ResultEngine<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::InvalidAmount(
            "category name must not be empty".to_string(),
        ));
    }
    Ok(collapsed)
}

/// Normalize a category name into its per-user unique key: NFKC fold plus
/// lowercase, so visually equal names collide.
pub(crate) fn normalize_category_key(value: &str) -> String {
    value.nfkc().collect::<String>().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_collapses_whitespace() {
        assert_eq!(
            normalize_category_display("  Eating   Out ").unwrap(),
            "Eating Out"
        );
        assert!(normalize_category_display("   ").is_err());
    }

    #[test]
    fn key_folds_width_and_case() {
        assert_eq!(normalize_category_key("Ｇｒｏｃｅｒｉｅｓ"), "groceries");
        assert_eq!(normalize_category_key("CAFÉ"), "café");
    }
}
