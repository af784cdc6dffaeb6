//! Recurrence date math.
//!
//! Pure calendar logic shared by the reset sweep and the calendar expansion:
//! given a recurrence rule and a reference day, compute the next occurrence
//! day, decide whether a completed task is due for reset on a user's local
//! "today", and test pattern membership for a single day.
//!
//! Everything here works on [`NaiveDate`]. Timezone conversion happens at the
//! call site, so comparisons are calendar-day comparisons and never drift by
//! a UTC offset.

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceRule {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceRule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Parses a stored rule, returning `None` for unknown values.
    ///
    /// Reads are lenient on purpose: a row with an unrecognized
    /// `recurrence_type` behaves as non-recurring instead of poisoning every
    /// query that touches it.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Returns the first occurrence day strictly after `from`.
///
/// Monthly and yearly steps clamp the day-of-month to the target month's
/// length (Jan 31 → Feb 28, Feb 29 → next Feb 28). `None` only on calendar
/// overflow.
pub fn next_occurrence(rule: RecurrenceRule, from: NaiveDate) -> Option<NaiveDate> {
    match rule {
        RecurrenceRule::Daily => from.checked_add_days(Days::new(1)),
        RecurrenceRule::Weekly => from.checked_add_days(Days::new(7)),
        RecurrenceRule::Monthly => from.checked_add_months(Months::new(1)),
        RecurrenceRule::Yearly => from.checked_add_months(Months::new(12)),
    }
}

/// Decides whether a completed recurring task is due for reset on `today`.
///
/// `completed_on` is the completion timestamp truncated to the user's local
/// day; `today` is the user's local day. All comparisons are at day
/// granularity.
///
/// The final occurrence is still in scope when it lands exactly on
/// `recurring_until`; the second clause of the return keeps that boundary day
/// resetting. Historical behavior, keep as is.
pub fn should_reset(
    rule: RecurrenceRule,
    completed_on: NaiveDate,
    recurring_until: NaiveDate,
    today: NaiveDate,
) -> bool {
    let Some(next) = next_occurrence(rule, completed_on) else {
        return false;
    };
    if next > recurring_until {
        return false;
    }
    today >= next || (today == recurring_until && next == today)
}

/// Tests whether `date` belongs to the recurrence pattern anchored at
/// `anchor` (the task's creation day), within the `recurring_until` horizon.
pub fn is_visible_on(
    rule: RecurrenceRule,
    anchor: NaiveDate,
    recurring_until: NaiveDate,
    date: NaiveDate,
) -> bool {
    if date > recurring_until {
        return false;
    }
    match rule {
        RecurrenceRule::Daily => true,
        RecurrenceRule::Weekly => date.signed_duration_since(anchor).num_days() % 7 == 0,
        RecurrenceRule::Monthly => anchor.day() == date.day(),
        RecurrenceRule::Yearly => anchor.month() == date.month() && anchor.day() == date.day(),
    }
}
