pub use sea_orm_migration::prelude::*;

mod m20260412_000000_init;
mod m20260503_000000_task_recurrence;
mod m20260528_000000_wallet;
mod m20260622_000000_idempotency_key;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260412_000000_init::Migration),
            Box::new(m20260503_000000_task_recurrence::Migration),
            Box::new(m20260528_000000_wallet::Migration),
            Box::new(m20260622_000000_idempotency_key::Migration),
        ]
    }
}
