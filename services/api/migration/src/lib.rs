pub use sea_orm_migration::prelude::*;

mod m20261019_000001_create_access_codes;
mod m20261019_000002_create_sessions;
mod m20261019_000003_create_session_ips;
mod m20261019_000004_create_temp_addresses;
mod m20261019_000005_create_email_messages;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261019_000001_create_access_codes::Migration),
            Box::new(m20261019_000002_create_sessions::Migration),
            Box::new(m20261019_000003_create_session_ips::Migration),
            Box::new(m20261019_000004_create_temp_addresses::Migration),
            Box::new(m20261019_000005_create_email_messages::Migration),
        ]
    }
}
