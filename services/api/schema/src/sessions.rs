use sea_orm::entity::prelude::*;

/// User session created by redeeming an access code.
/// Not linked to `access_codes` by foreign key: revoking a code leaves live sessions intact.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub code_id: Uuid,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::session_ips::Entity")]
    SessionIps,
    #[sea_orm(has_many = "super::temp_addresses::Entity")]
    TempAddresses,
}

impl Related<super::session_ips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionIps.def()
    }
}

impl Related<super::temp_addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TempAddresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
