use sea_orm::entity::prelude::*;

/// Inbound message, matched to its address by `to_email`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "email_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub to_email: String,
    pub from_email: String,
    pub subject: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub received_at: chrono::DateTime<chrono::Utc>,
    pub is_read: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
