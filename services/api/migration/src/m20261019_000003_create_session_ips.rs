use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionIps::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SessionIps::SessionId).uuid().not_null())
                    .col(ColumnDef::new(SessionIps::Ip).string().not_null())
                    .col(
                        ColumnDef::new(SessionIps::BoundAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(SessionIps::SessionId)
                            .col(SessionIps::Ip),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionIps::Table, SessionIps::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionIps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SessionIps {
    Table,
    SessionId,
    Ip,
    BoundAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}
