use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TempAddresses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TempAddresses::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TempAddresses::EmailAddress)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TempAddresses::SessionId).uuid().not_null())
                    .col(
                        ColumnDef::new(TempAddresses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TempAddresses::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TempAddresses::Table, TempAddresses::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(TempAddresses::Table)
                    .col(TempAddresses::SessionId)
                    .name("idx_temp_addresses_session_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TempAddresses::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum TempAddresses {
    Table,
    Id,
    EmailAddress,
    SessionId,
    CreatedAt,
    ExpiresAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}
