use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailMessages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EmailMessages::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EmailMessages::ToEmail).string().not_null())
                    .col(ColumnDef::new(EmailMessages::FromEmail).string().not_null())
                    .col(ColumnDef::new(EmailMessages::Subject).string().not_null())
                    .col(ColumnDef::new(EmailMessages::Body).text().not_null())
                    .col(
                        ColumnDef::new(EmailMessages::ReceivedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EmailMessages::IsRead)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        // Inbox listing: messages for a set of addresses, newest first.
        manager
            .create_index(
                Index::create()
                    .table(EmailMessages::Table)
                    .col(EmailMessages::ToEmail)
                    .col(EmailMessages::ReceivedAt)
                    .name("idx_email_messages_to_email_received_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailMessages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum EmailMessages {
    Table,
    Id,
    ToEmail,
    FromEmail,
    Subject,
    Body,
    ReceivedAt,
    IsRead,
}
