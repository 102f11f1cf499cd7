use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // サブタスクは parent_id による自己参照で表現する。
        // 「1階層まで」という制約はDBでは表現せず、サービス層でチェックする。
        manager
            .create_table(
                Table::create()
                    .table(Todo::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Todo::Id)
                            .string_len(255)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Todo::Content).text().not_null())
                    .col(ColumnDef::new(Todo::Completed).boolean().not_null().default(false))
                    .col(ColumnDef::new(Todo::UserId).string_len(255).not_null())
                    .col(ColumnDef::new(Todo::ListId).string_len(255).not_null())
                    .col(ColumnDef::new(Todo::ParentId).string_len(255).null())
                    .col(
                        ColumnDef::new(Todo::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Todo::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_user")
                            .from(Todo::Table, Todo::UserId)
                            .to(Alias::new("user"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_list")
                            .from(Todo::Table, Todo::ListId)
                            .to(Alias::new("todo_list"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todo_list_id")
                    .table(Todo::Table)
                    .col(Todo::ListId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todo_parent_id")
                    .table(Todo::Table)
                    .col(Todo::ParentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Todo::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Todo {
    Table,
    Id,
    Content,
    Completed,
    UserId,
    ListId,
    ParentId,
    CreatedAt,
    UpdatedAt,
}
