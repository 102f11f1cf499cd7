use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TodoList::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TodoList::Id)
                            .string_len(255)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TodoList::Name).string_len(255).not_null())
                    .col(ColumnDef::new(TodoList::UserId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(TodoList::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TodoList::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // ユーザー削除時のみDB側でカスケードする
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_todo_list_user")
                            .from(TodoList::Table, TodoList::UserId)
                            .to(Alias::new("user"), Alias::new("id"))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_todo_list_user_id")
                    .table(TodoList::Table)
                    .col(TodoList::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TodoList::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TodoList {
    Table,
    Id,
    Name,
    UserId,
    CreatedAt,
    UpdatedAt,
}
