use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Tarefa {
    Table,
    Id,
    Titulo,
    Descricao,
    Data,
    Status,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tarefa::Table)
                    .if_not_exists()
                    .col(pk_auto(Tarefa::Id))
                    .col(string(Tarefa::Titulo))
                    .col(string_null(Tarefa::Descricao))
                    .col(timestamp(Tarefa::Data))
                    .col(integer(Tarefa::Status))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Tarefa::Table).to_owned())
            .await
    }
}
