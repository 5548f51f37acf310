use entities::{base_balance, modifier_entry, transaction_record};
use sea_orm_migration::{prelude::*, sea_orm::Schema};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db_backend = manager.get_database_backend();
        let schema = Schema::new(db_backend);

        manager
            .create_table(
                schema
                    .create_table_from_entity(base_balance::Entity)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // (wallet_address, sequence) is the primary key, so concurrent writers
        // racing for the same slot collide here.
        manager
            .create_table(
                schema
                    .create_table_from_entity(modifier_entry::Entity)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_modifier_entry_created_at")
                    .table(modifier_entry::Entity)
                    .col(modifier_entry::Column::WalletAddress)
                    .col(modifier_entry::Column::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                schema
                    .create_table_from_entity(transaction_record::Entity)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transaction_record_from")
                    .table(transaction_record::Entity)
                    .col(transaction_record::Column::FromAddress)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_transaction_record_to")
                    .table(transaction_record::Entity)
                    .col(transaction_record::Column::ToAddress)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(transaction_record::Entity)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(modifier_entry::Entity)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(base_balance::Entity)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}
