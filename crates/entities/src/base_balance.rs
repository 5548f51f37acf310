//! `SeaORM` Entity mirroring the last observed on-chain balance of a wallet

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "BaseBalance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub wallet_address: String,
    /// floor of `ron_balance`, computed when the row was written
    #[sea_orm(column_type = "Text")]
    pub gem_balance: String,
    /// raw observed amount, stored verbatim even when it does not parse
    #[sea_orm(column_type = "Text")]
    pub ron_balance: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
