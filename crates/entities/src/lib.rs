pub mod base_balance;
pub mod modifier_entry;
pub mod sea_orm_active_enums;
pub mod transaction_record;
