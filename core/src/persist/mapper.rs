use crate::util::millis;
use entities::{modifier_entry, sea_orm_active_enums::TransactionStatus, transaction_record};
use rpc::{ModifierEntryInfo, TransactionInfo};

pub fn transaction_status_to_str(status: TransactionStatus) -> &'static str {
    match status {
        TransactionStatus::Pending => "pending",
        TransactionStatus::Completed => "completed",
        TransactionStatus::Failed => "failed",
    }
}

pub fn modifier_model_to_info(entry: modifier_entry::Model) -> ModifierEntryInfo {
    ModifierEntryInfo {
        wallet_address: entry.wallet_address,
        gem_modifier: entry.gem_modifier,
        sequence: Some(entry.sequence),
        description: Some(entry.description),
        created_at: Some(millis(entry.created_at)),
        updated_at: Some(millis(entry.updated_at)),
    }
}

pub fn transaction_model_to_info(record: transaction_record::Model) -> TransactionInfo {
    TransactionInfo {
        id: record.id,
        from_address: record.from_address,
        to_address: record.to_address,
        amount: record.amount,
        tx_hash: record.tx_hash,
        status: transaction_status_to_str(record.status).to_string(),
        created_at: millis(record.created_at),
        updated_at: millis(record.updated_at),
    }
}
