pub mod base_balances;
pub mod common;
pub mod modifiers;
pub mod transactions;

pub use base_balances::*;
pub use common::{WalletAddress, parse_address};
pub use modifiers::*;
pub use transactions::*;
