pub mod category;
pub mod transaction;

pub use category::{Category, CategoryId};
pub use transaction::{CategoryRef, Transaction, TransactionId};
