//! Repository implementations for database access

pub mod transactions;

pub use transactions::{TransactionRecord, TransactionRepo};
