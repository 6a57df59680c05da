//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod transaction;
pub mod validation;

pub use transaction::{parse_transaction_id, NewTransaction};
pub use validation::ValidationError;
