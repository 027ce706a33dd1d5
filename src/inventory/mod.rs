pub mod actions;
pub mod aggregate;
pub mod error;
pub mod fake;
pub mod query;
pub mod timestamp;
pub mod types;

pub use actions::{Inventory, InventoryOptions};
pub use error::InventoryError;
pub use types::*;
