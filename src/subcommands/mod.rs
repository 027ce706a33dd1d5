use color_eyre::eyre::{Result, eyre};
use serde::Serialize;

use stockmate::inventory::ActionResponse;

pub mod bulk;
pub mod create_table;
pub mod items;
pub mod list;

/// Prints the envelope as JSON and turns a non-200 status into an error so the
/// process exits non-zero.
pub fn print_response<T: Serialize>(response: &ActionResponse<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(response)?);
    if response.is_success() {
        Ok(())
    } else {
        Err(eyre!("{}", response.message))
    }
}
