pub mod create_table;
pub mod debug;
pub mod executor;
pub mod json;
pub mod scan;
pub mod update;

pub use create_table::*;
pub use debug::send_dynamo_request;
pub use executor::*;
pub use json::*;
pub use scan::*;
pub use update::*;
