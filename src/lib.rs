pub mod aws;
pub mod config;
pub mod dynamodb;
pub mod expr;
pub mod inventory;
pub mod logging;
pub mod store;
