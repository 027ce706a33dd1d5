use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("{0}")]
    Validation(String),
    #[error("item not found")]
    NotFound,
    #[error("bulk operations are disabled in this environment")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InventoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }

    pub fn status(&self) -> u16 {
        match self {
            InventoryError::Validation(_) => 400,
            InventoryError::Forbidden => 403,
            InventoryError::NotFound => 404,
            InventoryError::Store(_) => 500,
        }
    }

    /// Text safe to hand back to a caller. Store failures never leak detail.
    pub fn public_message(&self) -> String {
        match self {
            InventoryError::Validation(message) => format!("Bad Request: {message}"),
            InventoryError::Forbidden => "Forbidden".to_string(),
            InventoryError::NotFound => "Not Found".to_string(),
            InventoryError::Store(_) => "Internal Server Error".to_string(),
        }
    }
}

impl From<crate::dynamodb::JsonConversionError> for InventoryError {
    fn from(err: crate::dynamodb::JsonConversionError) -> Self {
        InventoryError::Store(StoreError::from(err))
    }
}
