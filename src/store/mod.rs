use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use thiserror::Error;

use crate::dynamodb::JsonConversionError;
use crate::expr::{DynamoExpression, Operand};

pub mod dynamo;
pub mod memory;

pub use crate::dynamodb::Item;
pub use dynamo::DynamoStore;
pub use memory::MemoryStore;

pub const KEY_ATTRIBUTE: &str = "id";
pub const NAME_ATTRIBUTE: &str = "name";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("DynamoDB request failed: {0}")]
    DynamoDb(#[from] aws_sdk_dynamodb::Error),
    #[error("stored item could not be converted: {0}")]
    Conversion(#[from] JsonConversionError),
    #[error("request rejected by store: {0}")]
    Rejected(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// One page of a filtered scan. `last_evaluated_key` is the continuation token;
/// `None` means the scan is exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Put-or-replace. Returns the replaced item, if any.
    async fn put(&self, item: Item) -> Result<Option<Item>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Returns the deleted item, or `None` when nothing was stored under `id`.
    async fn delete(&self, id: &str) -> Result<Option<Item>, StoreError>;

    /// Sets exactly the attributes in `changes` and returns the full item
    /// afterwards. An empty change set is passed through and rejected by the store.
    async fn update(&self, id: &str, changes: Item) -> Result<Item, StoreError>;

    /// Reads one page of the table. `limit` is the store-side page size and is
    /// applied before `filter`, so a page may hold fewer matching items than
    /// `limit` while the scan is not yet exhausted.
    async fn scan_page(
        &self,
        filter: Option<&DynamoExpression>,
        start_key: Option<Item>,
        limit: Option<i32>,
    ) -> Result<ScanPage, StoreError>;

    /// Finds a live item by its unique name.
    ///
    /// The default walks a full filtered scan. Stores that can index `name`
    /// should override this.
    async fn find_by_name(&self, name: &str) -> Result<Option<Item>, StoreError> {
        let filter = DynamoExpression::equals(NAME_ATTRIBUTE, Operand::Value(name.to_string()));
        let mut start_key = None;
        loop {
            let page = self.scan_page(Some(&filter), start_key, None).await?;
            if let Some(item) = page.items.into_iter().next() {
                return Ok(Some(item));
            }
            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => return Ok(None),
            }
        }
    }
}

pub fn key_for(id: &str) -> Item {
    Item::from([(KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
}

pub fn item_id(item: &Item) -> Option<&str> {
    match item.get(KEY_ATTRIBUTE) {
        Some(AttributeValue::S(id)) => Some(id),
        _ => None,
    }
}
