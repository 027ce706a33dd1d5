use std::{
    collections::BTreeMap,
    ops::Bound,
    sync::{
        RwLock,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;

use super::{Item, ItemStore, KEY_ATTRIBUTE, ScanPage, StoreError, item_id};
use crate::expr::{self, DynamoExpression};

/// Rows a scan reads per page when the caller gives no limit. Stands in for
/// DynamoDB's 1 MB page cap.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// In-process table with DynamoDB scan semantics: rows are delivered in key
/// order, `limit` counts rows read before filtering, and a page that reaches
/// its limit always carries a continuation key.
#[derive(Debug)]
pub struct MemoryStore {
    items: RwLock<BTreeMap<String, Item>>,
    page_size: usize,
    unavailable: AtomicBool,
    writes_until_failure: AtomicUsize,
    calls: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            page_size: page_size.max(1),
            unavailable: AtomicBool::new(false),
            writes_until_failure: AtomicUsize::new(usize::MAX),
            calls: AtomicUsize::new(0),
        }
    }

    /// Makes every subsequent operation fail until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Lets `writes` more put/update/delete calls succeed, then fails the rest.
    pub fn fail_writes_after(&self, writes: usize) {
        self.writes_until_failure.store(writes, Ordering::SeqCst);
    }

    /// Number of operations the store has received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn begin(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store is offline".to_string()));
        }
        Ok(())
    }

    fn begin_write(&self) -> Result<(), StoreError> {
        self.begin()?;
        let allowed = self
            .writes_until_failure
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |remaining| match remaining {
                0 => None,
                usize::MAX => Some(usize::MAX),
                n => Some(n - 1),
            })
            .is_ok();
        if !allowed {
            return Err(StoreError::Unavailable("write capacity exhausted".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Item>>, StoreError> {
        self.items
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Item>>, StoreError> {
        self.items
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

#[async_trait]
impl ItemStore for MemoryStore {
    async fn put(&self, item: Item) -> Result<Option<Item>, StoreError> {
        self.begin_write()?;
        let Some(id) = item_id(&item).map(str::to_string) else {
            return Err(StoreError::Rejected(format!(
                "item is missing string key attribute {KEY_ATTRIBUTE}"
            )));
        };
        Ok(self.write()?.insert(id, item))
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        self.begin()?;
        Ok(self.read()?.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<Option<Item>, StoreError> {
        self.begin_write()?;
        Ok(self.write()?.remove(id))
    }

    async fn update(&self, id: &str, changes: Item) -> Result<Item, StoreError> {
        self.begin_write()?;
        if changes.is_empty() {
            return Err(StoreError::Rejected(
                "update expression has no assignments".to_string(),
            ));
        }
        if changes.contains_key(KEY_ATTRIBUTE) {
            return Err(StoreError::Rejected(format!(
                "cannot update key attribute {KEY_ATTRIBUTE}"
            )));
        }
        let mut items = self.write()?;
        let item = items.entry(id.to_string()).or_insert_with(|| {
            Item::from([(KEY_ATTRIBUTE.to_string(), AttributeValue::S(id.to_string()))])
        });
        item.extend(changes);
        Ok(item.clone())
    }

    async fn scan_page(
        &self,
        filter: Option<&DynamoExpression>,
        start_key: Option<Item>,
        limit: Option<i32>,
    ) -> Result<ScanPage, StoreError> {
        self.begin()?;
        let page_len = match limit {
            Some(limit) if limit < 1 => {
                return Err(StoreError::Rejected(format!(
                    "limit must be at least 1, got {limit}"
                )));
            }
            Some(limit) => limit as usize,
            None => self.page_size,
        };

        let start_after = start_key
            .as_ref()
            .and_then(|key| item_id(key))
            .map(str::to_string);
        let lower = match start_after.as_ref() {
            Some(id) => Bound::Excluded(id),
            None => Bound::Unbounded,
        };

        let items = self.read()?;
        let mut range = items.range::<String, _>((lower, Bound::Unbounded));
        let scanned: Vec<(&String, &Item)> = range.by_ref().take(page_len).collect();
        let more_remaining = range.next().is_some();

        let last_evaluated_key = match scanned.last() {
            Some((id, _)) if scanned.len() == page_len && (limit.is_some() || more_remaining) => {
                Some(super::key_for(id))
            }
            _ => None,
        };
        let items = scanned
            .into_iter()
            .filter(|(_, item)| filter.is_none_or(|filter_expr| expr::matches(filter_expr, item)))
            .map(|(_, item)| item.clone())
            .collect();

        Ok(ScanPage {
            items,
            last_evaluated_key,
        })
    }
}
