use uuid::Uuid;

use crate::dynamodb::{from_item, to_item};
use crate::store::{ItemStore, item_id};

use super::aggregate::aggregate;
use super::error::InventoryError;
use super::fake;
use super::query::{self, ScanPlan};
use super::timestamp::{self, Bound};
use super::types::{
    ActionResponse, AdditionalInventoryFilters, BulkSummary, InventoryData, InventoryFilters,
    InventoryItem, ItemChanges,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryOptions {
    /// Enables `clear_inventory` and `populate_inventory`.
    pub allow_bulk_operations: bool,
}

#[derive(Debug)]
pub struct Inventory<S> {
    store: S,
    options: InventoryOptions,
}

impl<S: ItemStore> Inventory<S> {
    pub fn new(store: S, options: InventoryOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn options(&self) -> InventoryOptions {
        self.options
    }

    pub async fn list_inventory(&self, filters: &InventoryFilters) -> ActionResponse<InventoryData> {
        respond("list_inventory", self.list(query::default_plan(filters)).await.map(Some))
    }

    pub async fn list_inventory_extended(
        &self,
        filters: &AdditionalInventoryFilters,
    ) -> ActionResponse<InventoryData> {
        respond(
            "list_inventory_extended",
            self.list(query::extended_plan(filters)).await.map(Some),
        )
    }

    /// Adds an item, or replaces the item that already carries `name`.
    ///
    /// The id is taken from the existing item of the same name, then from `id`,
    /// then freshly generated. Both timestamps are set to now.
    pub async fn add_item(
        &self,
        name: &str,
        price: f64,
        category: &str,
        id: Option<&str>,
    ) -> ActionResponse<InventoryItem> {
        respond("add_item", self.try_add_item(name, price, category, id).await.map(Some))
    }

    /// Writes exactly the supplied fields and returns the item afterwards.
    /// `last_updated_dt` is left alone unless `changes` sets it.
    pub async fn edit_item(&self, id: &str, changes: &ItemChanges) -> ActionResponse<InventoryItem> {
        respond("edit_item", self.try_edit_item(id, changes).await.map(Some))
    }

    /// Deleting a missing id still succeeds; `data` then stays empty.
    pub async fn delete_item(&self, id: &str) -> ActionResponse<InventoryItem> {
        respond("delete_item", self.try_delete_item(id).await)
    }

    pub async fn get_item(&self, id: &str) -> ActionResponse<InventoryItem> {
        respond("get_item", self.try_get_item(id).await.map(Some))
    }

    pub async fn clear_inventory(&self) -> ActionResponse<BulkSummary> {
        respond("clear_inventory", self.try_clear().await.map(Some))
    }

    pub async fn populate_inventory(&self, count: usize) -> ActionResponse<BulkSummary> {
        respond("populate_inventory", self.try_populate(count).await.map(Some))
    }

    async fn list(&self, plan: Result<ScanPlan, InventoryError>) -> Result<InventoryData, InventoryError> {
        let plan = plan?;
        Ok(aggregate(&self.store, &plan).await?)
    }

    async fn try_add_item(
        &self,
        name: &str,
        price: f64,
        category: &str,
        id: Option<&str>,
    ) -> Result<InventoryItem, InventoryError> {
        let name = required("name", name)?;
        let category = required("category", category)?;
        validate_price(price)?;

        let existing = self.store.find_by_name(name).await?;
        let id = match existing.as_ref().and_then(item_id) {
            Some(existing_id) => {
                tracing::debug!(id = existing_id, name, "Replacing item with the same name");
                existing_id.to_string()
            }
            None => id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
        };

        let now = timestamp::now();
        let item = InventoryItem {
            id,
            name: name.to_string(),
            category: category.to_string(),
            price,
            created_dt: now.clone(),
            last_updated_dt: now,
        };
        self.store.put(to_item(&item)?).await?;
        Ok(item)
    }

    async fn try_edit_item(&self, id: &str, changes: &ItemChanges) -> Result<InventoryItem, InventoryError> {
        let id = required("id", id)?;
        let changes = normalize_changes(changes)?;
        let updated = self.store.update(id, to_item(&changes)?).await?;
        Ok(from_item(&updated)?)
    }

    async fn try_delete_item(&self, id: &str) -> Result<Option<InventoryItem>, InventoryError> {
        let id = required("id", id)?;
        let Some(previous) = self.store.delete(id).await? else {
            return Ok(None);
        };
        match from_item::<InventoryItem>(&previous) {
            Ok(item) => Ok(Some(item)),
            Err(err) => {
                tracing::warn!(id, error = %err, "Deleted item could not be decoded");
                Ok(None)
            }
        }
    }

    async fn try_get_item(&self, id: &str) -> Result<InventoryItem, InventoryError> {
        let id = required("id", id)?;
        match self.store.get(id).await? {
            Some(item) => Ok(from_item(&item)?),
            None => Err(InventoryError::NotFound),
        }
    }

    async fn try_clear(&self) -> Result<BulkSummary, InventoryError> {
        self.ensure_bulk_allowed()?;
        let plan = query::default_plan(&InventoryFilters::default())?;
        let data = aggregate(&self.store, &plan).await?;
        for item in &data.items {
            self.store.delete(&item.id).await?;
        }
        tracing::info!(deleted = data.items.len(), "Cleared inventory");
        Ok(BulkSummary {
            processed: data.items.len(),
        })
    }

    async fn try_populate(&self, count: usize) -> Result<BulkSummary, InventoryError> {
        self.ensure_bulk_allowed()?;
        for _ in 0..count {
            let item = fake::fake_item(&mut rand::thread_rng());
            self.try_add_item(&item.name, item.price, &item.category, None)
                .await?;
        }
        tracing::info!(count, "Populated inventory");
        Ok(BulkSummary { processed: count })
    }

    fn ensure_bulk_allowed(&self) -> Result<(), InventoryError> {
        if self.options.allow_bulk_operations {
            Ok(())
        } else {
            Err(InventoryError::Forbidden)
        }
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, InventoryError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(InventoryError::validation(format!("{field} is required")));
    }
    Ok(value)
}

/// Trims text fields and rewrites timestamps in the stored format, so edited
/// rows stay comparable with the ones `add_item` writes.
fn normalize_changes(changes: &ItemChanges) -> Result<ItemChanges, InventoryError> {
    let text = |field: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|value| required(field, value).map(str::to_string))
            .transpose()
    };
    let stamp = |field: &str, value: &Option<String>| {
        value
            .as_deref()
            .map(|value| {
                timestamp::parse_bound(value, Bound::Start)
                    .map_err(|err| InventoryError::validation(format!("{field}: {err}")))
            })
            .transpose()
    };
    if let Some(price) = changes.price {
        validate_price(price)?;
    }
    Ok(ItemChanges {
        name: text("name", &changes.name)?,
        category: text("category", &changes.category)?,
        price: changes.price,
        created_dt: stamp("created_dt", &changes.created_dt)?,
        last_updated_dt: stamp("last_updated_dt", &changes.last_updated_dt)?,
    })
}

fn validate_price(price: f64) -> Result<(), InventoryError> {
    if !price.is_finite() || price < 0.0 {
        return Err(InventoryError::validation(format!(
            "price must be a non-negative number, got {price}"
        )));
    }
    Ok(())
}

fn respond<T>(operation: &str, result: Result<Option<T>, InventoryError>) -> ActionResponse<T> {
    match result {
        Ok(data) => ActionResponse {
            status: 200,
            message: format!("[{operation}] Success"),
            data,
        },
        Err(err) => {
            match &err {
                InventoryError::Store(source) => {
                    tracing::error!(operation, error = %source, "Store request failed");
                }
                InventoryError::Forbidden => {
                    tracing::warn!(operation, "Bulk operation refused");
                }
                InventoryError::Validation(_) | InventoryError::NotFound => {
                    tracing::debug!(operation, error = %err, "Request rejected");
                }
            }
            ActionResponse {
                status: err.status(),
                message: format!("[{operation}] {}", err.public_message()),
                data: None,
            }
        }
    }
}
