use crate::dynamodb::from_item;
use crate::store::{Item, ItemStore, StoreError};

use super::query::{PageRequest, ScanPlan, SortOrder, SortSpec};
use super::types::{InventoryData, InventoryItem};

/// Pagination counts physical store pages. The store applies `Limit` before
/// filtering, so a page can hold fewer than `limit` items.
pub async fn aggregate<S>(store: &S, plan: &ScanPlan) -> Result<InventoryData, StoreError>
where
    S: ItemStore + ?Sized,
{
    let rows = match plan.pagination {
        None => scan_all(store, plan).await?,
        Some(PageRequest { page, limit }) => {
            scan_page_number(store, plan, page.unwrap_or(1), limit).await?
        }
    };

    let mut items = rows
        .iter()
        .map(from_item::<InventoryItem>)
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(sort) = plan.sort {
        sort_items(&mut items, sort);
    }
    let total_price = items.iter().map(|item| item.price).sum();

    let (count, page, limit) = match plan.pagination {
        Some(request) => (Some(items.len()), request.page, request.limit),
        None => (None, None, None),
    };
    Ok(InventoryData {
        items,
        total_price,
        count,
        page,
        limit,
    })
}

async fn scan_all<S>(store: &S, plan: &ScanPlan) -> Result<Vec<Item>, StoreError>
where
    S: ItemStore + ?Sized,
{
    let mut rows = Vec::new();
    let mut start_key = None;
    let mut pages = 0usize;
    loop {
        let page = store.scan_page(Some(&plan.filter), start_key, None).await?;
        pages += 1;
        rows.extend(page.items);
        match page.last_evaluated_key {
            Some(key) => start_key = Some(key),
            None => break,
        }
    }
    tracing::debug!(pages, rows = rows.len(), "Scanned to exhaustion");
    Ok(rows)
}

/// Returns the rows of store page `target` (1-based), or nothing when the scan
/// runs out first.
async fn scan_page_number<S>(
    store: &S,
    plan: &ScanPlan,
    target: u32,
    limit: Option<u32>,
) -> Result<Vec<Item>, StoreError>
where
    S: ItemStore + ?Sized,
{
    let limit = limit.map(|limit| i32::try_from(limit).unwrap_or(i32::MAX));
    let mut start_key = None;
    let mut current = 1;
    loop {
        let page = store.scan_page(Some(&plan.filter), start_key, limit).await?;
        if current == target {
            tracing::debug!(page = current, rows = page.items.len(), "Fetched requested page");
            return Ok(page.items);
        }
        match page.last_evaluated_key {
            Some(key) => start_key = Some(key),
            None => {
                tracing::debug!(requested = target, available = current, "Scan ended before requested page");
                return Ok(Vec::new());
            }
        }
        current += 1;
    }
}

pub fn sort_items(items: &mut [InventoryItem], sort: SortSpec) {
    items.sort_unstable_by(|a, b| {
        let ordering = sort.field.compare(a, b);
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dynamodb::to_item;
    use crate::expr::{DynamoExpression, Operand};
    use crate::inventory::query::SortField;
    use crate::store::MemoryStore;

    fn item(id: &str, category: &str, price: f64) -> InventoryItem {
        InventoryItem {
            id: id.to_string(),
            name: format!("name-{id}"),
            category: category.to_string(),
            price,
            created_dt: "2024-01-01 00:00:00 +08:00".to_string(),
            last_updated_dt: "2024-01-01 00:00:00 +08:00".to_string(),
        }
    }

    async fn store_with(items: &[InventoryItem], page_size: usize) -> MemoryStore {
        let store = MemoryStore::with_page_size(page_size);
        for item in items {
            store.put(to_item(item).unwrap()).await.unwrap();
        }
        store
    }

    fn everything() -> DynamoExpression {
        DynamoExpression::Function {
            name: crate::expr::FunctionName::AttributeExists,
            args: vec![Operand::Path("id".into())],
        }
    }

    fn plan(pagination: Option<PageRequest>, sort: Option<SortSpec>) -> ScanPlan {
        ScanPlan {
            filter: everything(),
            pagination,
            sort,
        }
    }

    #[tokio::test]
    async fn unpaginated_scan_concatenates_all_pages() {
        let items: Vec<_> = (0..7).map(|i| item(&format!("{i:02}"), "A", 1.5)).collect();
        let store = store_with(&items, 3).await;

        let data = aggregate(&store, &plan(None, None)).await.unwrap();
        assert_eq!(data.items, items);
        assert_eq!(data.total_price, 10.5);
        assert_eq!(data.count, None);
    }

    #[tokio::test]
    async fn page_number_walks_store_pages() {
        let items: Vec<_> = (0..25).map(|i| item(&format!("{i:02}"), "A", 1.0)).collect();
        let store = store_with(&items, 100).await;

        let second = aggregate(
            &store,
            &plan(
                Some(PageRequest {
                    page: Some(2),
                    limit: Some(10),
                }),
                None,
            ),
        )
        .await
        .unwrap();
        assert_eq!(second.items, items[10..20]);
        assert_eq!(second.count, Some(10));
        assert_eq!(second.page, Some(2));
        assert_eq!(second.limit, Some(10));

        let beyond = aggregate(
            &store,
            &plan(
                Some(PageRequest {
                    page: Some(9),
                    limit: Some(10),
                }),
                None,
            ),
        )
        .await
        .unwrap();
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_price, 0.0);
    }

    #[tokio::test]
    async fn limit_without_page_reads_first_page_only() {
        let items: Vec<_> = (0..5).map(|i| item(&format!("{i}"), "A", 2.0)).collect();
        let store = store_with(&items, 100).await;

        let data = aggregate(
            &store,
            &plan(
                Some(PageRequest {
                    page: None,
                    limit: Some(2),
                }),
                None,
            ),
        )
        .await
        .unwrap();
        assert_eq!(data.items.len(), 2);
        assert_eq!(data.page, None);
        assert_eq!(store.call_count(), 5 + 1);
    }

    #[tokio::test]
    async fn filtered_pages_may_be_short() {
        let items: Vec<_> = (0..10)
            .map(|i| item(&format!("{i}"), if i % 2 == 0 { "A" } else { "B" }, 1.0))
            .collect();
        let store = store_with(&items, 100).await;
        let plan = ScanPlan {
            filter: DynamoExpression::equals("category", Operand::Value("A".into())),
            pagination: Some(PageRequest {
                page: Some(1),
                limit: Some(4),
            }),
            sort: None,
        };
        let data = aggregate(&store, &plan).await.unwrap();
        assert_eq!(data.items.len(), 2);
    }

    #[tokio::test]
    async fn sorts_after_retrieval() {
        let items = vec![item("a", "A", 3.0), item("b", "A", 1.0), item("c", "A", 2.0)];
        let store = store_with(&items, 100).await;

        let desc = SortSpec {
            field: SortField::Price,
            order: SortOrder::Desc,
        };
        let data = aggregate(&store, &plan(None, Some(desc))).await.unwrap();
        let prices: Vec<f64> = data.items.iter().map(|item| item.price).collect();
        assert_eq!(prices, vec![3.0, 2.0, 1.0]);
        assert_eq!(data.total_price, 6.0);
    }

    #[tokio::test]
    async fn undecodable_rows_fail_the_aggregation() {
        let store = MemoryStore::new();
        let mut row = crate::store::key_for("broken");
        row.insert(
            "price".to_string(),
            aws_sdk_dynamodb::types::AttributeValue::S("free".to_string()),
        );
        store.put(row).await.unwrap();

        let err = aggregate(&store, &plan(None, None)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conversion(_)));
    }

    #[tokio::test]
    async fn store_failures_propagate() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(aggregate(&store, &plan(None, None)).await.is_err());
    }
}
