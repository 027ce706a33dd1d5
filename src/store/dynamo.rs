use async_trait::async_trait;
use aws_sdk_dynamodb::Client;

use super::{Item, ItemStore, ScanPage, StoreError, key_for};
use crate::dynamodb::{self, ScanBuilder, UpdateBuilder};
use crate::expr::DynamoExpression;

#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ItemStore for DynamoStore {
    async fn put(&self, item: Item) -> Result<Option<Item>, StoreError> {
        Ok(dynamodb::put_item(&self.client, &self.table_name, item).await?)
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(dynamodb::get_item(&self.client, &self.table_name, key_for(id)).await?)
    }

    async fn delete(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(dynamodb::delete_item(&self.client, &self.table_name, key_for(id)).await?)
    }

    async fn update(&self, id: &str, changes: Item) -> Result<Item, StoreError> {
        let builder = UpdateBuilder::from_changes(&changes);
        Ok(dynamodb::update_item(&self.client, &self.table_name, key_for(id), &builder).await?)
    }

    async fn scan_page(
        &self,
        filter: Option<&DynamoExpression>,
        start_key: Option<Item>,
        limit: Option<i32>,
    ) -> Result<ScanPage, StoreError> {
        let builder = match filter {
            Some(expr) => ScanBuilder::from_expression(expr),
            None => ScanBuilder::new(),
        };
        let mut output =
            dynamodb::execute_scan_page(&self.client, &self.table_name, &builder, start_key, limit)
                .await?;
        tracing::trace!(
            table = %self.table_name,
            count = output.count(),
            scanned_count = output.scanned_count(),
            "Scan page received"
        );
        let last_evaluated_key = output.take_last_evaluated_key();
        Ok(ScanPage {
            items: output.into_items(),
            last_evaluated_key,
        })
    }
}
