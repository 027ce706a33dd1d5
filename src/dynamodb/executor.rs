use std::collections::HashMap;

use aws_sdk_dynamodb::{
    Client, Error,
    types::{AttributeValue, ReturnValue},
};

use super::{ScanBuilder, UpdateBuilder, send_dynamo_request};

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, Default)]
pub struct Output {
    items: Option<Vec<Item>>,
    count: i32,
    scanned_count: i32,
    last_evaluated_key: Option<Item>,
}

impl Output {
    pub fn into_items(self) -> Vec<Item> {
        self.items.unwrap_or_default()
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn scanned_count(&self) -> i32 {
        self.scanned_count
    }

    pub fn take_last_evaluated_key(&mut self) -> Option<Item> {
        self.last_evaluated_key.take()
    }
}

pub async fn execute_scan_page(
    client: &Client,
    table_name: &str,
    builder: &ScanBuilder,
    start_key: Option<Item>,
    limit: Option<i32>,
) -> Result<Output, Error> {
    let mut request = client.scan().table_name(table_name);

    tracing::trace!(
        table=%table_name,
        filter_expression=?builder.filter_expression(),
        attribute_names=?builder.expression_attribute_names(),
        attribute_values=?builder.expression_attribute_values(),
        start_key=?start_key,
        limit=?limit,
        "Scan"
    );

    if let Some(filter_expr) = builder.filter_expression() {
        request = request.filter_expression(filter_expr);

        for (key, value) in builder.expression_attribute_names() {
            request = request.expression_attribute_names(key.clone(), value.clone());
        }

        for (key, value) in builder.expression_attribute_values() {
            request = request.expression_attribute_values(key.clone(), value.clone());
        }
    }

    let start_key_present = start_key.is_some();
    if let Some(start_key) = start_key {
        request = request.set_exclusive_start_key(Some(start_key));
    }

    if let Some(limit) = limit {
        request = request.limit(limit);
    }

    let span = tracing::trace_span!(
        "Scan",
        table = %table_name,
        start_key_present = start_key_present,
        limit = ?limit
    );
    let result = send_dynamo_request(span, || request.send(), |err| format!("{err:?}")).await?;
    Ok(Output {
        items: result.items,
        count: result.count,
        scanned_count: result.scanned_count,
        last_evaluated_key: result.last_evaluated_key,
    })
}

/// Writes `item`, replacing any item with the same key. Returns the replaced item.
pub async fn put_item(client: &Client, table_name: &str, item: Item) -> Result<Option<Item>, Error> {
    let request = client
        .put_item()
        .table_name(table_name)
        .set_item(Some(item))
        .return_values(ReturnValue::AllOld);

    let span = tracing::trace_span!("PutItem", table = %table_name);
    let result = send_dynamo_request(span, || request.send(), |err| format!("{err:?}")).await?;
    Ok(result.attributes)
}

pub async fn get_item(client: &Client, table_name: &str, key: Item) -> Result<Option<Item>, Error> {
    let request = client.get_item().table_name(table_name).set_key(Some(key));

    let span = tracing::trace_span!("GetItem", table = %table_name);
    let result = send_dynamo_request(span, || request.send(), |err| format!("{err:?}")).await?;
    Ok(result.item)
}

/// Deletes the item under `key`. DynamoDB does not distinguish a delete from a
/// no-op, so the only signal is whether a previous item comes back.
pub async fn delete_item(
    client: &Client,
    table_name: &str,
    key: Item,
) -> Result<Option<Item>, Error> {
    let request = client
        .delete_item()
        .table_name(table_name)
        .set_key(Some(key))
        .return_values(ReturnValue::AllOld);

    let span = tracing::trace_span!("DeleteItem", table = %table_name);
    let result = send_dynamo_request(span, || request.send(), |err| format!("{err:?}")).await?;
    Ok(result.attributes)
}

pub async fn update_item(
    client: &Client,
    table_name: &str,
    key: Item,
    builder: &UpdateBuilder,
) -> Result<Item, Error> {
    let mut request = client
        .update_item()
        .table_name(table_name)
        .set_key(Some(key))
        .update_expression(builder.update_expression())
        .return_values(ReturnValue::AllNew);

    for (key, value) in builder.expression_attribute_names() {
        request = request.expression_attribute_names(key.clone(), value.clone());
    }

    for (key, value) in builder.expression_attribute_values() {
        request = request.expression_attribute_values(key.clone(), value.clone());
    }

    tracing::trace!(
        table=%table_name,
        update_expression=%builder.update_expression(),
        attribute_names=?builder.expression_attribute_names(),
        "UpdateItem"
    );

    let span = tracing::trace_span!("UpdateItem", table = %table_name);
    let result = send_dynamo_request(span, || request.send(), |err| format!("{err:?}")).await?;
    Ok(result.attributes.unwrap_or_default())
}
