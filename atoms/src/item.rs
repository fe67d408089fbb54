use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;
use std::collections::HashMap;

/// A raw DynamoDB item as returned by `query` / `get_item`.
pub type Item = HashMap<String, AttributeValue>;

pub fn string(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).map(|s| s.to_string())
}

pub fn number<T: std::str::FromStr>(item: &Item, key: &str) -> Option<T> {
    item.get(key)
        .and_then(|v| v.as_n().ok())
        .and_then(|n| n.parse().ok())
}

pub fn boolean(item: &Item, key: &str) -> Option<bool> {
    item.get(key).and_then(|v| v.as_bool().ok()).copied()
}

/// JSON documents (conditions, hints) are stored as string attributes.
pub fn json(item: &Item, key: &str) -> Option<serde_json::Value> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| serde_json::from_str(s).ok())
}

/// Strips the entity prefix off the sort key, e.g. `TASK#abc` -> `abc`.
pub fn id_from_sk(item: &Item, prefix: &str) -> Option<String> {
    item.get("SK")
        .and_then(|v| v.as_s().ok())
        .and_then(|sk| sk.strip_prefix(prefix))
        .map(|id| id.to_string())
}

/// Runs `query` through every page. One `Query` call stops after 1 MB of items.
pub async fn query_all(query: QueryFluentBuilder) -> Result<Vec<Item>, String> {
    let mut pages = query.into_paginator().items().send();
    let mut items = Vec::new();

    while let Some(item) = pages.next().await {
        items.push(item.map_err(|e| format!("DynamoDB query error: {}", e))?);
    }

    Ok(items)
}
