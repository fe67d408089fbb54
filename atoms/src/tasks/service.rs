use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use super::model::{Hint, Task, CreateTaskPayload, UpdateTaskPayload, UnlockTrigger};
use crate::item::{self, Item};
use std::collections::HashMap;

pub const DEFAULT_TASK_TYPE: &str = "answer";
pub const DEFAULT_POINTS: u32 = 10;

/// Build a task from its DynamoDB item. Unknown triggers read as `manual` (always open).
pub fn task_from_item(quest_id: &str, task_id: &str, item: &Item) -> Task {
    let unlock_trigger = item::string(item, "unlock_trigger")
        .and_then(|s| UnlockTrigger::parse(&s))
        .unwrap_or(UnlockTrigger::Manual);

    let hints: Vec<Hint> = item::json(item, "hints")
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();

    Task {
        task_id: task_id.to_string(),
        quest_id: quest_id.to_string(),
        title: item::string(item, "title").unwrap_or_default(),
        description: item::string(item, "description"),
        instructions: item::string(item, "instructions"),
        task_type: item::string(item, "task_type").unwrap_or_else(|| DEFAULT_TASK_TYPE.to_string()),
        unlock_trigger,
        unlock_condition: item::json(item, "unlock_condition").unwrap_or(serde_json::Value::Null),
        correct_answer: item::string(item, "correct_answer"),
        points: item::number(item, "points").unwrap_or(DEFAULT_POINTS),
        order_index: item::number(item, "order_index").unwrap_or(0),
        hints,
        created_at: item::string(item, "created_at").unwrap_or_default(),
        updated_at: item::string(item, "updated_at").unwrap_or_default(),
    }
}

/// Load all tasks for a quest, ordered by `order_index`
pub async fn load_tasks_for_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Vec<Task>, String> {
    let pk = format!("QUEST#{}", quest_id);

    let items = item::query_all(
        client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(pk))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string())),
    )
    .await?;

    let mut tasks: Vec<Task> = items
        .iter()
        .filter_map(|item| {
            item::id_from_sk(item, "TASK#").map(|task_id| task_from_item(quest_id, &task_id, item))
        })
        .collect();

    tasks.sort_by(|a, b| a.order_index.cmp(&b.order_index));

    Ok(tasks)
}

/// Create a new task in a quest
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    payload: CreateTaskPayload,
) -> Result<Task, String> {
    let task_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let pk = format!("QUEST#{}", quest_id);
    let sk = format!("TASK#{}", task_id);

    let task_type = payload.task_type.unwrap_or_else(|| DEFAULT_TASK_TYPE.to_string());
    let points = payload.points.unwrap_or(DEFAULT_POINTS);

    let condition_json = serde_json::to_string(&payload.unlock_condition)
        .map_err(|e| format!("Failed to serialize unlock condition: {}", e))?;
    let hints_json = serde_json::to_string(&payload.hints)
        .map_err(|e| format!("Failed to serialize hints: {}", e))?;

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(pk))
        .item("SK", AttributeValue::S(sk))
        .item("title", AttributeValue::S(payload.title.clone()))
        .item("task_type", AttributeValue::S(task_type.clone()))
        .item("unlock_trigger", AttributeValue::S(payload.unlock_trigger.as_str().to_string()))
        .item("unlock_condition", AttributeValue::S(condition_json))
        .item("points", AttributeValue::N(points.to_string()))
        .item("order_index", AttributeValue::N(payload.order_index.to_string()))
        .item("hints", AttributeValue::S(hints_json))
        .item("created_at", AttributeValue::S(now.clone()))
        .item("updated_at", AttributeValue::S(now.clone()));

    if let Some(description) = &payload.description {
        builder = builder.item("description", AttributeValue::S(description.clone()));
    }
    if let Some(instructions) = &payload.instructions {
        builder = builder.item("instructions", AttributeValue::S(instructions.clone()));
    }
    if let Some(answer) = &payload.correct_answer {
        builder = builder.item("correct_answer", AttributeValue::S(answer.clone()));
    }

    builder.send().await.map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Task {
        task_id,
        quest_id: quest_id.to_string(),
        title: payload.title,
        description: payload.description,
        instructions: payload.instructions,
        task_type,
        unlock_trigger: payload.unlock_trigger,
        unlock_condition: payload.unlock_condition,
        correct_answer: payload.correct_answer,
        points,
        order_index: payload.order_index,
        hints: payload.hints,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Get a specific task
pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    task_id: &str,
) -> Result<Task, String> {
    let pk = format!("QUEST#{}", quest_id);
    let sk = format!("TASK#{}", task_id);

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk))
        .key("SK", AttributeValue::S(sk))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    match result.item() {
        Some(item) => Ok(task_from_item(quest_id, task_id, item)),
        None => Err("Task not found".to_string()),
    }
}

/// Update a task
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    task_id: &str,
    payload: UpdateTaskPayload,
) -> Result<Task, String> {
    let pk = format!("QUEST#{}", quest_id);
    let sk = format!("TASK#{}", task_id);

    let mut update_expr: Vec<String> = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values = HashMap::new();

    // `#name = :name` for every attribute that changes
    let mut set = |name: &str, value: AttributeValue| {
        update_expr.push(format!("#{0} = :{0}", name));
        expr_names.insert(format!("#{}", name), name.to_string());
        expr_values.insert(format!(":{}", name), value);
    };

    set("updated_at", AttributeValue::S(chrono::Utc::now().to_rfc3339()));

    if let Some(title) = payload.title {
        set("title", AttributeValue::S(title));
    }
    if let Some(description) = payload.description {
        set("description", AttributeValue::S(description));
    }
    if let Some(instructions) = payload.instructions {
        set("instructions", AttributeValue::S(instructions));
    }
    if let Some(task_type) = payload.task_type {
        set("task_type", AttributeValue::S(task_type));
    }
    if let Some(trigger) = payload.unlock_trigger {
        set("unlock_trigger", AttributeValue::S(trigger.as_str().to_string()));
    }
    if let Some(condition) = payload.unlock_condition {
        let condition_json = serde_json::to_string(&condition)
            .map_err(|e| format!("Failed to serialize unlock condition: {}", e))?;
        set("unlock_condition", AttributeValue::S(condition_json));
    }
    if let Some(answer) = payload.correct_answer {
        set("correct_answer", AttributeValue::S(answer));
    }
    if let Some(points) = payload.points {
        set("points", AttributeValue::N(points.to_string()));
    }
    if let Some(order_index) = payload.order_index {
        set("order_index", AttributeValue::N(order_index.to_string()));
    }
    if let Some(hints) = payload.hints {
        let hints_json = serde_json::to_string(&hints)
            .map_err(|e| format!("Failed to serialize hints: {}", e))?;
        set("hints", AttributeValue::S(hints_json));
    }

    let update_expression = format!("SET {}", update_expr.join(", "));

    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(pk))
        .key("SK", AttributeValue::S(sk))
        .condition_expression("attribute_exists(SK)")
        .update_expression(update_expression);

    for (k, v) in expr_names {
        builder = builder.expression_attribute_names(k, v);
    }

    for (k, v) in expr_values {
        builder = builder.expression_attribute_values(k, v);
    }

    builder.send().await.map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    get_task(client, table_name, quest_id, task_id).await
}

/// Delete a task. Completions referencing it are left alone; they no longer match any door.
pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    task_id: &str,
) -> Result<(), String> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .key("SK", AttributeValue::S(format!("TASK#{}", task_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::unlock::UnlockRule;
    use chrono::NaiveDate;

    fn s(v: &str) -> AttributeValue {
        AttributeValue::S(v.to_string())
    }

    #[test]
    fn task_item_parses_into_closed_unlock_rule() {
        let mut item = Item::new();
        item.insert("title".to_string(), s("Day 5 - December 5"));
        item.insert("unlock_trigger".to_string(), s("date"));
        item.insert("unlock_condition".to_string(), s(r#"{"date":"2024-12-05"}"#));
        item.insert("order_index".to_string(), AttributeValue::N("4".to_string()));
        item.insert("hints".to_string(), s(r#"[{"text":"look up"}]"#));

        let task = task_from_item("q1", "t5", &item);

        assert_eq!(task.order_index, 4);
        assert_eq!(task.points, DEFAULT_POINTS);
        assert_eq!(task.task_type, DEFAULT_TASK_TYPE);
        assert_eq!(task.hints.len(), 1);
        assert_eq!(
            task.unlock_rule(),
            UnlockRule::Date { unlock_on: NaiveDate::from_ymd_opt(2024, 12, 5) }
        );
    }

    #[test]
    fn unknown_trigger_and_broken_json_degrade_gracefully() {
        let mut item = Item::new();
        item.insert("unlock_trigger".to_string(), s("weekly"));
        item.insert("unlock_condition".to_string(), s("{not json"));
        item.insert("hints".to_string(), s("nope"));

        let task = task_from_item("q1", "t1", &item);

        assert_eq!(task.unlock_trigger, UnlockTrigger::Manual);
        assert_eq!(task.unlock_condition, serde_json::Value::Null);
        assert!(task.hints.is_empty());
    }
}
