use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::Datelike;
use super::advent::{advent_door_payloads, advent_window, generate_share_code};
use super::model::{Quest, QuestStatus, QuestType, CreateQuestPayload, UpdateQuestPayload};
use crate::clock::Clock;
use crate::item::{self, Item};
use std::collections::HashMap;

const SHARE_CODE_ATTEMPTS: usize = 5;

pub fn quest_from_item(quest_id: &str, item: &Item) -> Quest {
    Quest {
        quest_id: quest_id.to_string(),
        creator_id: item::string(item, "creator_id").unwrap_or_default(),
        title: item::string(item, "title").unwrap_or_default(),
        description: item::string(item, "description"),
        quest_type: item::string(item, "quest_type")
            .and_then(|s| QuestType::parse(&s))
            .unwrap_or(QuestType::Custom),
        status: item::string(item, "status")
            .and_then(|s| QuestStatus::parse(&s))
            .unwrap_or(QuestStatus::Draft),
        start_date: item::string(item, "start_date"),
        end_date: item::string(item, "end_date"),
        is_public: item::boolean(item, "is_public").unwrap_or(true),
        requires_auth: item::boolean(item, "requires_auth").unwrap_or(false),
        share_code: item::string(item, "share_code"),
        recipient_first_name: item::string(item, "recipient_first_name"),
        created_at: item::string(item, "created_at").unwrap_or_default(),
        updated_at: item::string(item, "updated_at").unwrap_or_default(),
        published_at: item::string(item, "published_at"),
    }
}

/// Create a quest as a draft.
///
/// Christmas calendars get the December 1-24 window of the clock's year and their 24 doors.
pub async fn create_quest<C: Clock + ?Sized>(
    client: &DynamoClient,
    table_name: &str,
    creator_id: &str,
    payload: CreateQuestPayload,
    clock: &C,
) -> Result<Quest, String> {
    let quest_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let year = clock.today().year();

    let (start_date, end_date) = if payload.quest_type == QuestType::ChristmasCalendar {
        let (start, end) = advent_window(year);
        (Some(start), Some(end))
    } else {
        (payload.start_date.clone(), payload.end_date.clone())
    };

    let is_public = payload.is_public.unwrap_or(true);
    let requires_auth = payload.requires_auth.unwrap_or(false);

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S("QUEST".to_string()))
        .item("SK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .item("creator_id", AttributeValue::S(creator_id.to_string()))
        .item("title", AttributeValue::S(payload.title.clone()))
        .item("quest_type", AttributeValue::S(payload.quest_type.as_str().to_string()))
        .item("status", AttributeValue::S(QuestStatus::Draft.as_str().to_string()))
        .item("is_public", AttributeValue::Bool(is_public))
        .item("requires_auth", AttributeValue::Bool(requires_auth))
        .item("created_at", AttributeValue::S(now.clone()))
        .item("updated_at", AttributeValue::S(now.clone()));

    if let Some(description) = &payload.description {
        builder = builder.item("description", AttributeValue::S(description.clone()));
    }
    if let Some(start) = &start_date {
        builder = builder.item("start_date", AttributeValue::S(start.clone()));
    }
    if let Some(end) = &end_date {
        builder = builder.item("end_date", AttributeValue::S(end.clone()));
    }
    if let Some(name) = &payload.recipient_first_name {
        builder = builder.item("recipient_first_name", AttributeValue::S(name.clone()));
    }

    builder.send().await.map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    if payload.quest_type == QuestType::ChristmasCalendar {
        for door in advent_door_payloads(year) {
            crate::tasks::service::create_task(client, table_name, &quest_id, door).await?;
        }
        tracing::info!("🎄 Seeded advent doors: quest_id={}, year={}", quest_id, year);
    }

    Ok(Quest {
        quest_id,
        creator_id: creator_id.to_string(),
        title: payload.title,
        description: payload.description,
        quest_type: payload.quest_type,
        status: QuestStatus::Draft,
        start_date,
        end_date,
        is_public,
        requires_auth,
        share_code: None,
        recipient_first_name: payload.recipient_first_name,
        created_at: now.clone(),
        updated_at: now,
        published_at: None,
    })
}

pub async fn get_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Quest, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("QUEST".to_string()))
        .key("SK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    match result.item() {
        Some(item) => Ok(quest_from_item(quest_id, item)),
        None => Err("Quest not found".to_string()),
    }
}

/// Quests created by `creator_id`, newest first
pub async fn list_quests_for_creator(
    client: &DynamoClient,
    table_name: &str,
    creator_id: &str,
) -> Result<Vec<Quest>, String> {
    let items = item::query_all(
        client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S("QUEST".to_string()))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("QUEST#".to_string())),
    )
    .await?;

    let mut quests: Vec<Quest> = items
        .iter()
        .filter_map(|item| {
            item::id_from_sk(item, "QUEST#").map(|quest_id| quest_from_item(&quest_id, item))
        })
        .filter(|quest| quest.creator_id == creator_id)
        .collect();

    quests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    Ok(quests)
}

pub async fn update_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    payload: UpdateQuestPayload,
) -> Result<Quest, String> {
    let mut update_expr: Vec<String> = vec![];
    let mut expr_names = HashMap::new();
    let mut expr_values = HashMap::new();

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
    if let Some(status) = payload.status {
        set("status", AttributeValue::S(status.as_str().to_string()));
    }
    if let Some(start) = payload.start_date {
        set("start_date", AttributeValue::S(start));
    }
    if let Some(end) = payload.end_date {
        set("end_date", AttributeValue::S(end));
    }
    if let Some(is_public) = payload.is_public {
        set("is_public", AttributeValue::Bool(is_public));
    }
    if let Some(requires_auth) = payload.requires_auth {
        set("requires_auth", AttributeValue::Bool(requires_auth));
    }
    if let Some(name) = payload.recipient_first_name {
        set("recipient_first_name", AttributeValue::S(name));
    }

    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("QUEST".to_string()))
        .key("SK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .condition_expression("attribute_exists(SK)")
        .update_expression(format!("SET {}", update_expr.join(", ")));

    for (k, v) in expr_names {
        builder = builder.expression_attribute_names(k, v);
    }

    for (k, v) in expr_values {
        builder = builder.expression_attribute_values(k, v);
    }

    builder.send().await.map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    get_quest(client, table_name, quest_id).await
}

/// Publish a quest. An existing share code is kept, otherwise a fresh one is claimed.
pub async fn publish_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Quest, String> {
    let quest = get_quest(client, table_name, quest_id).await?;

    let share_code = match quest.share_code {
        Some(code) => code,
        None => claim_share_code(client, table_name, quest_id).await?,
    };

    let now = chrono::Utc::now().to_rfc3339();

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("QUEST".to_string()))
        .key("SK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .update_expression("SET #status = :status, share_code = :code, published_at = :now, updated_at = :now")
        .expression_attribute_names("#status", "status")
        .expression_attribute_values(":status", AttributeValue::S(QuestStatus::Published.as_str().to_string()))
        .expression_attribute_values(":code", AttributeValue::S(share_code.clone()))
        .expression_attribute_values(":now", AttributeValue::S(now))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    tracing::info!("📣 Quest published: quest_id={}, share_code={}", quest_id, share_code);

    get_quest(client, table_name, quest_id).await
}

/// Writes a `SHARE#{code}` pointer, retrying when the code is already taken.
async fn claim_share_code(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<String, String> {
    for _ in 0..SHARE_CODE_ATTEMPTS {
        let code = generate_share_code(&mut rand::thread_rng());

        let result = client
            .put_item()
            .table_name(table_name)
            .item("PK", AttributeValue::S("SHARE".to_string()))
            .item("SK", AttributeValue::S(format!("SHARE#{}", code)))
            .item("quest_id", AttributeValue::S(quest_id.to_string()))
            .condition_expression("attribute_not_exists(SK)")
            .send()
            .await;

        match result {
            Ok(_) => return Ok(code),
            Err(e)
                if e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false) =>
            {
                tracing::warn!("⚠️ Share code collision, retrying: code={}", code);
            }
            Err(e) => return Err(format!("DynamoDB put_item error: {}", e)),
        }
    }

    Err("Could not allocate a share code".to_string())
}

/// Published quest behind a share code. Drafts and archived quests read as not found.
pub async fn get_quest_by_share_code(
    client: &DynamoClient,
    table_name: &str,
    share_code: &str,
) -> Result<Quest, String> {
    let code = share_code.trim().to_uppercase();

    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("SHARE".to_string()))
        .key("SK", AttributeValue::S(format!("SHARE#{}", code)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    let quest_id = result
        .item()
        .and_then(|item| item::string(item, "quest_id"))
        .ok_or_else(|| "Quest not found".to_string())?;

    let quest = get_quest(client, table_name, &quest_id).await?;
    if quest.status != QuestStatus::Published {
        return Err("Quest not found".to_string());
    }

    Ok(quest)
}

/// Delete a quest with its tasks and share pointer
pub async fn delete_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<(), String> {
    let quest = get_quest(client, table_name, quest_id).await?;

    let tasks = crate::tasks::service::load_tasks_for_quest(client, table_name, quest_id).await?;
    for task in tasks {
        crate::tasks::service::delete_task(client, table_name, quest_id, &task.task_id).await?;
    }

    if let Some(code) = &quest.share_code {
        client
            .delete_item()
            .table_name(table_name)
            .key("PK", AttributeValue::S("SHARE".to_string()))
            .key("SK", AttributeValue::S(format!("SHARE#{}", code)))
            .send()
            .await
            .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;
    }

    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S("QUEST".to_string()))
        .key("SK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB delete_item error: {}", e))?;

    Ok(())
}
