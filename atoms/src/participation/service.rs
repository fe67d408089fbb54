use aws_sdk_dynamodb::Client as DynamoClient;
use aws_sdk_dynamodb::operation::query::builders::QueryFluentBuilder;
use aws_sdk_dynamodb::types::AttributeValue;
use super::model::{
    Participant, ParticipantStatus, TaskCompletion, CreateParticipantPayload,
};
use crate::item::{self, Item};
use std::collections::HashSet;

pub const DEFAULT_COMPLETION_POINTS: u32 = 10;

pub fn participant_from_item(quest_id: &str, participant_id: &str, item: &Item) -> Participant {
    Participant {
        participant_id: participant_id.to_string(),
        quest_id: quest_id.to_string(),
        user_id: item::string(item, "user_id"),
        is_guest: item::boolean(item, "is_guest").unwrap_or(false),
        guest_email: item::string(item, "guest_email"),
        status: item::string(item, "status")
            .and_then(|s| ParticipantStatus::parse(&s))
            .unwrap_or(ParticipantStatus::Active),
        started_at: item::string(item, "started_at").unwrap_or_default(),
        completed_at: item::string(item, "completed_at"),
        total_points: item::number(item, "total_points").unwrap_or(0),
    }
}

pub fn completion_from_item(participant_id: &str, task_id: &str, item: &Item) -> TaskCompletion {
    TaskCompletion {
        completion_id: item::string(item, "completion_id").unwrap_or_default(),
        participant_id: participant_id.to_string(),
        task_id: task_id.to_string(),
        answer: item::string(item, "answer"),
        photo_url: item::string(item, "photo_url"),
        photo_data_url: item::string(item, "photo_data_url"),
        points_earned: item::number(item, "points_earned").unwrap_or(0),
        hints_used: item::number(item, "hints_used").unwrap_or(0),
        attempts: item::number(item, "attempts").unwrap_or(1),
        completed_at: item::string(item, "completed_at").unwrap_or_default(),
    }
}

/// Splits a submitted photo into `(photo_url, photo_data_url)`.
pub fn photo_fields(photo: Option<String>) -> (Option<String>, Option<String>) {
    match photo {
        Some(p) if p.starts_with("data:") => (None, Some(p)),
        Some(p) if !p.trim().is_empty() => (Some(p), None),
        _ => (None, None),
    }
}

/// Join a quest. Without a user id the participant is a guest unless told otherwise.
pub async fn create_participant(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    payload: CreateParticipantPayload,
) -> Result<Participant, String> {
    let participant_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let is_guest = payload.is_guest.unwrap_or(payload.user_id.is_none());

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .item("SK", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .item("is_guest", AttributeValue::Bool(is_guest))
        .item("status", AttributeValue::S(ParticipantStatus::Active.as_str().to_string()))
        .item("started_at", AttributeValue::S(now.clone()))
        .item("total_points", AttributeValue::N("0".to_string()));

    if let Some(user_id) = &payload.user_id {
        builder = builder.item("user_id", AttributeValue::S(user_id.clone()));
    }
    if let Some(email) = &payload.guest_email {
        builder = builder.item("guest_email", AttributeValue::S(email.clone()));
    }

    builder.send().await.map_err(|e| format!("DynamoDB put_item error: {}", e))?;

    Ok(Participant {
        participant_id,
        quest_id: quest_id.to_string(),
        user_id: payload.user_id,
        is_guest,
        guest_email: payload.guest_email,
        status: ParticipantStatus::Active,
        started_at: now,
        completed_at: None,
        total_points: 0,
    })
}

pub async fn get_participant(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
) -> Result<Participant, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .key("SK", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    match result.item() {
        Some(item) => Ok(participant_from_item(quest_id, participant_id, item)),
        None => Err("Participant not found".to_string()),
    }
}

/// Look a participant up by user id, or by guest email among guests.
pub async fn find_participant(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    user_id: Option<&str>,
    guest_email: Option<&str>,
) -> Result<Option<Participant>, String> {
    if user_id.is_none() && guest_email.is_none() {
        return Ok(None);
    }

    let items = item::query_all(
        client
            .query()
            .table_name(table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(format!("QUEST#{}", quest_id)))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("PARTICIPANT#".to_string())),
    )
    .await?;

    let found = items
        .iter()
        .filter_map(|item| {
            item::id_from_sk(item, "PARTICIPANT#")
                .map(|participant_id| participant_from_item(quest_id, &participant_id, item))
        })
        .find(|p| match (user_id, guest_email) {
            (Some(uid), _) => p.user_id.as_deref() == Some(uid),
            (None, Some(email)) => p.is_guest && p.guest_email.as_deref() == Some(email),
            (None, None) => false,
        });

    Ok(found)
}

fn completions_query(client: &DynamoClient, table_name: &str, participant_id: &str) -> QueryFluentBuilder {
    client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("COMPLETION#".to_string()))
}

/// Completion items carry the quest they were recorded under. Items without one predate
/// that attribute and are kept.
pub fn completion_in_quest(item: &Item, quest_id: &str) -> bool {
    item::string(item, "quest_id").map_or(true, |q| q == quest_id)
}

/// Completions of a participant in `quest_id`, oldest first
pub async fn load_completions(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
) -> Result<Vec<TaskCompletion>, String> {
    let items = item::query_all(completions_query(client, table_name, participant_id)).await?;

    let mut completions: Vec<TaskCompletion> = items
        .iter()
        .filter(|item| completion_in_quest(item, quest_id))
        .filter_map(|item| {
            item::id_from_sk(item, "COMPLETION#")
                .map(|task_id| completion_from_item(participant_id, &task_id, item))
        })
        .collect();

    completions.sort_by(|a, b| a.completed_at.cmp(&b.completed_at));

    Ok(completions)
}

/// Task ids from completion items read with only `SK` and `quest_id` projected.
pub fn completed_ids_from_items(items: &[Item], quest_id: &str) -> HashSet<String> {
    items
        .iter()
        .filter(|item| completion_in_quest(item, quest_id))
        .filter_map(|item| item::id_from_sk(item, "COMPLETION#"))
        .collect()
}

/// The completion set the unlock rules run against. Skips the inline photo payloads.
pub async fn load_completed_task_ids(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
) -> Result<HashSet<String>, String> {
    let items = item::query_all(
        completions_query(client, table_name, participant_id).projection_expression("SK, quest_id"),
    )
    .await?;

    Ok(completed_ids_from_items(&items, quest_id))
}

async fn get_completion(
    client: &DynamoClient,
    table_name: &str,
    participant_id: &str,
    task_id: &str,
) -> Result<Option<TaskCompletion>, String> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .key("SK", AttributeValue::S(format!("COMPLETION#{}", task_id)))
        .send()
        .await
        .map_err(|e| format!("DynamoDB get_item error: {}", e))?;

    Ok(result
        .item()
        .map(|item| completion_from_item(participant_id, task_id, item)))
}

/// Record that a participant finished a task.
///
/// Completing twice returns the first completion and awards no extra points.
#[allow(clippy::too_many_arguments)]
pub async fn complete_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
    task_id: &str,
    answer: Option<String>,
    points: Option<u32>,
    photo: Option<String>,
) -> Result<TaskCompletion, String> {
    if let Some(existing) = get_completion(client, table_name, participant_id, task_id).await? {
        tracing::info!(
            "↩️ Task already completed: participant_id={}, task_id={}",
            participant_id,
            task_id
        );
        return Ok(existing);
    }

    let completion_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();
    let points_earned = points.unwrap_or(DEFAULT_COMPLETION_POINTS);
    let (photo_url, photo_data_url) = photo_fields(photo);

    let mut builder = client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .item("SK", AttributeValue::S(format!("COMPLETION#{}", task_id)))
        .item("completion_id", AttributeValue::S(completion_id.clone()))
        .item("quest_id", AttributeValue::S(quest_id.to_string()))
        .item("points_earned", AttributeValue::N(points_earned.to_string()))
        .item("hints_used", AttributeValue::N("0".to_string()))
        .item("attempts", AttributeValue::N("1".to_string()))
        .item("completed_at", AttributeValue::S(now.clone()))
        .condition_expression("attribute_not_exists(SK)");

    if let Some(answer) = answer.as_ref().filter(|a| !a.is_empty()) {
        builder = builder.item("answer", AttributeValue::S(answer.clone()));
    }
    if let Some(url) = &photo_url {
        builder = builder.item("photo_url", AttributeValue::S(url.clone()));
    }
    if let Some(data_url) = &photo_data_url {
        builder = builder.item("photo_data_url", AttributeValue::S(data_url.clone()));
    }

    match builder.send().await {
        Ok(_) => {}
        // Lost a race against a concurrent completion of the same task
        Err(e)
            if e
                .as_service_error()
                .map(|se| se.is_conditional_check_failed_exception())
                .unwrap_or(false) =>
        {
            return get_completion(client, table_name, participant_id, task_id)
                .await?
                .ok_or_else(|| "Completion not found".to_string());
        }
        Err(e) => return Err(format!("DynamoDB put_item error: {}", e)),
    }

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .key("SK", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .update_expression("SET total_points = if_not_exists(total_points, :zero) + :points")
        .expression_attribute_values(":zero", AttributeValue::N("0".to_string()))
        .expression_attribute_values(":points", AttributeValue::N(points_earned.to_string()))
        .send()
        .await
        .map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    Ok(TaskCompletion {
        completion_id,
        participant_id: participant_id.to_string(),
        task_id: task_id.to_string(),
        answer: answer.filter(|a| !a.is_empty()),
        photo_url,
        photo_data_url,
        points_earned,
        hints_used: 0,
        attempts: 1,
        completed_at: now,
    })
}

/// Set the participant status; completing also stamps `completed_at`.
pub async fn update_participant_status(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
    status: ParticipantStatus,
) -> Result<Participant, String> {
    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(format!("QUEST#{}", quest_id)))
        .key("SK", AttributeValue::S(format!("PARTICIPANT#{}", participant_id)))
        .condition_expression("attribute_exists(SK)")
        .expression_attribute_names("#status", "status")
        .expression_attribute_values(":status", AttributeValue::S(status.as_str().to_string()));

    builder = if status == ParticipantStatus::Completed {
        builder
            .update_expression("SET #status = :status, completed_at = :now")
            .expression_attribute_values(":now", AttributeValue::S(chrono::Utc::now().to_rfc3339()))
    } else {
        builder.update_expression("SET #status = :status")
    };

    builder.send().await.map_err(|e| format!("DynamoDB update_item error: {}", e))?;

    get_participant(client, table_name, quest_id, participant_id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_urls_are_kept_out_of_photo_url() {
        let inline = "data:image/jpeg;base64,/9j/4AAQ".to_string();
        assert_eq!(photo_fields(Some(inline.clone())), (None, Some(inline)));

        let hosted = "https://cdn.example.com/p.jpg".to_string();
        assert_eq!(photo_fields(Some(hosted.clone())), (Some(hosted), None));

        assert_eq!(photo_fields(Some("  ".to_string())), (None, None));
        assert_eq!(photo_fields(None), (None, None));
    }

    #[test]
    fn completion_items_default_to_a_single_attempt() {
        let mut item = Item::new();
        item.insert("points_earned".to_string(), AttributeValue::N("10".to_string()));
        let completion = completion_from_item("p1", "t1", &item);

        assert_eq!(completion.attempts, 1);
        assert_eq!(completion.points_earned, 10);
        assert_eq!(completion.task_id, "t1");
    }

    #[test]
    fn completion_ids_come_from_projected_items_of_the_quest() {
        let projected = |task_id: &str, quest_id: Option<&str>| {
            let mut item = Item::new();
            item.insert("SK".to_string(), AttributeValue::S(format!("COMPLETION#{}", task_id)));
            if let Some(q) = quest_id {
                item.insert("quest_id".to_string(), AttributeValue::S(q.to_string()));
            }
            item
        };
        let items = vec![
            projected("t1", Some("q1")),
            projected("t2", None),
            projected("t3", Some("q2")),
        ];

        let ids = completed_ids_from_items(&items, "q1");
        assert_eq!(ids, HashSet::from(["t1".to_string(), "t2".to_string()]));
        assert!(!completion_in_quest(&items[2], "q1"));
    }
}
