use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response, http::StatusCode};
use questmas_atoms::quests::{self, QuestType};
use questmas_atoms::respond;
use questmas_shared::sharing::{personalized_greeting, viral_message, SharePlatform};
use serde::Deserialize;

/// GET /share-text?platform=&task_title=&quest_title=
pub fn share_text(
    platform: Option<&str>,
    task_title: Option<&str>,
    quest_title: Option<&str>,
) -> Result<Response<Body>, Error> {
    let platform = platform.map(SharePlatform::parse).unwrap_or_default();
    let text = viral_message(platform, task_title, quest_title);

    respond::json(
        StatusCode::OK,
        &serde_json::json!({ "platform": platform, "text": text }),
    )
}

#[derive(Debug, Deserialize, Default)]
pub struct GreetingPayload {
    pub sharer_name: String,
    /// Fills in the recipient, title and kind from the stored quest
    pub quest_id: Option<String>,
    pub recipient_name: Option<String>,
    pub quest_title: Option<String>,
    pub is_christmas_calendar: Option<bool>,
}

/// POST /greeting
pub async fn greeting(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: GreetingPayload = serde_json::from_slice(body)?;
    if payload.sharer_name.trim().is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "sharer_name is required");
    }

    let quest = match payload.quest_id.as_deref() {
        Some(quest_id) => match quests::get_quest(client, table_name, quest_id).await {
            Ok(q) => Some(q),
            Err(e) => return respond::service_error(&e),
        },
        None => None,
    };

    let recipient = payload
        .recipient_name
        .or_else(|| quest.as_ref().and_then(|q| q.recipient_first_name.clone()))
        .unwrap_or_default();
    let quest_title = payload
        .quest_title
        .or_else(|| quest.as_ref().map(|q| q.title.clone()))
        .unwrap_or_default();
    let is_christmas_calendar = payload
        .is_christmas_calendar
        .or_else(|| quest.as_ref().map(|q| q.quest_type == QuestType::ChristmasCalendar))
        .unwrap_or(true);

    let text = personalized_greeting(
        &recipient,
        &payload.sharer_name,
        &quest_title,
        is_christmas_calendar,
        &mut rand::thread_rng(),
    );

    respond::json(StatusCode::OK, &serde_json::json!({ "greeting": text }))
}
