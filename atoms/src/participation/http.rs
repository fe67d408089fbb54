use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response, http::StatusCode};
use super::model::CreateParticipantPayload;
use super::service;
use crate::respond;

/// POST /quests/{quest_id}/participants
///
/// Re-joining with the same user id (or guest email) returns the existing participant.
pub async fn join_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    user_id: Option<&str>,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let mut payload: CreateParticipantPayload = if body.is_empty() {
        CreateParticipantPayload::default()
    } else {
        serde_json::from_slice(body)?
    };
    // A signed-in caller always joins as themselves
    if let Some(uid) = user_id {
        payload.user_id = Some(uid.to_string());
    }

    let existing = service::find_participant(
        client,
        table_name,
        quest_id,
        payload.user_id.as_deref(),
        payload.guest_email.as_deref(),
    )
    .await;

    match existing {
        Ok(Some(participant)) => return respond::json(StatusCode::OK, &participant),
        Ok(None) => {}
        Err(e) => {
            tracing::error!("❌ join_quest lookup failed: quest_id={}, error={}", quest_id, e);
            return respond::service_error(&e);
        }
    }

    match service::create_participant(client, table_name, quest_id, payload).await {
        Ok(participant) => {
            tracing::info!(
                "✅ join_quest success: quest_id={}, participant_id={}, guest={}",
                quest_id,
                participant.participant_id,
                participant.is_guest,
            );
            respond::json(StatusCode::CREATED, &participant)
        }
        Err(e) => {
            tracing::error!("❌ join_quest failed: quest_id={}, error={}", quest_id, e);
            respond::service_error(&e)
        }
    }
}

pub async fn get_participant(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
) -> Result<Response<Body>, Error> {
    match service::get_participant(client, table_name, quest_id, participant_id).await {
        Ok(participant) => respond::json(StatusCode::OK, &participant),
        Err(e) => respond::service_error(&e),
    }
}

/// GET /quests/{quest_id}/participants/{participant_id}/completions
///
/// 404 unless the participant belongs to `quest_id`.
pub async fn list_completions(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
) -> Result<Response<Body>, Error> {
    if let Err(e) = service::get_participant(client, table_name, quest_id, participant_id).await {
        return respond::service_error(&e);
    }

    match service::load_completions(client, table_name, quest_id, participant_id).await {
        Ok(completions) => respond::json(StatusCode::OK, &completions),
        Err(e) => {
            tracing::error!(
                "❌ list_completions failed: quest_id={}, participant_id={}, error={}",
                quest_id,
                participant_id,
                e
            );
            respond::service_error(&e)
        }
    }
}
