use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response, http::StatusCode};
use super::model::{CreateQuestPayload, UpdateQuestPayload};
use super::service;
use crate::clock::Clock;
use crate::respond;

/// POST /quests
pub async fn create_quest<C: Clock + ?Sized>(
    client: &DynamoClient,
    table_name: &str,
    creator_id: &str,
    body: &[u8],
    clock: &C,
) -> Result<Response<Body>, Error> {
    tracing::info!(
        "📥 create_quest: table={}, creator_id={}, raw_body={}",
        table_name,
        creator_id,
        String::from_utf8_lossy(body),
    );

    let payload: CreateQuestPayload = serde_json::from_slice(body)?;

    match service::create_quest(client, table_name, creator_id, payload, clock).await {
        Ok(quest) => {
            tracing::info!(
                "✅ create_quest success: quest_id={}, type={}",
                quest.quest_id,
                quest.quest_type.as_str(),
            );
            respond::json(StatusCode::CREATED, &quest)
        }
        Err(e) => {
            tracing::error!("❌ create_quest failed: creator_id={}, error={}", creator_id, e);
            respond::service_error(&e)
        }
    }
}

/// GET /quests
pub async fn list_creator_quests(
    client: &DynamoClient,
    table_name: &str,
    creator_id: &str,
) -> Result<Response<Body>, Error> {
    match service::list_quests_for_creator(client, table_name, creator_id).await {
        Ok(quests) => respond::json(StatusCode::OK, &quests),
        Err(e) => {
            tracing::error!("❌ list_creator_quests failed: creator_id={}, error={}", creator_id, e);
            respond::service_error(&e)
        }
    }
}

pub async fn get_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Response<Body>, Error> {
    match service::get_quest(client, table_name, quest_id).await {
        Ok(quest) => respond::json(StatusCode::OK, &quest),
        Err(e) => respond::service_error(&e),
    }
}

pub async fn update_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateQuestPayload = serde_json::from_slice(body)?;

    match service::update_quest(client, table_name, quest_id, payload).await {
        Ok(quest) => respond::json(StatusCode::OK, &quest),
        Err(e) => {
            tracing::error!("❌ update_quest failed: quest_id={}, error={}", quest_id, e);
            respond::service_error(&e)
        }
    }
}

pub async fn delete_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Response<Body>, Error> {
    match service::delete_quest(client, table_name, quest_id).await {
        Ok(()) => respond::no_content(),
        Err(e) => {
            tracing::error!("❌ delete_quest failed: quest_id={}, error={}", quest_id, e);
            respond::service_error(&e)
        }
    }
}

/// POST /quests/{quest_id}/publish
pub async fn publish_quest(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Response<Body>, Error> {
    match service::publish_quest(client, table_name, quest_id).await {
        Ok(quest) => respond::json(StatusCode::OK, &quest),
        Err(e) => {
            tracing::error!("❌ publish_quest failed: quest_id={}, error={}", quest_id, e);
            respond::service_error(&e)
        }
    }
}

/// GET /share/{code} - public
pub async fn get_shared_quest(
    client: &DynamoClient,
    table_name: &str,
    share_code: &str,
) -> Result<Response<Body>, Error> {
    match service::get_quest_by_share_code(client, table_name, share_code).await {
        Ok(quest) => respond::json(StatusCode::OK, &quest),
        Err(e) => respond::service_error(&e),
    }
}
