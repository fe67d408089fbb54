use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response, http::StatusCode};
use super::model::{CreateTaskPayload, UpdateTaskPayload};
use super::service;
use crate::respond;

/// POST /quests/{quest_id}/tasks
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: CreateTaskPayload = serde_json::from_slice(body)?;

    match service::create_task(client, table_name, quest_id, payload).await {
        Ok(task) => {
            tracing::info!(
                "✅ create_task success: quest_id={}, task_id={}, trigger={}",
                quest_id,
                task.task_id,
                task.unlock_trigger.as_str(),
            );
            respond::json(StatusCode::CREATED, &task)
        }
        Err(e) => {
            tracing::error!("❌ create_task failed: quest_id={}, error={}", quest_id, e);
            respond::service_error(&e)
        }
    }
}

/// GET /quests/{quest_id}/tasks (ordered by order_index)
pub async fn list_quest_tasks(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
) -> Result<Response<Body>, Error> {
    match service::load_tasks_for_quest(client, table_name, quest_id).await {
        Ok(tasks) => respond::json(StatusCode::OK, &tasks),
        Err(e) => {
            tracing::error!("❌ list_quest_tasks failed: quest_id={}, error={}", quest_id, e);
            respond::service_error(&e)
        }
    }
}

pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    match service::get_task(client, table_name, quest_id, task_id).await {
        Ok(task) => respond::json(StatusCode::OK, &task),
        Err(e) => respond::service_error(&e),
    }
}

pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let payload: UpdateTaskPayload = serde_json::from_slice(body)?;

    match service::update_task(client, table_name, quest_id, task_id, payload).await {
        Ok(task) => respond::json(StatusCode::OK, &task),
        Err(e) => {
            tracing::error!(
                "❌ update_task failed: quest_id={}, task_id={}, error={}",
                quest_id,
                task_id,
                e
            );
            respond::service_error(&e)
        }
    }
}

pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    match service::delete_task(client, table_name, quest_id, task_id).await {
        Ok(()) => respond::no_content(),
        Err(e) => respond::service_error(&e),
    }
}
