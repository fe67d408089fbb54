use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{Body, Error, Response, http::StatusCode};
use questmas_atoms::clock::Clock;
use questmas_atoms::participation::{self, CompleteTaskPayload, Participant, ParticipantStatus, TaskCompletion};
use questmas_atoms::respond;
use questmas_atoms::tasks::{self, is_unlocked, Task};
use serde::Serialize;
use std::collections::HashSet;

use crate::calendar::{all_tasks_completed, build_calendar, Door};

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub participant: Participant,
    pub doors: Vec<Door>,
    pub completed_count: usize,
    pub all_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct CompletionResult {
    pub completion: TaskCompletion,
    /// The participant just finished the whole quest
    pub quest_completed: bool,
}

/// GET /quests/{quest_id}/participants/{participant_id}/calendar
pub async fn get_calendar<C: Clock + ?Sized>(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
    clock: &C,
    open_all_doors: bool,
) -> Result<Response<Body>, Error> {
    let participant = match participation::get_participant(client, table_name, quest_id, participant_id).await {
        Ok(p) => p,
        Err(e) => return respond::service_error(&e),
    };

    // 1) Tasks of the quest
    let task_rows = match tasks::load_tasks_for_quest(client, table_name, quest_id).await {
        Ok(rows) => rows,
        Err(e) => {
            tracing::error!("❌ get_calendar tasks failed: quest_id={}, error={}", quest_id, e);
            return respond::service_error(&e);
        }
    };

    // 2) What this participant already did
    let completed =
        match participation::load_completed_task_ids(client, table_name, quest_id, participant_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(
                    "❌ get_calendar completions failed: participant_id={}, error={}",
                    participant_id,
                    e
                );
                return respond::service_error(&e);
            }
        };

    // 3) Join into doors
    let doors = build_calendar(&task_rows, &completed, clock, open_all_doors);

    tracing::info!(
        "📅 get_calendar: quest_id={}, participant_id={}, today={}, tasks={}, completed={}",
        quest_id,
        participant_id,
        clock.today(),
        task_rows.len(),
        completed.len(),
    );

    respond::json(
        StatusCode::OK,
        &CalendarView {
            participant,
            completed_count: completed.len(),
            all_completed: all_tasks_completed(&task_rows, &completed),
            doors,
        },
    )
}

/// POST /quests/{quest_id}/participants/{participant_id}/tasks/{task_id}/complete
///
/// Locked tasks are refused with 403 and wrong answers with 422. Completing the last open
/// task marks the participant completed.
#[allow(clippy::too_many_arguments)]
pub async fn complete_task<C: Clock + ?Sized>(
    client: &DynamoClient,
    table_name: &str,
    quest_id: &str,
    participant_id: &str,
    task_id: &str,
    body: &[u8],
    clock: &C,
    open_all_doors: bool,
) -> Result<Response<Body>, Error> {
    let payload: CompleteTaskPayload = if body.is_empty() {
        CompleteTaskPayload::default()
    } else {
        serde_json::from_slice(body)?
    };

    let participant = match participation::get_participant(client, table_name, quest_id, participant_id).await {
        Ok(p) => p,
        Err(e) => return respond::service_error(&e),
    };

    let task_rows = match tasks::load_tasks_for_quest(client, table_name, quest_id).await {
        Ok(rows) => rows,
        Err(e) => return respond::service_error(&e),
    };
    let Some(task) = task_rows.iter().find(|t| t.task_id == task_id) else {
        return respond::error(StatusCode::NOT_FOUND, "Task not found");
    };

    let mut completed =
        match participation::load_completed_task_ids(client, table_name, quest_id, participant_id).await {
            Ok(ids) => ids,
            Err(e) => return respond::service_error(&e),
        };

    if let Err((status, reason)) =
        completion_gate(task, &task_rows, &completed, clock, open_all_doors, payload.answer.as_deref())
    {
        tracing::warn!(
            "🔒 complete_task rejected: participant_id={}, task_id={}, today={}, reason={}",
            participant_id,
            task_id,
            clock.today(),
            reason,
        );
        return respond::error(status, reason);
    }

    let completion = match participation::complete_task(
        client,
        table_name,
        quest_id,
        participant_id,
        task_id,
        payload.answer.map(|a| a.trim().to_string()),
        Some(task.points),
        payload.photo_url,
    )
    .await
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(
                "❌ complete_task failed: participant_id={}, task_id={}, error={}",
                participant_id,
                task_id,
                e
            );
            return respond::service_error(&e);
        }
    };

    completed.insert(task_id.to_string());
    let quest_completed = finishes_quest(participant.status, &task_rows, &completed);

    if quest_completed {
        if let Err(e) = participation::update_participant_status(
            client,
            table_name,
            quest_id,
            participant_id,
            ParticipantStatus::Completed,
        )
        .await
        {
            return respond::service_error(&e);
        }
        tracing::info!("🏁 Quest completed: quest_id={}, participant_id={}", quest_id, participant_id);
    }

    tracing::info!(
        "✅ complete_task success: participant_id={}, task_id={}, points={}",
        participant_id,
        task_id,
        completion.points_earned,
    );

    respond::json(StatusCode::OK, &CompletionResult { completion, quest_completed })
}

/// Whether a participant may complete `task` now: 403 while it is locked, 422 for a wrong answer.
pub fn completion_gate<C: Clock + ?Sized>(
    task: &Task,
    tasks: &[Task],
    completed: &HashSet<String>,
    clock: &C,
    open_all_doors: bool,
    answer: Option<&str>,
) -> Result<(), (StatusCode, &'static str)> {
    if !open_all_doors && !is_unlocked(task, tasks, completed, clock) {
        return Err((StatusCode::FORBIDDEN, "Task is locked"));
    }
    if !task.check_answer(answer) {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "Wrong answer"));
    }
    Ok(())
}

/// True when `completed` (after the new completion) covers the quest for the first time.
pub fn finishes_quest(status: ParticipantStatus, tasks: &[Task], completed: &HashSet<String>) -> bool {
    status != ParticipantStatus::Completed && all_tasks_completed(tasks, completed)
}
