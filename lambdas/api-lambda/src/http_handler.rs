use calendar_block::{doors, photos, share};
use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Request, RequestExt, Response,
};
use lambda_http::http::header::{HeaderValue, VARY};
use questmas_atoms::{participation, quests, tasks, SystemClock};
use questmas_shared::AppState;
use std::sync::Arc;

fn with_cors_headers(mut resp: Response<Body>, allowed_origin: &str) -> Response<Body> {
    let headers = resp.headers_mut();
    headers.insert(
        "Access-Control-Allow-Origin",
        HeaderValue::from_str(allowed_origin).unwrap_or_else(|_| HeaderValue::from_static("*")),
    );
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET,POST,PATCH,DELETE,OPTIONS"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type,Authorization,X-User-Id"),
    );
    headers.append(VARY, HeaderValue::from_static("Origin"));

    resp
}

fn finalize_response(
    resp: Result<Response<Body>, Error>,
    allowed_origin: &str,
) -> Result<Response<Body>, Error> {
    resp.map(|r| with_cors_headers(r, allowed_origin))
}

/// Main Lambda handler - routes every endpoint
pub(crate) async fn function_handler(
    event: Request,
    state: Arc<AppState>,
) -> Result<Response<Body>, Error> {
    let method = event.method();
    let path = event.uri().path();
    let body = event.body();
    let user_id = event
        .headers()
        .get("X-User-Id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let config = &state.config;
    let client = &state.dynamo_client;
    let table_name = config.table_name.as_str();
    let origin = config.allowed_origin.as_str();
    let clock = config.test_mode.clock(SystemClock);

    tracing::info!("🚀 Questmas API invoked - Method: {} Path: {}", method, path);

    // Handle CORS preflight
    if *method == Method::OPTIONS {
        let resp = Response::builder()
            .status(StatusCode::OK)
            .body(Body::Empty)
            .map_err(Box::new)?;
        return Ok(with_cors_headers(resp, origin));
    }

    let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let query = event.query_string_parameters();

    let resp = match (method, parts.as_slice()) {
        // --- QUESTS (creator) ---
        // POST /quests - create quest
        (&Method::POST, ["quests"]) => match user_id {
            Some(uid) => quests::http::create_quest(client, table_name, uid, body, &clock).await,
            None => unauthorized(),
        },
        // GET /quests - quests of the caller
        (&Method::GET, ["quests"]) => match user_id {
            Some(uid) => quests::http::list_creator_quests(client, table_name, uid).await,
            None => unauthorized(),
        },
        // GET /quests/{id}
        (&Method::GET, ["quests", quest_id]) => {
            quests::http::get_quest(client, table_name, quest_id).await
        }
        // PATCH /quests/{id}
        (&Method::PATCH, ["quests", quest_id]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            quests::http::update_quest(client, table_name, quest_id, body).await
        }
        // DELETE /quests/{id} - also removes tasks and the share code
        (&Method::DELETE, ["quests", quest_id]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            quests::http::delete_quest(client, table_name, quest_id).await
        }
        // POST /quests/{id}/publish
        (&Method::POST, ["quests", quest_id, "publish"]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            quests::http::publish_quest(client, table_name, quest_id).await
        }

        // --- TASKS ---
        // GET /quests/{id}/tasks - full tasks with answers, participants use the calendar
        (&Method::GET, ["quests", quest_id, "tasks"]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            tasks::http::list_quest_tasks(client, table_name, quest_id).await
        }
        // POST /quests/{id}/tasks
        (&Method::POST, ["quests", quest_id, "tasks"]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            tasks::http::create_task(client, table_name, quest_id, body).await
        }
        // GET /quests/{id}/tasks/{tid}
        (&Method::GET, ["quests", quest_id, "tasks", task_id]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            tasks::http::get_task(client, table_name, quest_id, task_id).await
        }
        // PATCH /quests/{id}/tasks/{tid}
        (&Method::PATCH, ["quests", quest_id, "tasks", task_id]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            tasks::http::update_task(client, table_name, quest_id, task_id, body).await
        }
        // DELETE /quests/{id}/tasks/{tid}
        (&Method::DELETE, ["quests", quest_id, "tasks", task_id]) => {
            if let Err(resp) = require_creator(&state, quest_id, user_id).await {
                return finalize_response(Ok(resp), origin);
            }
            tasks::http::delete_task(client, table_name, quest_id, task_id).await
        }

        // --- SHARE CODES ---
        // GET /share/{code} - published quest behind a share code
        (&Method::GET, ["share", share_code]) => {
            quests::http::get_shared_quest(client, table_name, share_code).await
        }

        // --- PARTICIPANTS ---
        // POST /quests/{id}/participants - join as user or guest
        (&Method::POST, ["quests", quest_id, "participants"]) => {
            participation::http::join_quest(client, table_name, quest_id, user_id, body).await
        }
        // GET /quests/{id}/participants/{pid}
        (&Method::GET, ["quests", quest_id, "participants", participant_id]) => {
            participation::http::get_participant(client, table_name, quest_id, participant_id).await
        }
        // GET /quests/{id}/participants/{pid}/completions
        (&Method::GET, ["quests", quest_id, "participants", participant_id, "completions"]) => {
            participation::http::list_completions(client, table_name, quest_id, participant_id).await
        }
        // GET /quests/{id}/participants/{pid}/calendar - the 24 doors
        (&Method::GET, ["quests", quest_id, "participants", participant_id, "calendar"]) => {
            doors::get_calendar(
                client,
                table_name,
                quest_id,
                participant_id,
                &clock,
                config.open_all_doors,
            )
            .await
        }
        // POST /quests/{id}/participants/{pid}/tasks/{tid}/complete
        (
            &Method::POST,
            ["quests", quest_id, "participants", participant_id, "tasks", task_id, "complete"],
        ) => {
            doors::complete_task(
                client,
                table_name,
                quest_id,
                participant_id,
                task_id,
                body,
                &clock,
                config.open_all_doors,
            )
            .await
        }

        // --- PHOTOS & SHARING ---
        // POST /photos/watermark?caption=&title=&locale=&frame=
        (&Method::POST, ["photos", "watermark"]) => {
            let watermark_query = photos::WatermarkQuery {
                caption: query.first("caption").map(str::to_string),
                title: query.first("title").map(str::to_string),
                locale: query.first("locale").map(str::to_string),
                frame: query.first("frame").map(str::to_string),
            };
            photos::watermark_photo(body, &watermark_query, config.default_locale)
        }
        // GET /share-text?platform=&task_title=&quest_title=
        (&Method::GET, ["share-text"]) => share::share_text(
            query.first("platform"),
            query.first("task_title"),
            query.first("quest_title"),
        ),
        // POST /greeting
        (&Method::POST, ["greeting"]) => share::greeting(client, table_name, body).await,

        (_, route) if is_known_route(route) => method_not_allowed(),
        _ => not_found(),
    };

    finalize_response(resp, origin)
}

/// Creator-only routes: caller must send `X-User-Id` matching the quest's creator.
async fn require_creator(
    state: &AppState,
    quest_id: &str,
    user_id: Option<&str>,
) -> Result<(), Response<Body>> {
    let Some(uid) = user_id else {
        return Err(error_response(StatusCode::UNAUTHORIZED, "Missing X-User-Id"));
    };

    match quests::get_quest(&state.dynamo_client, &state.config.table_name, quest_id).await {
        Ok(quest) if quest.creator_id == uid => Ok(()),
        Ok(_) => {
            tracing::warn!("🚫 Creator check failed: quest_id={}, user_id={}", quest_id, uid);
            Err(error_response(StatusCode::FORBIDDEN, "Not the creator of this quest"))
        }
        Err(e) if e.ends_with("not found") => Err(error_response(StatusCode::NOT_FOUND, &e)),
        Err(e) => {
            tracing::error!("❌ Creator check failed: quest_id={}, error={}", quest_id, e);
            Err(error_response(StatusCode::INTERNAL_SERVER_ERROR, &e))
        }
    }
}

/// Path shapes served by some method, for telling 405 from 404.
fn is_known_route(parts: &[&str]) -> bool {
    matches!(
        parts,
        ["quests"]
            | ["quests", _]
            | ["quests", _, "publish"]
            | ["quests", _, "tasks"]
            | ["quests", _, "tasks", _]
            | ["share", _]
            | ["quests", _, "participants"]
            | ["quests", _, "participants", _]
            | ["quests", _, "participants", _, "completions" | "calendar"]
            | ["quests", _, "participants", _, "tasks", _, "complete"]
            | ["photos", "watermark"]
            | ["share-text"]
            | ["greeting"]
    )
}

fn error_response(status: StatusCode, message: &str) -> Response<Body> {
    let mut resp = Response::new(Body::from(serde_json::json!({ "error": message }).to_string()));
    *resp.status_mut() = status;
    resp.headers_mut()
        .insert("Content-Type", HeaderValue::from_static("application/json"));
    resp
}

fn unauthorized() -> Result<Response<Body>, Error> {
    Ok(error_response(StatusCode::UNAUTHORIZED, "Missing X-User-Id"))
}

fn method_not_allowed() -> Result<Response<Body>, Error> {
    Ok(error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed"))
}

fn not_found() -> Result<Response<Body>, Error> {
    Ok(error_response(StatusCode::NOT_FOUND, "Not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_routes() {
        assert!(is_known_route(&["quests"]));
        assert!(is_known_route(&["quests", "q1", "participants", "p1", "calendar"]));
        assert!(is_known_route(&["quests", "q1", "participants", "p1", "tasks", "t1", "complete"]));
        assert!(!is_known_route(&["quests", "q1", "participants", "p1", "inbox"]));
        assert!(!is_known_route(&[]));
    }

    #[test]
    fn error_responses_are_json() {
        let resp = error_response(StatusCode::NOT_FOUND, "Not found");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
    }

    #[test]
    fn cors_uses_configured_origin() {
        let resp = with_cors_headers(error_response(StatusCode::OK, "x"), "https://questmas.app");
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "https://questmas.app");
    }
}
