use lambda_http::{Body, Error, Response, http::StatusCode};
use serde::Serialize;

/// JSON response with the CORS header every handler sets.
pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(value)?.into())
        .map_err(Box::new)?)
}

/// `{ "error": message }`
pub fn error(status: StatusCode, message: &str) -> Result<Response<Body>, Error> {
    json(status, &serde_json::json!({ "error": message }))
}

pub fn no_content() -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Empty)
        .map_err(Box::new)?)
}

/// Services report missing rows as `"<Entity> not found"`.
pub fn service_error(e: &str) -> Result<Response<Body>, Error> {
    if e.ends_with("not found") {
        error(StatusCode::NOT_FOUND, e)
    } else {
        error(StatusCode::INTERNAL_SERVER_ERROR, e)
    }
}
