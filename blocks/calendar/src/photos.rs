use lambda_http::{Body, Error, Response, http::StatusCode};
use questmas_atoms::respond;
use questmas_shared::photos::{self, resolve_caption, Frame, Locale, PhotoError};

/// Query of `POST /photos/watermark`
#[derive(Debug, Clone, Default)]
pub struct WatermarkQuery {
    pub caption: Option<String>,
    pub title: Option<String>,
    pub locale: Option<String>,
    pub frame: Option<String>,
}

/// POST /photos/watermark
///
/// Body is the photo, raw or as a base64 data URL. Without a caption a random phrase of the
/// requested (or default) locale is burned in. Answers with the JPEG.
pub fn watermark_photo(
    body: &[u8],
    query: &WatermarkQuery,
    default_locale: Locale,
) -> Result<Response<Body>, Error> {
    if body.is_empty() {
        return respond::error(StatusCode::BAD_REQUEST, "Photo is required");
    }

    let locale = query.locale.as_deref().map(Locale::from_tag).unwrap_or(default_locale);
    let frame = query.frame.as_deref().map(Frame::parse).unwrap_or_default();
    let caption = resolve_caption(query.caption.as_deref(), locale, &mut rand::thread_rng());

    match photos::share_photo(body, &caption, query.title.as_deref(), frame) {
        Ok(jpeg) => {
            tracing::info!(
                "🖼️ watermark_photo success: input_bytes={}, output_bytes={}, frame={:?}, locale={:?}",
                body.len(),
                jpeg.len(),
                frame,
                locale,
            );
            Ok(Response::builder()
                .status(StatusCode::OK)
                .header("Content-Type", "image/jpeg")
                .header("Access-Control-Allow-Origin", "*")
                .body(Body::Binary(jpeg))
                .map_err(Box::new)?)
        }
        Err(e @ (PhotoError::Decode(_) | PhotoError::EmptyImage | PhotoError::EmptyCaption)) => {
            tracing::warn!("⚠️ watermark_photo rejected input: {}", e);
            respond::error(StatusCode::BAD_REQUEST, "Could not read the photo, please try again")
        }
        Err(e) => {
            tracing::error!("❌ watermark_photo failed: {}", e);
            respond::error(StatusCode::INTERNAL_SERVER_ERROR, "Could not prepare the photo, please try again")
        }
    }
}
