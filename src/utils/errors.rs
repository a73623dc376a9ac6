use actix_web::{HttpResponse, error::InternalError, web};
use serde_json::json;

/// Wraps a handler failure in the flat `{"error": "..."}` body every
/// endpoint uses. The underlying cause is logged at the call site; the
/// message here is the generic client-facing one.
pub fn internal_error(message: &'static str) -> actix_web::Error {
    InternalError::from_response(
        message,
        HttpResponse::InternalServerError().json(json!({ "error": message })),
    )
    .into()
}

/// JSON extractor config whose rejections carry the flat error body
/// instead of actix's plain-text default.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

/// Query-string extractor config, same body shape as [`json_config`].
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(json!({ "error": message })),
        )
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{ResponseError, http::StatusCode};

    #[test]
    fn maps_to_a_500() {
        let err = internal_error("Failed to fetch attendance");
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
