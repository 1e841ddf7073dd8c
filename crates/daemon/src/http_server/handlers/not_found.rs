use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Unknown routes answer with a JSON body naming the path.
pub async fn not_found_handler(uri: Uri) -> Response {
    let err_msg = serde_json::json!({
        "msg": "not found",
        "path": uri.path(),
    });
    (StatusCode::NOT_FOUND, Json(err_msg)).into_response()
}
