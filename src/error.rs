use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Error taxonomy for the HTTP and persistence surface.
///
/// The pure resolver/compiler layer never returns these for malformed
/// optional input — it degrades to defaults. What reaches callers is limited
/// to missing pages, store failures on save, and template rendering faults.
/// Analytics writes are best-effort and handled at the call site (logged,
/// swallowed), so they have no variant here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("page not found: {0}")]
    NotFound(i64),

    #[error("persistence error")]
    Persistence(#[from] sqlx::Error),

    #[error("template error")]
    Render(#[from] askama::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::NotFound(id) => (StatusCode::NOT_FOUND, format!("page {id} not found")),
            Error::Persistence(e) => {
                tracing::error!("persistence error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
            Error::Render(e) => {
                tracing::error!("template error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
            }
        };
        (status, message).into_response()
    }
}
