use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use mongodb::bson::doc;
use tracing::error;

use crate::domain::errors::ApiError;
use crate::interface_adapters::protocol::{ErrorResponse, HealthResponse, WelcomeResponse};
use crate::interface_adapters::state::AppState;

// Handler for the root welcome endpoint. No inputs, no side effects.
pub async fn root(State(state): State<AppState>) -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: format!("Welcome to {}", state.settings.app_name),
    })
}

// Handler for the v1 health endpoint: answers ok once the document store
// responds to a ping.
pub async fn health(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<ErrorResponse>)> {
    state
        .db
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| translate_error(ApiError::Database(err.to_string())))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        environment: state.settings.environment.clone(),
    }))
}

// Central error-translation boundary. Every handler failure funnels through
// here: the internal detail goes to the log sink and the caller always gets
// the same generic 500 envelope, whatever the cause was.
pub fn translate_error(err: ApiError) -> (StatusCode, Json<ErrorResponse>) {
    error!(detail = err.detail(), kind = ?err, "unhandled error");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            detail: "Internal server error".to_string(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            timestamp: Utc::now(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_an_error_is_translated_then_the_envelope_is_a_generic_500() {
        let (status, Json(body)) =
            translate_error(ApiError::Internal("secret stack trace".to_string()));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "Internal server error");
        assert_eq!(body.status_code, 500);
    }

    #[test]
    fn when_the_cause_is_a_database_error_then_the_detail_is_not_leaked() {
        let (_, Json(body)) =
            translate_error(ApiError::Database("connection refused at 10.0.0.3".to_string()));

        assert!(!body.detail.contains("10.0.0.3"));
        assert_eq!(body.detail, "Internal server error");
    }

    #[test]
    fn when_an_error_is_translated_then_the_timestamp_is_current() {
        let before = Utc::now();
        let (_, Json(body)) = translate_error(ApiError::Internal("boom".to_string()));
        let after = Utc::now();

        assert!(body.timestamp >= before);
        assert!(body.timestamp <= after);
    }
}
