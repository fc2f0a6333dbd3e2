//! Upload settings routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};
use tracing::info;

use crate::{AppState, error::upload_error_response};

/// Creates the settings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload/environments", get(list_environments))
        .route(
            "/upload/settings/{environment}",
            get(get_settings).put(update_settings),
        )
}

/// GET `/upload/environments`
/// Environments with stored upload settings.
async fn list_environments(State(state): State<AppState>) -> Response {
    match state.settings.environments().await {
        Ok(environments) => (
            StatusCode::OK,
            Json(json!({ "environments": environments })),
        )
            .into_response(),
        Err(e) => upload_error_response(&e),
    }
}

/// GET `/upload/settings/{environment}`
/// Providers and the current configuration of an environment.
async fn get_settings(
    State(state): State<AppState>,
    Path(environment): Path<String>,
) -> Response {
    match state.settings.get_settings(&environment).await {
        Ok(settings) => (StatusCode::OK, Json(settings)).into_response(),
        Err(e) => upload_error_response(&e),
    }
}

/// PUT `/upload/settings/{environment}`
/// Replace the configuration of an environment.
async fn update_settings(
    State(state): State<AppState>,
    Path(environment): Path<String>,
    Json(payload): Json<Value>,
) -> Response {
    match state.settings.update_settings(&environment, payload).await {
        Ok(config) => {
            info!(
                environment = %environment,
                provider = %config.provider,
                enabled = config.enabled,
                size_limit = config.size_limit,
                "Upload settings updated"
            );
            (StatusCode::OK, Json(json!({ "ok": true }))).into_response()
        }
        Err(e) => upload_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{body_json, get, json_request, test_app};
    use axum::http::StatusCode;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_lists_providers_and_default_config() {
        let app = test_app();

        let response = app
            .oneshot(get("/upload/settings/development"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(
            body,
            json!({
                "providers": [{ "provider": "local", "name": "Local server" }],
                "config": {
                    "provider": "local",
                    "name": "Local server",
                    "enabled": true,
                    "sizeLimit": 1_000_000.0
                }
            })
        );
    }

    #[tokio::test]
    async fn test_update_then_get() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                "/upload/settings/development",
                &json!({ "provider": "test", "enabled": false, "sizeLimit": "1000" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "ok": true }));

        let response = app
            .oneshot(get("/upload/settings/development"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body["config"],
            json!({ "provider": "test", "enabled": false, "sizeLimit": 1000.0 })
        );
    }

    #[tokio::test]
    async fn test_invalid_size_limit_is_rejected() {
        let app = test_app();

        let response = app
            .oneshot(json_request(
                "PUT",
                "/upload/settings/development",
                &json!({ "provider": "local", "sizeLimit": "unlimited" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_environments_listing() {
        let app = test_app();

        app.clone()
            .oneshot(json_request(
                "PUT",
                "/upload/settings/production",
                &json!({ "provider": "local", "sizeLimit": 10 }),
            ))
            .await
            .unwrap();
        app.clone()
            .oneshot(get("/upload/settings/development"))
            .await
            .unwrap();

        let response = app.oneshot(get("/upload/environments")).await.unwrap();
        assert_eq!(
            body_json(response).await,
            json!({ "environments": ["production"] })
        );
    }

    #[tokio::test]
    async fn test_reading_unknown_environments_stores_nothing() {
        let app = test_app();

        for environment in ["x1", "whatever", "..%2Fetc"] {
            let response = app
                .clone()
                .oneshot(get(&format!("/upload/settings/{environment}")))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = app.oneshot(get("/upload/environments")).await.unwrap();
        assert_eq!(body_json(response).await, json!({ "environments": [] }));
    }
}
