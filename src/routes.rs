//! Route table.
//!
//! Every (method, path) pair maps to one handler. Routes addressed by an
//! account id sit behind the ownership guard; everything else is public.

use std::time::Duration;

use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower::{ServiceBuilder, timeout::TimeoutLayer};
use tower_http::trace::TraceLayer;

use crate::{error::AppError, handlers, middleware, state::AppState};

/// Build the application router.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    // Account-scoped routes: the guard must admit the request first
    let guarded_routes = Router::new()
        .route(
            "/account/{id}",
            get(handlers::accounts::get_account).delete(handlers::accounts::delete_account),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_account_owner,
        ));

    let router = Router::new()
        .route(
            "/account",
            get(handlers::accounts::list_accounts).post(handlers::accounts::create_account),
        )
        .route("/transfer", post(handlers::transfer::create_transfer))
        .route("/login", post(handlers::login::login))
        .route("/health", get(handlers::health::health_check))
        .merge(guarded_routes)
        // Known path, unknown method: 400 instead of axum's default 405
        .method_not_allowed_fallback(handlers::fallback::method_not_allowed);

    with_request_timeout(router, request_timeout)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bound every request by `timeout`.
///
/// When the deadline passes, or the client goes away, the request future is
/// dropped wherever it is suspended. Timeouts answer 408 in the usual error envelope.
pub fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(request_timed_out))
            .layer(TimeoutLayer::new(timeout)),
    )
}

async fn request_timed_out(error: BoxError) -> AppError {
    tracing::warn!(%error, "Request aborted");
    AppError::Timeout
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn slow_request_times_out_with_error_body() {
        let app = with_request_timeout(
            Router::new().route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            ),
            Duration::from_millis(20),
        );

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "error": "request timed out" }));
    }
}
