use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::store::release;

/// GET /health
/// Opens a fresh connection and runs `SELECT 1`; 503 when the store is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let probe = async {
        let mut conn = state.store.connect().await?;
        conn.ping().await?;
        release(conn).await;
        Ok::<_, crate::store::StoreError>(())
    };

    match probe.await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": env!("CARGO_PKG_NAME")
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {e}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "database": "disconnected",
                    "error": e.to_string()
                })),
            )
        }
    }
}
