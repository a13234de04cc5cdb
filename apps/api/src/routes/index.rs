use anyhow::Context;
use askama::Template;
use axum::{extract::State, response::Html};

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;
use crate::store::{release, StoreError};

const RECENT_LIMIT: i64 = 5;

struct Overview {
    version: String,
    user_count: i64,
    recent: Vec<User>,
}

/// Status page; `overview` is set when connected, `error` when not.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexPage<'a> {
    target: &'a str,
    db_status: &'a str,
    overview: Option<Overview>,
    error: Option<String>,
}

/// GET /
/// Store failures still render a page, showing "Disconnected".
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let overview = async {
        let mut conn = state.store.connect().await?;
        let version = conn.server_version().await?;
        let user_count = conn.count_users().await?;
        let recent = conn.list_users(Some(RECENT_LIMIT)).await?;
        release(conn).await;
        Ok::<_, StoreError>(Overview {
            version,
            user_count,
            recent,
        })
    };

    let db = &state.config.database;
    let target = format!("{}@{}:{}/{}", db.user, db.host, db.port, db.name);

    let page = match overview.await {
        Ok(overview) => IndexPage {
            target: &target,
            db_status: "Connected",
            overview: Some(overview),
            error: None,
        },
        Err(e) => {
            tracing::warn!("Index page could not reach the database: {e}");
            IndexPage {
                target: &target,
                db_status: "Disconnected",
                overview: None,
                error: Some(e.to_string()),
            }
        }
    };

    let html = page.render().context("failed to render index page")?;
    Ok(Html(html))
}
