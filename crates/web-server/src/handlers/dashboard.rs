use crate::{gate::CurrentUser, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use core_types::{DashboardStats, Role, User};
use database::ReadFallback;
use serde_json::json;
use std::sync::Arc;

/// # GET /
pub async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "app": "SIMLAB",
        "links": ["/login", "/register", "/dashboard", "/elements", "/equipment",
                  "/reactions", "/experiments", "/laboratory", "/reports"],
    }))
}

/// # GET /api/health
pub async fn health() -> &'static str {
    "OK"
}

/// # GET /test-db
pub async fn test_db(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    if database::ping(state.db_repo.pool()).await {
        (StatusCode::OK, Json(json!({ "database": "ok" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "database": "unavailable" })),
        )
    }
}

async fn stats_for(state: &AppState, user_id: i32, role: Role) -> DashboardStats {
    match role {
        Role::Teacher => DashboardStats::Teacher(
            state
                .db_repo
                .teacher_dashboard_stats(user_id)
                .await
                .or_empty("teacher_dashboard_stats"),
        ),
        Role::Student => DashboardStats::Student(
            state
                .db_repo
                .student_stats(user_id)
                .await
                .or_empty("student_stats"),
        ),
    }
}

/// # GET /dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<serde_json::Value> {
    let stats = stats_for(&state, user.user_id, user.role).await;
    Json(json!({ "user": user, "stats": stats }))
}

/// # GET /api/dashboard-stats
pub async fn dashboard_stats(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Json<DashboardStats> {
    Json(stats_for(&state, user.user_id, user.role).await)
}

/// # GET /users
pub async fn users(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Json<Vec<User>> {
    Json(state.db_repo.list_users().await.or_empty("list_users"))
}
