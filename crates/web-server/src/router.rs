use crate::handlers::{auth, dashboard, elements, equipment, experiments, lab, reactions, reports};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

/// Assembles every route of the lab over the shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        // --- Public ---
        .route("/", get(dashboard::index))
        .route("/api/health", get(dashboard::health))
        .route("/test-db", get(dashboard::test_db))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", get(auth::logout))
        // --- Any logged-in user ---
        .route("/dashboard", get(dashboard::dashboard))
        .route("/api/dashboard-stats", get(dashboard::dashboard_stats))
        .route("/users", get(dashboard::users))
        .route("/elements", get(elements::list))
        .route("/elements/:id", get(elements::detail))
        .route("/equipment", get(equipment::list))
        .route("/equipment/:id", get(equipment::detail))
        .route("/reactions", get(reactions::list))
        .route("/reactions/:id", get(reactions::detail))
        .route("/experiments", get(experiments::list))
        .route("/experiments/:id", get(experiments::detail))
        .route("/my-experiments", get(experiments::mine))
        .route("/laboratory", get(lab::laboratory))
        .route("/api/check-reaction", post(lab::check_reaction))
        .route("/api/simulate-reaction", post(lab::simulate_reaction))
        .route("/save-experiment", post(lab::save_experiment))
        // --- Teachers ---
        .route("/elements/add", post(elements::add))
        .route("/elements/:id/edit", get(elements::edit_page).post(elements::update))
        .route("/equipment/add", post(equipment::add))
        .route("/equipment/:id/edit", get(equipment::edit_page).post(equipment::update))
        .route("/reactions/add", post(reactions::add))
        .route("/reactions/:id/edit", get(reactions::edit_page).post(reactions::update))
        .route("/reactions/:id/delete", post(reactions::delete))
        .route("/api/reaction-experiment", post(reactions::create_with_experiment))
        .route("/my_students", get(reports::my_students))
        .route("/reports", get(reports::menu))
        .route("/reports/equipment-usage", get(reports::equipment_usage))
        .route("/reports/low_activity_students", get(reports::low_activity_students))
        .route("/reports/inactive_students", get(reports::inactive_students))
        .route("/reports/teacher_statistics", get(reports::teacher_statistics))
        .route("/reports/element_views", get(reports::element_views))
        .route("/reports/student_experiments", get(reports::student_experiments))
        .route("/reports/detailed_experiments", get(reports::student_experiments))
        .route("/reports/user_activity", get(reports::user_activity))
        .with_state(state)
        .layer(cors)
        // Logs every request and its latency.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
