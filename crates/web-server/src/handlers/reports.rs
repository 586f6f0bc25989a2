//! Teacher-only reports, each scoped to the requesting teacher. Every
//! handler degrades to an empty list when the underlying query fails.

use crate::{gate::TeacherUser, state::AppState};
use axum::{
    extract::{Query, State},
    Json,
};
use core_types::{
    ElementViewCount, EquipmentUsage, LowActivityStudent, StudentActivity, StudentExperiment,
    StudentRef, TeacherStatistics, UserActivity,
};
use database::ReadFallback;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Report names as they appear under `/reports/`.
pub const REPORTS: [&str; 8] = [
    "equipment-usage",
    "low_activity_students",
    "inactive_students",
    "teacher_statistics",
    "element_views",
    "student_experiments",
    "detailed_experiments",
    "user_activity",
];

#[derive(Debug, Default, Deserialize)]
pub struct ThresholdQuery {
    pub threshold: Option<i64>,
}

/// # GET /reports
pub async fn menu(TeacherUser(teacher): TeacherUser) -> Json<serde_json::Value> {
    let links: Vec<String> = REPORTS.iter().map(|name| format!("/reports/{name}")).collect();
    Json(json!({ "page": "reports", "teacher": teacher.display_name, "reports": links }))
}

/// # GET /my_students
pub async fn my_students(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<StudentActivity>> {
    Json(
        state
            .db_repo
            .student_activity(teacher.user_id)
            .await
            .or_empty("student_activity"),
    )
}

/// # GET /reports/equipment-usage
pub async fn equipment_usage(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<EquipmentUsage>> {
    Json(
        state
            .db_repo
            .equipment_usage(Some(teacher.user_id))
            .await
            .or_empty("equipment_usage"),
    )
}

/// # GET /reports/low_activity_students
pub async fn low_activity_students(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
    Query(query): Query<ThresholdQuery>,
) -> Json<Vec<LowActivityStudent>> {
    let threshold = query
        .threshold
        .filter(|t| *t > 0)
        .unwrap_or(state.config.reports.low_activity_threshold);
    Json(
        state
            .db_repo
            .students_with_few_experiments(teacher.user_id, threshold)
            .await
            .or_empty("students_with_few_experiments"),
    )
}

/// # GET /reports/inactive_students
pub async fn inactive_students(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<StudentRef>> {
    Json(
        state
            .db_repo
            .students_without_experiments(teacher.user_id)
            .await
            .or_empty("students_without_experiments"),
    )
}

/// # GET /reports/teacher_statistics
pub async fn teacher_statistics(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<TeacherStatistics>> {
    Json(
        state
            .db_repo
            .teacher_statistics(Some(teacher.user_id))
            .await
            .or_empty("teacher_statistics"),
    )
}

/// # GET /reports/element_views
pub async fn element_views(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<ElementViewCount>> {
    Json(
        state
            .db_repo
            .element_views(teacher.user_id)
            .await
            .or_empty("element_views"),
    )
}

/// # GET /reports/student_experiments
/// Also served as `/reports/detailed_experiments`.
pub async fn student_experiments(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<StudentExperiment>> {
    Json(
        state
            .db_repo
            .student_experiments(teacher.user_id)
            .await
            .or_empty("student_experiments"),
    )
}

/// # GET /reports/user_activity
pub async fn user_activity(
    State(state): State<Arc<AppState>>,
    TeacherUser(teacher): TeacherUser,
) -> Json<Vec<UserActivity>> {
    Json(
        state
            .db_repo
            .user_activity_summary(Some(teacher.user_id))
            .await
            .or_empty("user_activity_summary"),
    )
}
