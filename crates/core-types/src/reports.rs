//! Row shapes produced by the aggregate report queries.
//!
//! All counts come back from PostgreSQL as `BIGINT`, hence `i64`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Headline numbers on a teacher's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TeacherDashboardStats {
    pub student_count: i64,
    pub reaction_count: i64,
    pub experiment_count: i64,
    /// Participations by the teacher's students recorded today.
    pub activity_count: i64,
}

/// Headline numbers on a student's dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StudentStats {
    pub experiment_count: i64,
    pub element_count: i64,
    pub equipment_count: i64,
    pub reaction_count: i64,
}

/// Either dashboard, depending on who is looking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Teacher(TeacherDashboardStats),
    Student(StudentStats),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct EquipmentUsage {
    pub equipment_id: i32,
    pub equipment_name: String,
    pub usage_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StudentActivity {
    pub student_id: i32,
    pub full_name: String,
    pub total_elements_viewed: i64,
    pub total_lab_equipment_viewed: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StudentRef {
    pub student_id: i32,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct LowActivityStudent {
    pub student_id: i32,
    pub full_name: String,
    pub total_experiments: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TeacherStatistics {
    pub teacher_id: i32,
    pub full_name: String,
    pub total_students: i64,
    pub total_experiments: i64,
    /// `None` when the teacher has no students yet.
    pub avg_experiments_per_student: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct ElementViewCount {
    pub element_id: i32,
    pub symbol: String,
    pub element_name: String,
    pub view_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct StudentExperiment {
    pub student_id: i32,
    pub student_name: String,
    pub experiment_id: i32,
    pub result: String,
    pub product: Option<String>,
    pub element1_symbol: String,
    pub element2_symbol: String,
    pub participated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct UserActivity {
    pub user_id: i32,
    pub full_name: String,
    pub role: String,
    pub elements_viewed: i64,
    pub equipment_viewed: i64,
    pub experiments_participated: i64,
}
