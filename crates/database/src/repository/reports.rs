//! Aggregate, read-only queries behind the dashboards and teacher reports.
//!
//! "Students of a teacher" always means rows of `students` with that
//! `teacher_id`; counts over joins use `DISTINCT` where a fan-out would
//! otherwise inflate them.

use super::DbRepository;
use crate::DbError;
use core_types::{
    ElementViewCount, EquipmentUsage, LowActivityStudent, StudentActivity, StudentExperiment,
    StudentRef, StudentStats, TeacherDashboardStats, TeacherStatistics, UserActivity,
};

impl DbRepository {
    /// Activity counts participations by the teacher's students whose
    /// timestamp falls on the current date.
    pub async fn teacher_dashboard_stats(&self, teacher_id: i32) -> Result<TeacherDashboardStats, DbError> {
        let stats = sqlx::query_as::<_, TeacherDashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM students WHERE teacher_id = $1) AS student_count,
                (SELECT COUNT(*) FROM reactions WHERE teacher_id = $1) AS reaction_count,
                (SELECT COUNT(*) FROM experiments WHERE teacher_id = $1) AS experiment_count,
                (SELECT COUNT(*)
                 FROM experiment_participations AS p
                 JOIN students AS s ON s.student_id = p.user_id
                 WHERE s.teacher_id = $1
                   AND p.participated_at::date = CURRENT_DATE) AS activity_count
            "#,
        )
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn student_stats(&self, user_id: i32) -> Result<StudentStats, DbError> {
        let stats = sqlx::query_as::<_, StudentStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM experiment_participations WHERE user_id = $1) AS experiment_count,
                (SELECT COUNT(*) FROM element_views WHERE user_id = $1) AS element_count,
                (SELECT COUNT(*) FROM equipment_views WHERE user_id = $1) AS equipment_count,
                (SELECT COUNT(DISTINCT ex.reaction_id)
                 FROM experiment_participations AS p
                 JOIN experiments AS ex ON ex.experiment_id = p.experiment_id
                 WHERE p.user_id = $1) AS reaction_count
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    /// How many experiments use each piece of equipment. With a teacher id,
    /// only that teacher's equipment is listed.
    pub async fn equipment_usage(&self, teacher_id: Option<i32>) -> Result<Vec<EquipmentUsage>, DbError> {
        let usage = sqlx::query_as::<_, EquipmentUsage>(
            r#"
            SELECT le.equipment_id, le.equipment_name, COUNT(ee.experiment_id) AS usage_count
            FROM lab_equipment AS le
            LEFT JOIN experiment_equipment AS ee ON ee.equipment_id = le.equipment_id
            WHERE $1::INTEGER IS NULL OR le.teacher_id = $1
            GROUP BY le.equipment_id, le.equipment_name
            ORDER BY usage_count DESC, le.equipment_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(usage)
    }

    /// Distinct elements and equipment each of the teacher's students viewed.
    pub async fn student_activity(&self, teacher_id: i32) -> Result<Vec<StudentActivity>, DbError> {
        let activity = sqlx::query_as::<_, StudentActivity>(
            r#"
            SELECT s.student_id,
                   u.user_name || ' ' || u.user_surname AS full_name,
                   COUNT(DISTINCT ev.element_id) AS total_elements_viewed,
                   COUNT(DISTINCT qv.equipment_id) AS total_lab_equipment_viewed
            FROM students AS s
            JOIN users AS u ON u.user_id = s.student_id
            LEFT JOIN element_views AS ev ON ev.user_id = s.student_id
            LEFT JOIN equipment_views AS qv ON qv.user_id = s.student_id
            WHERE s.teacher_id = $1
            GROUP BY s.student_id, full_name
            ORDER BY total_elements_viewed DESC, total_lab_equipment_viewed DESC, full_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activity)
    }

    pub async fn students_without_experiments(&self, teacher_id: i32) -> Result<Vec<StudentRef>, DbError> {
        let students = sqlx::query_as::<_, StudentRef>(
            r#"
            SELECT s.student_id, u.user_name || ' ' || u.user_surname AS full_name
            FROM students AS s
            JOIN users AS u ON u.user_id = s.student_id
            WHERE s.teacher_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM experiment_participations AS p WHERE p.user_id = s.student_id
              )
            ORDER BY full_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// Students with fewer than `threshold` participations, least active
    /// first. Students with none are included.
    pub async fn students_with_few_experiments(
        &self,
        teacher_id: i32,
        threshold: i64,
    ) -> Result<Vec<LowActivityStudent>, DbError> {
        let students = sqlx::query_as::<_, LowActivityStudent>(
            r#"
            SELECT s.student_id,
                   u.user_name || ' ' || u.user_surname AS full_name,
                   COUNT(p.participation_id) AS total_experiments
            FROM students AS s
            JOIN users AS u ON u.user_id = s.student_id
            LEFT JOIN experiment_participations AS p ON p.user_id = s.student_id
            WHERE s.teacher_id = $1
            GROUP BY s.student_id, full_name
            HAVING COUNT(p.participation_id) < $2
            ORDER BY total_experiments ASC, full_name
            "#,
        )
        .bind(teacher_id)
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(students)
    }

    /// Per teacher: students, their participations, and the average per
    /// student rounded to two places. Teachers without students sort last.
    /// With a teacher id, only that teacher's row is returned.
    pub async fn teacher_statistics(&self, teacher_id: Option<i32>) -> Result<Vec<TeacherStatistics>, DbError> {
        let stats = sqlx::query_as::<_, TeacherStatistics>(
            r#"
            SELECT t.teacher_id,
                   u.user_name || ' ' || u.user_surname AS full_name,
                   COUNT(DISTINCT s.student_id) AS total_students,
                   COUNT(p.participation_id) AS total_experiments,
                   ROUND(COUNT(p.participation_id)::NUMERIC
                         / NULLIF(COUNT(DISTINCT s.student_id), 0), 2) AS avg_experiments_per_student
            FROM teachers AS t
            JOIN users AS u ON u.user_id = t.teacher_id
            LEFT JOIN students AS s ON s.teacher_id = t.teacher_id
            LEFT JOIN experiment_participations AS p ON p.user_id = s.student_id
            WHERE $1::INTEGER IS NULL OR t.teacher_id = $1
            GROUP BY t.teacher_id, full_name
            ORDER BY avg_experiments_per_student DESC NULLS LAST, full_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    /// Elements viewed by at least one of the teacher's students, with the
    /// number of those students who viewed each.
    pub async fn element_views(&self, teacher_id: i32) -> Result<Vec<ElementViewCount>, DbError> {
        let views = sqlx::query_as::<_, ElementViewCount>(
            r#"
            SELECT e.element_id, e.symbol, e.element_name, COUNT(*) AS view_count
            FROM element_views AS ev
            JOIN students AS s ON s.student_id = ev.user_id
            JOIN elements AS e ON e.element_id = ev.element_id
            WHERE s.teacher_id = $1
            GROUP BY e.element_id, e.symbol, e.element_name
            ORDER BY view_count DESC, e.symbol
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(views)
    }

    /// Every run by the teacher's students, newest first.
    pub async fn student_experiments(&self, teacher_id: i32) -> Result<Vec<StudentExperiment>, DbError> {
        let runs = sqlx::query_as::<_, StudentExperiment>(
            r#"
            SELECT s.student_id,
                   u.user_name || ' ' || u.user_surname AS student_name,
                   ex.experiment_id, ex.result, r.product,
                   e1.symbol AS element1_symbol, e2.symbol AS element2_symbol,
                   p.participated_at
            FROM students AS s
            JOIN users AS u ON u.user_id = s.student_id
            JOIN experiment_participations AS p ON p.user_id = s.student_id
            JOIN experiments AS ex ON ex.experiment_id = p.experiment_id
            JOIN reactions AS r ON r.reaction_id = ex.reaction_id
            JOIN elements AS e1 ON e1.element_id = r.element1_id
            JOIN elements AS e2 ON e2.element_id = r.element2_id
            WHERE s.teacher_id = $1
            ORDER BY p.participated_at DESC, student_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(runs)
    }

    /// Distinct elements, equipment and experiments touched by each user.
    /// With a teacher id, only that teacher's students are listed.
    pub async fn user_activity_summary(&self, teacher_id: Option<i32>) -> Result<Vec<UserActivity>, DbError> {
        let activity = sqlx::query_as::<_, UserActivity>(
            r#"
            SELECT u.user_id,
                   u.user_name || ' ' || u.user_surname AS full_name,
                   u.role,
                   COUNT(DISTINCT ev.element_id) AS elements_viewed,
                   COUNT(DISTINCT qv.equipment_id) AS equipment_viewed,
                   COUNT(DISTINCT p.experiment_id) AS experiments_participated
            FROM users AS u
            LEFT JOIN students AS s ON s.student_id = u.user_id
            LEFT JOIN element_views AS ev ON ev.user_id = u.user_id
            LEFT JOIN equipment_views AS qv ON qv.user_id = u.user_id
            LEFT JOIN experiment_participations AS p ON p.user_id = u.user_id
            WHERE $1::INTEGER IS NULL OR s.teacher_id = $1
            GROUP BY u.user_id, full_name, u.role
            ORDER BY full_name
            "#,
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(activity)
    }
}
