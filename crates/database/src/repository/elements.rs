use super::DbRepository;
use crate::DbError;
use core_types::{Element, ElementDetail, NewElement};

const ELEMENT_COLUMNS: &str = "e.element_id, e.symbol, e.element_name, e.atomic_number, \
    e.atomic_weight, e.melting_point, e.boiling_point, e.hazard_type, e.description, e.teacher_id";

impl DbRepository {
    /// Adds an element to the catalogue. A symbol that already exists in any
    /// letter case is rejected as `DbError::Duplicate`.
    pub async fn add_element(&self, teacher_id: i32, element: &NewElement) -> Result<i32, DbError> {
        let element_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO elements (symbol, element_name, atomic_number, atomic_weight,
                                  melting_point, boiling_point, hazard_type, description, teacher_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING element_id
            "#,
        )
        .bind(element.symbol.trim())
        .bind(element.element_name.trim())
        .bind(element.atomic_number)
        .bind(element.atomic_weight)
        .bind(element.melting_point)
        .bind(element.boiling_point)
        .bind(&element.hazard_type)
        .bind(&element.description)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(element_id, symbol = %element.symbol, teacher_id, "Element added");
        Ok(element_id)
    }

    /// Returns `true` if the element existed and was updated.
    pub async fn update_element(&self, element_id: i32, element: &NewElement) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE elements
            SET symbol = $1, element_name = $2, atomic_number = $3, atomic_weight = $4,
                melting_point = $5, boiling_point = $6, hazard_type = $7, description = $8
            WHERE element_id = $9
            "#,
        )
        .bind(element.symbol.trim())
        .bind(element.element_name.trim())
        .bind(element.atomic_number)
        .bind(element.atomic_weight)
        .bind(element.melting_point)
        .bind(element.boiling_point)
        .bind(&element.hazard_type)
        .bind(&element.description)
        .bind(element_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// The element with the name of the teacher who created it.
    pub async fn get_element(&self, element_id: i32) -> Result<Option<ElementDetail>, DbError> {
        let sql = format!(
            r#"
            SELECT {ELEMENT_COLUMNS}, u.user_name || ' ' || u.user_surname AS created_by
            FROM elements AS e
            JOIN users AS u ON u.user_id = e.teacher_id
            WHERE e.element_id = $1
            "#
        );
        let element = sqlx::query_as::<_, ElementDetail>(&sql)
            .bind(element_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(element)
    }

    /// The whole catalogue in periodic-table order.
    pub async fn list_elements(&self) -> Result<Vec<Element>, DbError> {
        let sql = format!("SELECT {ELEMENT_COLUMNS} FROM elements AS e ORDER BY e.atomic_number, e.element_id");
        let elements = sqlx::query_as::<_, Element>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(elements)
    }
}
