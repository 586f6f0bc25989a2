use super::DbRepository;
use crate::DbError;
use core_types::{LabEquipment, NewEquipment};

impl DbRepository {
    pub async fn add_equipment(&self, teacher_id: i32, equipment: &NewEquipment) -> Result<i32, DbError> {
        let equipment_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO lab_equipment (equipment_name, equipment_type, description, safety_info, teacher_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING equipment_id
            "#,
        )
        .bind(equipment.equipment_name.trim())
        .bind(&equipment.equipment_type)
        .bind(&equipment.description)
        .bind(&equipment.safety_info)
        .bind(teacher_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(equipment_id, teacher_id, "Equipment added");
        Ok(equipment_id)
    }

    pub async fn update_equipment(&self, equipment_id: i32, equipment: &NewEquipment) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE lab_equipment
            SET equipment_name = $1, equipment_type = $2, description = $3, safety_info = $4
            WHERE equipment_id = $5
            "#,
        )
        .bind(equipment.equipment_name.trim())
        .bind(&equipment.equipment_type)
        .bind(&equipment.description)
        .bind(&equipment.safety_info)
        .bind(equipment_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn get_equipment(&self, equipment_id: i32) -> Result<Option<LabEquipment>, DbError> {
        let equipment = sqlx::query_as::<_, LabEquipment>(
            r#"
            SELECT equipment_id, equipment_name, equipment_type, description, safety_info, teacher_id
            FROM lab_equipment
            WHERE equipment_id = $1
            "#,
        )
        .bind(equipment_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(equipment)
    }

    pub async fn list_equipment(&self) -> Result<Vec<LabEquipment>, DbError> {
        let equipment = sqlx::query_as::<_, LabEquipment>(
            r#"
            SELECT equipment_id, equipment_name, equipment_type, description, safety_info, teacher_id
            FROM lab_equipment
            ORDER BY equipment_name, equipment_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(equipment)
    }
}
