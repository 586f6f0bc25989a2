use super::DbRepository;
use crate::DbError;
use core_types::{NewUser, Role, TeacherSummary, User, UserAccount};

const ACCOUNT_SELECT: &str = r#"
    SELECT u.user_id, u.user_name, u.user_surname, u.email, u.role, u.password,
           s.teacher_id
    FROM users AS u
    LEFT JOIN students AS s ON s.student_id = u.user_id
"#;

impl DbRepository {
    /// Inserts the account and its role row in one transaction. Returns the
    /// new user id.
    pub async fn register_user(&self, user: &NewUser) -> Result<i32, DbError> {
        user.validate()?;

        let mut tx = self.pool.begin().await?;

        let user_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO users (user_name, user_surname, email, password, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING user_id
            "#,
        )
        .bind(&user.name)
        .bind(&user.surname)
        .bind(user.email.trim())
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        match user.role {
            Role::Teacher => {
                sqlx::query("INSERT INTO teachers (teacher_id) VALUES ($1)")
                    .bind(user_id)
                    .execute(&mut *tx)
                    .await?;
            }
            Role::Student => {
                sqlx::query("INSERT INTO students (student_id, teacher_id) VALUES ($1, $2)")
                    .bind(user_id)
                    .bind(user.teacher_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        tracing::info!(user_id, role = %user.role, "Registered user");
        Ok(user_id)
    }

    /// Looks an account up by email, ignoring case. Used by login.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>, DbError> {
        let sql = format!("{ACCOUNT_SELECT} WHERE LOWER(u.email) = LOWER($1)");
        let account = sqlx::query_as::<_, UserAccount>(&sql)
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<Option<UserAccount>, DbError> {
        let sql = format!("{ACCOUNT_SELECT} WHERE u.user_id = $1");
        let account = sqlx::query_as::<_, UserAccount>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, user_name, user_surname, email, role
            FROM users
            ORDER BY user_name, user_surname
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Teachers a student can pick at registration.
    pub async fn list_teachers(&self) -> Result<Vec<TeacherSummary>, DbError> {
        let teachers = sqlx::query_as::<_, TeacherSummary>(
            r#"
            SELECT t.teacher_id, u.user_name, u.user_surname
            FROM teachers AS t
            JOIN users AS u ON u.user_id = t.teacher_id
            ORDER BY u.user_name, u.user_surname
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(teachers)
    }
}
