//! User repository for database operations

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::user::{NewUser, Role, TeacherProfile, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user together with its role-specific profile row,
    /// in one transaction.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        // Hash the password
        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(new_user.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, username, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let user = user_from_row(&row)?;

        match new_user.role {
            Role::Student => {
                sqlx::query(
                    r#"
                    INSERT INTO students (id, user_id, student_code, full_name)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user.id)
                .bind(&new_user.student_code)
                .bind(&new_user.full_name)
                .execute(&mut *tx)
                .await?;
            }
            Role::Teacher => {
                sqlx::query(
                    r#"
                    INSERT INTO teachers (id, user_id, full_name)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(Uuid::new_v4())
                .bind(user.id)
                .bind(&new_user.full_name)
                .execute(&mut *tx)
                .await?;
            }
            Role::Admin => {}
        }

        tx.commit().await?;

        Ok(user)
    }

    /// Check whether a username or email is already taken
    pub async fn username_or_email_taken(
        &self,
        username: &str,
        email: Option<&str>,
    ) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT id
            FROM users
            WHERE username = $1 OR email = $2
            LIMIT 1
            "#,
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Find a user by username or email
    pub async fn find_by_username_or_email(&self, username_or_email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE username = $1 OR email = $1
            LIMIT 1
            "#,
        )
        .bind(username_or_email)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Find a user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(user_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Verify a password against the stored hash
    pub fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Invalid stored password hash: {}", e))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Find the teacher profile linked to a user account
    pub async fn find_teacher_profile(&self, user_id: Uuid) -> Result<Option<TeacherProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, full_name
            FROM teachers
            WHERE user_id = $1
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| TeacherProfile {
            id: row.get("id"),
            full_name: row.get("full_name"),
        }))
    }
}

fn user_from_row(row: &PgRow) -> Result<User> {
    let role: String = row.get("role");
    let role =
        Role::from_str(&role).ok_or_else(|| anyhow::anyhow!("Unexpected role value: {}", role))?;

    Ok(User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
