// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Role, User, UserStatus},
};

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu username (login)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, status, parent_owner_id,
                   granted_permissions, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, status, parent_owner_id,
                   granted_permissions, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_user)
    }

    // Cria um novo usuário, com tratamento de erro para username duplicado.
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        username: &str,
        password_hash: &str,
        role: Role,
        parent_owner_id: Option<Uuid>,
        granted_permissions: Option<&Vec<String>>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, role, status, parent_owner_id, granted_permissions)
            VALUES ($1, $2, $3, 'ACTIVE', $4, $5)
            RETURNING id, username, password_hash, role, status, parent_owner_id,
                      granted_permissions, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(role)
        .bind(parent_owner_id)
        .bind(granted_permissions)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O usuário '{}' já existe.",
                        username
                    ));
                }
            }
            e.into()
        })?;

        Ok(user)
    }

    // Admin enxerga todos os principals
    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, status, parent_owner_id,
                   granted_permissions, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(executor)
        .await?;
        Ok(users)
    }

    // Owner enxerga apenas as sub-contas do seu próprio tenant
    pub async fn list_sub_accounts<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
    ) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, status, parent_owner_id,
                   granted_permissions, created_at, updated_at
            FROM users
            WHERE parent_owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(executor)
        .await?;
        Ok(users)
    }

    pub async fn update_grants<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        role: Role,
        granted_permissions: Option<&Vec<String>>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET role = $2, granted_permissions = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, password_hash, role, status, parent_owner_id,
                      granted_permissions, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(role)
        .bind(granted_permissions)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: UserStatus,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
