// src/db/catalog_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalog::{CatalogItem, CatalogItemPayload, Client, ClientPayload},
};

// Catálogo do tenant: clientes e itens precificados.
// `scope = None` significa admin (sem filtro de tenant).
#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn list_clients<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, owner_id, name, email, phone, address, tax_id, created_at, updated_at
            FROM clients
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope)
        .fetch_all(executor)
        .await?;
        Ok(clients)
    }

    pub async fn find_client<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<Option<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, owner_id, name, email, phone, address, tax_id, created_at, updated_at
            FROM clients
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .fetch_optional(executor)
        .await?;
        Ok(client)
    }

    /// Busca por nome/documento/e-mail para o autocomplete do formulário
    pub async fn search_clients<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        query: &str,
    ) -> Result<Vec<Client>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let search_term = format!("%{}%", query);

        let clients = sqlx::query_as::<_, Client>(
            r#"
            SELECT id, owner_id, name, email, phone, address, tax_id, created_at, updated_at
            FROM clients
            WHERE ($1::uuid IS NULL OR owner_id = $1)
              AND (name ILIKE $2 OR tax_id ILIKE $2 OR email ILIKE $2)
            ORDER BY name ASC
            LIMIT 10
            "#,
        )
        .bind(scope)
        .bind(search_term)
        .fetch_all(executor)
        .await?;
        Ok(clients)
    }

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &ClientPayload,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (owner_id, name, email, phone, address, tax_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, name, email, phone, address, tax_id, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.tax_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O cliente '{}' já está cadastrado.",
                        payload.name
                    ));
                }
            }
            e.into()
        })?;

        Ok(client)
    }

    pub async fn update_client<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
        payload: &ClientPayload,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET name = $3, email = $4, phone = $5, address = $6, tax_id = $7, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.tax_id)
        .execute(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O cliente '{}' já está cadastrado.",
                        payload.name
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    pub async fn delete_client<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM clients WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)")
                .bind(id)
                .bind(scope)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    /// Upsert por nome: a chave natural do import em lote.
    /// A segunda gravação com o mesmo nome vence.
    pub async fn upsert_client_by_name<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &ClientPayload,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (owner_id, name, email, phone, address, tax_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (owner_id, lower(name)) DO UPDATE SET
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                tax_id = EXCLUDED.tax_id,
                updated_at = NOW()
            RETURNING id, owner_id, name, email, phone, address, tax_id, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&payload.name)
        .bind(&payload.email)
        .bind(&payload.phone)
        .bind(&payload.address)
        .bind(&payload.tax_id)
        .fetch_one(executor)
        .await?;
        Ok(client)
    }

    /// Criação implícita durante a gravação do orçamento: só o nome.
    /// Se o cliente já existe, devolve o registro existente intacto.
    pub async fn upsert_client_minimal<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        name: &str,
    ) -> Result<Client, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, Client>(
            r#"
            INSERT INTO clients (owner_id, name)
            VALUES ($1, $2)
            ON CONFLICT (owner_id, lower(name)) DO UPDATE SET updated_at = clients.updated_at
            RETURNING id, owner_id, name, email, phone, address, tax_id, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(name)
        .fetch_one(executor)
        .await?;
        Ok(client)
    }

    pub async fn bulk_delete_clients<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM clients WHERE id = ANY($1) AND ($2::uuid IS NULL OR owner_id = $2)",
        )
        .bind(ids)
        .bind(scope)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    // =========================================================================
    //  ITENS DO CATÁLOGO
    // =========================================================================

    pub async fn list_items<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
    ) -> Result<Vec<CatalogItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, CatalogItem>(
            r#"
            SELECT id, owner_id, model_number, name, description, unit_rate, tax_rate,
                   tax_code, created_at, updated_at
            FROM items
            WHERE ($1::uuid IS NULL OR owner_id = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(scope)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn create_item<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CatalogItemPayload,
    ) -> Result<CatalogItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            INSERT INTO items (owner_id, model_number, name, description, unit_rate, tax_rate, tax_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, model_number, name, description, unit_rate, tax_rate,
                      tax_code, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&payload.model_number)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.unit_rate)
        .bind(payload.tax_rate)
        .bind(&payload.tax_code)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O item '{}' já está cadastrado.",
                        payload.name
                    ));
                }
            }
            e.into()
        })?;

        Ok(item)
    }

    pub async fn update_item<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
        payload: &CatalogItemPayload,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET model_number = $3, name = $4, description = $5, unit_rate = $6,
                tax_rate = $7, tax_code = $8, updated_at = NOW()
            WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)
            "#,
        )
        .bind(id)
        .bind(scope)
        .bind(&payload.model_number)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.unit_rate)
        .bind(payload.tax_rate)
        .bind(&payload.tax_code)
        .execute(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation(format!(
                        "O item '{}' já está cadastrado.",
                        payload.name
                    ));
                }
            }
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    pub async fn delete_item<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        id: Uuid,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result =
            sqlx::query("DELETE FROM items WHERE id = $1 AND ($2::uuid IS NULL OR owner_id = $2)")
                .bind(id)
                .bind(scope)
                .execute(executor)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn upsert_item_by_name<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        payload: &CatalogItemPayload,
    ) -> Result<CatalogItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, CatalogItem>(
            r#"
            INSERT INTO items (owner_id, model_number, name, description, unit_rate, tax_rate, tax_code)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (owner_id, lower(name)) DO UPDATE SET
                model_number = EXCLUDED.model_number,
                description = EXCLUDED.description,
                unit_rate = EXCLUDED.unit_rate,
                tax_rate = EXCLUDED.tax_rate,
                tax_code = EXCLUDED.tax_code,
                updated_at = NOW()
            RETURNING id, owner_id, model_number, name, description, unit_rate, tax_rate,
                      tax_code, created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&payload.model_number)
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(payload.unit_rate)
        .bind(payload.tax_rate)
        .bind(&payload.tax_code)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn bulk_delete_items<'e, E>(
        &self,
        executor: E,
        scope: Option<Uuid>,
        ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "DELETE FROM items WHERE id = ANY($1) AND ($2::uuid IS NULL OR owner_id = $2)",
        )
        .bind(ids)
        .bind(scope)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
