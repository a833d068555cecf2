// src/services/user_service.rs

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    middleware::auth::AuthContext,
    models::auth::{CreateUserPayload, Role, UpdateUserPayload, User, UserStatus},
    services::policy,
};

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list(&self, ctx: &AuthContext) -> Result<Vec<User>, AppError> {
        if !policy::can_list_principals(&ctx.identity) {
            return Err(AppError::Forbidden);
        }
        match ctx.identity.role {
            Role::Admin => self.repo.list_all(&self.pool).await,
            _ => self.repo.list_sub_accounts(&self.pool, ctx.identity.id).await,
        }
    }

    /// Admin cria qualquer papel; Owner cria sub-contas debaixo de si.
    /// Sub-conta nunca chega aqui com sucesso.
    pub async fn create(
        &self,
        ctx: &AuthContext,
        payload: &CreateUserPayload,
    ) -> Result<User, AppError> {
        let new_role = payload.role.unwrap_or(match ctx.identity.role {
            Role::Admin => Role::Owner,
            _ => Role::SubAccount,
        });

        if !policy::can_create_principal(&ctx.identity, new_role) {
            return Err(AppError::Forbidden);
        }

        let parent_owner_id = match new_role {
            // A sub-conta nasce dentro do tenant efetivo: o do owner criador,
            // ou o tenant para o qual o admin trocou de contexto
            Role::SubAccount => Some(ctx.tenant_id()),
            _ => None,
        };

        validate_grants(payload.granted_permissions.as_ref())?;

        let password_clone = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        self.repo
            .create_user(
                &self.pool,
                &payload.username,
                &hashed_password,
                new_role,
                parent_owner_id,
                payload.granted_permissions.as_ref(),
            )
            .await
    }

    pub async fn update(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        payload: &UpdateUserPayload,
    ) -> Result<User, AppError> {
        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        if !policy::can_manage_principal(&ctx.identity, &target) {
            return Err(AppError::Forbidden);
        }

        let new_role = payload.role.unwrap_or(target.role);

        // Ninguém rebaixa a conta com a qual está autenticado
        if policy::is_self_demotion(&ctx.identity, id, new_role) {
            return Err(AppError::Forbidden);
        }

        // Owner não promove sub-conta: o vínculo de tenant deixaria de fazer sentido
        if ctx.identity.role == Role::Owner && new_role != Role::SubAccount {
            return Err(AppError::Forbidden);
        }

        validate_grants(payload.granted_permissions.as_ref())?;

        let grants = payload
            .granted_permissions
            .clone()
            .or(target.granted_permissions);

        self.repo
            .update_grants(&self.pool, id, new_role, grants.as_ref())
            .await
    }

    pub async fn update_status(
        &self,
        ctx: &AuthContext,
        id: Uuid,
        status: UserStatus,
    ) -> Result<(), AppError> {
        // Desativar a própria conta é proibido para qualquer papel
        if policy::is_self_target(&ctx.identity, id) {
            return Err(AppError::Forbidden);
        }

        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        if !policy::can_manage_principal(&ctx.identity, &target) {
            return Err(AppError::Forbidden);
        }

        self.repo.update_status(&self.pool, id, status).await
    }

    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<(), AppError> {
        if policy::is_self_target(&ctx.identity, id) {
            return Err(AppError::Forbidden);
        }

        let target = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFoundOrForbidden)?;

        if !policy::can_manage_principal(&ctx.identity, &target) {
            return Err(AppError::Forbidden);
        }

        self.repo.delete(&self.pool, id).await?;
        Ok(())
    }
}

fn validate_grants(grants: Option<&Vec<String>>) -> Result<(), AppError> {
    if let Some(grants) = grants {
        for slug in grants {
            if !policy::is_known_permission(slug) {
                return Err(AppError::InvalidPayload(format!(
                    "Permissão desconhecida: '{}'.",
                    slug
                )));
            }
        }
    }
    Ok(())
}
