// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, Role, User, UserStatus},
    services::policy,
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    pool: sqlx::PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, pool: sqlx::PgPool) -> Self {
        Self { user_repo, jwt_secret, pool }
    }

    /// Cadastro público: sempre nasce um Owner (um tenant novo).
    pub async fn register_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        // O hashing é pesado; sai da thread do runtime
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let new_user = self
            .user_repo
            .create_user(
                &self.pool,
                username,
                &hashed_password,
                Role::Owner,
                None,
                None,
            )
            .await?;

        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.status == UserStatus::Disabled {
            return Err(AppError::AccountDisabled);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    /// Valida o token e carrega a identidade. Sujeito inexistente ou conta
    /// desativada não passam daqui.
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if user.status == UserStatus::Disabled {
            return Err(AppError::AccountDisabled);
        }

        Ok(user)
    }

    /// Resolve o tenant efetivo da requisição (cabeçalho x-context-id).
    ///
    /// Admin pode assumir qualquer conta existente; alvo desconhecido cai
    /// silenciosamente de volta para o próprio admin. Sub-conta sem troca
    /// explícita age como o pai, que é o dono real dos dados.
    pub async fn resolve_context(
        &self,
        identity: &User,
        requested: Option<Uuid>,
    ) -> Result<User, AppError> {
        match requested {
            Some(target_id) => {
                if !policy::can_switch_context(identity, target_id) {
                    return Err(AppError::Forbidden);
                }
                match identity.role {
                    Role::Admin | Role::SubAccount => Ok(self
                        .user_repo
                        .find_by_id(target_id)
                        .await?
                        .unwrap_or_else(|| identity.clone())),
                    // Owner "trocando" para si mesmo: não há o que carregar
                    Role::Owner => Ok(identity.clone()),
                }
            }
            None => {
                if identity.role == Role::SubAccount {
                    if let Some(parent_id) = identity.parent_owner_id {
                        if let Some(parent) = self.user_repo.find_by_id(parent_id).await? {
                            return Ok(parent);
                        }
                    }
                }
                Ok(identity.clone())
            }
        }
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
