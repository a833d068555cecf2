// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    typed_header::TypedHeader,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Role, User},
};

// O nome do cabeçalho de troca de contexto (multi-tenancy)
const CONTEXT_ID_HEADER: &str = "x-context-id";

/// O contexto de autorização da requisição, resolvido UMA vez aqui e
/// carregado explicitamente por todos os handlers e serviços.
///
/// `identity` é quem está logado; `tenant` é em nome de quem os dados são
/// lidos e gravados (o próprio usuário, o pai de uma sub-conta, ou qualquer
/// tenant no caso do admin).
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub identity: User,
    pub tenant: User,
}

impl AuthContext {
    /// Filtro de tenant das queries: None = admin, enxerga todos os tenants.
    pub fn scope(&self) -> Option<Uuid> {
        match self.identity.role {
            Role::Admin => None,
            _ => Some(self.tenant.id),
        }
    }

    /// Dono das gravações feitas nesta requisição.
    pub fn tenant_id(&self) -> Uuid {
        self.tenant.id
    }
}

// O middleware em si: valida o bearer token, resolve o tenant efetivo e
// pendura o AuthContext nos "extensions" da requisição.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: axum::http::Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AppError::InvalidToken)?;

    let identity = app_state
        .auth_service
        .validate_token(bearer.token())
        .await?;

    let requested = match request.headers().get(CONTEXT_ID_HEADER) {
        Some(value) => {
            let value_str = value.to_str().map_err(|_| {
                AppError::InvalidPayload(
                    "Cabeçalho x-context-id contém caracteres inválidos.".to_string(),
                )
            })?;
            let target = Uuid::parse_str(value_str).map_err(|_| {
                AppError::InvalidPayload(
                    "Cabeçalho x-context-id inválido (não é um UUID).".to_string(),
                )
            })?;
            Some(target)
        }
        None => None,
    };

    let tenant = app_state
        .auth_service
        .resolve_context(&identity, requested)
        .await?;

    request.extensions_mut().insert(AuthContext { identity, tenant });
    Ok(next.run(request).await)
}

// Extrator para obter o contexto autenticado diretamente nos handlers
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
