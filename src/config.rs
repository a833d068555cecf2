// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::db::{
    CatalogRepository, CompanyRepository, InvoiceRepository, QuotationRepository, UserRepository,
};
use crate::services::{
    auth::AuthService, catalog_service::CatalogService, company_service::CompanyService,
    invoice_service::InvoiceService, quotation_service::QuotationService,
    user_service::UserService,
};

// O estado compartilhado que será acessível em toda a aplicação.
// Os serviços recebem repositórios e pool explicitamente: nada de
// singleton global de banco.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub quotation_service: QuotationService,
    pub invoice_service: InvoiceService,
    pub company_service: CompanyService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let quotation_repo = QuotationRepository::new(db_pool.clone());
        let invoice_repo = InvoiceRepository::new(db_pool.clone());
        let company_repo = CompanyRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let user_service = UserService::new(user_repo, db_pool.clone());
        let catalog_service = CatalogService::new(catalog_repo.clone(), db_pool.clone());
        let quotation_service = QuotationService::new(
            quotation_repo.clone(),
            catalog_repo,
            company_repo.clone(),
            invoice_repo.clone(),
            db_pool.clone(),
        );
        let invoice_service =
            InvoiceService::new(invoice_repo, quotation_repo, db_pool.clone());
        let company_service = CompanyService::new(company_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            user_service,
            catalog_service,
            quotation_service,
            invoice_service,
            company_service,
        })
    }
}
