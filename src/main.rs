//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Gestão de principals + /me (o guard resolve identidade e tenant efetivo)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/"
               , get(handlers::users::list_users)
               .post(handlers::users::create_user)
        )
        .route("/{id}"
               , put(handlers::users::update_user)
               .delete(handlers::users::delete_user)
        )
        .route("/{id}/status", patch(handlers::users::update_user_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let client_routes = Router::new()
        .route("/"
               , get(handlers::clients::list_clients)
               .post(handlers::clients::create_client)
        )
        .route("/search", get(handlers::clients::search_clients))
        .route("/bulk"
               , post(handlers::clients::bulk_upsert_clients)
               .delete(handlers::clients::bulk_delete_clients)
        )
        .route("/{id}"
               , put(handlers::clients::update_client)
               .delete(handlers::clients::delete_client)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let item_routes = Router::new()
        .route("/"
               , get(handlers::items::list_items)
               .post(handlers::items::create_item)
        )
        .route("/bulk"
               , post(handlers::items::bulk_upsert_items)
               .delete(handlers::items::bulk_delete_items)
        )
        .route("/{id}"
               , put(handlers::items::update_item)
               .delete(handlers::items::delete_item)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let quotation_routes = Router::new()
        .route("/"
               , get(handlers::quotations::list_quotations)
               .post(handlers::quotations::create_quotation)
        )
        .route("/{id}"
               , get(handlers::quotations::get_quotation)
               .put(handlers::quotations::update_quotation)
               .delete(handlers::quotations::delete_quotation)
        )
        .route("/{id}/duplicate", post(handlers::quotations::duplicate_quotation))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let invoice_routes = Router::new()
        .route("/", get(handlers::invoices::list_invoices))
        .route("/convert/{quotation_id}", post(handlers::invoices::convert_quotation))
        .route("/{id}/status", patch(handlers::invoices::update_invoice_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let company_routes = Router::new()
        .route("/"
               , get(handlers::companies::list_companies)
               .post(handlers::companies::create_company)
        )
        .route("/{id}"
               , get(handlers::companies::get_company)
               .put(handlers::companies::update_company)
               .delete(handlers::companies::delete_company)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/clients", client_routes)
        .nest("/api/items", item_routes)
        .nest("/api/quotations", quotation_routes)
        .nest("/api/invoices", invoice_routes)
        .nest("/api/companies", company_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
