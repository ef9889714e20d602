use std::sync::Arc;

use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;

use cms_admin_backend::api::{AdminApi, AuthApi, HealthApi};
use cms_admin_backend::app_data::AppData;
use cms_admin_backend::auth::Authenticator;
use cms_admin_backend::config::{
    init_logging, AppSettings, DatabaseConnections, SecretManager, SystemEnvironment,
};
use cms_admin_backend::coordinators::AuthCoordinator;
use cms_admin_backend::types::db::user::Role;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let env = SystemEnvironment;
    let settings = AppSettings::from_env_provider(&env).expect("Failed to load settings");
    let secret_manager = Arc::new(
        SecretManager::init(&env, settings.is_production).expect("Failed to load secrets"),
    );

    let connections = DatabaseConnections::init(&settings)
        .await
        .expect("Failed to connect to databases");
    connections
        .migrate()
        .await
        .expect("Failed to run migrations");

    let app_data = Arc::new(
        AppData::init(connections, settings.clone(), secret_manager)
            .expect("Failed to initialize application data"),
    );

    seed_initial_admin(&app_data).await;

    let coordinator = Arc::new(AuthCoordinator::new(app_data.clone()));
    let authenticator = Arc::new(Authenticator::new(
        app_data.token_service.clone(),
        app_data.user_store.clone(),
    ));

    let auth_api = AuthApi::new(coordinator, authenticator.clone());
    let admin_api = AdminApi::new(
        authenticator,
        app_data.audit_store.clone(),
        app_data.audit_logger.clone(),
    );

    let api_service = OpenApiService::new(
        (HealthApi, auth_api, admin_api),
        "CMS Admin Backend",
        env!("CARGO_PKG_VERSION"),
    )
    .server(format!("{}/api", settings.public_url));

    let ui = api_service.swagger_ui();

    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    let address = settings.server_address();
    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at {}/swagger", settings.public_url);

    Server::new(TcpListener::bind(address)).run(app).await
}

/// Create the first admin account when the users table is empty
///
/// Controlled by ADMIN_EMAIL and ADMIN_PASSWORD. Without them an empty
/// instance stays empty and nobody can log in, so the gap is logged loudly.
async fn seed_initial_admin(app_data: &Arc<AppData>) {
    let user_count = app_data
        .user_store
        .count()
        .await
        .expect("Failed to count users");
    if user_count > 0 {
        return;
    }

    let (email, password) = match (
        std::env::var("ADMIN_EMAIL").ok(),
        std::env::var("ADMIN_PASSWORD").ok(),
    ) {
        (Some(email), Some(password)) => (email, password),
        _ => {
            tracing::warn!(
                "no users exist and ADMIN_EMAIL/ADMIN_PASSWORD are not set, nobody can log in"
            );
            return;
        }
    };

    let password_hash = app_data
        .password_hasher
        .hash(&password)
        .expect("Failed to hash initial admin password");

    let user = app_data
        .user_store
        .create_user(&email, &password_hash, "Administrator", Role::Admin)
        .await
        .expect("Failed to seed initial admin user");

    tracing::info!(user_id = user.id, "seeded initial admin account");
}
