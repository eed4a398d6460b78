use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use sea_orm_migration::MigratorTrait;
use tokio::net::TcpListener;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use truck_fare_backend::{
    config::Config,
    db,
    entities::user::{self, UserRole},
    fare::{DistanceProvider, FareService, MapsClient, SeaOrmCategoryStore},
    routes,
    utils::password,
    AppResult, AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "truck_fare_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Connect to database and bring the schema up to date
    let db = db::connect(&config)
        .await
        .expect("Failed to connect to database");
    migration::Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database ready");

    seed_admin(&db, &config)
        .await
        .expect("Failed to seed admin account");

    let fare = FareService::new(
        Arc::new(SeaOrmCategoryStore::new(db.clone())),
        build_provider(&config),
    );

    // Create app state
    let state = AppState {
        db,
        config: config.clone(),
        fare,
    };

    // Configure rate limiting: 100 requests per 60 seconds per IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(60)
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(GovernorLayer::new(governor_config));

    // Start server with socket address for rate limiting
    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Failed to start server");
}

/// Mapping provider is optional; without it quotes fall back to Haversine
/// distances.
fn build_provider(config: &Config) -> Option<Arc<dyn DistanceProvider>> {
    let base_url = match &config.maps_base_url {
        Some(url) => url.clone(),
        None => {
            tracing::info!("No mapping provider configured, using haversine distances");
            return None;
        }
    };

    let client = MapsClient::new(
        base_url.clone(),
        config.maps_api_key.clone(),
        config.maps_timeout_secs,
    )
    .expect("Failed to build maps client");

    tracing::info!("Mapping provider configured at {}", base_url);
    Some(Arc::new(client))
}

/// Create the admin account from config on first startup.
async fn seed_admin(db: &DatabaseConnection, config: &Config) -> AppResult<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(&config.admin_email))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(config.admin_email.clone()),
        password_hash: Set(password::hash(&config.admin_password)?),
        name: Set("Admin".to_string()),
        role: Set(UserRole::Admin),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Admin account created: {}", config.admin_email);
    Ok(())
}
