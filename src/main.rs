//! EC2 Network Gateway API - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use ec2_network_gateway::application::locks::ResourceLocks;
use ec2_network_gateway::application::use_cases::internet_gateways::{
    AttachInternetGatewayUseCase, CreateInternetGatewayUseCase, DeleteInternetGatewayUseCase,
    DescribeInternetGatewaysUseCase, DetachInternetGatewayUseCase,
};
use ec2_network_gateway::domain::gateways::{ItemRepository, NetworkControlPlane};
use ec2_network_gateway::infrastructure::driven_adapters::config::{AppConfig, LogFormat, StoreBackend};
use ec2_network_gateway::infrastructure::driven_adapters::{
    database, MemoryItemRepository, NeutronClient, PostgresItemRepository,
};
use ec2_network_gateway::infrastructure::driving_adapters::api_rest::{self, AppState};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ec2_network_gateway=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Plain => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn item_repository(config: &AppConfig) -> anyhow::Result<Arc<dyn ItemRepository>> {
    match config.database.backend {
        StoreBackend::Postgres => {
            let pool = database::create_pool(&config.database)
                .await
                .context("Failed to connect to the database")?;
            tracing::info!("Database connection pool created");

            database::run_migrations(&pool).await?;
            tracing::info!("Database migrations completed");

            Ok(Arc::new(PostgresItemRepository::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory item store; state is lost on restart");
            Ok(Arc::new(MemoryItemRepository::new()))
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = allowed_origins
            .iter()
            .map(|origin| HeaderValue::from_str(origin))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid entry in server.allowed_origins")?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new().allow_origin(origin).allow_methods(Any).allow_headers(Any))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    init_tracing(config.log.format);
    tracing::info!("Configuration loaded successfully");

    let item_repository = item_repository(&config).await?;

    let control_plane: Arc<dyn NetworkControlPlane> = Arc::new(NeutronClient::new(&config.control_plane)?);
    tracing::info!(
        url = %config.control_plane.url,
        external_network = %config.control_plane.external_network,
        "Network control plane client created"
    );

    let locks = Arc::new(ResourceLocks::new());

    let app_state = AppState {
        config: Arc::new(config.clone()),
        create_internet_gateway_use_case: Arc::new(CreateInternetGatewayUseCase::new(item_repository.clone())),
        attach_internet_gateway_use_case: Arc::new(AttachInternetGatewayUseCase::new(
            item_repository.clone(),
            control_plane.clone(),
            locks.clone(),
            config.control_plane.external_network.clone(),
        )),
        detach_internet_gateway_use_case: Arc::new(DetachInternetGatewayUseCase::new(
            item_repository.clone(),
            control_plane,
            locks.clone(),
        )),
        delete_internet_gateway_use_case: Arc::new(DeleteInternetGatewayUseCase::new(item_repository.clone(), locks)),
        describe_internet_gateways_use_case: Arc::new(DescribeInternetGatewaysUseCase::new(item_repository)),
    };

    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit.requests_per_second)
            .burst_size(config.rate_limit.burst_size)
            .finish()
            .context("Invalid rate_limit configuration")?,
    );

    let app = api_rest::router(app_state)
        .layer(GovernorLayer {
            config: governor_config,
        })
        .layer(cors_layer(&config.server.allowed_origins)?);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
