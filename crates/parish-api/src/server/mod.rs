//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use parish_common::{AppConfig, AppError, JwtService};
use parish_core::SmsSender;
use parish_db::{create_pool, run_migrations, InMemoryStore};
use parish_service::{LoggingSmsSender, ServiceContextBuilder, TwilioSmsSender};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, apply_middleware_with_config};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health checks get the base stack only so probes are never rate limited.
pub fn create_app(state: AppState) -> Router {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    );
    let health = apply_middleware(health_routes());

    api.merge(health).with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let builder = match &config.database.url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");
            let db_config = parish_db::DatabaseConfig::new(
                url.clone(),
                config.database.max_connections,
                config.database.min_connections,
            );
            let pool = create_pool(&db_config)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            run_migrations(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");
            ServiceContextBuilder::new().postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set, using the in-memory store. Data is lost on restart.");
            ServiceContextBuilder::new().in_memory(InMemoryStore::new())
        }
    };

    let sms_sender: Arc<dyn SmsSender> = match &config.sms.twilio {
        Some(twilio) => {
            info!(from = %twilio.from_number, "Sending SMS through Twilio");
            Arc::new(TwilioSmsSender::new(twilio.clone()))
        }
        None => {
            warn!("Twilio is not configured, outbound SMS will only be logged");
            Arc::new(LoggingSmsSender)
        }
    };

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));

    let service_context = builder
        .sms_sender(sms_sender)
        .jwt_service(jwt_service)
        .reminders(config.reminders.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_falls_back_to_in_memory() {
        let state = create_app_state(AppConfig::in_memory("test-secret"))
            .await
            .unwrap();
        assert!(state.service_context().pool().is_none());
        assert!(state.cron_secret().is_none());
    }
}
