//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, warn};

use crate::api::services::{AppStartTime, analytics_routes, health_routes};
use crate::config::{ServerConfig, StaticConfig};
use crate::runtime::lifetime;

/// Validate CORS configuration at startup (runs once)
fn validate_cors_config(server: &ServerConfig) {
    if server.cors_allowed_origins.is_empty() {
        warn!("CORS: no allowed origins configured, cross-origin requests will be rejected");
    } else if server.cors_allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS: any origin is allowed");
    }
}

/// Build CORS middleware from configuration
fn build_cors_middleware(server: &ServerConfig) -> Cors {
    // Empty origins = same-origin only
    if server.cors_allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "HEAD", "OPTIONS"])
        .allowed_header(actix_web::http::header::CONTENT_TYPE)
        .allowed_header(actix_web::http::header::ACCEPT)
        .max_age(3600);

    if server.cors_allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &server.cors_allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// 注册所有路由
///
/// `/health` 先于 API scope 注册，`api_prefix` 为空时也不会被吞掉。
pub fn configure_routes(api_prefix: String) -> impl Fn(&mut web::ServiceConfig) + Clone {
    move |cfg: &mut web::ServiceConfig| {
        cfg.service(health_routes())
            .service(web::scope(&api_prefix).service(analytics_routes()));
    }
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares the metrics repository and analytics service
/// 3. Configures and starts the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(config: Arc<StaticConfig>) -> Result<()> {
    // Record application start time
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::prepare_startup(&config).await.map_err(|e| {
        error!("Server startup failed: {:#}", e);
        e
    })?;

    let repository = startup.repository.clone();
    let analytics_service = startup.analytics_service.clone();

    let server_config = config.server.clone();
    let cpu_count = server_config.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    validate_cors_config(&server_config);

    let routes = configure_routes(server_config.api_prefix.clone());
    let cors_config = server_config.clone();

    let server = HttpServer::new(move || {
        let cors = build_cors_middleware(&cors_config);

        App::new()
            .wrap(cors)
            .wrap(Compress::default())
            .app_data(web::Data::new(repository.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .configure(routes.clone())
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", server_config.host, server_config.port);
    warn!(
        "Starting server at http://{} (API prefix: {})",
        bind_address, server_config.api_prefix
    );

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    warn!("Server stopped");
    Ok(())
}
