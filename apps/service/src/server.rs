use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Result;
use tracing::info;
use uptime::{AggregationConfig, MonitorAggregator, ProbeStore};

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::routes;

/// Largest accepted JSON body
const JSON_LIMIT_BYTES: usize = 64 * 1024;

/// Shared state of every worker
pub struct AppState {
    pub store: Arc<dyn ProbeStore>,
    pub aggregator: MonitorAggregator,
}

impl AppState {
    pub fn new(store: Arc<dyn ProbeStore>, config: AggregationConfig) -> Self {
        let aggregator = MonitorAggregator::new(store.clone(), config);
        Self { store, aggregator }
    }
}

/// Extractor settings and routes, shared by the server and the tests
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(JSON_LIMIT_BYTES)
            .error_handler(|err, _| ApiError::BadPayload(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| ApiError::BadPayload(err.to_string()).into()),
    );

    routes::routes(cfg);
}

pub async fn run_server(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.bind, config.port).parse()?;
    let state = web::Data::new(state);

    info!(%addr, "Starting HTTP server");
    HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
