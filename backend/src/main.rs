//! Backend entry-point: wires REST endpoints and OpenAPI docs.

use std::env;

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use aula_backend::inbound::http::health::HealthState;
use aula_backend::outbound::persistence::{DbPool, PoolConfig};
use aula_backend::server::{bind_addr_from_env, create_server, paging_from_env, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let database_url = env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set"))?;
    let bind_addr = bind_addr_from_env().map_err(std::io::Error::other)?;
    let paging = paging_from_env().map_err(std::io::Error::other)?;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(std::io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool).with_paging(paging);
    let server = create_server(health_state, config)?;
    server.await
}
