use axum::{middleware::from_fn_with_state, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_rs::config::Config;
use checkout_rs::metrics::Metrics;
use checkout_rs::routes::{self, AppState};
use checkout_rs::xpay;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,checkout_rs=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cfg = Config::from_env()?;
    tracing::info!("config loaded");

    // An absent gateway disables the payment feature, not the process: the
    // checkout endpoints answer 503 while everything else keeps serving.
    let gateway = match xpay::XpayConfig::from_env() {
        Ok(xpay_config) => {
            tracing::info!(
                protocol = xpay_config.protocol.as_str(),
                "payment gateway configured"
            );
            Some(xpay::gateway_from_config(xpay_config))
        }
        Err(e) => {
            tracing::warn!(error = %e, "payment gateway unavailable");
            None
        }
    };

    let state = Arc::new(AppState {
        gateway,
        membership_fee_cents: cfg.membership_fee_eur * 100,
        metrics: Metrics::new(),
    });

    let app = Router::new()
        .route("/health/live", get(routes::health::health_live))
        .route("/health/ready", get(routes::health::health_ready))
        .route("/metrics", get(routes::metrics::metrics))
        .with_state(state.clone())
        .merge(routes::checkout_router(state.clone()))
        .layer(from_fn_with_state(
            state,
            checkout_rs::middleware::metrics::metrics_middleware,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
