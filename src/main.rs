// SPDX-License-Identifier: MIT
// Copyright 2026 The RunZa Authors

//! RunZa API Server
//!
//! Fitness tracking backend: activity logging with points, levels and
//! streaks, direct messaging, and exercise pose analysis.

use runza_api::{config::Config, db::Database, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    init_logging(config.is_production());
    tracing::info!(
        port = config.port,
        environment = %config.environment,
        "Starting RunZa API"
    );

    // Open the database and apply migrations
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to open database");

    let state = Arc::new(AppState::new(config.clone(), db).expect("Failed to build services"));

    // Seed the exercise catalog on first start
    let seeded = if state.config.reseed_exercises {
        state.pose_service.reseed_default_catalog().await
    } else {
        state.pose_service.seed_default_catalog().await
    }
    .expect("Failed to seed exercise catalog");
    if seeded > 0 {
        tracing::info!(count = seeded, "Exercise catalog seeded");
    }

    // Build router
    let app = runza_api::routes::create_router(state);

    // Start server
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize logging: flattened JSON in production, readable text otherwise.
fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("runza_api=debug".parse().unwrap())
        .add_directive("info".parse().unwrap());

    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .with_current_span(true)
                    .flatten_event(true),
            )
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
