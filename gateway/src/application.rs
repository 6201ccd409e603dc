// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use crate::configuration::GatewayOptions;
use crate::constants::MAX_BODY_SIZE;
use crate::identity::IdentityResolver;
use crate::routes;
use crate::store::{Catalog, MemoryRegistry, MemoryStore};
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::serve::Serve;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub options: GatewayOptions,
    pub identity: Arc<dyn IdentityResolver>,
    pub store: Arc<MemoryStore>,
    pub registry: Arc<MemoryRegistry>,
    pub catalog: Catalog,
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    pub async fn build(
        options: GatewayOptions,
        identity: Arc<dyn IdentityResolver>,
        store: Arc<MemoryStore>,
        registry: Arc<MemoryRegistry>,
    ) -> Result<Self, std::io::Error> {
        let address = format!("{}:{}", options.host, options.port);
        let listener = TcpListener::bind(address).await?;
        let host = options.host.clone();
        let app = create_router(options, identity, store, registry);
        let server = axum::serve(listener, app);
        let port = server.local_addr()?.port();

        tracing::info!("[gateway] listening at http://{}:{}", host, port);

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn create_router(
    options: GatewayOptions,
    identity: Arc<dyn IdentityResolver>,
    store: Arc<MemoryStore>,
    registry: Arc<MemoryRegistry>,
) -> Router {
    let catalog = Catalog::new(store.clone(), registry.clone());
    let state = Arc::new(AppState {
        options,
        identity,
        store,
        registry,
        catalog,
    });

    Router::new()
        .route("/", get(routes::health))
        .route("/health", get(routes::health))
        .route(
            "/credentials/",
            get(routes::list_credentials).post(routes::create_credential),
        )
        .route("/credentials/{id}/", get(routes::get_credential))
        .route("/clusters/", axum::routing::post(routes::create_cluster))
        .route("/clusters/{id}/", get(routes::get_cluster))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .with_state(state)
}
