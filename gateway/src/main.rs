// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

use clap::Parser;
use gateway_broker::application::Application;
use gateway_broker::configuration::GatewayOptions;
use gateway_broker::identity::HeaderIdentity;
use gateway_broker::store::{MemoryRegistry, MemoryStore};
use std::{io::Error, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Error> {
    println!("[gateway] init");

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        // this needs to be set to remove duplicated information in the log.
        .with_current_span(false)
        // this needs to be set to false, otherwise ANSI color codes will
        // show up in a confusing manner in CloudWatch logs.
        .with_ansi(false)
        // disabling time is handy because CloudWatch will add the ingestion time.
        .without_time()
        // remove the name of the function from every log entry
        .with_target(false)
        .init();

    // get configuration options from environment variables
    let options = GatewayOptions::parse();

    tracing::info!("[gateway] {:?}", &options);

    let identity = Arc::new(HeaderIdentity);
    let store = Arc::new(MemoryStore::new());
    let registry = Arc::new(MemoryRegistry::new());

    let application = Application::build(options, identity, store, registry)
        .await
        .unwrap();

    application.run_until_stopped().await.map_err(Error::from)
}
