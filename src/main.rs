#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod configuration;
mod github;
mod server;

use crate::configuration::Configuration;
use crate::github::GitHubClient;
use crate::server::{Listener, ServerContext};

fn set_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

fn main() -> Result<(), server::Error> {
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    set_tracing();

    let config = Configuration::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime")
        .block_on(run(config))
}

async fn run(config: Configuration) -> Result<(), server::Error> {
    info!(
        "Querying packages for identities {:?}",
        config.identities.as_slice()
    );

    let client = GitHubClient::new(&config.token);
    let context = ServerContext::new(Arc::new(client), &config)?;
    let listener = Listener::new(config.binding_address(), context);

    listener.serve().await
}
