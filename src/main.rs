// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
use anyhow::{Context, Result};
use kube::Client;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use starter_kit_operator::config::Config;
use starter_kit_operator::github::GitHubGateway;
use starter_kit_operator::kubernetes::wait_for_openshift_apis;
use starter_kit_operator::reconcilers::StarterKitReconciler;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing, honouring RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting StarterKit operator");

    // Load configuration
    let config = Config::from_env()?;
    info!(
        "Configuration loaded: dev_mode={}, github_api_url={}, watch_namespace={}",
        config.dev_mode,
        config.github_api_url,
        config.watch_namespace.as_deref().unwrap_or("<all>")
    );
    if config.dev_mode {
        warn!("Dev mode is enabled: generated repositories are deleted with their StarterKit");
    }

    // Create Kubernetes client
    let client = Client::try_default()
        .await
        .context("Failed to create Kubernetes client")?;
    info!("Connected to Kubernetes cluster");

    info!("Waiting for OpenShift APIs to become available...");
    wait_for_openshift_apis(&client).await?;

    let gateway = GitHubGateway::new(&config.github_api_url)
        .with_context(|| format!("Invalid GITHUB_API_URL '{}'", config.github_api_url))?;
    let reconciler = StarterKitReconciler::new(client, config, gateway);

    info!("Starting StarterKit controller...");
    reconciler.run().await?;

    info!("Controller stopped, shutting down");
    Ok(())
}
