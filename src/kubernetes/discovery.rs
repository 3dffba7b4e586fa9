// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! OpenShift API availability checking

use crate::constants::discovery::{OPENSHIFT_API_GROUPS, POLL_INTERVAL_SECS, POLL_MAX_INTERVAL_SECS};
use crate::error::Result;
use kube::{discovery::Discovery, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Wait until every OpenShift API group the operator writes to is served.
/// This uses exponential backoff starting at POLL_INTERVAL_SECS seconds.
pub async fn wait_for_openshift_apis(client: &Client) -> Result<()> {
    let mut interval = POLL_INTERVAL_SECS;

    loop {
        match find_missing_groups(client).await {
            Ok(missing) if missing.is_empty() => {
                info!("OpenShift APIs ({}) are available", OPENSHIFT_API_GROUPS.join(", "));
                return Ok(());
            }
            Ok(missing) => {
                info!(
                    "OpenShift APIs not yet available (missing {}), waiting {} seconds...",
                    missing.join(", "),
                    interval
                );
            }
            Err(e) => {
                warn!(
                    "Error discovering OpenShift APIs: {}, retrying in {} seconds...",
                    e, interval
                );
            }
        }

        sleep(Duration::from_secs(interval)).await;

        interval = next_interval(interval);
    }
}

async fn find_missing_groups(client: &Client) -> Result<Vec<&'static str>> {
    let discovery = Discovery::new(client.clone())
        .filter(&OPENSHIFT_API_GROUPS)
        .run()
        .await?;

    let served: Vec<&str> = discovery.groups().map(|g| g.name()).collect();
    Ok(missing_groups(&served))
}

fn missing_groups(served: &[&str]) -> Vec<&'static str> {
    OPENSHIFT_API_GROUPS
        .iter()
        .copied()
        .filter(|group| !served.contains(group))
        .collect()
}

fn next_interval(interval: u64) -> u64 {
    (interval * 2).min(POLL_MAX_INTERVAL_SECS)
}
