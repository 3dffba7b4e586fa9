// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
use crate::constants::github::DEFAULT_API_URL;
use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_REQUEUE_AFTER_SECS: u64 = 5;
const DEFAULT_ERROR_REQUEUE_SECS: u64 = 60;

/// Operator configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Delete the generated GitHub repository when a StarterKit is finalized
    pub dev_mode: bool,
    pub github_api_url: String,
    /// Restrict watches to one namespace; all namespaces when unset
    pub watch_namespace: Option<String>,
    /// Delay before revisiting a StarterKit whose pass created something
    pub requeue_after: Duration,
    pub error_requeue: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dev_mode: false,
            github_api_url: DEFAULT_API_URL.to_string(),
            watch_namespace: None,
            requeue_after: Duration::from_secs(DEFAULT_REQUEUE_AFTER_SECS),
            error_requeue: Duration::from_secs(DEFAULT_ERROR_REQUEUE_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Destructive: only an explicit "true" turns it on
        let dev_mode = lookup("DEVX_DEV_MODE").is_some_and(|v| v == "true");

        let github_api_url = lookup("GITHUB_API_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let watch_namespace = lookup("WATCH_NAMESPACE").filter(|v| !v.is_empty());

        let requeue_after = seconds(&lookup, "REQUEUE_AFTER_SECS", DEFAULT_REQUEUE_AFTER_SECS)?;
        let error_requeue = seconds(&lookup, "ERROR_REQUEUE_SECS", DEFAULT_ERROR_REQUEUE_SECS)?;

        Ok(Config {
            dev_mode,
            github_api_url,
            watch_namespace,
            requeue_after,
            error_requeue,
        })
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> Result<Duration> {
    match lookup(key) {
        Some(value) => {
            let secs: u64 = value
                .parse()
                .with_context(|| format!("{} must be a number of seconds, got '{}'", key, value))?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(Duration::from_secs(default)),
    }
}
