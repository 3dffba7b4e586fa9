// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarterKitError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("GitHub request failed: {0}")]
    GitHubRequest(#[from] reqwest::Error),

    #[error("GitHub API returned {status}: {message}")]
    GitHubApi { status: u16, message: String },

    #[error("Object is missing required key: {0}")]
    MissingObjectKey(&'static str),

    #[error("Secret {secret} does not contain key '{key}'")]
    MissingSecretKey { secret: String, key: String },

    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to generate webhook secret: {0}")]
    SecretGeneration(String),
}

impl StarterKitError {
    /// The object (or route) the request addressed does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            StarterKitError::KubeError(kube::Error::Api(err)) => err.code == 404,
            StarterKitError::GitHubApi { status, .. } => *status == 404,
            _ => false,
        }
    }

    /// Optimistic concurrency rejected a write based on a stale resourceVersion
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            StarterKitError::KubeError(kube::Error::Api(err)) if err.code == 409 && err.reason == "Conflict"
        )
    }
}

pub type Result<T> = std::result::Result<T, StarterKitError>;
