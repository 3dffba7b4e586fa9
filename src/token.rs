// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! GitHub credential lookup and webhook token generation

use crate::constants::WEBHOOK_SECRET_BYTES;
use crate::error::{Result, StarterKitError};
use crate::types::starterkit::SecretKeyRef;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};
use rand::RngCore;
use std::fmt;
use tracing::{debug, instrument};

/// Opaque GitHub access token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct GitHubToken(String);

impl GitHubToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GitHubToken(***)")
    }
}

/// Resolve the token referenced by `selector` in `namespace`.
///
/// A missing Secret yields `Ok(None)` so the caller can wait for it to
/// appear. A Secret without the referenced key is an error.
#[instrument(skip(client))]
pub async fn resolve(
    client: &Client,
    namespace: &str,
    selector: &SecretKeyRef,
) -> Result<Option<GitHubToken>> {
    let secrets: Api<Secret> = Api::namespaced(client.clone(), namespace);

    let Some(secret) = secrets.get_opt(&selector.name).await? else {
        debug!("GitHub secret {}/{} not found", namespace, selector.name);
        return Ok(None);
    };

    token_from_secret(&secret, selector).map(Some)
}

fn token_from_secret(secret: &Secret, selector: &SecretKeyRef) -> Result<GitHubToken> {
    let missing = || StarterKitError::MissingSecretKey {
        secret: selector.name.clone(),
        key: selector.key.clone(),
    };

    let Some(bytes) = secret.data.as_ref().and_then(|d| d.get(&selector.key)) else {
        return Err(missing());
    };

    let token = String::from_utf8(bytes.0.clone()).map_err(|_| missing())?;
    Ok(GitHubToken(token.trim().to_string()))
}

/// URL-safe base64 of fresh random bytes, used as the build webhook secret
pub fn generate_webhook_secret() -> Result<String> {
    let mut raw = [0u8; WEBHOOK_SECRET_BYTES];
    rand::rngs::OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|e| StarterKitError::SecretGeneration(e.to_string()))?;
    Ok(URL_SAFE.encode(raw))
}
