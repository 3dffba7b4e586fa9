// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
use crate::constants::{DEFAULT_PORT, FINALIZER};
use kube::{CustomResource, ResourceExt};
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
#[kube(group = "devx.ibm.com", version = "v1alpha1", kind = "StarterKit")]
#[kube(namespaced, shortname = "skit")]
#[kube(status = "StarterKitStatus")]
#[kube(printcolumn = r#"{"name":"Target Repo","type":"string","jsonPath":".status.targetRepo"}"#)]
#[serde(rename_all = "camelCase")]
pub struct StarterKitSpec {
    #[serde(default)]
    pub options: StarterKitOptions,
    pub template_repo: TemplateRepo,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StarterKitOptions {
    /// Application port, 0 selects the default
    #[serde(default)]
    pub port: i32,
    #[serde(default)]
    pub env: Vec<EnvEntry>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, schemars::JsonSchema)]
pub struct EnvEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// The template to clone from and the repository to create from it
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRepo {
    pub template_owner: String,
    pub template_repo_name: String,
    pub owner: String,
    pub name: String,
    #[serde(default, rename = "repoDescription")]
    pub description: String,
    pub secret_key_ref: SecretKeyRef,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
pub struct SecretKeyRef {
    /// Secret in the StarterKit's namespace
    pub name: String,
    pub key: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StarterKitStatus {
    /// URL of the generated repository, empty until creation succeeded
    #[serde(default)]
    pub target_repo: String,
}

/// Lifecycle state inferred from the stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    PendingExternalRepo,
    ExternalRepoReady,
    MarkedForDeletion,
}

impl StarterKit {
    pub fn phase(&self) -> Phase {
        if self.is_marked_for_deletion() {
            Phase::MarkedForDeletion
        } else if self.target_repo().is_some() {
            Phase::ExternalRepoReady
        } else {
            Phase::PendingExternalRepo
        }
    }

    /// The generated repository URL, if creation already succeeded
    pub fn target_repo(&self) -> Option<&str> {
        self.status
            .as_ref()
            .map(|s| s.target_repo.as_str())
            .filter(|repo| !repo.is_empty())
    }

    pub fn is_marked_for_deletion(&self) -> bool {
        self.metadata.deletion_timestamp.is_some()
    }

    pub fn has_finalizer(&self) -> bool {
        self.finalizers().iter().any(|f| f == FINALIZER)
    }

    /// Port for the Service and container, falling back to the default
    pub fn effective_port(&self) -> i32 {
        if self.spec.options.port > 0 {
            self.spec.options.port
        } else {
            DEFAULT_PORT
        }
    }
}
