// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Desired-state builders for the resources a StarterKit owns.
//!
//! Every builder is a pure function of the parent StarterKit. Children share
//! the parent's name and namespace, and their labels derive only from that
//! name.

pub mod build;
pub mod deployment;
pub mod network;

pub use build::{build_config, image_stream, webhook_callback_url, webhook_secret, webhook_secret_value};
pub use deployment::deployment_config;
pub use network::{route, service};

use crate::constants::labels;
use crate::types::StarterKit;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::{api::ObjectMeta, Resource, ResourceExt};
use std::collections::BTreeMap;
use std::fmt;

/// The kinds of child resource, in the order a pass ensures them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildKind {
    ImageStream,
    Route,
    Service,
    Secret,
    BuildConfig,
    Deployment,
}

impl ChildKind {
    pub const ALL: [ChildKind; 6] = [
        ChildKind::ImageStream,
        ChildKind::Route,
        ChildKind::Service,
        ChildKind::Secret,
        ChildKind::BuildConfig,
        ChildKind::Deployment,
    ];
}

impl fmt::Display for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChildKind::ImageStream => "ImageStream",
            ChildKind::Route => "Route",
            ChildKind::Service => "Service",
            ChildKind::Secret => "Secret",
            ChildKind::BuildConfig => "BuildConfig",
            ChildKind::Deployment => "DeploymentConfig",
        };
        f.write_str(name)
    }
}

/// `app=<name>, devx=""`
pub(crate) fn app_labels(skit: &StarterKit) -> BTreeMap<String, String> {
    BTreeMap::from([
        (labels::APP.to_string(), skit.name_any()),
        (labels::DEVX.to_string(), String::new()),
    ])
}

/// Metadata shared by every child: same name and namespace as the parent
pub(crate) fn child_meta(skit: &StarterKit, labels: BTreeMap<String, String>) -> ObjectMeta {
    ObjectMeta {
        name: Some(skit.name_any()),
        namespace: skit.namespace(),
        labels: Some(labels),
        ..Default::default()
    }
}

/// Attach the parent as controlling owner so deletion cascades
pub fn with_owner<K: Resource>(mut child: K, owner: &OwnerReference) -> K {
    child.meta_mut().owner_references = Some(vec![owner.clone()]);
    child
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::starterkit::{
        EnvEntry, SecretKeyRef, StarterKitOptions, StarterKitSpec, StarterKitStatus, TemplateRepo,
    };

    pub fn make_starterkit(port: i32, target_repo: &str) -> StarterKit {
        let mut skit = StarterKit::new(
            "devx-test-java-spring-app",
            StarterKitSpec {
                options: StarterKitOptions {
                    port,
                    env: vec![EnvEntry {
                        name: "LOG_LEVEL".to_string(),
                        value: Some("debug".to_string()),
                    }],
                },
                template_repo: TemplateRepo {
                    template_owner: "IBM".to_string(),
                    template_repo_name: "java-spring-app".to_string(),
                    owner: "devx-test".to_string(),
                    name: "devx-test-java-spring-app".to_string(),
                    description: "Java Spring App".to_string(),
                    secret_key_ref: SecretKeyRef {
                        name: "token-secret".to_string(),
                        key: "apikey".to_string(),
                    },
                },
            },
        );
        skit.metadata.namespace = Some("apps".to_string());
        skit.status = Some(StarterKitStatus {
            target_repo: target_repo.to_string(),
        });
        skit
    }

    #[test]
    fn test_child_kind_order() {
        let names: Vec<String> = ChildKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            [
                "ImageStream",
                "Route",
                "Service",
                "Secret",
                "BuildConfig",
                "DeploymentConfig"
            ]
        );
    }

    #[test]
    fn test_child_meta_copies_parent_identity() {
        let skit = make_starterkit(0, "");
        let meta = child_meta(&skit, app_labels(&skit));

        assert_eq!(meta.name.as_deref(), Some("devx-test-java-spring-app"));
        assert_eq!(meta.namespace.as_deref(), Some("apps"));
        let labels = meta.labels.unwrap();
        assert_eq!(labels.get("app").unwrap(), "devx-test-java-spring-app");
        assert_eq!(labels.get("devx").unwrap(), "");
    }

    #[test]
    fn test_with_owner_sets_single_reference() {
        let skit = make_starterkit(0, "");
        let owner = OwnerReference {
            api_version: "devx.ibm.com/v1alpha1".to_string(),
            kind: "StarterKit".to_string(),
            name: skit.name_any(),
            uid: "uid-1".to_string(),
            controller: Some(true),
            ..Default::default()
        };

        let child = with_owner(route(&skit), &owner);

        assert_eq!(child.owner_references(), &[owner]);
    }
}
