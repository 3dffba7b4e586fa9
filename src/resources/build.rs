// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Image and build pipeline resources, plus the webhook that feeds them.

use super::{app_labels, child_meta};
use crate::constants::{labels, DEFAULT_GIT_REF, WEBHOOK_SECRET_KEY};
use crate::error::Result;
use crate::types::openshift::{
    BuildConfig, BuildConfigSpec, BuildOutput, BuildSource, BuildStrategy, BuildTriggerPolicy,
    DockerBuildStrategy, GitBuildSource, ImageChangeTrigger, ImageStream, ImageStreamSpec,
    SecretLocalReference, WebHookTrigger,
};
use crate::types::StarterKit;
use k8s_openapi::api::core::v1::{ObjectReference, Secret};
use kube::ResourceExt;
use std::collections::BTreeMap;
use url::Url;

pub fn image_stream(skit: &StarterKit) -> ImageStream {
    ImageStream {
        metadata: child_meta(skit, app_labels(skit)),
        spec: ImageStreamSpec::default(),
    }
}

/// Secret holding the token GitHub presents when calling the build webhook
pub fn webhook_secret(skit: &StarterKit, token: &str) -> Secret {
    let labels = BTreeMap::from([(labels::APP.to_string(), skit.name_any())]);

    Secret {
        metadata: child_meta(skit, labels),
        string_data: Some(BTreeMap::from([(
            WEBHOOK_SECRET_KEY.to_string(),
            token.to_string(),
        )])),
        ..Default::default()
    }
}

/// Read the webhook token back from a stored (or freshly built) Secret
pub fn webhook_secret_value(secret: &Secret) -> Option<String> {
    if let Some(value) = secret
        .string_data
        .as_ref()
        .and_then(|d| d.get(WEBHOOK_SECRET_KEY))
    {
        return Some(value.clone());
    }

    secret
        .data
        .as_ref()
        .and_then(|d| d.get(WEBHOOK_SECRET_KEY))
        .and_then(|bytes| String::from_utf8(bytes.0.clone()).ok())
}

/// Docker build of the target repository into `<name>:latest`
pub fn build_config(skit: &StarterKit) -> BuildConfig {
    let name = skit.name_any();

    BuildConfig {
        metadata: child_meta(skit, app_labels(skit)),
        spec: BuildConfigSpec {
            source: BuildSource {
                source_type: "Git".to_string(),
                git: Some(GitBuildSource {
                    uri: skit.target_repo().unwrap_or_default().to_string(),
                    git_ref: Some(DEFAULT_GIT_REF.to_string()),
                }),
            },
            strategy: BuildStrategy {
                strategy_type: "Docker".to_string(),
                docker_strategy: Some(DockerBuildStrategy {
                    dockerfile_path: Some("Dockerfile".to_string()),
                }),
            },
            output: BuildOutput {
                to: Some(image_stream_tag(&name)),
            },
            triggers: vec![
                BuildTriggerPolicy {
                    trigger_type: "ImageChange".to_string(),
                    image_change: Some(ImageChangeTrigger {}),
                    ..Default::default()
                },
                BuildTriggerPolicy {
                    trigger_type: "ConfigChange".to_string(),
                    ..Default::default()
                },
                BuildTriggerPolicy {
                    trigger_type: "GitHub".to_string(),
                    github: Some(WebHookTrigger {
                        secret_reference: Some(SecretLocalReference { name }),
                    }),
                    ..Default::default()
                },
            ],
        },
    }
}

pub(crate) fn image_stream_tag(name: &str) -> ObjectReference {
    ObjectReference {
        kind: Some("ImageStreamTag".to_string()),
        name: Some(format!("{}:latest", name)),
        ..Default::default()
    }
}

/// The BuildConfig's GitHub webhook endpoint on the public API server
pub fn webhook_callback_url(
    api_server_url: &str,
    namespace: &str,
    name: &str,
    secret: &str,
) -> Result<Url> {
    let mut url = Url::parse(api_server_url)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend([
            "apis",
            "build.openshift.io",
            "v1",
            "namespaces",
            namespace,
            "buildconfigs",
            name,
            "webhooks",
            secret,
            "github",
        ]);
    Ok(url)
}
