// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
use super::build::image_stream_tag;
use super::child_meta;
use crate::constants::{annotations, labels};
use crate::types::openshift::{
    DeploymentConfig, DeploymentConfigSpec, DeploymentStrategy, DeploymentTriggerImageChangeParams,
    DeploymentTriggerPolicy,
};
use crate::types::StarterKit;
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, EnvVar, EnvVarSource, ObjectFieldSelector, PodSpec, PodTemplateSpec,
};
use kube::api::ObjectMeta;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// DeploymentConfig that rolls out every new `<name>:latest` image
pub fn deployment_config(skit: &StarterKit) -> DeploymentConfig {
    let name = skit.name_any();
    let selector = BTreeMap::from([
        (labels::APP.to_string(), name.clone()),
        (labels::NAME.to_string(), name.clone()),
    ]);
    let mut pod_labels = selector.clone();
    pod_labels.insert(labels::DEVX.to_string(), String::new());

    let mut metadata = child_meta(skit, pod_labels.clone());
    metadata.annotations = Some(BTreeMap::from([(
        annotations::VCS_URI.to_string(),
        skit.target_repo().unwrap_or_default().to_string(),
    )]));

    DeploymentConfig {
        metadata,
        spec: DeploymentConfigSpec {
            strategy: DeploymentStrategy {
                strategy_type: "Rolling".to_string(),
            },
            triggers: vec![
                DeploymentTriggerPolicy {
                    trigger_type: "ImageChange".to_string(),
                    image_change_params: Some(DeploymentTriggerImageChangeParams {
                        automatic: true,
                        container_names: vec![name.clone()],
                        from: image_stream_tag(&name),
                    }),
                },
                DeploymentTriggerPolicy {
                    trigger_type: "ConfigChange".to_string(),
                    image_change_params: None,
                },
            ],
            replicas: 1,
            selector,
            template: Some(PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(pod_labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![Container {
                        name: name.clone(),
                        image: Some(name),
                        ports: Some(vec![ContainerPort {
                            container_port: skit.effective_port(),
                            ..Default::default()
                        }]),
                        env: Some(container_env(skit)),
                        ..Default::default()
                    }],
                    ..Default::default()
                }),
            }),
        },
    }
}

/// User supplied variables followed by the OLM target namespace
fn container_env(skit: &StarterKit) -> Vec<EnvVar> {
    let mut env: Vec<EnvVar> = skit
        .spec
        .options
        .env
        .iter()
        .map(|e| EnvVar {
            name: e.name.clone(),
            value: e.value.clone(),
            value_from: None,
        })
        .collect();

    env.push(EnvVar {
        name: "WATCH_NAMESPACE".to_string(),
        value: None,
        value_from: Some(EnvVarSource {
            field_ref: Some(ObjectFieldSelector {
                field_path: "metadata.annotations['olm.targetNamespaces']".to_string(),
                api_version: None,
            }),
            ..Default::default()
        }),
    });
    env
}
