// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
use super::{app_labels, child_meta};
use crate::constants::labels;
use crate::types::openshift::{Route, RouteSpec, RouteTargetReference};
use crate::types::StarterKit;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;
use std::collections::BTreeMap;

/// Route exposing the StarterKit's Service
pub fn route(skit: &StarterKit) -> Route {
    Route {
        metadata: child_meta(skit, app_labels(skit)),
        spec: RouteSpec {
            host: None,
            to: RouteTargetReference {
                kind: "Service".to_string(),
                name: skit.name_any(),
            },
        },
    }
}

/// Service on the effective port, selecting pods by `name`
pub fn service(skit: &StarterKit) -> Service {
    let port = skit.effective_port();
    let selector = BTreeMap::from([(labels::NAME.to_string(), skit.name_any())]);

    Service {
        metadata: child_meta(skit, app_labels(skit)),
        spec: Some(ServiceSpec {
            ports: Some(vec![ServicePort {
                name: Some("web".to_string()),
                port,
                target_port: Some(IntOrString::Int(port)),
                ..Default::default()
            }]),
            selector: Some(selector),
            ..Default::default()
        }),
        ..Default::default()
    }
}
