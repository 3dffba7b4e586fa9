// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Custom resource types: the StarterKit CRD and the OpenShift kinds it owns.

pub mod openshift;
pub mod starterkit;

pub use openshift::{BuildConfig, DeploymentConfig, ImageStream, Infrastructure, Route};
pub use starterkit::{Phase, StarterKit, StarterKitSpec, StarterKitStatus};
