// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes reconcilers that react to watch events.

mod children;
pub mod starterkit;

pub use starterkit::{PassOutcome, StarterKitReconciler, WaitReason};
