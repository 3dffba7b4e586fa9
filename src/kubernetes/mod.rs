// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes utilities for API discovery.

pub mod discovery;

pub use discovery::wait_for_openshift_apis;
