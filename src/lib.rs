// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0
pub mod config;
pub mod constants;
pub mod error;
pub mod github;
pub mod kubernetes;
pub mod reconcilers;
pub mod resources;
pub mod token;
pub mod types;

#[cfg(test)]
pub mod test_utils;
