// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Source-control operations the reconciler performs on GitHub.

pub mod client;

pub use client::GitHubGateway;

use crate::error::Result;
use crate::token::GitHubToken;
use std::future::Future;
use url::Url;

/// Target repository to generate from a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRepoRequest<'a> {
    pub template_owner: &'a str,
    pub template_repo: &'a str,
    pub owner: &'a str,
    pub name: &'a str,
    pub description: &'a str,
}

/// Remote repository operations. None of them are idempotent: callers guard
/// against repeating them.
pub trait RepositoryGateway: Send + Sync + 'static {
    /// Generate a repository from a template, returning its URL
    fn create_from_template(
        &self,
        token: &GitHubToken,
        request: &TemplateRepoRequest<'_>,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Register a push webhook, returning the hook's API URL
    fn create_webhook(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
        callback_url: &Url,
    ) -> impl Future<Output = Result<String>> + Send;

    fn delete_repository(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}
