// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! GitHub REST client backing the repository gateway

use super::{RepositoryGateway, TemplateRepoRequest};
use crate::constants::github::{ACCEPT, REQUEST_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Result, StarterKitError};
use crate::token::GitHubToken;
use reqwest::{header, Client as HttpClient, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone)]
pub struct GitHubGateway {
    base_url: Url,
    http: HttpClient,
}

#[derive(Serialize)]
struct GenerateRepoBody<'a> {
    owner: &'a str,
    name: &'a str,
    description: &'a str,
}

#[derive(Serialize)]
struct CreateHookBody<'a> {
    name: &'static str,
    active: bool,
    events: [&'static str; 1],
    config: HookConfig<'a>,
}

#[derive(Serialize)]
struct HookConfig<'a> {
    url: &'a str,
    content_type: &'static str,
}

#[derive(Deserialize)]
struct RepositoryResponse {
    html_url: String,
}

#[derive(Deserialize)]
struct HookResponse {
    url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GitHubGateway {
    /// Create a gateway against `base_url`, e.g. `https://api.github.com`
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase.into());
        }

        let http = HttpClient::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { base_url, http })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, builder: RequestBuilder, token: &GitHubToken) -> RequestBuilder {
        builder
            .bearer_auth(token.expose())
            .header(header::ACCEPT, ACCEPT)
    }
}

/// Turn a non-2xx response into `GitHubApi`, keeping GitHub's message
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &text))
}

fn api_error(status: u16, body: &str) -> StarterKitError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    StarterKitError::GitHubApi { status, message }
}

impl RepositoryGateway for GitHubGateway {
    #[instrument(skip(self, token))]
    async fn create_from_template(
        &self,
        token: &GitHubToken,
        request: &TemplateRepoRequest<'_>,
    ) -> Result<String> {
        let url = self.endpoint(&[
            "repos",
            request.template_owner,
            request.template_repo,
            "generate",
        ]);
        debug!("POST {}", url);

        let body = GenerateRepoBody {
            owner: request.owner,
            name: request.name,
            description: request.description,
        };
        let response = self
            .authorized(self.http.post(url), token)
            .json(&body)
            .send()
            .await?;
        let repo: RepositoryResponse = check(response).await?.json().await?;

        info!("Created repository {}", repo.html_url);
        Ok(repo.html_url)
    }

    #[instrument(skip(self, token, callback_url))]
    async fn create_webhook(
        &self,
        token: &GitHubToken,
        owner: &str,
        repo: &str,
        callback_url: &Url,
    ) -> Result<String> {
        let url = self.endpoint(&["repos", owner, repo, "hooks"]);
        debug!("POST {}", url);

        let body = CreateHookBody {
            name: "web",
            active: true,
            events: ["push"],
            config: HookConfig {
                url: callback_url.as_str(),
                content_type: "json",
            },
        };
        let response = self
            .authorized(self.http.post(url), token)
            .json(&body)
            .send()
            .await?;
        let hook: HookResponse = check(response).await?.json().await?;

        Ok(hook.url)
    }

    #[instrument(skip(self, token))]
    async fn delete_repository(&self, token: &GitHubToken, owner: &str, repo: &str) -> Result<()> {
        let url = self.endpoint(&["repos", owner, repo]);
        debug!("DELETE {}", url);

        // Requires a token with the delete_repo scope
        let response = self.authorized(self.http.delete(url), token).send().await?;
        check(response).await?;

        info!("Deleted repository {}/{}", owner, repo);
        Ok(())
    }
}
