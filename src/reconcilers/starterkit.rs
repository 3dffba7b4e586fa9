// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! StarterKit reconciler - drives a StarterKit, its GitHub repository and its
//! child resources towards the desired state.

use crate::config::Config;
use crate::constants::{FINALIZER, INFRASTRUCTURE_NAME};
use crate::error::{Result, StarterKitError};
use crate::github::{GitHubGateway, RepositoryGateway, TemplateRepoRequest};
use crate::token::{self, GitHubToken};
use crate::types::{
    BuildConfig, DeploymentConfig, ImageStream, Infrastructure, Phase, Route, StarterKit,
    StarterKitStatus,
};
use futures::StreamExt;
use k8s_openapi::api::core::v1::{Secret, Service};
use k8s_openapi::NamespaceResourceScope;
use kube::{
    api::PostParams,
    runtime::{controller::Action, Controller},
    Api, Client, Resource, ResourceExt,
};
use kube_runtime::watcher::Config as WatcherConfig;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Why a pass stopped early without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitReason {
    /// The `cluster` Infrastructure object, or its API server URL, is missing
    Infrastructure,
    /// The Secret holding the GitHub token does not exist yet
    TokenSecret,
}

/// How a single reconciliation pass ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// No StarterKit with this identity exists
    Absent,
    Waiting(WaitReason),
    /// Nothing was created or persisted
    Converged,
    /// The pass created or persisted something
    Progressed,
    /// Cleanup ran and the finalizer was removed
    Finalized,
}

impl PassOutcome {
    pub fn action(&self, config: &Config) -> Action {
        match self {
            PassOutcome::Progressed => Action::requeue(config.requeue_after),
            _ => Action::await_change(),
        }
    }
}

pub struct StarterKitReconciler<G: RepositoryGateway = GitHubGateway> {
    pub(crate) client: Client,
    pub(crate) config: Config,
    pub(crate) gateway: G,
}

impl<G: RepositoryGateway> StarterKitReconciler<G> {
    pub fn new(client: Client, config: Config, gateway: G) -> Self {
        Self {
            client,
            config,
            gateway,
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        let client = self.client.clone();
        let namespace = self.config.watch_namespace.clone();
        let ns = namespace.as_deref();

        match ns {
            Some(ns) => info!("Watching StarterKits in namespace {}", ns),
            None => info!("Watching StarterKits in all namespaces"),
        }

        let starterkits: Api<StarterKit> = scoped_api(&client, ns);
        let context = Arc::new(self);

        Controller::new(starterkits, WatcherConfig::default())
            .owns(scoped_api::<ImageStream>(&client, ns), WatcherConfig::default())
            .owns(scoped_api::<Route>(&client, ns), WatcherConfig::default())
            .owns(scoped_api::<Service>(&client, ns), WatcherConfig::default())
            .owns(scoped_api::<Secret>(&client, ns), WatcherConfig::default())
            .owns(scoped_api::<BuildConfig>(&client, ns), WatcherConfig::default())
            .owns(
                scoped_api::<DeploymentConfig>(&client, ns),
                WatcherConfig::default(),
            )
            .shutdown_on_signal()
            .run(reconcile::<G>, error_policy::<G>, context)
            .for_each(|res| async move {
                match res {
                    Ok(o) => debug!("Reconciled StarterKit: {:?}", o),
                    Err(e) => warn!("Reconciliation error: {:?}", e),
                }
            })
            .await;

        Ok(())
    }

    /// Run one pass for the StarterKit `namespace/name`.
    ///
    /// State is always re-read from the API server, so a pass is safe to
    /// repeat. Steps stop at the first error.
    #[instrument(skip(self))]
    pub async fn reconcile_pass(&self, namespace: &str, name: &str) -> Result<PassOutcome> {
        info!("Reconciling StarterKit");
        let starterkits: Api<StarterKit> = Api::namespaced(self.client.clone(), namespace);

        let Some(mut skit) = starterkits.get_opt(name).await? else {
            info!("StarterKit not found, ignoring since object must be deleted");
            return Ok(PassOutcome::Absent);
        };
        debug!("StarterKit is in phase {:?}", skit.phase());

        let Some(api_server_url) = self.api_server_url().await? else {
            return Ok(PassOutcome::Waiting(WaitReason::Infrastructure));
        };

        let selector = &skit.spec.template_repo.secret_key_ref;
        let Some(github_token) = token::resolve(&self.client, namespace, selector).await? else {
            info!(
                "GitHub secret {} not found, waiting for it to be created",
                selector.name
            );
            return Ok(PassOutcome::Waiting(WaitReason::TokenSecret));
        };

        let mut progressed = false;

        if skit.target_repo().is_none() {
            skit = self
                .create_target_repo(&starterkits, skit, &github_token)
                .await?;
            progressed = true;
        }

        let created = self
            .ensure_children(&skit, &github_token, &api_server_url)
            .await?;
        progressed |= !created.is_empty();

        if skit.phase() == Phase::MarkedForDeletion {
            if !skit.has_finalizer() {
                return Ok(PassOutcome::Converged);
            }

            self.finalize(&skit, &github_token).await?;
            skit.finalizers_mut().retain(|f| f != FINALIZER);
            starterkits
                .replace(name, &PostParams::default(), &skit)
                .await?;
            info!("Removed finalizer from StarterKit");
            return Ok(PassOutcome::Finalized);
        }

        if !skit.has_finalizer() {
            info!("Adding finalizer to StarterKit");
            skit.finalizers_mut().push(FINALIZER.to_string());
            starterkits
                .replace(name, &PostParams::default(), &skit)
                .await?;
            progressed = true;
        }

        Ok(if progressed {
            PassOutcome::Progressed
        } else {
            PassOutcome::Converged
        })
    }

    /// Public API server URL from the `cluster` Infrastructure singleton
    async fn api_server_url(&self) -> Result<Option<String>> {
        let infrastructures: Api<Infrastructure> = Api::all(self.client.clone());

        let Some(infrastructure) = infrastructures.get_opt(INFRASTRUCTURE_NAME).await? else {
            info!("Infrastructure {} not found, waiting for it", INFRASTRUCTURE_NAME);
            return Ok(None);
        };

        match infrastructure.api_server_url() {
            Some(url) => {
                debug!("Found Kubernetes public URL {}", url);
                Ok(Some(url.to_string()))
            }
            None => {
                warn!("Infrastructure {} has no apiServerURL", INFRASTRUCTURE_NAME);
                Ok(None)
            }
        }
    }

    /// Generate the target repository and persist its URL in the status.
    ///
    /// Returns the stored object so later writes carry the new resourceVersion.
    async fn create_target_repo(
        &self,
        api: &Api<StarterKit>,
        mut skit: StarterKit,
        github_token: &GitHubToken,
    ) -> Result<StarterKit> {
        let repo = &skit.spec.template_repo;
        info!(
            "Creating repository {}/{} from template {}/{}",
            repo.owner, repo.name, repo.template_owner, repo.template_repo_name
        );

        let request = TemplateRepoRequest {
            template_owner: &repo.template_owner,
            template_repo: &repo.template_repo_name,
            owner: &repo.owner,
            name: &repo.name,
            description: &repo.description,
        };
        let target_repo = self
            .gateway
            .create_from_template(github_token, &request)
            .await?;
        info!("Repo created successfully: {}", target_repo);

        skit.status
            .get_or_insert_with(StarterKitStatus::default)
            .target_repo = target_repo;

        let data = serde_json::to_vec(&skit)?;
        let updated = api
            .replace_status(&skit.name_any(), &PostParams::default(), data)
            .await?;
        info!("Stored target repository in StarterKit status");

        Ok(updated)
    }

    /// Cleanup before the finalizer is released
    async fn finalize(&self, skit: &StarterKit, github_token: &GitHubToken) -> Result<()> {
        if !self.config.dev_mode {
            debug!("Dev mode disabled, keeping the generated repository");
            return Ok(());
        }

        let repo = &skit.spec.template_repo;
        info!("Dev mode enabled, deleting repository {}/{}", repo.owner, repo.name);
        self.gateway
            .delete_repository(github_token, &repo.owner, &repo.name)
            .await
    }
}

fn scoped_api<K>(client: &Client, namespace: Option<&str>) -> Api<K>
where
    K: Resource<Scope = NamespaceResourceScope>,
    K::DynamicType: Default,
{
    match namespace {
        Some(ns) => Api::namespaced(client.clone(), ns),
        None => Api::all(client.clone()),
    }
}

async fn reconcile<G: RepositoryGateway>(
    skit: Arc<StarterKit>,
    ctx: Arc<StarterKitReconciler<G>>,
) -> Result<Action> {
    // Only the identity is used; the pass re-reads everything else
    let name = skit.name_any();
    let namespace = skit
        .namespace()
        .ok_or(StarterKitError::MissingObjectKey("metadata.namespace"))?;

    let outcome = ctx.reconcile_pass(&namespace, &name).await?;
    debug!("Pass for {}/{} ended with {:?}", namespace, name, outcome);

    Ok(outcome.action(&ctx.config))
}

fn error_policy<G: RepositoryGateway>(
    skit: Arc<StarterKit>,
    error: &StarterKitError,
    ctx: Arc<StarterKitReconciler<G>>,
) -> Action {
    error!("Reconciliation error for StarterKit {}: {}", skit.name_any(), error);
    Action::requeue(ctx.config.error_requeue)
}
