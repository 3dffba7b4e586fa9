// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Create-if-absent handling for the resources a StarterKit owns.

use super::starterkit::StarterKitReconciler;
use crate::constants::WEBHOOK_SECRET_KEY;
use crate::error::{Result, StarterKitError};
use crate::github::RepositoryGateway;
use crate::resources::{self, with_owner, ChildKind};
use crate::token::{self, GitHubToken};
use crate::types::{BuildConfig, StarterKit};
use k8s_openapi::api::core::v1::Secret;
use k8s_openapi::NamespaceResourceScope;
use kube::{api::PostParams, Api, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};
use url::Url;

impl<G: RepositoryGateway> StarterKitReconciler<G> {
    /// Make sure every child kind exists, in `ChildKind::ALL` order.
    ///
    /// Existing children are left untouched. Returns the kinds created in
    /// this pass. The GitHub webhook is registered only when the BuildConfig
    /// is created here.
    pub(crate) async fn ensure_children(
        &self,
        skit: &StarterKit,
        github_token: &GitHubToken,
        api_server_url: &str,
    ) -> Result<Vec<ChildKind>> {
        let namespace = skit
            .namespace()
            .ok_or(StarterKitError::MissingObjectKey("metadata.namespace"))?;
        let owner = skit
            .controller_owner_ref(&())
            .ok_or(StarterKitError::MissingObjectKey("metadata.uid"))?;

        let name = skit.name_any();
        let mut created = Vec::new();
        let mut webhook_secret: Option<String> = None;

        for kind in ChildKind::ALL {
            debug!("Configuring {}", kind);

            let was_created = match kind {
                ChildKind::ImageStream => {
                    self.ensure_child(&namespace, with_owner(resources::image_stream(skit), &owner))
                        .await?
                }
                ChildKind::Route => {
                    self.ensure_child(&namespace, with_owner(resources::route(skit), &owner))
                        .await?
                }
                ChildKind::Service => {
                    self.ensure_child(&namespace, with_owner(resources::service(skit), &owner))
                        .await?
                }
                ChildKind::Secret => match self.fetch_child::<Secret>(&namespace, &name).await? {
                    Some(existing) => {
                        webhook_secret = resources::webhook_secret_value(&existing);
                        false
                    }
                    None => {
                        let generated = token::generate_webhook_secret()?;
                        let desired =
                            with_owner(resources::webhook_secret(skit, &generated), &owner);
                        self.create_child(&namespace, desired).await?;
                        webhook_secret = Some(generated);
                        true
                    }
                },
                ChildKind::BuildConfig => {
                    if self.fetch_child::<BuildConfig>(&namespace, &name).await?.is_some() {
                        false
                    } else {
                        // Local webhook inputs must be valid before the BuildConfig exists
                        let callback_url = webhook_callback(
                            &namespace,
                            &name,
                            api_server_url,
                            webhook_secret.as_deref(),
                        )?;
                        let desired = with_owner(resources::build_config(skit), &owner);
                        self.create_child(&namespace, desired).await?;
                        self.register_webhook(skit, github_token, &callback_url)
                            .await?;
                        true
                    }
                }
                ChildKind::Deployment => {
                    self.ensure_child(
                        &namespace,
                        with_owner(resources::deployment_config(skit), &owner),
                    )
                    .await?
                }
            };

            if was_created {
                created.push(kind);
            }
        }

        Ok(created)
    }

    /// Fetch the child by identity and create it only when absent.
    /// Returns whether it was created.
    async fn ensure_child<K>(&self, namespace: &str, desired: K) -> Result<bool>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
        K::DynamicType: Default,
    {
        if self.fetch_child::<K>(namespace, &desired.name_any()).await?.is_some() {
            return Ok(false);
        }
        self.create_child(namespace, desired).await?;
        Ok(true)
    }

    async fn fetch_child<K>(&self, namespace: &str, name: &str) -> Result<Option<K>>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + DeserializeOwned,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let existing = api.get_opt(name).await?;
        if existing.is_some() {
            debug!(
                "Skip reconcile: {} {}/{} already exists",
                K::kind(&K::DynamicType::default()),
                namespace,
                name
            );
        }
        Ok(existing)
    }

    async fn create_child<K>(&self, namespace: &str, desired: K) -> Result<K>
    where
        K: Resource<Scope = NamespaceResourceScope> + Clone + Debug + Serialize + DeserializeOwned,
        K::DynamicType: Default,
    {
        let api: Api<K> = Api::namespaced(self.client.clone(), namespace);
        let kind = K::kind(&K::DynamicType::default()).to_string();
        let name = desired.name_any();

        info!("Creating a new {} {}/{}", kind, namespace, name);
        let created = api.create(&PostParams::default(), &desired).await?;
        info!("{} {}/{} created successfully", kind, namespace, name);
        Ok(created)
    }

    /// Point a push webhook on the target repository at the BuildConfig
    async fn register_webhook(
        &self,
        skit: &StarterKit,
        github_token: &GitHubToken,
        callback_url: &Url,
    ) -> Result<()> {
        let repo = &skit.spec.template_repo;
        info!("Registering webhook on {}/{}", repo.owner, repo.name);
        let hook_url = self
            .gateway
            .create_webhook(github_token, &repo.owner, &repo.name, callback_url)
            .await?;

        info!("Webhook created successfully: {}", hook_url);
        Ok(())
    }
}

/// Callback URL for the BuildConfig's GitHub trigger, using the stored webhook secret
fn webhook_callback(
    namespace: &str,
    name: &str,
    api_server_url: &str,
    webhook_secret: Option<&str>,
) -> Result<Url> {
    let secret = webhook_secret.ok_or_else(|| StarterKitError::MissingSecretKey {
        secret: name.to_string(),
        key: WEBHOOK_SECRET_KEY.to_string(),
    })?;
    resources::webhook_callback_url(api_server_url, namespace, name, secret)
}
