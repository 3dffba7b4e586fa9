// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

//! Test utilities: an in-memory Kubernetes API server and a recording
//! GitHub gateway.

use crate::error::{Result, StarterKitError};
use crate::github::{RepositoryGateway, TemplateRepoRequest};
use crate::token::GitHubToken;
use http::{Request, Response};
use http_body_util::BodyExt;
use kube::client::Body;
use kube::{Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tower::Service;
use url::Url;

/// A mock HTTP service that stores objects by path.
///
/// GET reads, POST on a collection creates, PUT replaces (or updates only
/// `status` on a `/status` path) and enforces `metadata.resourceVersion`.
/// Canned responses registered with `on_request` take precedence.
#[derive(Clone, Default)]
pub struct MockService {
    state: Arc<Mutex<ApiState>>,
}

#[derive(Default)]
struct ApiState {
    objects: BTreeMap<String, Value>,
    canned: HashMap<(String, String), (u16, String)>,
    requests: Vec<(String, String)>,
    revision: u64,
}

/// Path of a single object of kind `K`
pub fn object_path<K>(namespace: Option<&str>, name: &str) -> String
where
    K: Resource<DynamicType = ()>,
{
    format!("{}/{}", K::url_path(&(), namespace), name)
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, assigning a uid and resourceVersion
    pub fn with_object<K>(self, object: &K) -> Self
    where
        K: Resource<DynamicType = ()> + Serialize,
    {
        let path = object_path::<K>(object.namespace().as_deref(), &object.name_any());
        let mut value = serde_json::to_value(object).unwrap();
        {
            let mut state = self.state.lock().unwrap();
            state.stamp(&mut value);
            state.objects.insert(path, value);
        }
        self
    }

    /// Always answer `method path` with the given status and body
    pub fn on_request(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.state.lock().unwrap().canned.insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
        self
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "default")
    }

    /// Current stored state of an object
    pub fn get<K>(&self, namespace: Option<&str>, name: &str) -> Option<K>
    where
        K: Resource<DynamicType = ()> + DeserializeOwned,
    {
        let path = object_path::<K>(namespace, name);
        let state = self.state.lock().unwrap();
        state
            .objects
            .get(&path)
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    /// All requests seen so far as (method, path)
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Number of requests with `method` whose path starts with `prefix`
    pub fn count(&self, method: &str, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|(m, p)| m == method && p.starts_with(prefix))
            .count()
    }

    pub fn creates(&self) -> usize {
        self.count("POST", "/")
    }
}

impl ApiState {
    fn stamp(&mut self, object: &mut Value) {
        self.revision += 1;
        object["metadata"]["resourceVersion"] = json!(self.revision.to_string());
        if object.pointer("/metadata/uid").is_none() {
            object["metadata"]["uid"] = json!(format!("uid-{}", self.revision));
        }
    }

    fn handle(&mut self, method: &str, path: &str, body: &[u8]) -> (u16, String) {
        self.requests.push((method.to_string(), path.to_string()));

        if let Some(resp) = self.canned.get(&(method.to_string(), path.to_string())) {
            return resp.clone();
        }

        match method {
            "GET" => match self.objects.get(path) {
                Some(object) => (200, object.to_string()),
                None => (404, not_found_json("object", path)),
            },
            "POST" => self.create(path, body),
            "PUT" => self.replace(path, body),
            _ => (405, status_json(405, "MethodNotAllowed", method)),
        }
    }

    fn create(&mut self, collection: &str, body: &[u8]) -> (u16, String) {
        let Ok(mut object) = serde_json::from_slice::<Value>(body) else {
            return (400, status_json(400, "BadRequest", "invalid body"));
        };
        let Some(name) = object
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .map(str::to_string)
        else {
            return (400, status_json(400, "BadRequest", "metadata.name is required"));
        };

        let path = format!("{}/{}", collection, name);
        if self.objects.contains_key(&path) {
            return (
                409,
                status_json(409, "AlreadyExists", &format!("\"{}\" already exists", name)),
            );
        }

        self.stamp(&mut object);
        self.objects.insert(path, object.clone());
        (201, object.to_string())
    }

    fn replace(&mut self, path: &str, body: &[u8]) -> (u16, String) {
        let (target, status_only) = match path.strip_suffix("/status") {
            Some(base) => (base.to_string(), true),
            None => (path.to_string(), false),
        };

        let Some(stored) = self.objects.get(&target).cloned() else {
            return (404, not_found_json("object", &target));
        };
        let Ok(incoming) = serde_json::from_slice::<Value>(body) else {
            return (400, status_json(400, "BadRequest", "invalid body"));
        };

        let sent_version = incoming.pointer("/metadata/resourceVersion");
        if sent_version.is_some() && sent_version != stored.pointer("/metadata/resourceVersion") {
            return (
                409,
                status_json(
                    409,
                    "Conflict",
                    "the object has been modified; please apply your changes to the latest version and try again",
                ),
            );
        }

        let mut updated = if status_only {
            let mut object = stored.clone();
            object["status"] = incoming.get("status").cloned().unwrap_or(Value::Null);
            object
        } else {
            // The status subresource owns `status`; full updates never change it
            let mut object = incoming;
            match stored.get("status") {
                Some(status) => object["status"] = status.clone(),
                None => {
                    if let Some(fields) = object.as_object_mut() {
                        fields.remove("status");
                    }
                }
            }
            object
        };

        self.stamp(&mut updated);
        self.objects.insert(target, updated.clone());
        (200, updated.to_string())
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = std::result::Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let state = self.state.clone();

        Box::pin(async move {
            let method = req.method().to_string();
            let path = req.uri().path().to_string();
            let body = req.into_body().collect().await?.to_bytes();

            let (status, body) = state.lock().unwrap().handle(&method, &path, &body);

            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))?)
        })
    }
}

/// A Kubernetes `Status` failure body
pub fn status_json(code: u16, reason: &str, message: &str) -> String {
    json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": message,
        "reason": reason,
        "code": code
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(resource: &str, name: &str) -> String {
    status_json(404, "NotFound", &format!("{} \"{}\" not found", resource, name))
}

/// A call made against the recording gateway
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    CreateFromTemplate {
        template: String,
        target: String,
    },
    CreateWebhook {
        repo: String,
        callback_url: String,
    },
    DeleteRepository {
        repo: String,
    },
}

/// Gateway fake that records every call and answers like GitHub would
#[derive(Clone, Default)]
pub struct RecordingGateway {
    calls: Arc<Mutex<Vec<GatewayCall>>>,
    fail_with: Arc<Mutex<Option<u16>>>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a GitHub API error
    pub fn failing(self, status: u16) -> Self {
        *self.fail_with.lock().unwrap() = Some(status);
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn repo_creations(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::CreateFromTemplate { .. }))
    }

    pub fn webhook_creations(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::CreateWebhook { .. }))
    }

    pub fn repo_deletions(&self) -> usize {
        self.count(|c| matches!(c, GatewayCall::DeleteRepository { .. }))
    }

    fn count(&self, pred: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: GatewayCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        match *self.fail_with.lock().unwrap() {
            Some(status) => Err(StarterKitError::GitHubApi {
                status,
                message: "injected failure".to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl RepositoryGateway for RecordingGateway {
    async fn create_from_template(
        &self,
        _token: &GitHubToken,
        request: &TemplateRepoRequest<'_>,
    ) -> Result<String> {
        self.record(GatewayCall::CreateFromTemplate {
            template: format!("{}/{}", request.template_owner, request.template_repo),
            target: format!("{}/{}", request.owner, request.name),
        })?;
        Ok(format!("github.com/{}/{}", request.owner, request.name))
    }

    async fn create_webhook(
        &self,
        _token: &GitHubToken,
        owner: &str,
        repo: &str,
        callback_url: &Url,
    ) -> Result<String> {
        self.record(GatewayCall::CreateWebhook {
            repo: format!("{}/{}", owner, repo),
            callback_url: callback_url.to_string(),
        })?;
        Ok(format!("https://api.github.com/repos/{}/{}/hooks/1", owner, repo))
    }

    async fn delete_repository(&self, _token: &GitHubToken, owner: &str, repo: &str) -> Result<()> {
        self.record(GatewayCall::DeleteRepository {
            repo: format!("{}/{}", owner, repo),
        })
    }
}
