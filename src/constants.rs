// Copyright 2026, The starter-kit-operator Authors
// SPDX-License-Identifier: Apache-2.0

/// Finalizer that blocks StarterKit deletion until cleanup has run
pub const FINALIZER: &str = "finalizer.devx.ibm.com";

/// Name of the cluster-scoped Infrastructure singleton
pub const INFRASTRUCTURE_NAME: &str = "cluster";

/// Container and service port used when the spec leaves it at zero
pub const DEFAULT_PORT: i32 = 3000;

/// Git ref the BuildConfig builds from
pub const DEFAULT_GIT_REF: &str = "master";

/// Key of the webhook token inside the child Secret
pub const WEBHOOK_SECRET_KEY: &str = "WebHookSecretKey";

/// Number of random bytes behind a webhook token
pub const WEBHOOK_SECRET_BYTES: usize = 32;

/// Label keys applied to every child resource
pub mod labels {
    pub const APP: &str = "app";
    pub const NAME: &str = "name";
    pub const DEVX: &str = "devx";
}

/// Annotation keys set on child resources
pub mod annotations {
    /// Source repository shown by the OpenShift console
    pub const VCS_URI: &str = "app.openshift.io/vcs-uri";
}

/// GitHub REST API defaults
pub mod github {
    pub const DEFAULT_API_URL: &str = "https://api.github.com";
    pub const ACCEPT: &str = "application/vnd.github+json";
    pub const USER_AGENT: &str = "starter-kit-operator";
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// OpenShift API discovery polling configuration
pub mod discovery {
    /// API groups that must be served before the controller starts
    pub const OPENSHIFT_API_GROUPS: [&str; 4] = [
        "image.openshift.io",
        "route.openshift.io",
        "build.openshift.io",
        "apps.openshift.io",
    ];
    /// Initial polling interval in seconds when waiting for the groups
    pub const POLL_INTERVAL_SECS: u64 = 10;
    /// Maximum polling interval in seconds (exponential backoff cap)
    pub const POLL_MAX_INTERVAL_SECS: u64 = 60;
}
