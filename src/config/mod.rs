//! Configuration system (layered: defaults < config file < env < code).
//!
//! An [`AgentConfig`] is built once at program start and handed to the
//! components that need it; nothing here is process-global.

pub mod auth;

pub use auth::{AuthValue, Credential};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::AgentError;

/// Service API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2025-05-01";

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(300);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to talk to the agent service and run a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// Project endpoint, e.g. `https://<resource>.services.ai.azure.com/api/projects/<project>`.
    pub endpoint: String,
    /// Model deployment name the agent runs on.
    pub model: String,
    pub credential: Option<AuthValue>,
    pub api_version: String,
    /// Delay between run status checks.
    pub poll_interval: Duration,
    /// Upper bound on how long a single run may take.
    pub max_wait: Duration,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// Directory generated files are saved into.
    pub output_dir: PathBuf,
    /// Execute function tools locally when the run asks for them.
    pub auto_function_calls: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model: String::new(),
            credential: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            output_dir: PathBuf::from("."),
            auto_function_calls: true,
        }
    }
}

/// On-disk TOML shape. Every field is optional and overrides the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub credential: Option<AuthValue>,
    pub api_version: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_wait_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub output_dir: Option<PathBuf>,
    pub auto_function_calls: Option<bool>,
}

impl ConfigFile {
    /// Read and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AgentError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| {
            AgentError::Configuration(format!("Invalid config file {}: {e}", path.display()))
        })
    }
}

impl AgentConfig {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    pub fn with_credential(mut self, credential: AuthValue) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Load defaults, then `file` (if any), then the process environment.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn load(file: Option<&Path>) -> Result<Self, AgentError> {
        let _ = dotenvy::dotenv(); // optional
        let mut config = Self::default();
        if let Some(path) = file {
            config.apply_file(ConfigFile::load(path)?);
        }
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Overlay values present in a config file.
    pub fn apply_file(&mut self, file: ConfigFile) {
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(model) = file.model {
            self.model = model;
        }
        if let Some(credential) = file.credential {
            self.credential = Some(credential);
        }
        if let Some(version) = file.api_version {
            self.api_version = version;
        }
        if let Some(ms) = file.poll_interval_ms {
            self.poll_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = file.max_wait_secs {
            self.max_wait = Duration::from_secs(secs);
        }
        if let Some(secs) = file.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(dir) = file.output_dir {
            self.output_dir = dir;
        }
        if let Some(auto) = file.auto_function_calls {
            self.auto_function_calls = auto;
        }
    }

    /// Overlay values from an environment lookup.
    ///
    /// An API key wins over a bearer token, which wins over
    /// `AZURE_AI_AGENTS_AUTH=azure_cli`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(endpoint) =
            non_empty("NEW_AIFOUNDRY_PROJECT_ENDPOINT").or_else(|| non_empty("AZURE_AI_AGENTS_ENDPOINT"))
        {
            self.endpoint = endpoint;
        }
        if let Some(model) = non_empty("CHAT_MODEL") {
            self.model = model;
        }
        if non_empty("AZURE_AI_AGENTS_AUTH")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("azure_cli"))
        {
            self.credential = Some(AuthValue::AzureCli);
        }
        if let Some(token) = non_empty("AZURE_AI_AGENTS_TOKEN") {
            self.credential = Some(AuthValue::BearerToken(token));
        }
        if let Some(key) = non_empty("AZURE_AI_AGENTS_API_KEY") {
            self.credential = Some(AuthValue::ApiKey(key));
        }
        if let Some(version) = non_empty("AZURE_AI_AGENTS_API_VERSION") {
            self.api_version = version;
        }
        if let Some(dir) = non_empty("AZURE_AI_AGENTS_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
    }

    /// Check that the config is complete enough to reach the service.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.endpoint.trim().is_empty() {
            return Err(AgentError::Configuration(
                "Missing project endpoint (set NEW_AIFOUNDRY_PROJECT_ENDPOINT)".into(),
            ));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(AgentError::Configuration(format!(
                "Project endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.model.trim().is_empty() {
            return Err(AgentError::Configuration(
                "Missing model deployment (set CHAT_MODEL)".into(),
            ));
        }
        if self.poll_interval.is_zero() {
            return Err(AgentError::Configuration(
                "Poll interval must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the configured credential.
    pub fn resolve_credential(&self) -> Result<Credential, AgentError> {
        self.credential
            .as_ref()
            .ok_or_else(|| {
                AgentError::Authentication(
                    "No credential configured (set AZURE_AI_AGENTS_API_KEY, AZURE_AI_AGENTS_TOKEN \
                     or AZURE_AI_AGENTS_AUTH=azure_cli)"
                        .into(),
                )
            })?
            .resolve()
    }
}
