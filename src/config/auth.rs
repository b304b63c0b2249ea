//! Credential values and their one-time resolution.

use std::fmt;
use std::process::Command;

use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Token audience for the agent service.
pub const AZURE_AI_RESOURCE: &str = "https://ai.azure.com";

/// How to authenticate against the agent service, as configured.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AuthValue {
    /// Resource key sent in the `api-key` header.
    ApiKey(String),
    /// Entra ID access token sent as `Authorization: Bearer`.
    BearerToken(String),
    /// Environment variable holding a bearer token, read at resolution time.
    EnvVar(String),
    /// Entra ID token from the signed-in Azure CLI (`az login`).
    AzureCli,
}

impl AuthValue {
    /// Resolve into a concrete credential.
    pub fn resolve(&self) -> Result<Credential, AgentError> {
        match self {
            Self::ApiKey(k) => Ok(Credential::ApiKey(k.clone())),
            Self::BearerToken(t) => Ok(Credential::Bearer(t.clone())),
            Self::EnvVar(var) => std::env::var(var).map(Credential::Bearer).map_err(|_| {
                AgentError::Authentication(format!("Environment variable {var} not set"))
            }),
            Self::AzureCli => azure_cli_token("az"),
        }
    }
}

/// Ask the Azure CLI at `program` for an access token to the agent service.
fn azure_cli_token(program: &str) -> Result<Credential, AgentError> {
    let output = Command::new(program)
        .args(["account", "get-access-token", "--resource", AZURE_AI_RESOURCE])
        .args(["--query", "accessToken", "--output", "tsv"])
        .output()
        .map_err(|e| {
            AgentError::Authentication(format!("Could not run Azure CLI '{program}': {e}"))
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr.trim();
        return Err(AgentError::Authentication(format!(
            "Azure CLI token request failed with status {}: {}",
            output.status,
            if message.is_empty() {
                "no stderr output"
            } else {
                message
            }
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(AgentError::Authentication(
            "Azure CLI returned an empty access token".into(),
        ));
    }
    Ok(Credential::Bearer(token))
}

impl fmt::Debug for AuthValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::BearerToken(_) => f.write_str("BearerToken(..)"),
            Self::EnvVar(var) => f.debug_tuple("EnvVar").field(var).finish(),
            Self::AzureCli => f.write_str("AzureCli"),
        }
    }
}

/// A resolved secret, owned by the client that sends it.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    ApiKey(String),
    Bearer(String),
}

impl Credential {
    /// Header name and value to attach to every request.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::ApiKey(key) => ("api-key", key.clone()),
            Self::Bearer(token) => ("authorization", format!("Bearer {token}")),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("Credential::ApiKey(..)"),
            Self::Bearer(_) => f.write_str("Credential::Bearer(..)"),
        }
    }
}
