use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FacadeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_socket_addr, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_AUDIT_SOURCE: &str = "AzureFunctionDynamics";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_CONTRACT_MANAGER_ROLE: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub server: Option<ServerConfig>,
    pub dynamics: DynamicsConfig,
    pub credentials: CredentialsConfig,
    pub audit: Option<AuditConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicsConfig {
    /// Web API base URL the entity sets hang off.
    pub instance: String,
    /// Resource (audience) requested for the bearer token.
    pub resource: String,
    pub only_enabled: Option<bool>,
    pub timeout_seconds: Option<u64>,
    /// `axt_role` option-set code answered by the contract manager check.
    pub contract_manager_role: Option<i32>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    pub authority: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("authority", &self.authority)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    pub source: Option<String>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FacadeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FacadeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FacadeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn bind_address(&self) -> &str {
        self.server
            .as_ref()
            .and_then(|s| s.bind.as_deref())
            .unwrap_or(DEFAULT_BIND)
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("dynamics.instance", &self.dynamics.instance)?;
        validate_url("dynamics.resource", &self.dynamics.resource)?;
        validate_url("credentials.authority", &self.credentials.authority)?;
        validate_resolved("credentials.client_id", &self.credentials.client_id)?;
        validate_resolved("credentials.client_secret", &self.credentials.client_secret)?;
        validate_range(
            "dynamics.timeout_seconds",
            self.request_timeout_seconds(),
            1,
            300,
        )?;
        validate_socket_addr("server.bind", self.bind_address())?;
        Ok(())
    }
}

/// Non-empty and free of unresolved `${VAR}` placeholders.
fn validate_resolved(field_name: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field_name, value)?;
    if value.contains("${") {
        return Err(FacadeError::MissingConfigError {
            field: format!("{} (unresolved placeholder {})", field_name, value),
        });
    }
    Ok(())
}

impl ConfigProvider for TomlConfig {
    fn crm_instance(&self) -> &str {
        &self.dynamics.instance
    }

    fn crm_resource(&self) -> &str {
        &self.dynamics.resource
    }

    fn token_authority(&self) -> &str {
        &self.credentials.authority
    }

    fn client_id(&self) -> &str {
        &self.credentials.client_id
    }

    fn client_secret(&self) -> &str {
        &self.credentials.client_secret
    }

    fn only_enabled(&self) -> bool {
        self.dynamics.only_enabled.unwrap_or(true)
    }

    fn contract_manager_role(&self) -> i32 {
        self.dynamics
            .contract_manager_role
            .unwrap_or(DEFAULT_CONTRACT_MANAGER_ROLE)
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.dynamics.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn audit_source(&self) -> &str {
        self.audit
            .as_ref()
            .and_then(|a| a.source.as_deref())
            .unwrap_or(DEFAULT_AUDIT_SOURCE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
