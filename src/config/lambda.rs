use crate::config::toml_config::{
    DEFAULT_AUDIT_SOURCE, DEFAULT_CONTRACT_MANAGER_ROLE, DEFAULT_TIMEOUT_SECONDS,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FacadeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use std::env;

/// Configuration for the serverless entry point, read from the function's
/// application settings.
#[derive(Clone)]
pub struct LambdaConfig {
    pub crm_instance: String,
    pub crm_resource: String,
    pub token_authority: String,
    pub client_id: String,
    pub client_secret: String,
    pub only_enabled: bool,
    pub contract_manager_role: i32,
    pub timeout_seconds: u64,
    pub audit_source: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key).ok_or_else(|| FacadeError::MissingConfigError {
                field: key.to_string(),
            })
        };

        Ok(Self {
            crm_instance: required("CRM_INSTANCE_URL")?,
            crm_resource: required("CRM_RESOURCE")?,
            token_authority: required("TOKEN_AUTHORITY")?,
            client_id: required("CRM_CLIENT_ID")?,
            client_secret: required("CRM_CLIENT_SECRET")?,
            only_enabled: lookup("CRM_ONLY_ENABLED")
                .map(|v| {
                    !matches!(
                        v.trim().to_ascii_lowercase().as_str(),
                        "0" | "false" | "off" | "no"
                    )
                })
                .unwrap_or(true),
            contract_manager_role: lookup("CRM_CONTRACT_MANAGER_ROLE")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CONTRACT_MANAGER_ROLE),
            timeout_seconds: lookup("CRM_TIMEOUT_SECONDS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            audit_source: lookup("AUDIT_SOURCE").unwrap_or_else(|| DEFAULT_AUDIT_SOURCE.to_string()),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn crm_instance(&self) -> &str {
        &self.crm_instance
    }

    fn crm_resource(&self) -> &str {
        &self.crm_resource
    }

    fn token_authority(&self) -> &str {
        &self.token_authority
    }

    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn client_secret(&self) -> &str {
        &self.client_secret
    }

    fn only_enabled(&self) -> bool {
        self.only_enabled
    }

    fn contract_manager_role(&self) -> i32 {
        self.contract_manager_role
    }

    fn request_timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn audit_source(&self) -> &str {
        &self.audit_source
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        validate_url("CRM_INSTANCE_URL", &self.crm_instance)?;
        validate_url("CRM_RESOURCE", &self.crm_resource)?;
        validate_url("TOKEN_AUTHORITY", &self.token_authority)?;
        validate_non_empty_string("CRM_CLIENT_ID", &self.client_id)?;
        validate_non_empty_string("CRM_CLIENT_SECRET", &self.client_secret)?;
        validate_range("CRM_TIMEOUT_SECONDS", self.timeout_seconds, 1, 300)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
