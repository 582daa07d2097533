use crate::adapters::{ClientCredentialsTokenProvider, DynamicsClient, TracingAuditSink};
use crate::core::orchestrator::ContactAggregator;
use crate::domain::ports::{AuditSink, ConfigProvider};
use crate::domain::services::CrmServices;
use crate::utils::error::Result;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: ContactAggregator,
    pub services: CrmServices,
}

impl AppState {
    pub fn new(services: CrmServices, audit: Arc<dyn AuditSink>, audit_source: &str) -> Self {
        Self {
            aggregator: ContactAggregator::new(services.clone(), audit, audit_source),
            services,
        }
    }

    /// Wires the CRM client, token provider and audit sink from configuration.
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds()))
            .build()?;

        let dynamics = Arc::new(DynamicsClient::new(client.clone()));
        let tokens = Arc::new(ClientCredentialsTokenProvider::new(
            client,
            config.token_authority(),
            config.crm_resource(),
            config.client_id(),
            config.client_secret(),
        ));

        let services = CrmServices {
            tokens,
            contacts: dynamics.clone(),
            accounts: dynamics.clone(),
            roles: dynamics.clone(),
            entitlements: dynamics,
            instance: config.crm_instance().to_string(),
            only_enabled: config.only_enabled(),
            contract_manager_role: config.contract_manager_role(),
        };

        Ok(Self::new(
            services,
            Arc::new(TracingAuditSink),
            config.audit_source(),
        ))
    }
}
