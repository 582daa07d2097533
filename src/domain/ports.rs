use crate::domain::model::{
    Account, AuditRecord, BearerToken, Contact, Entitlement, EntitlementContactRole,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Supplies a fresh bearer credential for the CRM API.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<BearerToken>;
}

/// Single-record lookups fail with `FacadeError::NotFound` when nothing matches.
#[async_trait]
pub trait ContactProvider: Send + Sync {
    async fn list_contacts(
        &self,
        token: &BearerToken,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<Contact>>;

    async fn lookup_by_email(
        &self,
        token: &BearerToken,
        email: &str,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Contact>;

    async fn lookup_by_contact_id(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Contact>;
}

#[async_trait]
pub trait AccountProvider: Send + Sync {
    async fn list_accounts(
        &self,
        token: &BearerToken,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<Account>>;

    async fn lookup_by_account_id(
        &self,
        token: &BearerToken,
        account_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Account>;

    async fn lookup_by_account_number(
        &self,
        token: &BearerToken,
        account_number: &str,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Account>;
}

/// Listings return an empty vector when nothing matches; `NotFound` is
/// reserved for the upstream rejecting the query itself.
#[async_trait]
pub trait RoleLinkProvider: Send + Sync {
    async fn list_by_contact_id(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<EntitlementContactRole>>;

    async fn list_by_entitlement_id(
        &self,
        token: &BearerToken,
        entitlement_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<EntitlementContactRole>>;

    /// Whether the contact holds at least one active link with `role`.
    async fn has_role(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        role: i32,
        instance: &str,
    ) -> Result<bool>;
}

#[async_trait]
pub trait EntitlementProvider: Send + Sync {
    async fn lookup_by_entitlement_id(
        &self,
        token: &BearerToken,
        entitlement_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Entitlement>;
}

/// Fire-and-forget error log. Implementations must not fail the caller.
pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

pub trait ConfigProvider: Send + Sync {
    /// CRM Web API base URL, e.g. `https://org.api.crm.dynamics.com/api/data/v9.1`.
    fn crm_instance(&self) -> &str;
    /// Resource the bearer token is issued for.
    fn crm_resource(&self) -> &str;
    fn token_authority(&self) -> &str;
    fn client_id(&self) -> &str;
    fn client_secret(&self) -> &str;
    fn only_enabled(&self) -> bool;
    /// Option-set code of the contract manager role.
    fn contract_manager_role(&self) -> i32;
    fn request_timeout_seconds(&self) -> u64;
    fn audit_source(&self) -> &str;
}
