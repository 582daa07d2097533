#![allow(dead_code)]

use async_trait::async_trait;
use contact_aggregator::domain::model::{
    Account, AuditRecord, BearerToken, Contact, Entitlement, EntitlementContactRole,
};
use contact_aggregator::domain::ports::{
    AccountProvider, AuditSink, ContactProvider, EntitlementProvider, RoleLinkProvider,
    TokenProvider,
};
use contact_aggregator::{ContactAggregator, CrmServices, FacadeError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub const INSTANCE: &str = "https://org.api.crm.dynamics.com/api/data/v9.1";
pub const TOKEN: &str = "test-token";
pub const CONTRACT_MANAGER_ROLE: i32 = 7;

/// In-memory CRM standing in for every provider port.
#[derive(Default)]
pub struct FakeCrm {
    pub contacts: HashMap<String, Contact>,
    pub accounts: HashMap<Uuid, Account>,
    pub roles: HashMap<Uuid, Vec<EntitlementContactRole>>,
    pub entitlements: HashMap<Uuid, Entitlement>,
    /// Entitlement ids whose lookup fails with a transport-style error.
    pub broken_entitlements: Vec<Uuid>,
    pub fail_token: bool,
    pub reject_role_listing: bool,
    pub token_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
    pub entitlement_calls: AtomicUsize,
}

impl FakeCrm {
    pub fn with_contact(mut self, email: &str, contact: Contact) -> Self {
        self.contacts.insert(email.to_string(), contact);
        self
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.insert(account.account_id, account);
        self
    }

    pub fn with_roles(mut self, contact_id: Uuid, roles: Vec<EntitlementContactRole>) -> Self {
        self.roles.insert(contact_id, roles);
        self
    }

    pub fn with_entitlement(mut self, entitlement: Entitlement) -> Self {
        self.entitlements.insert(entitlement.entitlement_id, entitlement);
        self
    }

    fn check_token(token: &BearerToken) -> Result<()> {
        if token.secret() != TOKEN {
            return Err(FacadeError::UpstreamError {
                service: "fake".to_string(),
                status: 401,
                body: String::new(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TokenProvider for FakeCrm {
    async fn access_token(&self) -> Result<BearerToken> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_token {
            return Err(FacadeError::TokenError {
                message: "identity provider unavailable".to_string(),
            });
        }
        Ok(BearerToken::new(TOKEN))
    }
}

#[async_trait]
impl ContactProvider for FakeCrm {
    async fn list_contacts(
        &self,
        token: &BearerToken,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Vec<Contact>> {
        Self::check_token(token)?;
        let mut contacts: Vec<_> = self.contacts.values().cloned().collect();
        contacts.sort_by_key(|c| c.contact_id);
        Ok(contacts)
    }

    async fn lookup_by_email(
        &self,
        token: &BearerToken,
        email: &str,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Contact> {
        Self::check_token(token)?;
        self.contacts
            .get(email)
            .cloned()
            .ok_or_else(|| FacadeError::not_found("contact", email))
    }

    async fn lookup_by_contact_id(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Contact> {
        Self::check_token(token)?;
        self.contacts
            .values()
            .find(|c| c.contact_id == contact_id)
            .cloned()
            .ok_or_else(|| FacadeError::not_found("contact", contact_id.to_string()))
    }
}

#[async_trait]
impl AccountProvider for FakeCrm {
    async fn list_accounts(
        &self,
        token: &BearerToken,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Vec<Account>> {
        Self::check_token(token)?;
        let mut accounts: Vec<_> = self.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.account_id);
        Ok(accounts)
    }

    async fn lookup_by_account_id(
        &self,
        token: &BearerToken,
        account_id: Uuid,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Account> {
        Self::check_token(token)?;
        self.account_calls.fetch_add(1, Ordering::SeqCst);
        self.accounts
            .get(&account_id)
            .cloned()
            .ok_or_else(|| FacadeError::not_found("account", account_id.to_string()))
    }

    async fn lookup_by_account_number(
        &self,
        token: &BearerToken,
        account_number: &str,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Account> {
        Self::check_token(token)?;
        self.accounts
            .values()
            .find(|a| a.account_number.as_deref() == Some(account_number))
            .cloned()
            .ok_or_else(|| FacadeError::not_found("account", account_number))
    }
}

#[async_trait]
impl RoleLinkProvider for FakeCrm {
    async fn list_by_contact_id(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Vec<EntitlementContactRole>> {
        Self::check_token(token)?;
        if self.reject_role_listing {
            return Err(FacadeError::not_found(
                "entitlement contact role",
                contact_id.to_string(),
            ));
        }
        Ok(self.roles.get(&contact_id).cloned().unwrap_or_default())
    }

    async fn list_by_entitlement_id(
        &self,
        token: &BearerToken,
        entitlement_id: Uuid,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Vec<EntitlementContactRole>> {
        Self::check_token(token)?;
        Ok(self
            .roles
            .values()
            .flatten()
            .filter(|r| r.entitlement_id == entitlement_id)
            .cloned()
            .collect())
    }

    async fn has_role(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        role: i32,
        _instance: &str,
    ) -> Result<bool> {
        Self::check_token(token)?;
        Ok(self
            .roles
            .get(&contact_id)
            .is_some_and(|links| links.iter().any(|r| r.role == Some(role))))
    }
}

#[async_trait]
impl EntitlementProvider for FakeCrm {
    async fn lookup_by_entitlement_id(
        &self,
        token: &BearerToken,
        entitlement_id: Uuid,
        _instance: &str,
        _only_enabled: bool,
    ) -> Result<Entitlement> {
        Self::check_token(token)?;
        self.entitlement_calls.fetch_add(1, Ordering::SeqCst);
        if self.broken_entitlements.contains(&entitlement_id) {
            return Err(FacadeError::UpstreamError {
                service: "fake".to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        self.entitlements
            .get(&entitlement_id)
            .cloned()
            .ok_or_else(|| FacadeError::not_found("entitlement", entitlement_id.to_string()))
    }
}

#[derive(Default)]
pub struct RecordingAuditSink {
    pub records: Mutex<Vec<AuditRecord>>,
}

impl RecordingAuditSink {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, record: AuditRecord) {
        self.records.lock().unwrap().push(record);
    }
}

pub fn services(crm: Arc<FakeCrm>) -> CrmServices {
    CrmServices {
        tokens: crm.clone(),
        contacts: crm.clone(),
        accounts: crm.clone(),
        roles: crm.clone(),
        entitlements: crm,
        instance: INSTANCE.to_string(),
        only_enabled: true,
        contract_manager_role: CONTRACT_MANAGER_ROLE,
    }
}

pub fn aggregator(crm: Arc<FakeCrm>, audit: Arc<RecordingAuditSink>) -> ContactAggregator {
    ContactAggregator::new(services(crm), audit, "TestSource")
}

pub fn id(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

pub fn contact(contact_id: Uuid, parent: Option<Uuid>) -> Contact {
    Contact {
        contact_id,
        parent_customer_id: parent,
        full_name: Some("Maria Silva".to_string()),
        email: Some("maria@x.com".to_string()),
        state_code: Some(0),
    }
}

pub fn account(account_id: Uuid, parent: Option<Uuid>) -> Account {
    Account {
        account_id,
        account_number: Some(format!("ACC-{}", account_id.as_u128())),
        name: Some("Acme".to_string()),
        tax_id: Some("12345678000199".to_string()),
        tax_id_view: Some("12.345.678/0001-99".to_string()),
        legal_name: Some("Acme Comercio Ltda".to_string()),
        parent_account_id: parent,
    }
}

pub fn role(entitlement_id: Uuid, code: i32, name: &str) -> EntitlementContactRole {
    EntitlementContactRole {
        role_link_id: None,
        entitlement_id,
        contact_id: None,
        role: Some(code),
        name: Some(name.to_string()),
    }
}

pub fn entitlement(entitlement_id: Uuid, customer: Uuid, service_line: Uuid) -> Entitlement {
    Entitlement {
        entitlement_id,
        customer_id: Some(customer),
        service_line_id: Some(service_line),
        name: Some(format!("Entitlement {}", entitlement_id.as_u128())),
    }
}
