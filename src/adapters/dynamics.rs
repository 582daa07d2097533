use crate::domain::model::{Account, BearerToken, Contact, Entitlement, EntitlementContactRole};
use crate::domain::ports::{AccountProvider, ContactProvider, EntitlementProvider, RoleLinkProvider};
use crate::utils::error::{FacadeError, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use uuid::Uuid;

const SERVICE: &str = "dynamics";

#[derive(Debug, Deserialize)]
struct ODataCollection<T> {
    value: Vec<T>,
}

/// OData Web API client for the CRM entity sets used by this service.
#[derive(Debug, Clone)]
pub struct DynamicsClient {
    client: Client,
}

impl DynamicsClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Runs `GET {instance}/{entity_set}?$filter=...` and returns the `value` array.
    /// An empty `filter` lists the whole entity set.
    async fn query<T: DeserializeOwned>(
        &self,
        token: &BearerToken,
        instance: &str,
        entity_set: &str,
        entity: &'static str,
        filter: &str,
    ) -> Result<Vec<T>> {
        let url = format!("{}/{}", instance.trim_end_matches('/'), entity_set);
        tracing::debug!("📡 Querying {} with $filter={}", url, filter);

        let mut request = self
            .client
            .get(&url)
            .bearer_auth(token.secret())
            .header(ACCEPT, "application/json")
            .header("OData-MaxVersion", "4.0")
            .header("OData-Version", "4.0");
        if !filter.is_empty() {
            request = request.query(&[("$filter", filter)]);
        }

        let response = request.send().await?;

        let status = response.status();
        tracing::debug!("📡 {} responded with status {}", entity_set, status);

        if status == StatusCode::NOT_FOUND {
            return Err(FacadeError::not_found(entity, filter));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("❌ {} query failed with status {}", entity_set, status);
            return Err(FacadeError::UpstreamError {
                service: SERVICE.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let collection: ODataCollection<T> = response.json().await?;
        Ok(collection.value)
    }

    /// First record of the query; the upstream order decides ties.
    async fn first<T: DeserializeOwned>(
        &self,
        token: &BearerToken,
        instance: &str,
        entity_set: &str,
        entity: &'static str,
        filter: &str,
        key: &str,
    ) -> Result<T> {
        self.query(token, instance, entity_set, entity, filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| FacadeError::not_found(entity, key))
    }
}

fn with_state(expr: String, only_enabled: bool) -> String {
    if only_enabled {
        format!("{} and statecode eq 0", expr)
    } else {
        expr
    }
}

/// Filter for a whole-set listing; empty when disabled records are wanted too.
fn state_only(only_enabled: bool) -> String {
    if only_enabled {
        "statecode eq 0".to_string()
    } else {
        String::new()
    }
}

/// OData string literal.
fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[async_trait]
impl ContactProvider for DynamicsClient {
    async fn list_contacts(
        &self,
        token: &BearerToken,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<Contact>> {
        self.query(token, instance, "contacts", "contact", &state_only(only_enabled))
            .await
    }

    async fn lookup_by_email(
        &self,
        token: &BearerToken,
        email: &str,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Contact> {
        let filter = with_state(format!("emailaddress1 eq {}", quote(email)), only_enabled);
        self.first(token, instance, "contacts", "contact", &filter, email)
            .await
    }

    async fn lookup_by_contact_id(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Contact> {
        let filter = with_state(format!("contactid eq {}", contact_id), only_enabled);
        self.first(token, instance, "contacts", "contact", &filter, &contact_id.to_string())
            .await
    }
}

#[async_trait]
impl AccountProvider for DynamicsClient {
    async fn list_accounts(
        &self,
        token: &BearerToken,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<Account>> {
        self.query(token, instance, "accounts", "account", &state_only(only_enabled))
            .await
    }

    async fn lookup_by_account_id(
        &self,
        token: &BearerToken,
        account_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Account> {
        let filter = with_state(format!("accountid eq {}", account_id), only_enabled);
        self.first(token, instance, "accounts", "account", &filter, &account_id.to_string())
            .await
    }

    async fn lookup_by_account_number(
        &self,
        token: &BearerToken,
        account_number: &str,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Account> {
        let filter = with_state(
            format!("accountnumber eq {}", quote(account_number)),
            only_enabled,
        );
        self.first(token, instance, "accounts", "account", &filter, account_number)
            .await
    }
}

#[async_trait]
impl RoleLinkProvider for DynamicsClient {
    async fn list_by_contact_id(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<EntitlementContactRole>> {
        let filter = with_state(format!("_axt_contactid_value eq {}", contact_id), only_enabled);
        self.query(
            token,
            instance,
            "axt_entitlementcontactroles",
            "entitlement contact role",
            &filter,
        )
        .await
    }

    async fn list_by_entitlement_id(
        &self,
        token: &BearerToken,
        entitlement_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Vec<EntitlementContactRole>> {
        let filter = with_state(
            format!("_axt_entitlementid_value eq {}", entitlement_id),
            only_enabled,
        );
        self.query(
            token,
            instance,
            "axt_entitlementcontactroles",
            "entitlement contact role",
            &filter,
        )
        .await
    }

    async fn has_role(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
        role: i32,
        instance: &str,
    ) -> Result<bool> {
        let filter = with_state(
            format!("_axt_contactid_value eq {} and axt_role eq {}", contact_id, role),
            true,
        );
        let links: Vec<EntitlementContactRole> = self
            .query(
                token,
                instance,
                "axt_entitlementcontactroles",
                "entitlement contact role",
                &filter,
            )
            .await?;
        Ok(!links.is_empty())
    }
}

#[async_trait]
impl EntitlementProvider for DynamicsClient {
    async fn lookup_by_entitlement_id(
        &self,
        token: &BearerToken,
        entitlement_id: Uuid,
        instance: &str,
        only_enabled: bool,
    ) -> Result<Entitlement> {
        let filter = with_state(format!("entitlementid eq {}", entitlement_id), only_enabled);
        self.first(
            token,
            instance,
            "entitlements",
            "entitlement",
            &filter,
            &entitlement_id.to_string(),
        )
        .await
    }
}
