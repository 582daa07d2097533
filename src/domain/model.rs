use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// CRM contact, read-only from this service's point of view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(rename = "contactid")]
    pub contact_id: Uuid,
    #[serde(rename = "_parentcustomerid_value")]
    pub parent_customer_id: Option<Uuid>,
    #[serde(rename = "fullname")]
    pub full_name: Option<String>,
    #[serde(rename = "emailaddress1")]
    pub email: Option<String>,
    #[serde(rename = "statecode")]
    pub state_code: Option<i32>,
}

/// CRM account (organization). A missing parent means the account is a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "accountid")]
    pub account_id: Uuid,
    #[serde(rename = "accountnumber")]
    pub account_number: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "axt_cnpj")]
    pub tax_id: Option<String>,
    #[serde(rename = "axt_cnpjview")]
    pub tax_id_view: Option<String>,
    #[serde(rename = "axt_razaosocial")]
    pub legal_name: Option<String>,
    #[serde(rename = "_parentaccountid_value")]
    pub parent_account_id: Option<Uuid>,
}

impl Account {
    /// Parent account id, or the account's own id when it is a root.
    pub fn root_or_parent_id(&self) -> Uuid {
        self.parent_account_id.unwrap_or(self.account_id)
    }
}

/// Link granting a contact a role within an entitlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitlementContactRole {
    #[serde(rename = "axt_entitlementcontactroleid")]
    pub role_link_id: Option<Uuid>,
    #[serde(rename = "_axt_entitlementid_value")]
    pub entitlement_id: Uuid,
    #[serde(rename = "_axt_contactid_value")]
    pub contact_id: Option<Uuid>,
    /// Option-set code of the role.
    #[serde(rename = "axt_role")]
    pub role: Option<i32>,
    #[serde(rename = "axt_name")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entitlement {
    #[serde(rename = "entitlementid")]
    pub entitlement_id: Uuid,
    #[serde(rename = "_customerid_value")]
    pub customer_id: Option<Uuid>,
    #[serde(rename = "_axt_servicelineid_value")]
    pub service_line_id: Option<Uuid>,
    pub name: Option<String>,
}

/// One flattened entry of the aggregated response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactData {
    #[serde(rename = "IdAccount")]
    pub id_account: Option<Uuid>,
    #[serde(rename = "IdServiceLine")]
    pub id_service_line: Option<Uuid>,
    #[serde(rename = "IdAxtRole")]
    pub id_axt_role: Option<i32>,
    #[serde(rename = "IdEntitlement")]
    pub id_entitlement: Uuid,
    #[serde(rename = "AxtName")]
    pub axt_name: Option<String>,
}

impl ContactData {
    pub fn from_role(role: &EntitlementContactRole, entitlement: &Entitlement) -> Self {
        Self {
            id_account: entitlement.customer_id,
            id_service_line: entitlement.service_line_id,
            id_axt_role: role.role,
            id_entitlement: entitlement.entitlement_id,
            axt_name: role.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResultState {
    Success,
    Failed,
}

/// Account block of the envelope. Every field is null when the contact has
/// no parent customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AccountSummary {
    #[serde(rename = "AccountNumber")]
    pub account_number: Option<String>,
    #[serde(rename = "AccountId")]
    pub account_id: Option<Uuid>,
    #[serde(rename = "AccountName")]
    pub account_name: Option<String>,
    #[serde(rename = "AccountCPNJ")]
    pub tax_id: Option<String>,
    #[serde(rename = "AccountCPNJView")]
    pub tax_id_view: Option<String>,
    #[serde(rename = "AccountAxt_Razaosocial")]
    pub legal_name: Option<String>,
    #[serde(rename = "ParentAccountId")]
    pub parent_account_id: Option<Uuid>,
}

impl AccountSummary {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Account> for AccountSummary {
    fn from(account: &Account) -> Self {
        Self {
            account_number: account.account_number.clone(),
            account_id: Some(account.account_id),
            account_name: account.name.clone(),
            tax_id: account.tax_id.clone(),
            tax_id_view: account.tax_id_view.clone(),
            legal_name: account.legal_name.clone(),
            parent_account_id: Some(account.root_or_parent_id()),
        }
    }
}

/// Response body of the aggregation endpoint.
///
/// Sections stay `None` until the flow reaches them, so a failed envelope
/// only carries what was resolved before the failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEnvelope {
    #[serde(rename = "ResultState")]
    pub result_state: ResultState,
    #[serde(rename = "ErrorMessage")]
    pub error_message: String,
    #[serde(rename = "IdContact", skip_serializing_if = "Option::is_none")]
    pub id_contact: Option<Uuid>,
    #[serde(flatten)]
    pub account: Option<AccountSummary>,
    #[serde(rename = "Entries", skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<ContactData>>,
}

impl ResultEnvelope {
    pub fn new() -> Self {
        Self {
            result_state: ResultState::Success,
            error_message: String::new(),
            id_contact: None,
            account: None,
            entries: None,
        }
    }

    pub fn fail(&mut self, message: &str) {
        self.result_state = ResultState::Failed;
        self.error_message = message.to_string();
    }

    pub fn is_success(&self) -> bool {
        self.result_state == ResultState::Success
    }
}

impl Default for ResultEnvelope {
    fn default() -> Self {
        Self::new()
    }
}

/// Opaque credential for outbound CRM calls.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Structured error record handed to the audit sink.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub source: String,
    pub correlation_id: String,
    pub exception: String,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(source: &str, correlation_id: &str, exception: impl fmt::Display) -> Self {
        Self {
            source: source.to_string(),
            correlation_id: correlation_id.to_string(),
            exception: exception.to_string(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn account(parent: Option<Uuid>) -> Account {
        Account {
            account_id: Uuid::from_u128(10),
            account_number: Some("ACC-001".to_string()),
            name: Some("Acme".to_string()),
            tax_id: Some("12345678000199".to_string()),
            tax_id_view: Some("12.345.678/0001-99".to_string()),
            legal_name: Some("Acme Ltda".to_string()),
            parent_account_id: parent,
        }
    }

    #[test]
    fn test_root_account_uses_own_id_as_parent() {
        let summary = AccountSummary::from(&account(None));
        assert_eq!(summary.parent_account_id, Some(Uuid::from_u128(10)));

        let child = AccountSummary::from(&account(Some(Uuid::from_u128(99))));
        assert_eq!(child.parent_account_id, Some(Uuid::from_u128(99)));
    }

    #[test]
    fn test_failed_envelope_without_contact_has_only_status_fields() {
        let mut envelope = ResultEnvelope::new();
        envelope.fail("nope");

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value, json!({"ResultState": "Failed", "ErrorMessage": "nope"}));
    }

    #[test]
    fn test_absent_account_serializes_explicit_nulls() {
        let mut envelope = ResultEnvelope::new();
        envelope.id_contact = Some(Uuid::from_u128(1));
        envelope.account = Some(AccountSummary::absent());
        envelope.entries = Some(Vec::new());

        let value = serde_json::to_value(&envelope).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "AccountNumber",
            "ParentAccountId",
            "AccountId",
            "AccountName",
            "AccountCPNJ",
            "AccountCPNJView",
            "AccountAxt_Razaosocial",
        ] {
            assert_eq!(object.get(key), Some(&serde_json::Value::Null), "{key}");
        }
        assert_eq!(value["ResultState"], "Success");
        assert_eq!(value["ErrorMessage"], "");
        assert_eq!(value["Entries"], json!([]));
    }

    #[test]
    fn test_role_link_deserializes_from_odata_names() {
        let role: EntitlementContactRole = serde_json::from_value(json!({
            "axt_entitlementcontactroleid": "00000000-0000-0000-0000-000000000003",
            "_axt_entitlementid_value": "00000000-0000-0000-0000-000000000004",
            "_axt_contactid_value": "00000000-0000-0000-0000-000000000001",
            "axt_role": 2,
            "axt_name": "Gestor"
        }))
        .unwrap();

        assert_eq!(role.entitlement_id, Uuid::from_u128(4));
        assert_eq!(role.role, Some(2));
        assert_eq!(role.name.as_deref(), Some("Gestor"));
    }

    #[test]
    fn test_bearer_token_debug_is_redacted() {
        let token = BearerToken::new("super-secret");
        assert_eq!(format!("{:?}", token), "BearerToken(<redacted>)");
        assert_eq!(token.secret(), "super-secret");
    }
}
