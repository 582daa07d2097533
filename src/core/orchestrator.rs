use crate::domain::model::{
    AccountSummary, AuditRecord, BearerToken, Contact, ContactData, ResultEnvelope,
};
use crate::domain::ports::AuditSink;
use crate::domain::services::CrmServices;
use crate::utils::error::FacadeError;
use crate::utils::validation::validate_email;
use std::sync::Arc;
use uuid::Uuid;

pub const CONTACT_NOT_REGISTERED: &str = "Usuário não cadastrado na organização.";
pub const ORGANIZATION_NOT_FOUND: &str = "Organização não encontrada.";
pub const NO_ACCESS_PROFILE: &str = "Usuário não contém perfil de acesso.";

/// Structured not-found terminal of the aggregation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ContactNotRegistered,
    OrganizationNotFound,
    NoAccessProfile,
}

impl Rejection {
    pub fn message(&self) -> &'static str {
        match self {
            Self::ContactNotRegistered => CONTACT_NOT_REGISTERED,
            Self::OrganizationNotFound => ORGANIZATION_NOT_FOUND,
            Self::NoAccessProfile => NO_ACCESS_PROFILE,
        }
    }
}

/// Why a step stopped the pipeline.
#[derive(Debug)]
pub enum Halt {
    Rejected {
        rejection: Rejection,
        cause: FacadeError,
    },
    Failed(FacadeError),
}

impl Halt {
    /// Not-found becomes the given rejection, anything else stays unclassified.
    fn classify(err: FacadeError, rejection: Rejection) -> Self {
        if err.is_not_found() {
            Self::Rejected {
                rejection,
                cause: err,
            }
        } else {
            Self::Failed(err)
        }
    }
}

impl From<FacadeError> for Halt {
    fn from(err: FacadeError) -> Self {
        Self::Failed(err)
    }
}

/// Result of resolving one role link during the entitlement fan-out.
#[derive(Debug)]
pub enum FanOutOutcome {
    Resolved(ContactData),
    Skipped {
        entitlement_id: Uuid,
        reason: FacadeError,
    },
}

#[derive(Debug)]
pub enum AggregationOutcome {
    Success(ResultEnvelope),
    NotFound(ResultEnvelope),
    /// Answered without a body.
    BadRequest,
}

impl AggregationOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Success(_) => 200,
            Self::NotFound(_) => 404,
            Self::BadRequest => 400,
        }
    }

    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        match self {
            Self::Success(envelope) | Self::NotFound(envelope) => Some(envelope),
            Self::BadRequest => None,
        }
    }
}

/// Keeps resolved entries in role order and drops the skipped ones.
pub fn assemble_entries(outcomes: Vec<FanOutOutcome>) -> Vec<ContactData> {
    outcomes
        .into_iter()
        .filter_map(|outcome| match outcome {
            FanOutOutcome::Resolved(entry) => Some(entry),
            FanOutOutcome::Skipped { .. } => None,
        })
        .collect()
}

/// Aggregates a contact, its organization and its entitlements into one
/// envelope. Every step runs sequentially and may end the request.
#[derive(Clone)]
pub struct ContactAggregator {
    services: CrmServices,
    audit: Arc<dyn AuditSink>,
    audit_source: String,
}

impl ContactAggregator {
    pub fn new(services: CrmServices, audit: Arc<dyn AuditSink>, audit_source: &str) -> Self {
        Self {
            services,
            audit,
            audit_source: audit_source.to_string(),
        }
    }

    pub async fn run(&self, email: Option<&str>, correlation_id: &str) -> AggregationOutcome {
        tracing::info!(correlation_id, "Starting contact aggregation");

        let mut envelope = ResultEnvelope::new();
        match self.execute(email, &mut envelope).await {
            Ok(()) => {
                tracing::info!(
                    correlation_id,
                    entries = envelope.entries.as_ref().map_or(0, Vec::len),
                    "✅ Contact aggregation completed"
                );
                AggregationOutcome::Success(envelope)
            }
            Err(Halt::Rejected { rejection, cause }) => {
                tracing::warn!(correlation_id, ?rejection, "Contact aggregation rejected: {}", cause);
                self.report(correlation_id, &cause);
                envelope.fail(rejection.message());
                AggregationOutcome::NotFound(envelope)
            }
            Err(Halt::Failed(err)) => {
                tracing::error!(
                    correlation_id,
                    category = ?err.category(),
                    "❌ Contact aggregation failed: {}",
                    err
                );
                self.report(correlation_id, &err);
                AggregationOutcome::BadRequest
            }
        }
    }

    async fn execute(&self, email: Option<&str>, envelope: &mut ResultEnvelope) -> Result<(), Halt> {
        let token = self.acquire_token().await?;
        let email = validate_email(email)?;

        let contact = self.lookup_contact(&token, email).await?;
        envelope.id_contact = Some(contact.contact_id);

        envelope.account = Some(self.resolve_account(&token, &contact).await?);

        let outcomes = self.expand_entitlements(&token, contact.contact_id).await?;
        envelope.entries = Some(assemble_entries(outcomes));
        Ok(())
    }

    pub async fn acquire_token(&self) -> Result<BearerToken, Halt> {
        tracing::debug!("Acquiring bearer token");
        Ok(self.services.tokens.access_token().await?)
    }

    pub async fn lookup_contact(&self, token: &BearerToken, email: &str) -> Result<Contact, Halt> {
        tracing::debug!("Looking up contact");
        self.services
            .contacts
            .lookup_by_email(token, email, &self.services.instance, self.services.only_enabled)
            .await
            .map_err(|e| Halt::classify(e, Rejection::ContactNotRegistered))
    }

    /// Resolves the contact's organization. A contact without a parent
    /// customer yields an all-null summary and no upstream call.
    pub async fn resolve_account(
        &self,
        token: &BearerToken,
        contact: &Contact,
    ) -> Result<AccountSummary, Halt> {
        let Some(parent_customer_id) = contact.parent_customer_id else {
            tracing::debug!(contact_id = %contact.contact_id, "Contact has no parent customer");
            return Ok(AccountSummary::absent());
        };

        tracing::debug!(%parent_customer_id, "Resolving account");
        let account = self
            .services
            .accounts
            .lookup_by_account_id(
                token,
                parent_customer_id,
                &self.services.instance,
                self.services.only_enabled,
            )
            .await
            .map_err(|e| Halt::classify(e, Rejection::OrganizationNotFound))?;

        Ok(AccountSummary::from(&account))
    }

    /// Lists the contact's role links, then resolves each entitlement in
    /// order. Entitlements that no longer resolve come back as `Skipped`.
    pub async fn expand_entitlements(
        &self,
        token: &BearerToken,
        contact_id: Uuid,
    ) -> Result<Vec<FanOutOutcome>, Halt> {
        tracing::debug!(%contact_id, "Listing entitlement contact roles");
        let roles = self
            .services
            .roles
            .list_by_contact_id(
                token,
                contact_id,
                &self.services.instance,
                self.services.only_enabled,
            )
            .await
            .map_err(|e| Halt::classify(e, Rejection::NoAccessProfile))?;

        let mut outcomes = Vec::with_capacity(roles.len());
        for role in &roles {
            let lookup = self
                .services
                .entitlements
                .lookup_by_entitlement_id(
                    token,
                    role.entitlement_id,
                    &self.services.instance,
                    self.services.only_enabled,
                )
                .await;

            match lookup {
                Ok(entitlement) => {
                    outcomes.push(FanOutOutcome::Resolved(ContactData::from_role(role, &entitlement)))
                }
                Err(reason) if reason.is_not_found() => {
                    // Dropped from the response without an audit record.
                    tracing::debug!(entitlement_id = %role.entitlement_id, "Skipping unresolved entitlement");
                    outcomes.push(FanOutOutcome::Skipped {
                        entitlement_id: role.entitlement_id,
                        reason,
                    });
                }
                Err(err) => return Err(Halt::Failed(err)),
            }
        }

        Ok(outcomes)
    }

    fn report(&self, correlation_id: &str, err: &FacadeError) {
        self.audit
            .record(AuditRecord::new(&self.audit_source, correlation_id, err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: u128) -> ContactData {
        ContactData {
            id_account: None,
            id_service_line: None,
            id_axt_role: Some(1),
            id_entitlement: Uuid::from_u128(n),
            axt_name: Some(format!("role-{n}")),
        }
    }

    #[test]
    fn test_assemble_entries_drops_skipped_in_place() {
        let outcomes = vec![
            FanOutOutcome::Resolved(entry(1)),
            FanOutOutcome::Skipped {
                entitlement_id: Uuid::from_u128(2),
                reason: FacadeError::not_found("entitlement", "2"),
            },
            FanOutOutcome::Resolved(entry(3)),
        ];

        let entries = assemble_entries(outcomes);
        let ids: Vec<Uuid> = entries.iter().map(|e| e.id_entitlement).collect();
        assert_eq!(ids, vec![Uuid::from_u128(1), Uuid::from_u128(3)]);
    }

    #[test]
    fn test_halt_classification() {
        let halt = Halt::classify(
            FacadeError::not_found("account", "x"),
            Rejection::OrganizationNotFound,
        );
        assert!(matches!(
            halt,
            Halt::Rejected {
                rejection: Rejection::OrganizationNotFound,
                ..
            }
        ));

        let halt = Halt::classify(
            FacadeError::TokenError {
                message: "boom".to_string(),
            },
            Rejection::OrganizationNotFound,
        );
        assert!(matches!(halt, Halt::Failed(_)));
    }

    #[test]
    fn test_outcome_status_codes() {
        assert_eq!(AggregationOutcome::Success(ResultEnvelope::new()).status_code(), 200);
        assert_eq!(AggregationOutcome::NotFound(ResultEnvelope::new()).status_code(), 404);
        assert_eq!(AggregationOutcome::BadRequest.status_code(), 400);
        assert!(AggregationOutcome::BadRequest.envelope().is_none());
    }
}
