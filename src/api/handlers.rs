use super::middleware::CorrelationId;
use super::state::AppState;
use crate::core::orchestrator::AggregationOutcome;
use crate::domain::model::{Account, Contact, Entitlement, EntitlementContactRole};
use crate::utils::error::{ErrorCategory, FacadeError};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ContactDataQuery {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnabledQuery {
    #[serde(rename = "onlyEnabled")]
    pub only_enabled: Option<bool>,
}

impl EnabledQuery {
    fn resolve(&self) -> bool {
        self.only_enabled.unwrap_or(true)
    }
}

/// Error body for the single-call CRM endpoints.
#[derive(Debug)]
pub struct ApiError(pub FacadeError);

impl From<FacadeError> for ApiError {
    fn from(err: FacadeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.category() {
            ErrorCategory::NotFound => StatusCode::NOT_FOUND,
            ErrorCategory::Validation => StatusCode::BAD_REQUEST,
            ErrorCategory::Upstream => StatusCode::BAD_GATEWAY,
            ErrorCategory::Configuration | ErrorCategory::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("❌ {}", self.0);
        }
        (status, Json(serde_json::json!({ "error": self.0.to_string() }))).into_response()
    }
}

pub fn outcome_response(outcome: AggregationOutcome) -> Response {
    match outcome {
        AggregationOutcome::Success(envelope) => (StatusCode::OK, Json(envelope)).into_response(),
        AggregationOutcome::NotFound(envelope) => {
            (StatusCode::NOT_FOUND, Json(envelope)).into_response()
        }
        AggregationOutcome::BadRequest => StatusCode::BAD_REQUEST.into_response(),
    }
}

pub async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

pub async fn handle_contact_data(
    State(state): State<AppState>,
    Extension(correlation_id): Extension<CorrelationId>,
    Query(query): Query<ContactDataQuery>,
) -> Response {
    let outcome = state
        .aggregator
        .run(query.email.as_deref(), &correlation_id.0)
        .await;
    outcome_response(outcome)
}

pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let contacts = services
        .contacts
        .list_contacts(&token, &services.instance, query.resolve())
        .await?;
    Ok(Json(contacts))
}

pub async fn contact_by_id(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Contact>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let contact = services
        .contacts
        .lookup_by_contact_id(&token, contact_id, &services.instance, query.resolve())
        .await?;
    Ok(Json(contact))
}

pub async fn contact_by_mail(
    State(state): State<AppState>,
    Path(mail): Path<String>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Contact>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let contact = services
        .contacts
        .lookup_by_email(&token, &mail, &services.instance, query.resolve())
        .await?;
    Ok(Json(contact))
}

pub async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Vec<Account>>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let accounts = services
        .accounts
        .list_accounts(&token, &services.instance, query.resolve())
        .await?;
    Ok(Json(accounts))
}

pub async fn account_by_id(
    State(state): State<AppState>,
    Path(account_id): Path<Uuid>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Account>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let account = services
        .accounts
        .lookup_by_account_id(&token, account_id, &services.instance, query.resolve())
        .await?;
    Ok(Json(account))
}

pub async fn account_by_number(
    State(state): State<AppState>,
    Path(account_number): Path<String>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Account>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let account = services
        .accounts
        .lookup_by_account_number(&token, &account_number, &services.instance, query.resolve())
        .await?;
    Ok(Json(account))
}

pub async fn roles_by_contact_id(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Vec<EntitlementContactRole>>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let roles = services
        .roles
        .list_by_contact_id(&token, contact_id, &services.instance, query.resolve())
        .await?;
    Ok(Json(roles))
}

/// Roles of the contact owning `mail`; an unknown contact answers `null`.
pub async fn roles_by_contact_mail(
    State(state): State<AppState>,
    Path(mail): Path<String>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Option<Vec<EntitlementContactRole>>>, ApiError> {
    let services = &state.services;
    let only_enabled = query.resolve();
    let token = services.tokens.access_token().await?;

    let contact = match services
        .contacts
        .lookup_by_email(&token, &mail, &services.instance, only_enabled)
        .await
    {
        Ok(contact) => contact,
        Err(e) if e.is_not_found() => return Ok(Json(None)),
        Err(e) => return Err(e.into()),
    };

    let roles = services
        .roles
        .list_by_contact_id(&token, contact.contact_id, &services.instance, only_enabled)
        .await?;
    Ok(Json(Some(roles)))
}

/// Roles of the active contact owning `mail`; an unknown contact is a 404.
pub async fn roles_by_contact_mail_address(
    State(state): State<AppState>,
    Path(mail): Path<String>,
) -> Result<Json<Vec<EntitlementContactRole>>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let contact = services
        .contacts
        .lookup_by_email(&token, &mail, &services.instance, true)
        .await?;
    let roles = services
        .roles
        .list_by_contact_id(&token, contact.contact_id, &services.instance, true)
        .await?;
    Ok(Json(roles))
}

pub async fn roles_by_entitlement_id(
    State(state): State<AppState>,
    Path(entitlement_id): Path<Uuid>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Vec<EntitlementContactRole>>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let roles = services
        .roles
        .list_by_entitlement_id(&token, entitlement_id, &services.instance, query.resolve())
        .await?;
    Ok(Json(roles))
}

pub async fn is_contract_manager(
    State(state): State<AppState>,
    Path(contact_id): Path<Uuid>,
) -> Result<Json<bool>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let is_manager = services
        .roles
        .has_role(
            &token,
            contact_id,
            services.contract_manager_role,
            &services.instance,
        )
        .await?;
    Ok(Json(is_manager))
}

pub async fn entitlement_by_id(
    State(state): State<AppState>,
    Path(entitlement_id): Path<Uuid>,
    Query(query): Query<EnabledQuery>,
) -> Result<Json<Entitlement>, ApiError> {
    let services = &state.services;
    let token = services.tokens.access_token().await?;
    let entitlement = services
        .entitlements
        .lookup_by_entitlement_id(&token, entitlement_id, &services.instance, query.resolve())
        .await?;
    Ok(Json(entitlement))
}
