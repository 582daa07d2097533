use super::handlers::{
    account_by_id, account_by_number, contact_by_id, contact_by_mail, entitlement_by_id,
    handle_contact_data, handle_health, is_contract_manager, list_accounts, list_contacts,
    roles_by_contact_id, roles_by_contact_mail, roles_by_contact_mail_address,
    roles_by_entitlement_id,
};
use super::middleware::{correlation_middleware, logging_middleware};
use super::state::AppState;
use crate::utils::error::Result;
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<()> {
    tracing::info!("🚀 Binding HTTP server on {}", addr);
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("HTTP server ready and accepting connections on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/dynamics-contact-data", get(handle_contact_data))
        .route("/health", get(handle_health))
        .nest("/api/dynamics", dynamics_routes())
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(axum::middleware::from_fn(correlation_middleware))
        .with_state(state)
}

fn dynamics_routes() -> Router<AppState> {
    Router::new()
        .route("/contact", get(list_contacts))
        .route("/contact/contactid/:contactid", get(contact_by_id))
        .route("/contact/mail/:mail", get(contact_by_mail))
        .route("/account", get(list_accounts))
        .route("/account/accountid/:accountid", get(account_by_id))
        .route("/account/accountnumber/:accountnumber", get(account_by_number))
        .route(
            "/entitlementcontactrole/contactid/:contactid",
            get(roles_by_contact_id),
        )
        .route("/entitlementcontactrole/mail/:mail", get(roles_by_contact_mail))
        .route(
            "/entitlementcontactrole/bycontactmail/:mail",
            get(roles_by_contact_mail_address),
        )
        .route(
            "/entitlementcontactrole/entitlementid/:entitlementid",
            get(roles_by_entitlement_id),
        )
        .route(
            "/entitlementcontactrole/iscontractmanagercontact/:contactid",
            get(is_contract_manager),
        )
        .route("/entitlement/entitlementid/:entitlementid", get(entitlement_by_id))
}
