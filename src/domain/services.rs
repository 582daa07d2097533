use crate::domain::ports::{
    AccountProvider, ContactProvider, EntitlementProvider, RoleLinkProvider, TokenProvider,
};
use std::sync::Arc;

/// Named dependencies every CRM-facing operation is built from.
#[derive(Clone)]
pub struct CrmServices {
    pub tokens: Arc<dyn TokenProvider>,
    pub contacts: Arc<dyn ContactProvider>,
    pub accounts: Arc<dyn AccountProvider>,
    pub roles: Arc<dyn RoleLinkProvider>,
    pub entitlements: Arc<dyn EntitlementProvider>,
    pub instance: String,
    pub only_enabled: bool,
    pub contract_manager_role: i32,
}
