//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, Authenticator, JobCommand, JobQuery, NotificationCommand, NotificationQuery,
    UserAdministration,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub authenticator: Arc<dyn Authenticator>,
    pub jobs: Arc<dyn JobCommand>,
    pub jobs_query: Arc<dyn JobQuery>,
    pub notifications: Arc<dyn NotificationCommand>,
    pub notifications_query: Arc<dyn NotificationQuery>,
    pub users: Arc<dyn UserAdministration>,
}
