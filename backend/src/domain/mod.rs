//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed job, notification and user model and
//! the use-cases that operate on it. Services depend only on the traits in
//! [`ports`]; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic failure.
//! - Job, Notification, User: validated aggregates.
//! - JobService, NotificationService, AccountManager, UserAdminService:
//!   implementations of the driving ports.

pub mod admin_invite;
pub mod auth;
pub mod error;
mod identifier;
pub mod job;
pub mod notification;
pub mod ports;
pub mod trace_id;
pub mod user;

mod account_service;
mod job_service;
mod notification_emitter;
mod notification_retention;
mod notification_service;
mod user_admin_service;

pub use self::account_service::{AccountManager, TokenAuthenticator};
pub use self::admin_invite::{AdminInviteCodes, INVITE_CODE_LEN, InviteCode, InviteCodeError};
pub use self::auth::{AuthSession, Caller, IssuedToken, TokenClaims};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identifier::IdentifierError;
pub use self::job::{
    JOB_HEADLINE_MAX, JOB_NOTES_MAX, JOB_SHORT_TEXT_MAX, Job, JobDetails, JobDraft, JobId,
    JobPatch, JobStatus, JobValidationError, SortDirection, StatusTransition,
};
pub use self::job_service::JobService;
pub use self::notification::{
    NOTIFICATION_RETENTION_DAYS, NewNotification, Notification, NotificationFeed, NotificationId,
    NotificationKind, NotificationPayload, UnknownNotificationKind, retention_cutoff,
};
pub use self::notification_emitter::NotificationEmitter;
pub use self::notification_retention::{DEFAULT_RETENTION_INTERVAL, NotificationRetentionWorker};
pub use self::notification_service::NotificationService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PASSWORD_MIN, Password, Role, USER_NAME_MAX, User, UserAccount, UserId,
    UserName, UserValidationError,
};
pub use self::user_admin_service::UserAdminService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use jobtrack::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
