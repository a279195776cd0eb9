//! Monthly admin invite codes.
//!
//! A code is the first 12 hex characters of `HMAC-SHA256(secret,
//! "{month}-{year}")`, with a 1-based, unpadded month. Codes from the current
//! and the previous calendar month are accepted so an invite issued at the end
//! of a month keeps working across the boundary.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use hmac::{Hmac, Mac};
use mockable::Clock;
use sha2::Sha256;
use tracing::error;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Number of hex characters in an invite code.
pub const INVITE_CODE_LEN: usize = 12;

/// Failures raised while issuing invite codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InviteCodeError {
    /// No invite secret is configured.
    #[error("admin invite secret is not configured")]
    NotConfigured,
    /// The secret could not key the HMAC.
    #[error("admin invite secret cannot key the HMAC")]
    InvalidKey,
    /// The clock produced a date outside the supported calendar range.
    #[error("calendar arithmetic overflowed for {year}-{month}")]
    Calendar { year: i32, month: u32 },
}

/// An invite code and the instant it stops validating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteCode {
    pub code: String,
    pub valid_until: DateTime<Utc>,
}

/// Issues and checks admin invite codes against the injected clock.
#[derive(Clone)]
pub struct AdminInviteCodes {
    secret: Option<Arc<Zeroizing<String>>>,
    clock: Arc<dyn Clock>,
}

impl AdminInviteCodes {
    /// Create the issuer. A missing or blank secret disables every code.
    pub fn new(secret: Option<String>, clock: Arc<dyn Clock>) -> Self {
        let secret = secret
            .filter(|value| !value.trim().is_empty())
            .map(|value| Arc::new(Zeroizing::new(value)));
        Self { secret, clock }
    }

    /// Code for the current month.
    pub fn generate(&self) -> Result<InviteCode, InviteCodeError> {
        let Some(secret) = &self.secret else {
            error!("admin invite requested without a configured secret");
            return Err(InviteCodeError::NotConfigured);
        };
        let now = self.clock.utc();
        let (year, month) = (now.year(), now.month());
        let code = code_for(secret, month, year).ok_or(InviteCodeError::InvalidKey)?;
        Ok(InviteCode {
            code,
            valid_until: end_of_following_month(year, month)?,
        })
    }

    /// Whether `candidate` matches this month's or last month's code.
    #[must_use]
    pub fn validate(&self, candidate: &str) -> bool {
        let Some(secret) = &self.secret else {
            error!("admin invite submitted without a configured secret");
            return false;
        };
        let now = self.clock.utc();
        let (year, month) = (now.year(), now.month());
        let (prev_year, prev_month) = previous_month(year, month);
        [(month, year), (prev_month, prev_year)]
            .into_iter()
            .filter_map(|(m, y)| code_for(secret, m, y))
            .any(|code| code == candidate)
    }
}

fn code_for(secret: &str, month: u32, year: i32) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{month}-{year}").as_bytes());
    let digest = hex::encode(mac.finalize().into_bytes());
    Some(digest.chars().take(INVITE_CODE_LEN).collect())
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn end_of_following_month(year: i32, month: u32) -> Result<DateTime<Utc>, InviteCodeError> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.checked_add_months(Months::new(2)))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or(InviteCodeError::Calendar { year, month })
}
