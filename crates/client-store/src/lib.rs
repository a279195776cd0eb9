//! Process-local cache of jobtrack jobs and notifications.
//!
//! Clients load collections from the REST API, then keep them current by
//! merging realtime frames and mirroring their own mutations locally. The
//! crate only knows the wire shapes, not the backend's domain types.
//!
//! # Example
//!
//! ```
//! use client_store::{ClientStore, FrameEffect};
//!
//! let mut store = ClientStore::default();
//! let effect = store
//!     .apply_frame(r#"{"event":"notification","data":{"type":"new_job","title":"New Job Application","message":"added"}}"#)
//!     .expect("valid frame");
//!
//! assert_eq!(effect, FrameEffect::NotificationAdded);
//! assert_eq!(store.unread_count(), 1);
//! ```

mod error;
mod frames;
mod records;
mod shared;
mod store;

pub use error::StoreError;
pub use frames::{FrameEffect, ServerFrame};
pub use records::{JobRecord, NotificationRecord, PushedNotification};
pub use shared::SharedStore;
pub use store::ClientStore;
