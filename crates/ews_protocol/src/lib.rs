//! # EWS Protocol
//!
//! Request rendering and response classification for the EWS store
//! client.
//!
//! This crate owns one round trip's worth of wire knowledge:
//! - [`Request`]: one variant per remote verb, rendered through a fixed
//!   template into full SOAP envelope bytes
//! - [`check_fault`]: the envelope-level fault check, fatal when it fires
//! - [`classify_response_messages`]: per-element outcome classification
//!   into success, warning (logged, index-counted, otherwise ignored),
//!   and error (accumulated, surfaced after the whole batch is walked)
//! - Typed payload readers for each verb ([`read_items_page`],
//!   [`read_sync_delta`], ...)
//! - [`SyncCursor`]: the opaque incremental-sync token
//!
//! ## Key Invariants
//!
//! - A fault aborts parsing outright; no partial results exist past it
//! - Element errors never abort the batch walk; they are raised as one
//!   aggregate carrying the success count, after every element is seen
//! - Success messages keep their batch index, so create/update identity
//!   feedback maps back to submitted entities by position

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cursor;
mod error;
mod request;
mod response;

pub use cursor::SyncCursor;
pub use error::{ErrorElement, ProtocolError, ProtocolResult};
pub use request::{
    DeleteType, FolderRef, ItemRef, ItemUpdate, Request, TemplateId, Traversal,
};
pub use response::{
    check_fault, classify_response_messages, parse_response, read_contacts, read_folder,
    read_folders, read_identity, read_items_page, read_sync_delta, ElementOutcomes, ItemIdentity,
    ItemsPage, SyncDelta,
};
