//! # EWS Model
//!
//! Typed entity model for the EWS store client.
//!
//! This crate composes the generic field tree and the extended-property
//! machinery into the entities callers work with:
//! - [`Item`]: identity (item id, change key, parent folder) plus the
//!   indexed extended-property collection shared by all item kinds
//! - [`Contact`]: the concrete entity, with its fixed declaration-order
//!   well-known fields and the create/update diff
//! - [`Folder`]: a bound folder with the counts the pagination engine
//!   relies on
//!
//! ## Key Invariants
//!
//! - Item id and change key are either both unset (new entity) or both
//!   set (bound to a remote record)
//! - `get_updates` partitions every declared child field into exactly one
//!   of sets/deletes, in declaration order
//! - A field missing from sets is simply not transmitted; the remote
//!   value is left untouched

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod contact;
mod data;
mod error;
mod folder;
mod item;
mod update;

pub use contact::{CompleteName, Contact, EmailEntry, PhoneEntry};
pub use data::{
    distinguished_folder, email_key, folder_class, item_class, phone_key, Gender,
};
pub use error::{ModelError, ModelResult};
pub use folder::Folder;
pub use item::Item;
pub use update::UpdateDiff;
