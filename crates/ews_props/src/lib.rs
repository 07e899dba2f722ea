//! # EWS Props
//!
//! Property type registry and extended-property addressing for the EWS
//! store client.
//!
//! This crate provides:
//! - [`TypeRegistry`]: an injected, bidirectional map between numeric MAPI
//!   property type codes and the symbolic type names the wire format uses
//! - Packed property tags (`(id << 16) | type`) and their accessors
//! - [`parse_numeric_text`]: the tolerant numeric parser the wire format
//!   requires (decimal, `0x` hex, leading-zero text)
//! - [`ExtendedFieldUri`]: the three-scheme property locator and its
//!   variant classifier
//! - [`ExtendedProperty`]: a locator plus a value, with the key
//!   projections the entity-side index uses
//!
//! ## Key Invariants
//!
//! - The populated attribute set of a locator uniquely determines its
//!   variant; ambiguous sets classify as [`PropVariant::Unknown`] and the
//!   property is retained opaquely, never guessed at
//! - Classification is computed on access, so a partially built locator
//!   is never frozen into a stale variant

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod extended;
mod numeric;
mod registry;

pub use error::{PropertyError, PropertyResult};
pub use extended::{ExtendedFieldUri, ExtendedProperty, PropVariant, PropertyKey, PropertySet};
pub use numeric::parse_numeric_text;
pub use registry::{
    pack_tag, tag_id, tag_type, type_codes, TypeRegistry, PR_GENDER, PR_LAST_MODIFICATION_TIME,
};
