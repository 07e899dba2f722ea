//! # EWS XML
//!
//! Field tree model and XML wire form for the EWS store client.
//!
//! This crate provides:
//! - The generic [`Field`] tree: a named, optionally-attributed,
//!   optionally-childed value node
//! - Serialization to the `t:`-prefixed element form used by the wire
//!   protocol, with empty-element suppression
//! - Parsing of response documents into field trees via namespace-aware
//!   node helpers
//!
//! ## Key Invariants
//!
//! - A field with no value, no attributes, and no children serializes to
//!   nothing at all
//! - Children serialize in the exact order they were declared
//! - An attribute set to `None` is omitted, never written as an empty string
//!
//! ## Usage
//!
//! ```
//! use ews_xml::Field;
//!
//! let mut field = Field::new("GivenName");
//! field.set("Ada");
//! assert_eq!(field.serialize().unwrap(), "<t:GivenName>Ada</t:GivenName>");
//!
//! let empty = Field::new("Surname");
//! assert_eq!(empty.serialize().unwrap(), "");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod field;
mod namespace;
mod parse;

pub use error::{XmlError, XmlResult};
pub use field::Field;
pub use namespace::{ERRORS_NS, MESSAGES_NS, SOAP_NS, TYPES_NS};
pub use parse::{
    descendant_text, field_from_node, find_descendant, node_attribute, parse_document,
};
