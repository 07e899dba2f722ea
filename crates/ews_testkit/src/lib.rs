//! # EWS Testkit
//!
//! Canned responses and fixtures for testing the EWS store client.
//!
//! The builders here produce the exact wire shapes the response readers
//! consume, layer by layer, so integration tests can script a mock
//! transport with mixed-outcome batches, multi-page enumerations, sync
//! change streams, and faults without embedding page-long XML literals.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod responses;
