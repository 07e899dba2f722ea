//! # EWS Engine
//!
//! Round-trip execution, pagination, and incremental sync for the EWS
//! store client.
//!
//! This crate drives the protocol layer against a pluggable transport:
//! - [`Transport`]: one blocking authenticated POST per call, with
//!   [`MockTransport`] for scripted tests
//! - [`Renderer`]: the template-rendering seam, defaulting to
//!   [`XmlRenderer`]
//! - [`StoreClient`]: one method per remote verb, plus the bounded
//!   enumeration loop and the single-page sync contract
//! - [`ClientConfig`]: page sizes and delete disposal
//!
//! ## Key Invariants
//!
//! - Bounded enumeration terminates on the server's end-of-range flag,
//!   or defensively once the offset passes the last known total count
//! - Sync never auto-loops: each call is one page, and the caller owns
//!   cursor persistence between pages
//! - Create/update identity feedback is positional over the submitted
//!   entity slice; failed elements leave their entity untouched

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod renderer;
mod transport;

pub use client::StoreClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, TransportError};
pub use renderer::{Renderer, XmlRenderer};
pub use transport::{MockTransport, Transport};
