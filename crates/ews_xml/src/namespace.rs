//! Namespace constants and qualified-name helpers.

/// SOAP envelope namespace.
pub const SOAP_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// Protocol messages namespace (the `m:` prefix on the wire).
pub const MESSAGES_NS: &str = "http://schemas.microsoft.com/exchange/services/2006/messages";

/// Protocol types namespace (the `t:` prefix on the wire).
pub const TYPES_NS: &str = "http://schemas.microsoft.com/exchange/services/2006/types";

/// Protocol errors namespace.
pub const ERRORS_NS: &str = "http://schemas.microsoft.com/exchange/services/2006/errors";
