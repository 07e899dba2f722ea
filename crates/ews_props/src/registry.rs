//! Property type registry and packed tags.
//!
//! The registry maps between the numeric MAPI property type codes carried
//! in packed tags and the symbolic names the wire format spells out
//! (`Short`, `SystemTime`, ...). It is passed into the layers that need
//! it rather than living as ambient global state, so the marshalling core
//! is testable against a synthetic table.

use crate::error::{PropertyError, PropertyResult};
use std::collections::HashMap;

/// Packs a property id and type code into a single tag.
///
/// The bit layout is the MAPI convention: id in the high word, type in
/// the low word.
pub const fn pack_tag(property_id: u16, type_code: u16) -> u32 {
    ((property_id as u32) << 16) | type_code as u32
}

/// Extracts the property id from a packed tag.
pub const fn tag_id(tag: u32) -> u16 {
    (tag >> 16) as u16
}

/// Extracts the type code from a packed tag.
pub const fn tag_type(tag: u32) -> u16 {
    (tag & 0xFFFF) as u16
}

/// Packed tag of the server-maintained last-modification timestamp.
pub const PR_LAST_MODIFICATION_TIME: u32 = pack_tag(0x3008, type_codes::SYSTIME);

/// Packed tag of the gender property.
pub const PR_GENDER: u32 = pack_tag(0x3A4D, type_codes::I2);

/// Numeric MAPI property type codes.
pub mod type_codes {
    /// Unspecified type.
    pub const UNSPECIFIED: u16 = 0x0000;
    /// Null type.
    pub const NULL: u16 = 0x0001;
    /// 16-bit integer.
    pub const I2: u16 = 0x0002;
    /// 32-bit integer.
    pub const LONG: u16 = 0x0003;
    /// 32-bit float.
    pub const R4: u16 = 0x0004;
    /// 64-bit float.
    pub const DOUBLE: u16 = 0x0005;
    /// Currency amount.
    pub const CURRENCY: u16 = 0x0006;
    /// Application time.
    pub const APPTIME: u16 = 0x0007;
    /// Error code.
    pub const ERROR: u16 = 0x000A;
    /// Boolean.
    pub const BOOLEAN: u16 = 0x000B;
    /// Embedded object.
    pub const OBJECT: u16 = 0x000D;
    /// 64-bit integer.
    pub const I8: u16 = 0x0014;
    /// 8-bit string.
    pub const STRING8: u16 = 0x001E;
    /// Unicode string.
    pub const UNICODE: u16 = 0x001F;
    /// System time.
    pub const SYSTIME: u16 = 0x0040;
    /// GUID.
    pub const CLSID: u16 = 0x0048;
    /// Byte array.
    pub const BINARY: u16 = 0x0102;
}

/// Bidirectional map between numeric type codes and symbolic type names.
///
/// Total over the known type set in both directions; unknown inputs fail
/// with a lookup-error kind rather than guessing.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    to_symbol: HashMap<u16, String>,
    to_code: HashMap<String, u16>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            to_symbol: HashMap::new(),
            to_code: HashMap::new(),
        }
    }

    /// Creates the registry with the observed MAPI table.
    ///
    /// Both the 8-bit and unicode string codes read back as `String`;
    /// the symbol `String` canonically packs as the unicode code.
    pub fn mapi() -> Self {
        use type_codes::*;

        let mut registry = Self::new();
        registry.insert(UNSPECIFIED, "Unspecified");
        registry.insert(NULL, "Null");
        registry.insert(I2, "Short");
        registry.insert(LONG, "Integer");
        registry.insert(R4, "Float");
        registry.insert(DOUBLE, "Double");
        registry.insert(CURRENCY, "Currency");
        registry.insert(APPTIME, "ApplicationTime");
        registry.insert(ERROR, "Error");
        registry.insert(BOOLEAN, "Boolean");
        registry.insert(OBJECT, "Object");
        registry.insert(I8, "Long");
        registry.insert(STRING8, "String");
        registry.insert(UNICODE, "String");
        registry.insert(SYSTIME, "SystemTime");
        registry.insert(CLSID, "CLSID");
        registry.insert(BINARY, "Binary");
        registry
    }

    /// Inserts a code/symbol pair.
    ///
    /// A later insert for the same symbol wins in the symbol-to-code
    /// direction.
    pub fn insert(&mut self, code: u16, symbol: impl Into<String>) {
        let symbol = symbol.into();
        self.to_symbol.insert(code, symbol.clone());
        self.to_code.insert(symbol, code);
    }

    /// Resolves a numeric type code to its symbolic name.
    pub fn type_code_to_symbol(&self, code: u16) -> PropertyResult<&str> {
        self.to_symbol
            .get(&code)
            .map(String::as_str)
            .ok_or(PropertyError::UnknownTypeCode { code })
    }

    /// Resolves a symbolic type name to its numeric code.
    pub fn symbol_to_type_code(&self, symbol: &str) -> PropertyResult<u16> {
        self.to_code
            .get(symbol)
            .copied()
            .ok_or_else(|| PropertyError::UnknownTypeSymbol {
                symbol: symbol.into(),
            })
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::mapi()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_and_unpack() {
        let tag = pack_tag(0x3008, type_codes::SYSTIME);
        assert_eq!(tag, 0x3008_0040);
        assert_eq!(tag_id(tag), 0x3008);
        assert_eq!(tag_type(tag), type_codes::SYSTIME);
    }

    #[test]
    fn well_known_tags() {
        assert_eq!(PR_LAST_MODIFICATION_TIME, 0x3008_0040);
        assert_eq!(PR_GENDER, 0x3A4D_0002);
    }

    #[test]
    fn mapi_table_is_bidirectional() {
        let registry = TypeRegistry::mapi();
        assert_eq!(
            registry.type_code_to_symbol(type_codes::SYSTIME).unwrap(),
            "SystemTime"
        );
        assert_eq!(
            registry.symbol_to_type_code("SystemTime").unwrap(),
            type_codes::SYSTIME
        );
    }

    #[test]
    fn string_aliases_resolve() {
        let registry = TypeRegistry::mapi();
        assert_eq!(
            registry.type_code_to_symbol(type_codes::STRING8).unwrap(),
            "String"
        );
        assert_eq!(
            registry.type_code_to_symbol(type_codes::UNICODE).unwrap(),
            "String"
        );
        // The symbol packs as whichever code was registered last.
        assert_eq!(
            registry.symbol_to_type_code("String").unwrap(),
            type_codes::UNICODE
        );
    }

    #[test]
    fn unknown_lookups_fail() {
        let registry = TypeRegistry::mapi();
        assert!(matches!(
            registry.type_code_to_symbol(0x4242),
            Err(PropertyError::UnknownTypeCode { code: 0x4242 })
        ));
        assert!(matches!(
            registry.symbol_to_type_code("Quaternion"),
            Err(PropertyError::UnknownTypeSymbol { .. })
        ));
    }

    #[test]
    fn synthetic_registry() {
        let mut registry = TypeRegistry::new();
        registry.insert(0x0001, "TestType");
        assert_eq!(registry.symbol_to_type_code("TestType").unwrap(), 1);
        assert!(registry.type_code_to_symbol(2).is_err());
    }
}
