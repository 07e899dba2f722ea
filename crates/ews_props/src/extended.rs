//! Extended-property locators, the variant classifier, and values.

use crate::error::{PropertyError, PropertyResult};
use crate::numeric::parse_numeric_text;
use crate::registry::{pack_tag, tag_id, tag_type, TypeRegistry};
use ews_xml::Field;
use std::fmt;
use uuid::Uuid;

/// Wire attribute names of the extended-field locator.
mod attr {
    pub const DISTINGUISHED_SET_ID: &str = "DistinguishedPropertySetId";
    pub const SET_ID: &str = "PropertySetId";
    pub const PROPERTY_TAG: &str = "PropertyTag";
    pub const PROPERTY_NAME: &str = "PropertyName";
    pub const PROPERTY_ID: &str = "PropertyId";
    pub const PROPERTY_TYPE: &str = "PropertyType";
}

/// A property set identifier, for the two named addressing schemes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertySet {
    /// A well-known set referenced by symbolic name.
    Distinguished(String),
    /// A set referenced by GUID.
    Guid(Uuid),
}

/// The addressing scheme a property locator uses.
///
/// The store exposes three schemes; a locator whose populated attributes
/// match none of their exact signatures is `Unknown` and is carried
/// opaquely rather than interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropVariant {
    /// Addressed by a fixed numeric (id, type) pair.
    Tagged,
    /// Addressed by a property set plus a numeric id.
    NamedNumeric,
    /// Addressed by a property set plus a string name.
    NamedString,
    /// No known signature matched.
    Unknown,
}

impl fmt::Display for PropVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropVariant::Tagged => "Tagged",
            PropVariant::NamedNumeric => "NamedNumeric",
            PropVariant::NamedString => "NamedString",
            PropVariant::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// The `ExtendedFieldURI` locator: which property a value belongs to.
///
/// Exactly one addressing combination is populated at a time in valid
/// data; the populated-attribute signature determines the variant. The
/// variant is computed on each [`variant`](Self::variant) call, never
/// cached, so a locator still being populated reports `Unknown` until
/// its signature is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedFieldUri {
    distinguished_set_id: Option<String>,
    set_id: Option<Uuid>,
    property_tag: Option<String>,
    property_name: Option<String>,
    property_id: Option<u32>,
    property_type: Option<String>,
}

impl ExtendedFieldUri {
    /// Creates a tag-addressed locator.
    ///
    /// `property_tag` stays textual here; the wire format writes it in
    /// several numeric encodings and it is echoed back as received.
    pub fn tagged(property_tag: impl Into<String>, property_type: impl Into<String>) -> Self {
        Self {
            property_tag: Some(property_tag.into()),
            property_type: Some(property_type.into()),
            ..Self::default()
        }
    }

    /// Creates a numeric-id named locator.
    pub fn named_numeric(set: PropertySet, property_id: u32, property_type: impl Into<String>) -> Self {
        let mut uri = Self {
            property_id: Some(property_id),
            property_type: Some(property_type.into()),
            ..Self::default()
        };
        uri.set_property_set(set);
        uri
    }

    /// Creates a string-name named locator.
    pub fn named_string(
        set: PropertySet,
        property_name: impl Into<String>,
        property_type: impl Into<String>,
    ) -> Self {
        let mut uri = Self {
            property_name: Some(property_name.into()),
            property_type: Some(property_type.into()),
            ..Self::default()
        };
        uri.set_property_set(set);
        uri
    }

    /// Builds a tag-addressed locator from a packed tag.
    ///
    /// The numeric type code is resolved to its symbolic name through the
    /// registry; the id is rendered in the hex form the wire favors.
    pub fn from_packed_tag(tag: u32, registry: &TypeRegistry) -> PropertyResult<Self> {
        let symbol = registry.type_code_to_symbol(tag_type(tag))?;
        Ok(Self::tagged(format!("0x{:x}", tag_id(tag)), symbol))
    }

    /// Reads a locator from a parsed `ExtendedFieldURI` field.
    pub fn from_field(field: &Field) -> PropertyResult<Self> {
        let set_id = match field.attribute(attr::SET_ID) {
            Some(text) => Some(
                Uuid::parse_str(text)
                    .map_err(|_| PropertyError::InvalidSetId { text: text.into() })?,
            ),
            None => None,
        };
        let property_id = match field.attribute(attr::PROPERTY_ID) {
            Some(text) => Some(parse_numeric_text(text)?),
            None => None,
        };
        Ok(Self {
            distinguished_set_id: field.attribute(attr::DISTINGUISHED_SET_ID).map(str::to_string),
            set_id,
            property_tag: field.attribute(attr::PROPERTY_TAG).map(str::to_string),
            property_name: field.attribute(attr::PROPERTY_NAME).map(str::to_string),
            property_id,
            property_type: field.attribute(attr::PROPERTY_TYPE).map(str::to_string),
        })
    }

    fn set_property_set(&mut self, set: PropertySet) {
        match set {
            PropertySet::Distinguished(name) => self.distinguished_set_id = Some(name),
            PropertySet::Guid(guid) => self.set_id = Some(guid),
        }
    }

    /// Returns the property set, if either set attribute is populated.
    pub fn property_set(&self) -> Option<PropertySet> {
        if let Some(name) = &self.distinguished_set_id {
            return Some(PropertySet::Distinguished(name.clone()));
        }
        self.set_id.map(PropertySet::Guid)
    }

    /// Returns the textual property tag, if populated.
    pub fn property_tag(&self) -> Option<&str> {
        self.property_tag.as_deref()
    }

    /// Returns the property name, if populated.
    pub fn property_name(&self) -> Option<&str> {
        self.property_name.as_deref()
    }

    /// Returns the numeric property id, if populated.
    pub fn property_id(&self) -> Option<u32> {
        self.property_id
    }

    /// Returns the symbolic property type, if populated.
    pub fn property_type(&self) -> Option<&str> {
        self.property_type.as_deref()
    }

    /// Classifies the locator by its populated-attribute signature.
    ///
    /// The decision table, over present (`+`) and absent (`-`)
    /// attributes:
    ///
    /// | variant      | tag | type | id | name | set ids        |
    /// |--------------|-----|------|----|------|----------------|
    /// | Tagged       |  +  |  +   | -  |  -   | both -         |
    /// | NamedNumeric |  -  |  +   | +  |  -   | exactly one +  |
    /// | NamedString  |  -  |  +   | -  |  +   | exactly one +  |
    ///
    /// Anything else is `Unknown`. The classifier never guesses; an
    /// ambiguous signature (say, both set ids populated) stays opaque.
    pub fn variant(&self) -> PropVariant {
        let tag = self.property_tag.is_some();
        let ptype = self.property_type.is_some();
        let id = self.property_id.is_some();
        let name = self.property_name.is_some();
        let set_count =
            usize::from(self.distinguished_set_id.is_some()) + usize::from(self.set_id.is_some());

        if tag && ptype && !id && !name && set_count == 0 {
            return PropVariant::Tagged;
        }
        if !tag && ptype && id && !name && set_count == 1 {
            return PropVariant::NamedNumeric;
        }
        if !tag && ptype && !id && name && set_count == 1 {
            return PropVariant::NamedString;
        }
        PropVariant::Unknown
    }

    /// Packs the (id, type) pair of a tag-addressed locator.
    ///
    /// Fails with a not-tagged kind for the other variants and with a
    /// parse or lookup error when the tag text or type symbol is bad.
    pub fn packed_tag(&self, registry: &TypeRegistry) -> PropertyResult<u32> {
        if self.variant() != PropVariant::Tagged {
            return Err(PropertyError::NotTagged {
                variant: self.variant().to_string(),
            });
        }
        // Tagged implies both attributes are present.
        let text = self.property_tag.as_deref().unwrap_or_default();
        let id = parse_numeric_text(text)?;
        // Property ids are 16-bit; a wider value would silently collide
        // with another tag after packing.
        if id > u32::from(u16::MAX) {
            return Err(PropertyError::InvalidNumericText { text: text.into() });
        }
        let type_code =
            registry.symbol_to_type_code(self.property_type.as_deref().unwrap_or_default())?;
        Ok(pack_tag(id as u16, type_code))
    }

    /// Renders the locator as an `ExtendedFieldURI` field.
    ///
    /// Only populated attributes appear; the element round-trips an
    /// `Unknown` locator byte-for-byte in content.
    pub fn to_field(&self) -> Field {
        let mut field = Field::new("ExtendedFieldURI");
        field.add_attribute(attr::DISTINGUISHED_SET_ID, self.distinguished_set_id.clone());
        field.add_attribute(attr::SET_ID, self.set_id.map(|g| g.to_string()));
        field.add_attribute(attr::PROPERTY_TAG, self.property_tag.clone());
        field.add_attribute(attr::PROPERTY_NAME, self.property_name.clone());
        field.add_attribute(attr::PROPERTY_ID, self.property_id.map(|id| id.to_string()));
        field.add_attribute(attr::PROPERTY_TYPE, self.property_type.clone());
        field
    }
}

/// Index key of an extended property inside an entity's collection.
///
/// Each known variant projects to its own key shape; `Unknown`
/// properties are unindexed and only reachable by iteration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Keyed by packed numeric tag.
    Tagged(u32),
    /// Keyed by property set and numeric id.
    NamedNumeric(PropertySet, u32),
    /// Keyed by property set and name.
    NamedString(PropertySet, String),
}

/// An extended property: one locator plus one opaque scalar value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedProperty {
    uri: ExtendedFieldUri,
    value: Option<String>,
}

impl ExtendedProperty {
    /// Creates a property with no value yet.
    pub fn new(uri: ExtendedFieldUri) -> Self {
        Self { uri, value: None }
    }

    /// Creates a property holding a value.
    pub fn with_value(uri: ExtendedFieldUri, value: impl Into<String>) -> Self {
        Self {
            uri,
            value: Some(value.into()),
        }
    }

    /// Reads a property from a parsed `ExtendedProperty` field.
    ///
    /// A missing `Value` child is tolerated (the property is retained
    /// valueless) so that unrecognized nodes still round-trip.
    pub fn from_field(field: &Field) -> PropertyResult<Self> {
        let uri = match field.child("ExtendedFieldURI") {
            Some(child) => ExtendedFieldUri::from_field(child)?,
            None => ExtendedFieldUri::default(),
        };
        let value = field
            .child("Value")
            .and_then(|v| v.value())
            .map(str::to_string);
        Ok(Self { uri, value })
    }

    /// Returns the locator.
    pub fn uri(&self) -> &ExtendedFieldUri {
        &self.uri
    }

    /// Returns the value, if present.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Returns the value or fails with a missing-value kind.
    pub fn text(&self) -> PropertyResult<&str> {
        self.value.as_deref().ok_or(PropertyError::MissingValue)
    }

    /// Replaces the value.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Classifies the locator. See [`ExtendedFieldUri::variant`].
    pub fn variant(&self) -> PropVariant {
        self.uri.variant()
    }

    /// Packs the locator's (id, type) pair; tag-addressed locators only.
    pub fn packed_tag(&self, registry: &TypeRegistry) -> PropertyResult<u32> {
        self.uri.packed_tag(registry)
    }

    /// Projects the index key for this property's variant.
    ///
    /// Returns `None` for `Unknown` locators and for tag-addressed
    /// locators whose tag text or type symbol does not resolve.
    pub fn key(&self, registry: &TypeRegistry) -> Option<PropertyKey> {
        match self.variant() {
            PropVariant::Tagged => self.packed_tag(registry).ok().map(PropertyKey::Tagged),
            PropVariant::NamedNumeric => Some(PropertyKey::NamedNumeric(
                self.uri.property_set()?,
                self.uri.property_id()?,
            )),
            PropVariant::NamedString => Some(PropertyKey::NamedString(
                self.uri.property_set()?,
                self.uri.property_name()?.to_string(),
            )),
            PropVariant::Unknown => None,
        }
    }

    /// Renders the property as an `ExtendedProperty` field.
    pub fn to_field(&self) -> Field {
        let mut field = Field::new("ExtendedProperty");
        field.push_child(self.uri.to_field());
        let mut value = Field::new("Value");
        if let Some(text) = &self.value {
            value.set(text.clone());
        }
        field.push_child(value);
        field
    }
}
