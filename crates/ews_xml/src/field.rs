//! The generic field tree node.

use crate::error::{XmlError, XmlResult};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// A named node in an entity's attribute/value/children tree.
///
/// One `Field` corresponds to one XML element on the wire. The tag is
/// stored unqualified; serialization applies the `t:` types prefix.
///
/// Fields exclusively own their children. The tree never holds
/// back-references; a parent folder is referenced by plain id data where
/// needed, never by pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    tag: String,
    value: Option<String>,
    attributes: Vec<(String, String)>,
    children: Vec<Field>,
    read_only: bool,
}

impl Field {
    /// Creates an empty field with the given tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            value: None,
            attributes: Vec::new(),
            children: Vec::new(),
            read_only: false,
        }
    }

    /// Creates a field holding a scalar value.
    pub fn with_value(tag: impl Into<String>, value: impl Into<String>) -> Self {
        let mut field = Self::new(tag);
        field.value = Some(value.into());
        field
    }

    /// Returns the unqualified tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the scalar value, if set.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replaces the scalar value. Children are unaffected.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Unsets the scalar value.
    ///
    /// An unset field is excluded from outgoing write requests, which
    /// leaves the remote value untouched. There is no wire primitive for
    /// an explicit remote clear.
    pub fn unset(&mut self) {
        self.value = None;
    }

    /// Adds or replaces an attribute.
    ///
    /// A `None` value is dropped entirely rather than stored as an empty
    /// string, so it can never be echoed back on serialization.
    pub fn add_attribute(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) {
        let key = key.into();
        let Some(value) = value else {
            self.attributes.retain(|(k, _)| *k != key);
            return;
        };
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Looks up an attribute by key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the attributes in insertion order.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Returns the child fields in declaration order.
    pub fn children(&self) -> &[Field] {
        &self.children
    }

    /// Returns the child fields mutably.
    pub fn children_mut(&mut self) -> &mut Vec<Field> {
        &mut self.children
    }

    /// Appends a child field.
    pub fn push_child(&mut self, child: Field) {
        self.children.push(child);
    }

    /// Finds the first child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&Field> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Returns true if the field is marked read-only.
    ///
    /// Read-only fields round-trip from responses but are never written
    /// back to the server.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Marks the field read-only.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Returns true if this field carries something to send in an update.
    ///
    /// A scalar field is pending when its value is set; a list-valued
    /// field is pending when it has at least one entry.
    pub fn has_pending_update(&self) -> bool {
        self.value.is_some() || !self.children.is_empty()
    }

    /// Returns true if the field would serialize to nothing.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.attributes.is_empty() && self.children.is_empty()
    }

    /// Serializes the field to its element text form.
    ///
    /// A field with no value, no attributes, and no children produces the
    /// empty string; this is how unset fields stay out of outgoing
    /// requests. Read-only fields also produce the empty string. Children
    /// are serialized recursively in declaration order.
    pub fn serialize(&self) -> XmlResult<String> {
        if self.read_only || self.is_empty() {
            return Ok(String::new());
        }

        let mut writer = Writer::new(Vec::new());
        self.write_into(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|_| XmlError::InvalidUtf8)
    }

    /// Serializes a self-closing element carrying only the attributes.
    ///
    /// This is the form used when a request asks the server to return a
    /// property (an extended-field locator), as opposed to setting one.
    pub fn serialize_for_get(&self) -> XmlResult<String> {
        let mut writer = Writer::new(Vec::new());
        let mut start = BytesStart::new(format!("t:{}", self.tag));
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Empty(start))?;
        String::from_utf8(writer.into_inner()).map_err(|_| XmlError::InvalidUtf8)
    }

    fn write_into(&self, writer: &mut Writer<Vec<u8>>) -> XmlResult<()> {
        if self.read_only || self.is_empty() {
            return Ok(());
        }

        let name = format!("t:{}", self.tag);
        let mut start = BytesStart::new(name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        writer.write_event(Event::Start(start))?;

        if let Some(value) = &self.value {
            writer.write_event(Event::Text(BytesText::new(value)))?;
        }
        for child in &self.children {
            child.write_into(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }

    /// Structural equality that ignores attribute insertion order.
    ///
    /// Attribute order is not significant on the wire; child order is.
    pub fn equivalent(&self, other: &Field) -> bool {
        if self.tag != other.tag
            || self.value != other.value
            || self.attributes.len() != other.attributes.len()
            || self.children.len() != other.children.len()
        {
            return false;
        }
        let attrs_match = self
            .attributes
            .iter()
            .all(|(k, v)| other.attribute(k) == Some(v.as_str()));
        attrs_match
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.equivalent(b))
    }
}
