//! Item identity and the shared extended-property collection.

use ews_props::{
    ExtendedFieldUri, ExtendedProperty, PropertyError, PropertyKey, PropertyResult, PropertySet,
    TypeRegistry,
};
use ews_xml::Field;
use std::collections::HashMap;

/// Identity and extended-property state shared by all item kinds.
///
/// Item id and change key travel together: both unset means a new,
/// unsaved entity; both set means the entity is bound to a remote
/// record. An entity with a stale change key is rejected by the server
/// on update; the rejection is surfaced, never silently retried.
#[derive(Debug, Clone)]
pub struct Item {
    item_id: Option<String>,
    change_key: Option<String>,
    parent_folder_id: Option<String>,
    parent_folder_change_key: Option<String>,
    item_class: Field,
    created_time: Option<String>,
    last_modified_time: Option<String>,
    eprops: Vec<ExtendedProperty>,
    index: HashMap<PropertyKey, usize>,
}

impl Item {
    /// Creates an unbound item.
    pub fn new() -> Self {
        Self {
            item_id: None,
            change_key: None,
            parent_folder_id: None,
            parent_folder_change_key: None,
            item_class: Field::new("ItemClass"),
            created_time: None,
            last_modified_time: None,
            eprops: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an unbound item parented under the given folder id.
    pub fn with_parent(parent_folder_id: impl Into<String>) -> Self {
        let mut item = Self::new();
        item.parent_folder_id = Some(parent_folder_id.into());
        item
    }

    /// Returns the item id, if bound.
    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    /// Returns the change key, if bound.
    pub fn change_key(&self) -> Option<&str> {
        self.change_key.as_deref()
    }

    /// Binds the entity to a remote record.
    ///
    /// Id and change key are only ever set together.
    pub fn bind_identity(&mut self, item_id: impl Into<String>, change_key: impl Into<String>) {
        self.item_id = Some(item_id.into());
        self.change_key = Some(change_key.into());
    }

    /// Refreshes the change key after a successful update.
    pub fn refresh_change_key(&mut self, change_key: impl Into<String>) {
        self.change_key = Some(change_key.into());
    }

    /// Returns true when the entity is bound to a remote record.
    pub fn is_bound(&self) -> bool {
        self.item_id.is_some() && self.change_key.is_some()
    }

    /// Returns the parent folder id, if known.
    ///
    /// Stored as plain id data; the model never holds an owning pointer
    /// back to a folder.
    pub fn parent_folder_id(&self) -> Option<&str> {
        self.parent_folder_id.as_deref()
    }

    /// Sets the parent folder id.
    pub fn set_parent_folder_id(&mut self, id: impl Into<String>) {
        self.parent_folder_id = Some(id.into());
    }

    /// Returns the parent folder change key, if the server sent one.
    pub fn parent_folder_change_key(&self) -> Option<&str> {
        self.parent_folder_change_key.as_deref()
    }

    /// Sets the parent folder change key.
    pub fn set_parent_folder_change_key(&mut self, change_key: impl Into<String>) {
        self.parent_folder_change_key = Some(change_key.into());
    }

    /// Returns the item class field.
    pub fn item_class(&self) -> &Field {
        &self.item_class
    }

    /// Returns the item class field mutably.
    pub fn item_class_mut(&mut self) -> &mut Field {
        &mut self.item_class
    }

    /// Returns the server-set creation time, if present.
    pub fn created_time(&self) -> Option<&str> {
        self.created_time.as_deref()
    }

    /// Records the server-set creation time.
    pub fn set_created_time(&mut self, value: impl Into<String>) {
        self.created_time = Some(value.into());
    }

    /// Returns the server-maintained last-modification time, if present.
    ///
    /// Read-only: it is parsed from responses and never written back.
    pub fn last_modified_time(&self) -> Option<&str> {
        self.last_modified_time.as_deref()
    }

    /// Records the last-modification time from a response.
    pub fn set_last_modified_time(&mut self, value: impl Into<String>) {
        self.last_modified_time = Some(value.into());
    }

    /// Returns every extended property, known and unknown variants alike.
    pub fn extended_properties(&self) -> &[ExtendedProperty] {
        &self.eprops
    }

    /// Adds an extended property, indexing it under its variant key.
    ///
    /// A property with the same key replaces the previous one. Unknown
    /// variants are retained unindexed and round-trip on serialization.
    pub fn add_extended_property(&mut self, prop: ExtendedProperty, registry: &TypeRegistry) {
        match prop.key(registry) {
            Some(key) => match self.index.get(&key) {
                Some(&slot) => self.eprops[slot] = prop,
                None => {
                    self.index.insert(key, self.eprops.len());
                    self.eprops.push(prop);
                }
            },
            None => self.eprops.push(prop),
        }
    }

    /// Looks up a property by its index key.
    pub fn property_by_key(&self, key: &PropertyKey) -> Option<&ExtendedProperty> {
        self.index.get(key).map(|&slot| &self.eprops[slot])
    }

    /// Looks up a tag-addressed property by packed tag.
    pub fn tagged_property(&self, tag: u32) -> Option<&ExtendedProperty> {
        self.property_by_key(&PropertyKey::Tagged(tag))
    }

    /// Looks up a named property by set and numeric id.
    pub fn named_numeric_property(
        &self,
        set: &PropertySet,
        property_id: u32,
    ) -> Option<&ExtendedProperty> {
        self.property_by_key(&PropertyKey::NamedNumeric(set.clone(), property_id))
    }

    /// Looks up a named property by set and name.
    pub fn named_string_property(
        &self,
        set: &PropertySet,
        name: &str,
    ) -> Option<&ExtendedProperty> {
        self.property_by_key(&PropertyKey::NamedString(set.clone(), name.to_string()))
    }

    /// Reads a tag-addressed property's value through a typed accessor.
    ///
    /// Fails with a not-found kind when the entity does not carry the
    /// property (including when it arrived unclassifiable).
    pub fn tagged_text(&self, tag: u32) -> PropertyResult<&str> {
        self.tagged_property(tag)
            .ok_or(PropertyError::NotFound)?
            .text()
    }

    /// Sets a tag-addressed property from a packed tag and value.
    pub fn set_tagged_property(
        &mut self,
        tag: u32,
        value: impl Into<String>,
        registry: &TypeRegistry,
    ) -> PropertyResult<()> {
        let uri = ExtendedFieldUri::from_packed_tag(tag, registry)?;
        self.add_extended_property(ExtendedProperty::with_value(uri, value), registry);
        Ok(())
    }

    /// Sets a named property with a numeric id.
    pub fn set_named_numeric_property(
        &mut self,
        set: PropertySet,
        property_id: u32,
        property_type: impl Into<String>,
        value: impl Into<String>,
        registry: &TypeRegistry,
    ) {
        let uri = ExtendedFieldUri::named_numeric(set, property_id, property_type);
        self.add_extended_property(ExtendedProperty::with_value(uri, value), registry);
    }

    /// Sets a named property with a string name.
    pub fn set_named_string_property(
        &mut self,
        set: PropertySet,
        name: impl Into<String>,
        property_type: impl Into<String>,
        value: impl Into<String>,
        registry: &TypeRegistry,
    ) {
        let uri = ExtendedFieldUri::named_string(set, name, property_type);
        self.add_extended_property(ExtendedProperty::with_value(uri, value), registry);
    }
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ews_props::PR_GENDER;
    use uuid::Uuid;

    #[test]
    fn new_item_is_unbound() {
        let item = Item::new();
        assert!(!item.is_bound());
        assert_eq!(item.item_id(), None);
        assert_eq!(item.change_key(), None);
    }

    #[test]
    fn bind_sets_both_halves() {
        let mut item = Item::new();
        item.bind_identity("AQA=", "CQA=");
        assert!(item.is_bound());
        assert_eq!(item.item_id(), Some("AQA="));
        assert_eq!(item.change_key(), Some("CQA="));

        item.refresh_change_key("CQB=");
        assert_eq!(item.change_key(), Some("CQB="));
        assert_eq!(item.item_id(), Some("AQA="));
    }

    #[test]
    fn tagged_property_set_and_get() {
        let registry = TypeRegistry::mapi();
        let mut item = Item::new();
        item.set_tagged_property(PR_GENDER, "2", &registry).unwrap();

        assert_eq!(item.tagged_text(PR_GENDER).unwrap(), "2");
    }

    #[test]
    fn tagged_property_replaces_on_same_key() {
        let registry = TypeRegistry::mapi();
        let mut item = Item::new();
        item.set_tagged_property(PR_GENDER, "2", &registry).unwrap();
        item.set_tagged_property(PR_GENDER, "3", &registry).unwrap();

        assert_eq!(item.tagged_text(PR_GENDER).unwrap(), "3");
        assert_eq!(item.extended_properties().len(), 1);
    }

    #[test]
    fn missing_property_is_not_found() {
        let item = Item::new();
        assert!(matches!(
            item.tagged_text(PR_GENDER),
            Err(PropertyError::NotFound)
        ));
    }

    #[test]
    fn named_properties_index_by_set() {
        let registry = TypeRegistry::mapi();
        let guid = Uuid::parse_str("c11ff724-aa03-4555-9952-8fa248a11c3e").unwrap();
        let mut item = Item::new();

        item.set_named_numeric_property(
            PropertySet::Guid(guid),
            0x8b,
            "String",
            "categories",
            &registry,
        );
        item.set_named_string_property(
            PropertySet::Distinguished("PublicStrings".into()),
            "Keywords",
            "String",
            "vip",
            &registry,
        );

        let set = PropertySet::Guid(guid);
        assert_eq!(
            item.named_numeric_property(&set, 0x8b).unwrap().value(),
            Some("categories")
        );
        let set = PropertySet::Distinguished("PublicStrings".into());
        assert_eq!(
            item.named_string_property(&set, "Keywords").unwrap().value(),
            Some("vip")
        );
    }

    #[test]
    fn unknown_property_is_retained_but_unindexed() {
        let registry = TypeRegistry::mapi();
        let mut item = Item::new();
        item.add_extended_property(
            ExtendedProperty::new(ExtendedFieldUri::default()),
            &registry,
        );

        assert_eq!(item.extended_properties().len(), 1);
        assert!(item.tagged_property(PR_GENDER).is_none());
    }
}
