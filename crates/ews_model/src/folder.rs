//! Folders: containers the enumeration and sync verbs operate on.

use crate::error::{ModelError, ModelResult};
use ews_xml::Field;

/// A folder bound to a remote container.
///
/// Folders are read-side only: they are built from responses and carry
/// the identity plus the counts the pagination engine uses. The model
/// never mutates remote folder state.
#[derive(Debug, Clone, Default)]
pub struct Folder {
    well_known_name: Option<String>,
    id: Option<String>,
    change_key: Option<String>,
    parent_folder_id: Option<String>,
    display_name: Option<String>,
    folder_class: Option<String>,
    total_count: u32,
    child_folder_count: u32,
}

impl Folder {
    /// Builds a folder from a parsed folder response subtree.
    ///
    /// Numeric counts must parse; a malformed count is an error rather
    /// than a silent zero, because the pagination bound depends on it.
    pub fn from_field(field: &Field) -> ModelResult<Self> {
        let mut folder = Self::default();

        for child in field.children() {
            match child.tag() {
                "FolderId" => {
                    folder.id = child.attribute("Id").map(str::to_string);
                    folder.change_key = child.attribute("ChangeKey").map(str::to_string);
                }
                "ParentFolderId" => {
                    folder.parent_folder_id = child.attribute("Id").map(str::to_string);
                }
                "DisplayName" => folder.display_name = child.value().map(str::to_string),
                "FolderClass" => folder.folder_class = child.value().map(str::to_string),
                "TotalCount" => folder.total_count = parse_count(child)?,
                "ChildFolderCount" => folder.child_folder_count = parse_count(child)?,
                _ => {}
            }
        }

        Ok(folder)
    }

    /// Builds an unbound handle for a distinguished (well-known) folder.
    ///
    /// The handle can address requests before any response has supplied
    /// a real folder id.
    pub fn distinguished(name: impl Into<String>) -> Self {
        Self {
            well_known_name: Some(name.into()),
            ..Self::default()
        }
    }

    /// The distinguished name, when this handle was built from one.
    pub fn well_known_name(&self) -> Option<&str> {
        self.well_known_name.as_deref()
    }

    /// Records the distinguished name a bound folder was resolved from.
    pub fn set_well_known_name(&mut self, name: impl Into<String>) {
        self.well_known_name = Some(name.into());
    }

    /// The folder id, if bound.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The change key, if bound.
    pub fn change_key(&self) -> Option<&str> {
        self.change_key.as_deref()
    }

    /// True once the folder carries a server-assigned id.
    pub fn is_bound(&self) -> bool {
        self.id.is_some()
    }

    /// The folder id, or an error when the folder is unbound.
    pub fn require_id(&self) -> ModelResult<&str> {
        self.id.as_deref().ok_or(ModelError::NotBound)
    }

    /// The parent folder id, if the server sent one.
    pub fn parent_folder_id(&self) -> Option<&str> {
        self.parent_folder_id.as_deref()
    }

    /// The display name.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// The folder class marker (see [`crate::folder_class`]).
    pub fn folder_class(&self) -> Option<&str> {
        self.folder_class.as_deref()
    }

    /// Number of items the folder reports holding.
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Number of immediate child folders.
    pub fn child_folder_count(&self) -> u32 {
        self.child_folder_count
    }
}

fn parse_count(field: &Field) -> ModelResult<u32> {
    let text = field.value().unwrap_or_default();
    text.parse()
        .map_err(|_| ModelError::invalid_number(field.tag(), text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{distinguished_folder, folder_class};
    use ews_xml::{field_from_node, find_descendant, parse_document, TYPES_NS};

    const FOLDER_XML: &str = r#"
        <root xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
          <t:ContactsFolder>
            <t:FolderId Id="Zm9s" ChangeKey="Y2s="/>
            <t:ParentFolderId Id="cm9vdA=="/>
            <t:FolderClass>IPF.Contact</t:FolderClass>
            <t:DisplayName>Contacts</t:DisplayName>
            <t:TotalCount>287</t:TotalCount>
            <t:ChildFolderCount>2</t:ChildFolderCount>
          </t:ContactsFolder>
        </root>"#;

    fn parse_folder(xml: &str) -> ModelResult<Folder> {
        let doc = parse_document(xml).unwrap();
        let node = find_descendant(doc.root_element(), TYPES_NS, "ContactsFolder").unwrap();
        Folder::from_field(&field_from_node(node))
    }

    #[test]
    fn parses_identity_and_counts() {
        let folder = parse_folder(FOLDER_XML).unwrap();
        assert!(folder.is_bound());
        assert_eq!(folder.id(), Some("Zm9s"));
        assert_eq!(folder.change_key(), Some("Y2s="));
        assert_eq!(folder.parent_folder_id(), Some("cm9vdA=="));
        assert_eq!(folder.display_name(), Some("Contacts"));
        assert_eq!(folder.folder_class(), Some(folder_class::CONTACTS));
        assert_eq!(folder.total_count(), 287);
        assert_eq!(folder.child_folder_count(), 2);
    }

    #[test]
    fn malformed_count_is_an_error() {
        let xml = FOLDER_XML.replace("287", "many");
        assert!(matches!(
            parse_folder(&xml),
            Err(ModelError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn distinguished_handle_is_unbound() {
        let folder = Folder::distinguished(distinguished_folder::CONTACTS);
        assert!(!folder.is_bound());
        assert_eq!(folder.well_known_name(), Some("contacts"));
        assert!(matches!(folder.require_id(), Err(ModelError::NotBound)));
    }
}
