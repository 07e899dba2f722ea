//! Request rendering: verb arguments into SOAP request bytes.
//!
//! Each remote verb has one template. The renderer receives a template
//! id plus named arguments and produces the full envelope; callers
//! never splice wire bytes themselves beyond small literal fragments
//! such as a single folder-id element.

use crate::cursor::SyncCursor;
use crate::error::{ProtocolError, ProtocolResult};
use ews_xml::{Field, MESSAGES_NS, SOAP_NS, TYPES_NS};
use quick_xml::escape::escape;
use std::fmt;

/// The schema version advertised in every request header.
const SERVER_VERSION: &str = "Exchange2010_SP2";

/// Identifies a request template, one per remote verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateId {
    /// Bind a folder by id or distinguished name.
    GetFolder,
    /// Enumerate child folders.
    FindFolder,
    /// Enumerate items in a folder, one page.
    FindItem,
    /// Fetch full items by id.
    GetItem,
    /// Create new items under a folder.
    CreateItem,
    /// Apply update diffs to bound items.
    UpdateItem,
    /// Delete items by id.
    DeleteItem,
    /// One incremental-sync round trip.
    SyncFolderItems,
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TemplateId::GetFolder => "GetFolder",
            TemplateId::FindFolder => "FindFolder",
            TemplateId::FindItem => "FindItem",
            TemplateId::GetItem => "GetItem",
            TemplateId::CreateItem => "CreateItem",
            TemplateId::UpdateItem => "UpdateItem",
            TemplateId::DeleteItem => "DeleteItem",
            TemplateId::SyncFolderItems => "SyncFolderItems",
        };
        f.write_str(name)
    }
}

/// Addresses a folder in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderRef {
    /// A well-known folder addressed by distinguished name.
    Distinguished(String),
    /// A bound folder addressed by server-assigned id.
    Id {
        /// The folder id.
        id: String,
        /// The change key, when the caller holds one.
        change_key: Option<String>,
    },
}

impl FolderRef {
    /// Addresses a distinguished folder by name.
    pub fn distinguished(name: impl Into<String>) -> Self {
        Self::Distinguished(name.into())
    }

    /// Addresses a bound folder by id.
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id {
            id: id.into(),
            change_key: None,
        }
    }

    fn render(&self) -> ProtocolResult<String> {
        let field = match self {
            Self::Distinguished(name) => {
                let mut f = Field::new("DistinguishedFolderId");
                f.add_attribute("Id", Some(name.as_str()));
                f
            }
            Self::Id { id, change_key } => {
                let mut f = Field::new("FolderId");
                f.add_attribute("Id", Some(id.as_str()));
                f.add_attribute("ChangeKey", change_key.as_deref());
                f
            }
        };
        Ok(field.serialize_for_get()?)
    }
}

/// Addresses an item in a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    /// The item id.
    pub id: String,
    /// The change key, when the verb requires one (update, delete).
    pub change_key: Option<String>,
}

impl ItemRef {
    /// Creates an item reference.
    pub fn new(id: impl Into<String>, change_key: Option<String>) -> Self {
        Self {
            id: id.into(),
            change_key,
        }
    }

    fn render(&self) -> ProtocolResult<String> {
        let mut field = Field::new("ItemId");
        field.add_attribute("Id", Some(self.id.as_str()));
        field.add_attribute("ChangeKey", self.change_key.as_deref());
        Ok(field.serialize_for_get()?)
    }
}

/// Folder-enumeration traversal depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Traversal {
    /// Immediate children only.
    #[default]
    Shallow,
    /// The full subtree.
    Deep,
}

impl Traversal {
    fn as_wire(self) -> &'static str {
        match self {
            Traversal::Shallow => "Shallow",
            Traversal::Deep => "Deep",
        }
    }
}

/// How a delete request disposes of the items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteType {
    /// Remove permanently.
    HardDelete,
    /// Move to the dumpster.
    SoftDelete,
    /// Move to the deleted-items folder.
    #[default]
    MoveToDeletedItems,
}

impl DeleteType {
    fn as_wire(self) -> &'static str {
        match self {
            DeleteType::HardDelete => "HardDelete",
            DeleteType::SoftDelete => "SoftDelete",
            DeleteType::MoveToDeletedItems => "MoveToDeletedItems",
        }
    }
}

/// One item's update instruction: identity plus the fields to set.
#[derive(Debug, Clone)]
pub struct ItemUpdate {
    /// The bound item id.
    pub item_id: String,
    /// The current change key; a stale key is rejected server-side.
    pub change_key: String,
    /// Fields with pending values, in declaration order.
    pub sets: Vec<Field>,
}

/// A fully-specified request, one variant per remote verb.
#[derive(Debug, Clone)]
pub enum Request {
    /// Bind a folder.
    BindFolder {
        /// The folder to bind.
        folder: FolderRef,
    },
    /// Enumerate child folders.
    FindFolders {
        /// The parent to enumerate under.
        parent: FolderRef,
        /// Traversal depth.
        traversal: Traversal,
    },
    /// Enumerate one page of items.
    FindItems {
        /// The folder to enumerate.
        folder: FolderRef,
        /// Zero-based offset of the page.
        offset: u32,
        /// Maximum entries in the page.
        batch_size: u32,
        /// When set, restrict to items modified strictly after this
        /// timestamp.
        since: Option<String>,
    },
    /// Fetch full items by id.
    GetItems {
        /// The items to fetch.
        item_ids: Vec<ItemRef>,
    },
    /// Create items under a folder.
    CreateItems {
        /// The destination folder.
        folder: FolderRef,
        /// Rendered entity trees, in submission order.
        items: Vec<Field>,
    },
    /// Apply update diffs to bound items.
    UpdateItems {
        /// Per-item instructions, in submission order.
        updates: Vec<ItemUpdate>,
    },
    /// Delete items by id.
    DeleteItems {
        /// The items to delete.
        item_ids: Vec<ItemRef>,
        /// Disposal mode.
        delete_type: DeleteType,
    },
    /// One incremental-sync round trip.
    SyncFolderItems {
        /// The folder to sync.
        folder: FolderRef,
        /// The cursor from the previous page, or `None` for a full
        /// baseline.
        cursor: Option<SyncCursor>,
        /// Maximum changes returned in this page.
        batch_size: u32,
    },
}

impl Request {
    /// The template this request renders through.
    pub fn template(&self) -> TemplateId {
        match self {
            Request::BindFolder { .. } => TemplateId::GetFolder,
            Request::FindFolders { .. } => TemplateId::FindFolder,
            Request::FindItems { .. } => TemplateId::FindItem,
            Request::GetItems { .. } => TemplateId::GetItem,
            Request::CreateItems { .. } => TemplateId::CreateItem,
            Request::UpdateItems { .. } => TemplateId::UpdateItem,
            Request::DeleteItems { .. } => TemplateId::DeleteItem,
            Request::SyncFolderItems { .. } => TemplateId::SyncFolderItems,
        }
    }

    /// Renders the request into full envelope bytes.
    pub fn render(&self) -> ProtocolResult<Vec<u8>> {
        let body = match self {
            Request::BindFolder { folder } => format!(
                "<m:GetFolder>\
                 <m:FolderShape><t:BaseShape>AllProperties</t:BaseShape></m:FolderShape>\
                 <m:FolderIds>{}</m:FolderIds>\
                 </m:GetFolder>",
                folder.render()?
            ),
            Request::FindFolders { parent, traversal } => format!(
                "<m:FindFolder Traversal=\"{}\">\
                 <m:FolderShape><t:BaseShape>AllProperties</t:BaseShape></m:FolderShape>\
                 <m:ParentFolderIds>{}</m:ParentFolderIds>\
                 </m:FindFolder>",
                traversal.as_wire(),
                parent.render()?
            ),
            Request::FindItems {
                folder,
                offset,
                batch_size,
                since,
            } => {
                let restriction = match since {
                    Some(watermark) => format!(
                        "<m:Restriction><t:IsGreaterThan>\
                         <t:FieldURI FieldURI=\"item:LastModifiedTime\"/>\
                         <t:FieldURIOrConstant><t:Constant Value=\"{}\"/></t:FieldURIOrConstant>\
                         </t:IsGreaterThan></m:Restriction>",
                        escape(watermark.as_str())
                    ),
                    None => String::new(),
                };
                format!(
                    "<m:FindItem Traversal=\"Shallow\">\
                     <m:ItemShape><t:BaseShape>AllProperties</t:BaseShape></m:ItemShape>\
                     <m:IndexedPageItemView MaxEntriesReturned=\"{batch_size}\" \
                      Offset=\"{offset}\" BasePoint=\"Beginning\"/>\
                     {restriction}\
                     <m:ParentFolderIds>{}</m:ParentFolderIds>\
                     </m:FindItem>",
                    folder.render()?
                )
            }
            Request::GetItems { item_ids } => format!(
                "<m:GetItem>\
                 <m:ItemShape><t:BaseShape>AllProperties</t:BaseShape></m:ItemShape>\
                 <m:ItemIds>{}</m:ItemIds>\
                 </m:GetItem>",
                render_item_refs(item_ids)?
            ),
            Request::CreateItems { folder, items } => {
                let mut rendered = String::new();
                for item in items {
                    rendered.push_str(&item.serialize()?);
                }
                format!(
                    "<m:CreateItem>\
                     <m:SavedItemFolderId>{}</m:SavedItemFolderId>\
                     <m:Items>{rendered}</m:Items>\
                     </m:CreateItem>",
                    folder.render()?
                )
            }
            Request::UpdateItems { updates } => {
                let mut changes = String::new();
                for update in updates {
                    changes.push_str(&render_item_change(update)?);
                }
                format!(
                    "<m:UpdateItem ConflictResolution=\"AutoResolve\">\
                     <m:ItemChanges>{changes}</m:ItemChanges>\
                     </m:UpdateItem>"
                )
            }
            Request::DeleteItems {
                item_ids,
                delete_type,
            } => format!(
                "<m:DeleteItem DeleteType=\"{}\">\
                 <m:ItemIds>{}</m:ItemIds>\
                 </m:DeleteItem>",
                delete_type.as_wire(),
                render_item_refs(item_ids)?
            ),
            Request::SyncFolderItems {
                folder,
                cursor,
                batch_size,
            } => {
                let state = match cursor {
                    Some(cursor) => {
                        format!("<m:SyncState>{}</m:SyncState>", escape(cursor.as_str()))
                    }
                    None => String::new(),
                };
                format!(
                    "<m:SyncFolderItems>\
                     <m:ItemShape><t:BaseShape>AllProperties</t:BaseShape></m:ItemShape>\
                     <m:SyncFolderId>{}</m:SyncFolderId>\
                     {state}\
                     <m:MaxChangesReturned>{batch_size}</m:MaxChangesReturned>\
                     </m:SyncFolderItems>",
                    folder.render()?
                )
            }
        };
        Ok(envelope(&body))
    }
}

fn envelope(body: &str) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soap:Envelope xmlns:soap=\"{SOAP_NS}\" xmlns:m=\"{MESSAGES_NS}\" xmlns:t=\"{TYPES_NS}\">\
         <soap:Header><t:RequestServerVersion Version=\"{SERVER_VERSION}\"/></soap:Header>\
         <soap:Body>{body}</soap:Body>\
         </soap:Envelope>"
    )
    .into_bytes()
}

fn render_item_refs(item_ids: &[ItemRef]) -> ProtocolResult<String> {
    let mut out = String::new();
    for item_ref in item_ids {
        out.push_str(&item_ref.render()?);
    }
    Ok(out)
}

/// Maps a declared scalar tag to its wire field locator.
fn field_uri_for(tag: &str) -> ProtocolResult<&'static str> {
    let uri = match tag {
        "FileAs" => "contacts:FileAs",
        "DisplayName" => "contacts:DisplayName",
        "GivenName" => "contacts:GivenName",
        "Initials" => "contacts:Initials",
        "MiddleName" => "contacts:MiddleName",
        "Nickname" => "contacts:Nickname",
        "CompanyName" => "contacts:CompanyName",
        "AssistantName" => "contacts:AssistantName",
        "Birthday" => "contacts:Birthday",
        "Department" => "contacts:Department",
        "JobTitle" => "contacts:JobTitle",
        "Manager" => "contacts:Manager",
        "SpouseName" => "contacts:SpouseName",
        "Surname" => "contacts:Surname",
        "WeddingAnniversary" => "contacts:WeddingAnniversary",
        "Alias" => "contacts:Alias",
        "Body" => "item:Body",
        "ItemClass" => "item:ItemClass",
        other => {
            return Err(ProtocolError::UnsupportedField {
                tag: other.to_string(),
            })
        }
    };
    Ok(uri)
}

/// Indexed collections set one entry at a time, keyed by slot.
fn indexed_uri_for(tag: &str) -> Option<&'static str> {
    match tag {
        "EmailAddresses" => Some("contacts:EmailAddress"),
        "PhoneNumbers" => Some("contacts:PhoneNumber"),
        _ => None,
    }
}

fn render_item_change(update: &ItemUpdate) -> ProtocolResult<String> {
    let item_ref = ItemRef::new(update.item_id.clone(), Some(update.change_key.clone()));
    let mut sets = String::new();
    for field in &update.sets {
        sets.push_str(&render_set_field(field)?);
    }
    Ok(format!(
        "<t:ItemChange>{}<t:Updates>{sets}</t:Updates></t:ItemChange>",
        item_ref.render()?
    ))
}

fn render_set_field(field: &Field) -> ProtocolResult<String> {
    if field.tag() == "ExtendedProperty" {
        let locator = field
            .child("ExtendedFieldURI")
            .ok_or(ProtocolError::UnexpectedResponse("ExtendedFieldURI"))?;
        return Ok(format!(
            "<t:SetItemField>{}<t:Contact>{}</t:Contact></t:SetItemField>",
            locator.serialize_for_get()?,
            field.serialize()?
        ));
    }

    if let Some(uri) = indexed_uri_for(field.tag()) {
        // One SetItemField per slot, each re-wrapped in the collection.
        let mut out = String::new();
        for entry in field.children() {
            let key = entry
                .attribute("Key")
                .ok_or(ProtocolError::UnexpectedResponse("Key attribute"))?;
            let mut wrapper = Field::new(field.tag());
            wrapper.push_child(entry.clone());
            out.push_str(&format!(
                "<t:SetItemField>\
                 <t:IndexedFieldURI FieldURI=\"{uri}\" FieldIndex=\"{}\"/>\
                 <t:Contact>{}</t:Contact>\
                 </t:SetItemField>",
                escape(key),
                wrapper.serialize()?
            ));
        }
        return Ok(out);
    }

    let uri = field_uri_for(field.tag())?;
    Ok(format!(
        "<t:SetItemField>\
         <t:FieldURI FieldURI=\"{uri}\"/>\
         <t:Contact>{}</t:Contact>\
         </t:SetItemField>",
        field.serialize()?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_string(request: &Request) -> String {
        String::from_utf8(request.render().unwrap()).unwrap()
    }

    #[test]
    fn bind_folder_by_distinguished_name() {
        let request = Request::BindFolder {
            folder: FolderRef::distinguished("contacts"),
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("<m:GetFolder>"));
        assert!(xml.contains("<t:DistinguishedFolderId Id=\"contacts\"/>"));
        assert!(xml.contains(SERVER_VERSION));
    }

    #[test]
    fn find_items_carries_paging_window() {
        let request = Request::FindItems {
            folder: FolderRef::id("Zm9s"),
            offset: 200,
            batch_size: 100,
            since: None,
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("MaxEntriesReturned=\"100\""));
        assert!(xml.contains("Offset=\"200\""));
        assert!(xml.contains("<t:FolderId Id=\"Zm9s\"/>"));
        assert!(!xml.contains("Restriction"));
    }

    #[test]
    fn find_items_since_adds_restriction() {
        let request = Request::FindItems {
            folder: FolderRef::distinguished("contacts"),
            offset: 0,
            batch_size: 50,
            since: Some("2014-03-05T11:28:41Z".into()),
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("item:LastModifiedTime"));
        assert!(xml.contains("Value=\"2014-03-05T11:28:41Z\""));
    }

    #[test]
    fn create_items_renders_entities_in_order() {
        let request = Request::CreateItems {
            folder: FolderRef::distinguished("contacts"),
            items: vec![
                Field::with_value("Contact", "a"),
                Field::with_value("Contact", "b"),
            ],
        };
        let xml = render_to_string(&request);
        let first = xml.find("<t:Contact>a").unwrap();
        let second = xml.find("<t:Contact>b").unwrap();
        assert!(first < second);
    }

    #[test]
    fn update_renders_set_item_fields() {
        let request = Request::UpdateItems {
            updates: vec![ItemUpdate {
                item_id: "AQA=".into(),
                change_key: "CQA=".into(),
                sets: vec![Field::with_value("GivenName", "Ada")],
            }],
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("<t:ItemId Id=\"AQA=\" ChangeKey=\"CQA=\"/>"));
        assert!(xml.contains("FieldURI=\"contacts:GivenName\""));
        assert!(xml.contains("<t:GivenName>Ada</t:GivenName>"));
    }

    #[test]
    fn update_renders_indexed_collection_entries() {
        let mut emails = Field::new("EmailAddresses");
        let mut entry = Field::with_value("Entry", "ada@analytical.example");
        entry.add_attribute("Key", Some("EmailAddress1"));
        emails.push_child(entry);

        let request = Request::UpdateItems {
            updates: vec![ItemUpdate {
                item_id: "AQA=".into(),
                change_key: "CQA=".into(),
                sets: vec![emails],
            }],
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("FieldURI=\"contacts:EmailAddress\""));
        assert!(xml.contains("FieldIndex=\"EmailAddress1\""));
    }

    #[test]
    fn update_rejects_unmapped_tag() {
        let request = Request::UpdateItems {
            updates: vec![ItemUpdate {
                item_id: "AQA=".into(),
                change_key: "CQA=".into(),
                sets: vec![Field::with_value("NoSuchTag", "x")],
            }],
        };
        assert!(matches!(
            request.render(),
            Err(ProtocolError::UnsupportedField { .. })
        ));
    }

    #[test]
    fn sync_without_cursor_omits_state() {
        let request = Request::SyncFolderItems {
            folder: FolderRef::distinguished("contacts"),
            cursor: None,
            batch_size: 100,
        };
        let xml = render_to_string(&request);
        assert!(!xml.contains("SyncState"));
        assert!(xml.contains("<m:MaxChangesReturned>100</m:MaxChangesReturned>"));
    }

    #[test]
    fn sync_with_cursor_echoes_token() {
        let request = Request::SyncFolderItems {
            folder: FolderRef::distinguished("contacts"),
            cursor: Some(SyncCursor::new("H4sIAAA=")),
            batch_size: 100,
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("<m:SyncState>H4sIAAA=</m:SyncState>"));
    }

    #[test]
    fn delete_carries_disposal_mode() {
        let request = Request::DeleteItems {
            item_ids: vec![ItemRef::new("AQA=", Some("CQA=".into()))],
            delete_type: DeleteType::HardDelete,
        };
        let xml = render_to_string(&request);
        assert!(xml.contains("DeleteType=\"HardDelete\""));
    }

    #[test]
    fn template_ids_follow_verbs() {
        let request = Request::BindFolder {
            folder: FolderRef::distinguished("contacts"),
        };
        assert_eq!(request.template(), TemplateId::GetFolder);
        assert_eq!(request.template().to_string(), "GetFolder");
    }
}
