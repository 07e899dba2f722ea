//! Response parsing: fault checks, per-element outcome classification,
//! and the typed readers for each verb's payload.

use crate::cursor::SyncCursor;
use crate::error::{ErrorElement, ProtocolError, ProtocolResult};
use ews_model::{Contact, Folder};
use ews_props::TypeRegistry;
use ews_xml::{
    descendant_text, field_from_node, find_descendant, parse_document, XmlError, ERRORS_NS,
    MESSAGES_NS, SOAP_NS, TYPES_NS,
};
use roxmltree::{Document, Node};
use tracing::{debug, warn};

/// Parses response bytes into a document, checking encoding.
pub fn parse_response(bytes: &[u8]) -> ProtocolResult<String> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::Xml(XmlError::InvalidUtf8))
}

/// Checks for an envelope-level fault.
///
/// A fault is fatal: it means the server rejected the whole request,
/// so no per-element parsing is attempted after one is found.
pub fn check_fault(doc: &Document<'_>) -> ProtocolResult<()> {
    let Some(fault) = find_descendant(doc.root_element(), SOAP_NS, "Fault") else {
        return Ok(());
    };

    let code = descendant_text(fault, ERRORS_NS, "ResponseCode")
        .or_else(|| {
            fault
                .descendants()
                .find(|n| n.has_tag_name("faultcode"))
                .and_then(|n| n.text())
                .map(str::to_string)
        })
        .unwrap_or_default();
    let text = fault
        .descendants()
        .find(|n| n.has_tag_name("faultstring"))
        .and_then(|n| n.text())
        .map(str::to_string)
        .unwrap_or_default();

    Err(ProtocolError::fault(code, text))
}

/// The classified elements of one batch response.
///
/// Successes keep their batch position so callers can map them back to
/// the submitted entities by index. Warning elements occupy a position
/// but carry no payload worth reading; they are tracked by index only.
/// Scoped to a single round trip and dropped with the parsed document.
#[derive(Debug)]
pub struct ElementOutcomes<'a, 'input> {
    /// Successful messages, as (batch index, message node).
    pub successes: Vec<(usize, Node<'a, 'input>)>,
    /// Batch indexes of warning messages, already logged.
    pub warnings: Vec<usize>,
    /// Failed messages, in response order.
    pub errors: Vec<ErrorElement>,
}

impl ElementOutcomes<'_, '_> {
    /// Converts accumulated element failures into a batch-level error.
    ///
    /// `None` when every element succeeded. Callers consume the
    /// successes first, then raise this, so partial results (fed-back
    /// identities, parsed entities) survive up to the point of failure.
    pub fn into_error(self) -> Option<ProtocolError> {
        if self.errors.is_empty() {
            return None;
        }
        Some(ProtocolError::ElementErrors {
            successes: self.successes.len(),
            errors: self.errors,
        })
    }
}

/// Walks the response-message list, classifying each element.
///
/// Warnings are logged and otherwise ignored: they hold their batch
/// index (so positional correspondence survives) but are never handed
/// to a payload reader and never count as failures. Errors are
/// accumulated without aborting the walk, so a bad element never hides
/// its siblings.
pub fn classify_response_messages<'a, 'input>(
    doc: &'a Document<'input>,
) -> ProtocolResult<ElementOutcomes<'a, 'input>> {
    let messages = find_descendant(doc.root_element(), MESSAGES_NS, "ResponseMessages")
        .ok_or(ProtocolError::UnexpectedResponse("ResponseMessages"))?;

    let mut successes = Vec::new();
    let mut warnings = Vec::new();
    let mut errors = Vec::new();

    for (index, message) in messages.children().filter(Node::is_element).enumerate() {
        let code = descendant_text(message, MESSAGES_NS, "ResponseCode").unwrap_or_default();
        let text = descendant_text(message, MESSAGES_NS, "MessageText").unwrap_or_default();

        match message.attribute("ResponseClass") {
            Some("Success") => successes.push((index, message)),
            Some("Warning") => {
                warn!(index, %code, %text, "response element warning");
                warnings.push(index);
            }
            _ => errors.push(ErrorElement { index, code, text }),
        }
    }

    Ok(ElementOutcomes {
        successes,
        warnings,
        errors,
    })
}

/// The identity a create or update response assigns to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemIdentity {
    /// Server-assigned item id.
    pub item_id: String,
    /// Fresh change key.
    pub change_key: String,
}

/// One page of a bounded item enumeration.
#[derive(Debug, Default)]
pub struct ItemsPage {
    /// Contacts in server response order.
    pub contacts: Vec<Contact>,
    /// True when the server declares this the last page in range.
    pub includes_last: bool,
    /// The server's view of the total result size, when sent.
    pub total_count: Option<u32>,
}

/// One page of an incremental sync.
#[derive(Debug)]
pub struct SyncDelta {
    /// Entities created since the submitted cursor.
    pub created: Vec<Contact>,
    /// Entities modified since the submitted cursor.
    pub modified: Vec<Contact>,
    /// Item ids deleted since the submitted cursor.
    pub deleted: Vec<String>,
    /// The cursor to submit next.
    pub cursor: SyncCursor,
    /// True when the change stream is drained at this cursor.
    pub includes_last: bool,
}

/// Reads the folders of a bind-folder or find-folders message.
pub fn read_folders(message: Node<'_, '_>) -> ProtocolResult<Vec<Folder>> {
    let container = find_descendant(message, MESSAGES_NS, "Folders")
        .or_else(|| find_descendant(message, TYPES_NS, "Folders"))
        .ok_or(ProtocolError::UnexpectedResponse("Folders"))?;

    let mut folders = Vec::new();
    for node in container.children().filter(Node::is_element) {
        folders.push(Folder::from_field(&field_from_node(node))?);
    }
    Ok(folders)
}

/// Reads the single folder of a bind-folder message.
pub fn read_folder(message: Node<'_, '_>) -> ProtocolResult<Folder> {
    read_folders(message)?
        .into_iter()
        .next()
        .ok_or(ProtocolError::UnexpectedResponse("Folders"))
}

/// Reads the contacts of a get/create/update-items message.
pub fn read_contacts(
    message: Node<'_, '_>,
    registry: &TypeRegistry,
) -> ProtocolResult<Vec<Contact>> {
    let container = find_descendant(message, MESSAGES_NS, "Items")
        .or_else(|| find_descendant(message, TYPES_NS, "Items"))
        .ok_or(ProtocolError::UnexpectedResponse("Items"))?;

    let mut contacts = Vec::new();
    for node in container.children().filter(Node::is_element) {
        if node.tag_name().name() != "Contact" {
            debug!(tag = node.tag_name().name(), "skipping non-contact item");
            continue;
        }
        contacts.push(Contact::from_field(&field_from_node(node), registry)?);
    }
    Ok(contacts)
}

/// Reads one find-items page: contacts plus the paging flags.
pub fn read_items_page(
    message: Node<'_, '_>,
    registry: &TypeRegistry,
) -> ProtocolResult<ItemsPage> {
    let root = find_descendant(message, MESSAGES_NS, "RootFolder")
        .ok_or(ProtocolError::UnexpectedResponse("RootFolder"))?;

    let includes_last = root.attribute("IncludesLastItemInRange") == Some("true");
    let total_count = match root.attribute("TotalItemsInView") {
        Some(text) => match text.parse() {
            Ok(count) => Some(count),
            Err(_) => {
                warn!(text, "unparseable total item count, dropping bound");
                None
            }
        },
        None => None,
    };

    Ok(ItemsPage {
        contacts: read_contacts(message, registry)?,
        includes_last,
        total_count,
    })
}

/// Reads the identity a create/update message assigned to its item.
pub fn read_identity(message: Node<'_, '_>) -> ProtocolResult<ItemIdentity> {
    let item_id = find_descendant(message, TYPES_NS, "ItemId")
        .ok_or(ProtocolError::UnexpectedResponse("ItemId"))?;
    let id = item_id
        .attribute("Id")
        .ok_or_else(|| XmlError::missing_attribute("ItemId", "Id"))?;
    let change_key = item_id
        .attribute("ChangeKey")
        .ok_or_else(|| XmlError::missing_attribute("ItemId", "ChangeKey"))?;
    Ok(ItemIdentity {
        item_id: id.to_string(),
        change_key: change_key.to_string(),
    })
}

/// Reads one sync page: the three change partitions plus the new cursor.
pub fn read_sync_delta(
    message: Node<'_, '_>,
    registry: &TypeRegistry,
) -> ProtocolResult<SyncDelta> {
    let cursor = descendant_text(message, MESSAGES_NS, "SyncState")
        .ok_or(ProtocolError::UnexpectedResponse("SyncState"))?;
    let includes_last = descendant_text(message, MESSAGES_NS, "IncludesLastItemInRange")
        .as_deref()
        == Some("true");

    let mut created = Vec::new();
    let mut modified = Vec::new();
    let mut deleted = Vec::new();

    if let Some(changes) = find_descendant(message, MESSAGES_NS, "Changes") {
        for change in changes.children().filter(Node::is_element) {
            match change.tag_name().name() {
                "Create" => {
                    if let Some(contact) = change_contact(change, registry)? {
                        created.push(contact);
                    }
                }
                "Update" => {
                    if let Some(contact) = change_contact(change, registry)? {
                        modified.push(contact);
                    }
                }
                "Delete" => {
                    if let Some(id) = find_descendant(change, TYPES_NS, "ItemId")
                        .and_then(|n| n.attribute("Id"))
                    {
                        deleted.push(id.to_string());
                    }
                }
                other => debug!(tag = other, "skipping unrecognized change kind"),
            }
        }
    }

    Ok(SyncDelta {
        created,
        modified,
        deleted,
        cursor: SyncCursor::new(cursor),
        includes_last,
    })
}

fn change_contact(
    change: Node<'_, '_>,
    registry: &TypeRegistry,
) -> ProtocolResult<Option<Contact>> {
    let Some(node) = find_descendant(change, TYPES_NS, "Contact") else {
        debug!("change carries no contact payload");
        return Ok(None);
    };
    Ok(Some(Contact::from_field(&field_from_node(node), registry)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(messages: &str) -> String {
        format!(
            "<soap:Envelope xmlns:soap=\"{SOAP_NS}\" xmlns:m=\"{MESSAGES_NS}\" \
             xmlns:t=\"{TYPES_NS}\"><soap:Body><m:Response>\
             <m:ResponseMessages>{messages}</m:ResponseMessages>\
             </m:Response></soap:Body></soap:Envelope>"
        )
    }

    #[test]
    fn fault_aborts_with_code_and_text() {
        let xml = format!(
            "<soap:Envelope xmlns:soap=\"{SOAP_NS}\"><soap:Body><soap:Fault>\
             <faultcode>a:ErrorSchemaValidation</faultcode>\
             <faultstring>The request failed schema validation.</faultstring>\
             </soap:Fault></soap:Body></soap:Envelope>"
        );
        let doc = parse_document(&xml).unwrap();
        let err = check_fault(&doc).unwrap_err();
        match err {
            ProtocolError::MessageFault { code, text } => {
                assert_eq!(code, "a:ErrorSchemaValidation");
                assert!(text.contains("schema validation"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn clean_document_has_no_fault() {
        let xml = envelope("");
        let doc = parse_document(&xml).unwrap();
        assert!(check_fault(&doc).is_ok());
    }

    #[test]
    fn classification_collects_errors_without_stopping() {
        let xml = envelope(
            "<m:CreateItemResponseMessage ResponseClass=\"Success\"/>\
             <m:CreateItemResponseMessage ResponseClass=\"Error\">\
             <m:ResponseCode>ErrorInvalidChangeKey</m:ResponseCode>\
             <m:MessageText>stale</m:MessageText>\
             </m:CreateItemResponseMessage>\
             <m:CreateItemResponseMessage ResponseClass=\"Success\"/>",
        );
        let doc = parse_document(&xml).unwrap();
        let outcomes = classify_response_messages(&doc).unwrap();

        assert_eq!(outcomes.successes.len(), 2);
        assert_eq!(outcomes.successes[0].0, 0);
        assert_eq!(outcomes.successes[1].0, 2);
        assert_eq!(outcomes.errors.len(), 1);
        assert_eq!(outcomes.errors[0].index, 1);
        assert_eq!(outcomes.errors[0].code, "ErrorInvalidChangeKey");

        let err = outcomes.into_error().unwrap();
        assert!(matches!(
            err,
            ProtocolError::ElementErrors { successes: 2, .. }
        ));
    }

    #[test]
    fn warnings_are_logged_and_ignored() {
        let xml = envelope(
            "<m:FindItemResponseMessage ResponseClass=\"Warning\">\
             <m:ResponseCode>ErrorServerBusy</m:ResponseCode>\
             </m:FindItemResponseMessage>\
             <m:FindItemResponseMessage ResponseClass=\"Success\"/>",
        );
        let doc = parse_document(&xml).unwrap();
        let outcomes = classify_response_messages(&doc).unwrap();

        // The warning keeps its batch position but is never read.
        assert_eq!(outcomes.warnings, vec![0]);
        assert_eq!(outcomes.successes.len(), 1);
        assert_eq!(outcomes.successes[0].0, 1);
        assert!(outcomes.into_error().is_none());
    }

    #[test]
    fn items_page_reads_flags_and_contacts() {
        let xml = envelope(
            "<m:FindItemResponseMessage ResponseClass=\"Success\">\
             <m:RootFolder IncludesLastItemInRange=\"false\" TotalItemsInView=\"250\">\
             <t:Items><t:Contact><t:GivenName>Ada</t:GivenName></t:Contact></t:Items>\
             </m:RootFolder></m:FindItemResponseMessage>",
        );
        let doc = parse_document(&xml).unwrap();
        let outcomes = classify_response_messages(&doc).unwrap();
        let page = read_items_page(outcomes.successes[0].1, &TypeRegistry::mapi()).unwrap();

        assert!(!page.includes_last);
        assert_eq!(page.total_count, Some(250));
        assert_eq!(page.contacts.len(), 1);
        assert_eq!(page.contacts[0].given_name().value(), Some("Ada"));
    }

    #[test]
    fn identity_reads_both_halves() {
        let xml = envelope(
            "<m:CreateItemResponseMessage ResponseClass=\"Success\">\
             <m:Items><t:Contact><t:ItemId Id=\"AQA=\" ChangeKey=\"CQA=\"/></t:Contact></m:Items>\
             </m:CreateItemResponseMessage>",
        );
        let doc = parse_document(&xml).unwrap();
        let outcomes = classify_response_messages(&doc).unwrap();
        let identity = read_identity(outcomes.successes[0].1).unwrap();
        assert_eq!(identity.item_id, "AQA=");
        assert_eq!(identity.change_key, "CQA=");
    }

    #[test]
    fn sync_delta_partitions_changes() {
        let xml = envelope(
            "<m:SyncFolderItemsResponseMessage ResponseClass=\"Success\">\
             <m:SyncState>H4sIAAA=</m:SyncState>\
             <m:IncludesLastItemInRange>true</m:IncludesLastItemInRange>\
             <m:Changes>\
             <t:Create><t:Contact><t:GivenName>Ada</t:GivenName></t:Contact></t:Create>\
             <t:Update><t:Contact><t:GivenName>Grace</t:GivenName></t:Contact></t:Update>\
             <t:Delete><t:ItemId Id=\"gone=\" ChangeKey=\"x\"/></t:Delete>\
             </m:Changes></m:SyncFolderItemsResponseMessage>",
        );
        let doc = parse_document(&xml).unwrap();
        let outcomes = classify_response_messages(&doc).unwrap();
        let delta = read_sync_delta(outcomes.successes[0].1, &TypeRegistry::mapi()).unwrap();

        assert_eq!(delta.created.len(), 1);
        assert_eq!(delta.modified.len(), 1);
        assert_eq!(delta.deleted, vec!["gone=".to_string()]);
        assert_eq!(delta.cursor.as_str(), "H4sIAAA=");
        assert!(delta.includes_last);
    }

    #[test]
    fn folders_read_from_bind_response() {
        let xml = envelope(
            "<m:GetFolderResponseMessage ResponseClass=\"Success\">\
             <m:Folders><t:ContactsFolder>\
             <t:FolderId Id=\"Zm9s\" ChangeKey=\"Y2s=\"/>\
             <t:DisplayName>Contacts</t:DisplayName>\
             <t:TotalCount>12</t:TotalCount>\
             </t:ContactsFolder></m:Folders>\
             </m:GetFolderResponseMessage>",
        );
        let doc = parse_document(&xml).unwrap();
        let outcomes = classify_response_messages(&doc).unwrap();
        let folder = read_folder(outcomes.successes[0].1).unwrap();
        assert_eq!(folder.id(), Some("Zm9s"));
        assert_eq!(folder.total_count(), 12);
    }
}
