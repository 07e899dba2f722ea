//! Canned server responses, assembled from small string builders.
//!
//! Each builder produces one layer of the response envelope so tests
//! compose exactly the shape they need: message lists with mixed
//! outcomes, paged enumeration roots, sync change streams, or a bare
//! fault.

use ews_xml::{MESSAGES_NS, SOAP_NS, TYPES_NS};

/// Wraps a body in the response envelope.
pub fn envelope(body: &str) -> Vec<u8> {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <soap:Envelope xmlns:soap=\"{SOAP_NS}\" xmlns:m=\"{MESSAGES_NS}\" \
         xmlns:t=\"{TYPES_NS}\"><soap:Body>{body}</soap:Body></soap:Envelope>"
    )
    .into_bytes()
}

/// Wraps response messages in a verb's response element.
pub fn response(verb: &str, messages: &str) -> Vec<u8> {
    envelope(&format!(
        "<m:{verb}Response>\
         <m:ResponseMessages>{messages}</m:ResponseMessages>\
         </m:{verb}Response>"
    ))
}

/// A success message carrying a payload.
pub fn success_message(verb: &str, payload: &str) -> String {
    format!(
        "<m:{verb}ResponseMessage ResponseClass=\"Success\">\
         <m:ResponseCode>NoError</m:ResponseCode>{payload}\
         </m:{verb}ResponseMessage>"
    )
}

/// A warning message carrying a payload.
pub fn warning_message(verb: &str, code: &str, payload: &str) -> String {
    format!(
        "<m:{verb}ResponseMessage ResponseClass=\"Warning\">\
         <m:ResponseCode>{code}</m:ResponseCode>{payload}\
         </m:{verb}ResponseMessage>"
    )
}

/// An error message with a code and text.
pub fn error_message(verb: &str, code: &str, text: &str) -> String {
    format!(
        "<m:{verb}ResponseMessage ResponseClass=\"Error\">\
         <m:MessageText>{text}</m:MessageText>\
         <m:ResponseCode>{code}</m:ResponseCode>\
         </m:{verb}ResponseMessage>"
    )
}

/// An envelope-level fault.
pub fn fault(code: &str, text: &str) -> Vec<u8> {
    envelope(&format!(
        "<soap:Fault>\
         <faultcode>{code}</faultcode>\
         <faultstring>{text}</faultstring>\
         </soap:Fault>"
    ))
}

/// A minimal contact subtree with a given name and optional identity.
pub fn contact_payload(given_name: &str, identity: Option<(&str, &str)>) -> String {
    let item_id = match identity {
        Some((id, change_key)) => {
            format!("<t:ItemId Id=\"{id}\" ChangeKey=\"{change_key}\"/>")
        }
        None => String::new(),
    };
    format!(
        "<t:Contact>{item_id}\
         <t:GivenName>{given_name}</t:GivenName>\
         </t:Contact>"
    )
}

/// The items block of a get/create/update message.
pub fn items_block(contacts: &str) -> String {
    format!("<m:Items>{contacts}</m:Items>")
}

/// The paged root of a find-items message.
pub fn root_folder(includes_last: bool, total: u32, contacts: &str) -> String {
    format!(
        "<m:RootFolder IncludesLastItemInRange=\"{includes_last}\" \
         TotalItemsInView=\"{total}\">\
         <t:Items>{contacts}</t:Items>\
         </m:RootFolder>"
    )
}

/// A full single-message find-items response.
pub fn find_items_response(includes_last: bool, total: u32, contacts: &str) -> Vec<u8> {
    response(
        "FindItem",
        &success_message("FindItem", &root_folder(includes_last, total, contacts)),
    )
}

/// The folders block of a bind or find-folders message.
pub fn folders_block(folders: &str) -> String {
    format!("<m:Folders>{folders}</m:Folders>")
}

/// A contacts-folder subtree.
pub fn contacts_folder_payload(
    id: &str,
    change_key: &str,
    display_name: &str,
    total_count: u32,
) -> String {
    format!(
        "<t:ContactsFolder>\
         <t:FolderId Id=\"{id}\" ChangeKey=\"{change_key}\"/>\
         <t:FolderClass>IPF.Contact</t:FolderClass>\
         <t:DisplayName>{display_name}</t:DisplayName>\
         <t:TotalCount>{total_count}</t:TotalCount>\
         <t:ChildFolderCount>0</t:ChildFolderCount>\
         </t:ContactsFolder>"
    )
}

/// A full single-folder bind response.
pub fn bind_folder_response(
    id: &str,
    change_key: &str,
    display_name: &str,
    total_count: u32,
) -> Vec<u8> {
    response(
        "GetFolder",
        &success_message(
            "GetFolder",
            &folders_block(&contacts_folder_payload(
                id,
                change_key,
                display_name,
                total_count,
            )),
        ),
    )
}

/// A created-entity change in a sync stream.
pub fn create_change(contact: &str) -> String {
    format!("<t:Create>{contact}</t:Create>")
}

/// A modified-entity change in a sync stream.
pub fn update_change(contact: &str) -> String {
    format!("<t:Update>{contact}</t:Update>")
}

/// A deleted-entity change in a sync stream.
pub fn delete_change(item_id: &str) -> String {
    format!("<t:Delete><t:ItemId Id=\"{item_id}\" ChangeKey=\"x\"/></t:Delete>")
}

/// A full single-message sync response.
pub fn sync_response(cursor: &str, includes_last: bool, changes: &str) -> Vec<u8> {
    response(
        "SyncFolderItems",
        &success_message(
            "SyncFolderItems",
            &format!(
                "<m:SyncState>{cursor}</m:SyncState>\
                 <m:IncludesLastItemInRange>{includes_last}</m:IncludesLastItemInRange>\
                 <m:Changes>{changes}</m:Changes>"
            ),
        ),
    )
}

/// A delete response acknowledging every element.
pub fn delete_response(count: usize) -> Vec<u8> {
    let messages: String = (0..count)
        .map(|_| success_message("DeleteItem", ""))
        .collect();
    response("DeleteItem", &messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_compose_well_formed_documents() {
        let xml = String::from_utf8(find_items_response(
            true,
            1,
            &contact_payload("Ada", Some(("AQA=", "CQA="))),
        ))
        .unwrap();

        let doc = ews_xml::parse_document(&xml).unwrap();
        assert!(ews_xml::find_descendant(doc.root_element(), TYPES_NS, "Contact").is_some());
        assert!(
            ews_xml::find_descendant(doc.root_element(), MESSAGES_NS, "ResponseMessages")
                .is_some()
        );
    }

    #[test]
    fn fault_is_well_formed() {
        let xml = String::from_utf8(fault("a:ErrorSchemaValidation", "bad")).unwrap();
        let doc = ews_xml::parse_document(&xml).unwrap();
        assert!(ews_xml::find_descendant(doc.root_element(), SOAP_NS, "Fault").is_some());
    }
}
