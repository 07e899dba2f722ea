//! The contact entity.

use crate::data::Gender;
use crate::error::ModelResult;
use crate::item::Item;
use crate::update::UpdateDiff;
use ews_props::{parse_numeric_text, ExtendedProperty, TypeRegistry, PR_GENDER};
use ews_xml::Field;
use tracing::debug;

/// The server-derived complete-name block.
///
/// Read-only: populated from responses, never written back.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompleteName {
    /// Honorific title.
    pub title: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Middle name.
    pub middle_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Generational suffix.
    pub suffix: Option<String>,
    /// Initials.
    pub initials: Option<String>,
    /// Full display form.
    pub full_name: Option<String>,
    /// Nickname.
    pub nickname: Option<String>,
}

impl CompleteName {
    fn from_field(field: &Field) -> Self {
        let text = |tag: &str| field.child(tag).and_then(|c| c.value()).map(str::to_string);
        Self {
            title: text("Title"),
            first_name: text("FirstName"),
            middle_name: text("MiddleName"),
            last_name: text("LastName"),
            suffix: text("Suffix"),
            initials: text("Initials"),
            full_name: text("FullName"),
            nickname: text("Nickname"),
        }
    }
}

/// One entry of the email-address collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailEntry {
    /// Slot key (`EmailAddress1`..`EmailAddress3`).
    pub key: Option<String>,
    /// Routing type, usually `SMTP`.
    pub routing_type: Option<String>,
    /// Mailbox type.
    pub mailbox_type: Option<String>,
    /// The address itself.
    pub address: Option<String>,
}

/// One entry of the phone-number collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneEntry {
    /// Slot key (see [`crate::phone_key`]).
    pub key: Option<String>,
    /// The number.
    pub number: Option<String>,
}

/// A contact entity.
///
/// Composes the shared [`Item`] identity with the contact's well-known
/// fields. The well-known fields live in a fixed declaration order that
/// matches the destination schema's complex-type ordering; serialization
/// and the update diff both walk them in that exact order, because the
/// schema rejects reordered elements.
#[derive(Debug, Clone)]
pub struct Contact {
    item: Item,
    complete_name: CompleteName,
    file_as: Field,
    display_name: Field,
    given_name: Field,
    initials: Field,
    middle_name: Field,
    nickname: Field,
    company_name: Field,
    emails: Field,
    phones: Field,
    assistant_name: Field,
    birthday: Field,
    department: Field,
    job_title: Field,
    manager: Field,
    spouse_name: Field,
    surname: Field,
    wedding_anniversary: Field,
    alias: Field,
    notes: Field,
}

impl Contact {
    /// Creates an empty, unbound contact.
    pub fn new() -> Self {
        Self {
            item: Item::new(),
            complete_name: CompleteName::default(),
            file_as: Field::new("FileAs"),
            display_name: Field::new("DisplayName"),
            given_name: Field::new("GivenName"),
            initials: Field::new("Initials"),
            middle_name: Field::new("MiddleName"),
            nickname: Field::new("Nickname"),
            company_name: Field::new("CompanyName"),
            emails: Field::new("EmailAddresses"),
            phones: Field::new("PhoneNumbers"),
            assistant_name: Field::new("AssistantName"),
            birthday: Field::new("Birthday"),
            department: Field::new("Department"),
            job_title: Field::new("JobTitle"),
            manager: Field::new("Manager"),
            spouse_name: Field::new("SpouseName"),
            surname: Field::new("Surname"),
            wedding_anniversary: Field::new("WeddingAnniversary"),
            alias: Field::new("Alias"),
            notes: Field::new("Body"),
        }
    }

    /// Creates an unbound contact parented under the given folder.
    pub fn in_folder(parent_folder_id: impl Into<String>) -> Self {
        let mut contact = Self::new();
        contact.item.set_parent_folder_id(parent_folder_id);
        contact
    }

    /// Builds a contact from a parsed `Contact` response subtree.
    ///
    /// Unrecognized children are skipped; extended properties are
    /// dispatched to the variant classifier and indexed.
    pub fn from_field(field: &Field, registry: &TypeRegistry) -> ModelResult<Self> {
        let mut contact = Self::new();

        for child in field.children() {
            match child.tag() {
                "ItemId" => {
                    if let (Some(id), Some(ck)) = (child.attribute("Id"), child.attribute("ChangeKey")) {
                        contact.item.bind_identity(id, ck);
                    }
                }
                "ParentFolderId" => {
                    if let Some(id) = child.attribute("Id") {
                        contact.item.set_parent_folder_id(id);
                    }
                    if let Some(ck) = child.attribute("ChangeKey") {
                        contact.item.set_parent_folder_change_key(ck);
                    }
                }
                "ItemClass" => {
                    if let Some(value) = child.value() {
                        contact.item.item_class_mut().set(value);
                    }
                }
                "DateTimeCreated" => {
                    if let Some(value) = child.value() {
                        contact.item.set_created_time(value);
                    }
                }
                "LastModifiedTime" => {
                    if let Some(value) = child.value() {
                        contact.item.set_last_modified_time(value);
                    }
                }
                "CompleteName" => contact.complete_name = CompleteName::from_field(child),
                "EmailAddresses" => contact.emails = child.clone(),
                "PhoneNumbers" => contact.phones = child.clone(),
                "ExtendedProperty" => {
                    let prop = ExtendedProperty::from_field(child)?;
                    contact.item.add_extended_property(prop, registry);
                }
                other => {
                    let target = contact.scalar_field_mut(other);
                    match (target, child.value()) {
                        (Some(field), Some(value)) => field.set(value),
                        (Some(_), None) => {}
                        (None, _) => debug!(tag = other, "skipping unrecognized contact child"),
                    }
                }
            }
        }

        Ok(contact)
    }

    fn scalar_field_mut(&mut self, tag: &str) -> Option<&mut Field> {
        let field = match tag {
            "FileAs" => &mut self.file_as,
            "DisplayName" => &mut self.display_name,
            "GivenName" => &mut self.given_name,
            "Initials" => &mut self.initials,
            "MiddleName" => &mut self.middle_name,
            "Nickname" => &mut self.nickname,
            "CompanyName" => &mut self.company_name,
            "AssistantName" => &mut self.assistant_name,
            "Birthday" => &mut self.birthday,
            "Department" => &mut self.department,
            "JobTitle" => &mut self.job_title,
            "Manager" => &mut self.manager,
            "SpouseName" => &mut self.spouse_name,
            "Surname" => &mut self.surname,
            "WeddingAnniversary" => &mut self.wedding_anniversary,
            "Alias" => &mut self.alias,
            "Body" => &mut self.notes,
            _ => return None,
        };
        Some(field)
    }

    /// The declared well-known child fields, in schema order.
    pub fn declared_fields(&self) -> [&Field; 19] {
        [
            &self.file_as,
            &self.display_name,
            &self.given_name,
            &self.initials,
            &self.middle_name,
            &self.nickname,
            &self.company_name,
            &self.emails,
            &self.phones,
            &self.assistant_name,
            &self.birthday,
            &self.department,
            &self.job_title,
            &self.manager,
            &self.spouse_name,
            &self.surname,
            &self.wedding_anniversary,
            &self.alias,
            &self.notes,
        ]
    }

    /// Computes the write-path diff over the declared fields.
    pub fn get_updates(&self) -> UpdateDiff {
        UpdateDiff::partition(self.declared_fields())
    }

    /// Renders the contact as a `Contact` field tree for a create
    /// request.
    ///
    /// Identity is omitted (the server assigns it); empty fields
    /// disappear through empty-element suppression; extended properties
    /// follow the well-known fields.
    pub fn to_field(&self) -> Field {
        let mut root = Field::new("Contact");
        if self.item.item_class().has_pending_update() {
            root.push_child(self.item.item_class().clone());
        }
        for field in self.declared_fields() {
            root.push_child(field.clone());
        }
        for prop in self.item.extended_properties() {
            root.push_child(prop.to_field());
        }
        root
    }

    /// Returns the shared item state.
    pub fn item(&self) -> &Item {
        &self.item
    }

    /// Returns the shared item state mutably.
    pub fn item_mut(&mut self) -> &mut Item {
        &mut self.item
    }

    /// Returns the server-derived complete-name block.
    pub fn complete_name(&self) -> &CompleteName {
        &self.complete_name
    }

    /// First name with the complete-name fallback.
    pub fn first_name(&self) -> Option<&str> {
        self.complete_name
            .first_name
            .as_deref()
            .or_else(|| self.given_name.value())
    }

    /// Last name with the complete-name fallback.
    pub fn last_name(&self) -> Option<&str> {
        self.complete_name
            .last_name
            .as_deref()
            .or_else(|| self.surname.value())
    }

    /// Display name, deriving one when the server sent none.
    ///
    /// Falls back through the complete-name full form to first + last.
    pub fn display_name_or_derived(&self) -> String {
        if let Some(name) = self.display_name.value() {
            return name.to_string();
        }
        if let Some(name) = self.complete_name.full_name.as_deref() {
            return name.to_string();
        }
        let first = self.first_name().unwrap_or_default();
        let last = self.last_name().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }

    /// Email entries, in response order.
    pub fn emails(&self) -> Vec<EmailEntry> {
        self.emails
            .children()
            .iter()
            .map(|entry| EmailEntry {
                key: entry.attribute("Key").map(str::to_string),
                routing_type: entry.attribute("RoutingType").map(str::to_string),
                mailbox_type: entry.attribute("MailboxType").map(str::to_string),
                address: entry.value().map(str::to_string),
            })
            .collect()
    }

    /// Adds an email entry under the given slot key.
    pub fn add_email(&mut self, key: &str, address: impl Into<String>) {
        let mut entry = Field::with_value("Entry", address);
        entry.add_attribute("Key", Some(key));
        self.emails.push_child(entry);
    }

    /// Phone entries, in response order.
    pub fn phones(&self) -> Vec<PhoneEntry> {
        self.phones
            .children()
            .iter()
            .map(|entry| PhoneEntry {
                key: entry.attribute("Key").map(str::to_string),
                number: entry.value().map(str::to_string),
            })
            .collect()
    }

    /// Adds a phone entry under the given slot key.
    pub fn add_phone(&mut self, key: &str, number: impl Into<String>) {
        let mut entry = Field::with_value("Entry", number);
        entry.add_attribute("Key", Some(key));
        self.phones.push_child(entry);
    }

    /// Reads the gender extended property, if present.
    pub fn gender(&self) -> ModelResult<Option<Gender>> {
        let Some(prop) = self.item.tagged_property(PR_GENDER) else {
            return Ok(None);
        };
        let text = prop.text()?;
        let code = parse_numeric_text(text)?;
        Ok(Some(Gender::from_code(code)?))
    }

    /// Sets the gender extended property.
    pub fn set_gender(&mut self, gender: Gender, registry: &TypeRegistry) -> ModelResult<()> {
        self.item
            .set_tagged_property(PR_GENDER, gender.code().to_string(), registry)?;
        Ok(())
    }

    // Scalar field accessors.

    /// The file-as string.
    pub fn file_as(&self) -> &Field {
        &self.file_as
    }

    /// The file-as string, mutably.
    pub fn file_as_mut(&mut self) -> &mut Field {
        &mut self.file_as
    }

    /// The display name.
    pub fn display_name(&self) -> &Field {
        &self.display_name
    }

    /// The display name, mutably.
    pub fn display_name_mut(&mut self) -> &mut Field {
        &mut self.display_name
    }

    /// The given (first) name.
    pub fn given_name(&self) -> &Field {
        &self.given_name
    }

    /// The given name, mutably.
    pub fn given_name_mut(&mut self) -> &mut Field {
        &mut self.given_name
    }

    /// The surname.
    pub fn surname(&self) -> &Field {
        &self.surname
    }

    /// The surname, mutably.
    pub fn surname_mut(&mut self) -> &mut Field {
        &mut self.surname
    }

    /// The job title.
    pub fn job_title(&self) -> &Field {
        &self.job_title
    }

    /// The job title, mutably.
    pub fn job_title_mut(&mut self) -> &mut Field {
        &mut self.job_title
    }

    /// The company name.
    pub fn company_name(&self) -> &Field {
        &self.company_name
    }

    /// The company name, mutably.
    pub fn company_name_mut(&mut self) -> &mut Field {
        &mut self.company_name
    }

    /// The free-text notes body.
    pub fn notes(&self) -> &Field {
        &self.notes
    }

    /// The notes body, mutably.
    pub fn notes_mut(&mut self) -> &mut Field {
        &mut self.notes
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{email_key, phone_key};
    use ews_xml::{field_from_node, find_descendant, parse_document, TYPES_NS};

    const CONTACT_XML: &str = r#"
        <root xmlns:t="http://schemas.microsoft.com/exchange/services/2006/types">
          <t:Contact>
            <t:ItemId Id="AQA=" ChangeKey="CQA="/>
            <t:ParentFolderId Id="Zm9v" ChangeKey="cGFy"/>
            <t:ItemClass>IPM.Contact</t:ItemClass>
            <t:DateTimeCreated>2014-03-05T11:28:41Z</t:DateTimeCreated>
            <t:LastModifiedTime>2014-04-02T18:02:51Z</t:LastModifiedTime>
            <t:FileAs>Lovelace, Ada</t:FileAs>
            <t:DisplayName>Ada Lovelace</t:DisplayName>
            <t:GivenName>Ada</t:GivenName>
            <t:Surname>Lovelace</t:Surname>
            <t:CompleteName>
              <t:FirstName>Ada</t:FirstName>
              <t:LastName>Lovelace</t:LastName>
              <t:FullName>Ada Lovelace</t:FullName>
            </t:CompleteName>
            <t:EmailAddresses>
              <t:Entry Key="EmailAddress1" RoutingType="SMTP">ada@analytical.example</t:Entry>
            </t:EmailAddresses>
            <t:PhoneNumbers>
              <t:Entry Key="HomePhone">+44 20 0000 0000</t:Entry>
            </t:PhoneNumbers>
            <t:Body>Enchantress of numbers</t:Body>
            <t:ExtendedProperty>
              <t:ExtendedFieldURI PropertyTag="0x3a4d" PropertyType="Short"/>
              <t:Value>2</t:Value>
            </t:ExtendedProperty>
          </t:Contact>
        </root>"#;

    fn parse_contact() -> Contact {
        let registry = TypeRegistry::mapi();
        let doc = parse_document(CONTACT_XML).unwrap();
        let node = find_descendant(doc.root_element(), TYPES_NS, "Contact").unwrap();
        Contact::from_field(&field_from_node(node), &registry).unwrap()
    }

    #[test]
    fn parses_identity_and_fields() {
        let contact = parse_contact();

        assert!(contact.item().is_bound());
        assert_eq!(contact.item().item_id(), Some("AQA="));
        assert_eq!(contact.item().change_key(), Some("CQA="));
        assert_eq!(contact.item().parent_folder_id(), Some("Zm9v"));
        assert_eq!(contact.item().created_time(), Some("2014-03-05T11:28:41Z"));
        assert_eq!(
            contact.item().last_modified_time(),
            Some("2014-04-02T18:02:51Z")
        );
        assert_eq!(contact.given_name().value(), Some("Ada"));
        assert_eq!(contact.notes().value(), Some("Enchantress of numbers"));
    }

    #[test]
    fn parses_collections() {
        let contact = parse_contact();

        let emails = contact.emails();
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].key.as_deref(), Some(email_key::EMAIL_ADDRESS_1));
        assert_eq!(emails[0].address.as_deref(), Some("ada@analytical.example"));

        let phones = contact.phones();
        assert_eq!(phones.len(), 1);
        assert_eq!(phones[0].key.as_deref(), Some(phone_key::HOME_PHONE));
    }

    #[test]
    fn parses_complete_name_and_gender() {
        let contact = parse_contact();
        assert_eq!(contact.complete_name().full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(contact.gender().unwrap(), Some(Gender::Female));
    }

    #[test]
    fn display_name_fallback_chain() {
        let mut contact = Contact::new();
        assert_eq!(contact.display_name_or_derived(), "");

        contact.given_name_mut().set("Ada");
        contact.surname_mut().set("Lovelace");
        assert_eq!(contact.display_name_or_derived(), "Ada Lovelace");

        contact.complete_name.full_name = Some("Augusta Ada King".into());
        assert_eq!(contact.display_name_or_derived(), "Augusta Ada King");

        contact.display_name_mut().set("Countess of Lovelace");
        assert_eq!(contact.display_name_or_derived(), "Countess of Lovelace");
    }

    #[test]
    fn diff_partitions_every_declared_field() {
        let mut contact = Contact::new();
        contact.given_name_mut().set("Ada");
        contact.add_email(email_key::EMAIL_ADDRESS_1, "ada@analytical.example");

        let declared = contact.declared_fields().len();
        let diff = contact.get_updates();
        assert_eq!(diff.sets.len() + diff.deletes.len(), declared);
        assert!(diff.adds.is_empty());
        assert_eq!(diff.sets.len(), 2);
    }

    #[test]
    fn diff_preserves_declaration_order() {
        let mut contact = Contact::new();
        contact.surname_mut().set("Lovelace");
        contact.given_name_mut().set("Ada");

        let diff = contact.get_updates();
        // GivenName is declared before Surname regardless of set order.
        assert_eq!(diff.sets[0].tag(), "GivenName");
        assert_eq!(diff.sets[1].tag(), "Surname");
    }

    #[test]
    fn to_field_omits_identity_and_empty_fields() {
        let mut contact = Contact::new();
        contact.given_name_mut().set("Ada");

        let xml = contact.to_field().serialize().unwrap();
        assert!(xml.contains("<t:GivenName>Ada</t:GivenName>"));
        assert!(!xml.contains("ItemId"));
        assert!(!xml.contains("Surname"));
    }

    #[test]
    fn round_trip_keeps_extended_properties() {
        let registry = TypeRegistry::mapi();
        let contact = parse_contact();
        let xml = contact.to_field().serialize().unwrap();

        let wrapped = format!(
            "<root xmlns:t=\"{}\">{}</root>",
            ews_xml::TYPES_NS,
            xml
        );
        let doc = parse_document(&wrapped).unwrap();
        let node = find_descendant(doc.root_element(), TYPES_NS, "Contact").unwrap();
        let reparsed = Contact::from_field(&field_from_node(node), &registry).unwrap();

        assert_eq!(reparsed.gender().unwrap(), Some(Gender::Female));
        assert_eq!(reparsed.given_name().value(), Some("Ada"));
    }
}
