//! Well-known names and enumerations from the wire protocol.

use crate::error::{ModelError, ModelResult};

/// Distinguished folder ids, addressable without binding first.
pub mod distinguished_folder {
    /// The calendar folder.
    pub const CALENDAR: &str = "calendar";
    /// The contacts folder.
    pub const CONTACTS: &str = "contacts";
    /// The deleted-items folder.
    pub const DELETED_ITEMS: &str = "deleteditems";
    /// The drafts folder.
    pub const DRAFTS: &str = "drafts";
    /// The inbox.
    pub const INBOX: &str = "inbox";
    /// The journal folder.
    pub const JOURNAL: &str = "journal";
    /// The notes folder.
    pub const NOTES: &str = "notes";
    /// The outbox.
    pub const OUTBOX: &str = "outbox";
    /// The sent-items folder.
    pub const SENT_ITEMS: &str = "sentitems";
    /// The tasks folder.
    pub const TASKS: &str = "tasks";
    /// The root of the message store hierarchy.
    pub const MSG_FOLDER_ROOT: &str = "msgfolderroot";
    /// The mailbox root.
    pub const ROOT: &str = "root";
    /// The junk-email folder.
    pub const JUNK_EMAIL: &str = "junkemail";
    /// The search-folders container.
    pub const SEARCH_FOLDERS: &str = "searchfolders";
    /// The voice-mail folder.
    pub const VOICE_MAIL: &str = "voicemail";
}

/// Folder class markers.
pub mod folder_class {
    /// Contact folders.
    pub const CONTACTS: &str = "IPF.Contact";
    /// Journal folders.
    pub const JOURNALS: &str = "IPF.Journal";
    /// Task folders.
    pub const TASKS: &str = "IPF.Task";
    /// Calendar folders.
    pub const CALENDARS: &str = "IPF.Calendar";
    /// Note folders.
    pub const NOTES: &str = "IPF.Note";
}

/// Item class markers.
pub mod item_class {
    /// Activity items.
    pub const ACTIVITY: &str = "IPM.Activity";
    /// Appointment items.
    pub const APPOINTMENT: &str = "IPM.Appointment";
    /// Contact items.
    pub const CONTACT: &str = "IPM.Contact";
    /// Distribution list items.
    pub const DIST_LIST: &str = "IPM.DistList";
    /// Note (mail) items.
    pub const NOTE: &str = "IPM.Note";
    /// Task items.
    pub const TASK: &str = "IPM.Task";
}

/// Keys of the phone-number entry collection.
pub mod phone_key {
    /// Assistant's phone.
    pub const ASSISTANT_PHONE: &str = "AssistantPhone";
    /// Business fax.
    pub const BUSINESS_FAX: &str = "BusinessFax";
    /// Primary business phone.
    pub const BUSINESS_PHONE: &str = "BusinessPhone";
    /// Secondary business phone.
    pub const BUSINESS_PHONE2: &str = "BusinessPhone2";
    /// Callback number.
    pub const CALLBACK: &str = "Callback";
    /// Car phone.
    pub const CAR_PHONE: &str = "CarPhone";
    /// Company switchboard.
    pub const COMPANY_MAIN_PHONE: &str = "CompanyMainPhone";
    /// Home fax.
    pub const HOME_FAX: &str = "HomeFax";
    /// Primary home phone.
    pub const HOME_PHONE: &str = "HomePhone";
    /// Secondary home phone.
    pub const HOME_PHONE2: &str = "HomePhone2";
    /// ISDN line.
    pub const ISDN: &str = "Isdn";
    /// Mobile phone.
    pub const MOBILE_PHONE: &str = "MobilePhone";
    /// Other fax.
    pub const OTHER_FAX: &str = "OtherFax";
    /// Other telephone.
    pub const OTHER_TELEPHONE: &str = "OtherTelephone";
    /// Pager.
    pub const PAGER: &str = "Pager";
    /// Primary phone.
    pub const PRIMARY_PHONE: &str = "PrimaryPhone";
    /// Radio phone.
    pub const RADIO_PHONE: &str = "RadioPhone";
    /// Telex.
    pub const TELEX: &str = "Telex";
    /// TTY/TDD device.
    pub const TTY_TDD_PHONE: &str = "TtyTddPhone";
}

/// Keys of the email-address entry collection.
pub mod email_key {
    /// First email slot.
    pub const EMAIL_ADDRESS_1: &str = "EmailAddress1";
    /// Second email slot.
    pub const EMAIL_ADDRESS_2: &str = "EmailAddress2";
    /// Third email slot.
    pub const EMAIL_ADDRESS_3: &str = "EmailAddress3";
}

/// Gender, carried as the `PR_GENDER` tagged extended property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    /// Not specified.
    Unspecified,
    /// Female.
    Female,
    /// Male.
    Male,
}

impl Gender {
    /// Returns the wire code.
    pub fn code(self) -> u32 {
        match self {
            Gender::Unspecified => 1,
            Gender::Female => 2,
            Gender::Male => 3,
        }
    }

    /// Decodes a wire code.
    pub fn from_code(code: u32) -> ModelResult<Self> {
        match code {
            1 => Ok(Gender::Unspecified),
            2 => Ok(Gender::Female),
            3 => Ok(Gender::Male),
            other => Err(ModelError::InvalidCode {
                what: "gender",
                code: other,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes_round_trip() {
        for gender in [Gender::Unspecified, Gender::Female, Gender::Male] {
            assert_eq!(Gender::from_code(gender.code()).unwrap(), gender);
        }
    }

    #[test]
    fn gender_rejects_unknown_code() {
        assert!(matches!(
            Gender::from_code(7),
            Err(ModelError::InvalidCode { what: "gender", code: 7 })
        ));
    }
}
