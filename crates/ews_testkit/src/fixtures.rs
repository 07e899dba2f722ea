//! Entity and registry fixtures.

use ews_model::{email_key, Contact};
use ews_props::TypeRegistry;

/// A populated, unbound contact.
pub fn sample_contact() -> Contact {
    let mut contact = Contact::new();
    contact.given_name_mut().set("Ada");
    contact.surname_mut().set("Lovelace");
    contact.display_name_mut().set("Ada Lovelace");
    contact.add_email(email_key::EMAIL_ADDRESS_1, "ada@analytical.example");
    contact
}

/// A bound contact carrying identity.
pub fn bound_contact(item_id: &str, change_key: &str) -> Contact {
    let mut contact = sample_contact();
    contact.item_mut().bind_identity(item_id, change_key);
    contact
}

/// A tiny synthetic type registry.
///
/// Covers two codes only, which is enough to prove the registry is
/// injected rather than ambient: lookups outside this set must fail.
pub fn synthetic_registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry.insert(0x0003, "Integer");
    registry.insert(0x001f, "String");
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_contact_has_pending_fields() {
        let contact = sample_contact();
        assert!(!contact.item().is_bound());
        assert_eq!(contact.get_updates().sets.len(), 4);
    }

    #[test]
    fn synthetic_registry_is_not_total() {
        let registry = synthetic_registry();
        assert_eq!(registry.type_code_to_symbol(0x0003).unwrap(), "Integer");
        assert!(registry.type_code_to_symbol(0x0040).is_err());
    }
}
