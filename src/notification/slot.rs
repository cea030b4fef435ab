use once_cell::sync::Lazy;
use uuid::Uuid;

use super::EventId;

/// The deterministic display key a notification is posted under. Posting to
/// an occupied slot overwrites the previous content.
pub type SlotId = u32;

// Namespace under which event identifiers are hashed into display slots.
static SLOT_NAMESPACE: Lazy<Uuid> =
    Lazy::new(|| Uuid::new_v5(&Uuid::NAMESPACE_OID, b"quiesce.display-slot"));

/// Derives the display slot for an event identifier.
///
/// The derivation is a pure function of the identifier: re-posting the same
/// identifier lands in the same slot and replaces the earlier rendition
/// instead of duplicating it. Distinct identifiers may collide, in which case
/// the later post overwrites the earlier one; with a 32-bit slot space this
/// is an accepted approximation.
pub fn slot_for(identifier: &EventId) -> SlotId {
    let digest = Uuid::new_v5(&SLOT_NAMESPACE, identifier.as_str().as_bytes());
    let bytes = digest.as_bytes();
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

#[cfg(test)]
mod test {
    use super::*;

    /// The slot of an identifier must never change between derivations; the
    /// overwrite semantics of reposted notifications depend on it.
    #[test]
    fn test_slot_is_deterministic() {
        let id = EventId::from("5f2b-1");
        assert_eq!(slot_for(&id), slot_for(&id));
    }

    #[test]
    fn test_distinct_identifiers_usually_get_distinct_slots() {
        let a = slot_for(&EventId::from("message-a"));
        let b = slot_for(&EventId::from("message-b"));
        assert_ne!(a, b, "These two identifiers are known not to collide.");
    }
}
