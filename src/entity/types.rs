//! Entity types and structures

use crate::database::LookupRecord;
use crate::ip::{Address, Family};
use serde::Serialize;

/// Entity type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityType {
    /// IPv4 address
    IPv4,
    /// IPv6 address
    IPv6,
    /// Plain text (not an entity)
    Plain,
}

/// A segment of a line: an address literal or the text between them
#[derive(Debug, Clone)]
pub struct Entity {
    /// Byte range in the original line (start, end)
    pub location: (usize, usize),

    /// Entity type
    pub entity_type: EntityType,

    /// Original text
    pub text: String,

    /// Parsed address (for IP entities)
    pub address: Option<Address>,

    /// Lookup result, once resolved
    pub record: Option<LookupRecord>,
}

impl Entity {
    /// Create a new plain text entity
    pub fn plain(start: usize, end: usize, text: String) -> Self {
        Entity {
            location: (start, end),
            entity_type: EntityType::Plain,
            text,
            address: None,
            record: None,
        }
    }

    /// Create an IP entity; the type follows the parsed address family, so
    /// `::ffff:1.2.3.4` is an IPv4 entity
    pub fn ip(start: usize, end: usize, text: String, address: Address) -> Self {
        let entity_type = match address.family() {
            Family::V4 => EntityType::IPv4,
            Family::V6 => EntityType::IPv6,
        };
        Entity {
            location: (start, end),
            entity_type,
            text,
            address: Some(address),
            record: None,
        }
    }

    /// Check if this entity is an IP address
    pub fn is_ip(&self) -> bool {
        self.address.is_some()
    }

    /// Check if entity has been resolved
    pub fn has_record(&self) -> bool {
        self.record.is_some()
    }
}

/// Collection of entities extracted from text
#[derive(Debug, Clone, Default)]
pub struct Entities {
    pub entities: Vec<Entity>,
}

impl Entities {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity to the collection
    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Sort entities by their position in text
    pub fn sort_by_position(&mut self) {
        self.entities.sort_by_key(|e| e.location.0);
    }

    /// Drop every entity that starts inside an earlier one
    ///
    /// Ties on the start position keep the entity pushed first.
    pub fn remove_overlaps(&mut self) {
        self.sort_by_position();

        let mut covered = 0;
        self.entities.retain(|e| {
            let (start, end) = e.location;
            if start < covered {
                return false;
            }
            covered = end;
            true
        });
    }

    /// Get all IP entities
    pub fn ips(&self) -> Vec<&Entity> {
        self.entities.iter().filter(|e| e.is_ip()).collect()
    }

    /// Mutable access to the IP entities, for resolving them in place
    pub fn ips_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut().filter(|e| e.is_ip())
    }

    /// Count of all entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if collection is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(start: usize, text: &str) -> Entity {
        Entity::ip(start, start + text.len(), text.to_string(), text.parse().unwrap())
    }

    #[test]
    fn test_entity_creation() {
        let entity = ip(0, "192.168.1.1");
        assert_eq!(entity.entity_type, EntityType::IPv4);
        assert!(entity.is_ip());
        assert!(!entity.has_record());

        assert_eq!(ip(0, "2001:db8::1").entity_type, EntityType::IPv6);
        assert_eq!(ip(0, "::ffff:10.0.0.1").entity_type, EntityType::IPv4);
        assert!(!Entity::plain(0, 3, "abc".to_string()).is_ip());
    }

    #[test]
    fn test_entities_sort() {
        let mut entities = Entities::new();
        entities.push(ip(10, "8.8.8.8"));
        entities.push(ip(0, "1.1.1.1"));

        entities.sort_by_position();

        assert_eq!(entities.entities[0].text, "1.1.1.1");
        assert_eq!(entities.entities[1].text, "8.8.8.8");
    }

    #[test]
    fn test_remove_overlaps() {
        let mut entities = Entities::new();
        entities.push(ip(0, "::ffff:1.2.3.4"));
        entities.push(ip(7, "1.2.3.4"));
        entities.push(ip(20, "8.8.8.8"));

        entities.remove_overlaps();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities.entities[0].text, "::ffff:1.2.3.4");
        assert_eq!(entities.entities[1].text, "8.8.8.8");
    }
}
