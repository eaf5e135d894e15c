//! Entity parser - extracts address literals from text

use crate::entity::types::{Entities, Entity};
use crate::ip::Address;
use crate::regex::{find_ipv4, find_ipv6};

/// Parse a line of text and extract all IP address entities
///
/// IPv6 candidates are taken first so an embedded dotted quad
/// (`::ffff:1.2.3.4`) stays part of its IPv6 literal. Candidates the address
/// grammar rejects are dropped.
///
/// # Example
///
/// ```
/// use zxip_rs::entity::parser::parse_line;
///
/// let entities = parse_line("Server IP: 192.168.1.1, gateway fe80::1");
/// assert_eq!(entities.len(), 2);
/// ```
pub fn parse_line(text: &str) -> Entities {
    let mut entities = Entities::new();

    let candidates = find_ipv6(text).into_iter().chain(find_ipv4(text));
    for (start, end, literal) in candidates {
        if let Some(entity) = to_entity(start, end, literal) {
            entities.push(entity);
        }
    }

    // Remove overlapping entities
    entities.remove_overlaps();

    entities
}

fn to_entity(start: usize, end: usize, literal: String) -> Option<Entity> {
    match literal.parse::<Address>() {
        Ok(address) => Some(Entity::ip(start, end, literal, address)),
        Err(e) => {
            log::debug!("Skipping candidate '{}': {}", literal, e);
            None
        }
    }
}

/// Build a complete entity list with plain text segments
///
/// This fills in the gaps between extracted entities with plain text segments,
/// so that the original text can be reconstructed with annotations.
pub fn build_complete_entities(text: &str, mut entities: Entities) -> Entities {
    entities.sort_by_position();

    let mut complete = Entities::new();
    let mut last_pos = 0;

    for entity in entities.entities {
        let (start, end) = entity.location;

        // Add plain text before this entity
        if start > last_pos {
            complete.push(Entity::plain(last_pos, start, text[last_pos..start].to_string()));
        }

        complete.push(entity);
        last_pos = end;
    }

    // Add remaining plain text
    if last_pos < text.len() || complete.is_empty() {
        complete.push(Entity::plain(last_pos, text.len(), text[last_pos..].to_string()));
    }

    complete
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::types::EntityType;

    #[test]
    fn test_parse_line_ipv4() {
        let text = "Server IP: 192.168.1.1";
        let entities = parse_line(text);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities.entities[0].entity_type, EntityType::IPv4);
        assert_eq!(entities.entities[0].text, "192.168.1.1");
        assert_eq!(entities.entities[0].location, (11, 22));
    }

    #[test]
    fn test_parse_line_mixed() {
        let text = "from 2001:db8::1 via ::ffff:10.0.0.1 to 8.8.8.8 at 12:30:45";
        let entities = parse_line(text);
        let texts: Vec<&str> = entities.ips().iter().map(|e| e.text.as_str()).collect();

        assert_eq!(texts, vec!["2001:db8::1", "::ffff:10.0.0.1", "8.8.8.8"]);
        assert!(entities.entities[1].address.unwrap().is_mapped());
    }

    #[test]
    fn test_build_complete_entities() {
        let text = "Server: 1.2.3.4 ok";
        let entities = parse_line(text);
        let complete = build_complete_entities(text, entities);

        // Should have plain + ip + plain
        assert_eq!(complete.len(), 3);
        assert_eq!(complete.entities[0].text, "Server: ");
        assert_eq!(complete.entities[1].text, "1.2.3.4");
        assert_eq!(complete.entities[2].text, " ok");
    }

    #[test]
    fn test_no_entities() {
        let text = "No addresses here";
        let entities = parse_line(text);
        let complete = build_complete_entities(text, entities);

        assert_eq!(complete.len(), 1);
        assert_eq!(complete.entities[0].entity_type, EntityType::Plain);
        assert_eq!(complete.entities[0].text, text);

        let empty = build_complete_entities("", Entities::new());
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.entities[0].text, "");
    }
}
