//! Entity formatter - formats entities and lookup records for output

use crate::database::LookupRecord;
use crate::entity::types::{Entities, EntityType};

#[cfg(feature = "colored-output")]
use colored::Colorize;

fn colorize(display: &str, use_color: bool) -> String {
    #[cfg(feature = "colored-output")]
    if use_color {
        return display.green().to_string();
    }
    #[cfg(not(feature = "colored-output"))]
    let _ = use_color;

    display.to_string()
}

/// Format entities as text with inline location information
///
/// Each resolved address is followed by ` [display]`; everything else is
/// copied through unchanged.
pub fn format_text(entities: &Entities, use_color: bool) -> String {
    let mut result = String::new();

    for entity in &entities.entities {
        result.push_str(&entity.text);

        if let Some(ref record) = entity.record {
            result.push_str(&format!(" [{}]", colorize(record.display(), use_color)));
        }
    }

    result
}

/// Format one lookup as `addr [range] display`
pub fn format_record(record: &LookupRecord, use_color: bool) -> String {
    format!(
        "{} [{}] {}",
        record.address(),
        record.range(),
        colorize(record.display(), use_color)
    )
}

/// Format the address entities of a line as JSON
pub fn format_json(entities: &Entities) -> Result<String, serde_json::Error> {
    use serde_json::json;

    let items: Vec<_> = entities
        .entities
        .iter()
        .filter(|e| e.entity_type != EntityType::Plain)
        .map(|e| {
            json!({
                "text": e.text,
                "type": e.entity_type,
                "position": {
                    "start": e.location.0,
                    "end": e.location.1,
                },
                "record": e.record,
            })
        })
        .collect();

    serde_json::to_string(&json!({
        "entities": items
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::parser::{build_complete_entities, parse_line};
    use crate::ip::AddressRange;

    fn record(addr: &str) -> LookupRecord {
        LookupRecord::new(
            addr.parse().unwrap(),
            AddressRange::parse("8.8.8.0/24").unwrap(),
            "United States".to_string(),
            "Google DNS".to_string(),
        )
    }

    fn resolved_line(text: &str) -> Entities {
        let mut entities = build_complete_entities(text, parse_line(text));
        for entity in entities.ips_mut() {
            entity.record = Some(record(&entity.text));
        }
        entities
    }

    #[test]
    fn test_format_text_plain() {
        let text = "Hello";
        let entities = build_complete_entities(text, parse_line(text));
        assert_eq!(format_text(&entities, false), "Hello");
    }

    #[test]
    fn test_format_text_with_record() {
        let entities = resolved_line("dns 8.8.8.8 ok");
        assert_eq!(
            format_text(&entities, false),
            "dns 8.8.8.8 [United States Google DNS] ok"
        );
    }

    #[test]
    fn test_format_record() {
        assert_eq!(
            format_record(&record("8.8.8.8"), false),
            "8.8.8.8 [8.8.8.0 - 8.8.8.255] United States Google DNS"
        );
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&resolved_line("dns 8.8.8.8 ok")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let items = value["entities"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["text"], "8.8.8.8");
        assert_eq!(items[0]["type"], "IPv4");
        assert_eq!(items[0]["position"]["start"], 4);
        assert_eq!(items[0]["record"]["range"]["start"], "8.8.8.0");
        assert_eq!(items[0]["record"]["display"], "United States Google DNS");
    }
}
