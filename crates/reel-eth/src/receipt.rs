//! Transaction receipts and event-log extraction.
//!
//! After a state-changing call the receipt's event log is the only source
//! of truth for what the contract actually committed. Extraction is done
//! against a declared [`EventField`] schema rather than ad hoc scanning,
//! so every call site names the event, the field and which occurrence it
//! expects.

use crate::value::EthValue;

/// One decoded event emitted by a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub name: String,
    /// Decoded fields in ABI order
    pub fields: Vec<(String, EthValue)>,
}

impl EventLog {
    pub fn field(&self, name: &str) -> Option<&EthValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Receipt of a mined state-changing transaction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxReceipt {
    pub tx_hash: String,
    /// Events in emission order
    pub events: Vec<EventLog>,
}

impl TxReceipt {
    /// Extract the field a schema declares, or `None` if the event (at
    /// that occurrence) or the field is absent.
    pub fn extract(&self, schema: &EventField) -> Option<&EthValue> {
        self.events
            .iter()
            .filter(|e| e.name == schema.event)
            .nth(schema.occurrence.saturating_sub(1))
            .and_then(|e| e.field(schema.field))
    }
}

/// Declared location of a value inside a receipt's event log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventField {
    pub event: &'static str,
    pub field: &'static str,
    /// 1-based occurrence among events with the same name
    pub occurrence: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> TxReceipt {
        TxReceipt {
            tx_hash: "0xabc".to_string(),
            events: vec![
                EventLog {
                    name: "_Application".to_string(),
                    fields: vec![("listingHash".to_string(), EthValue::Uint(1))],
                },
                EventLog {
                    name: "_Challenge".to_string(),
                    fields: vec![("challengeID".to_string(), EthValue::Uint(9))],
                },
                EventLog {
                    name: "_Application".to_string(),
                    fields: vec![("listingHash".to_string(), EthValue::Uint(2))],
                },
            ],
        }
    }

    const FIRST_APPLICATION: EventField = EventField {
        event: "_Application",
        field: "listingHash",
        occurrence: 1,
    };

    #[test]
    fn test_extract_first_occurrence() {
        let value = receipt().extract(&FIRST_APPLICATION).cloned();
        assert_eq!(value, Some(EthValue::Uint(1)));
    }

    #[test]
    fn test_extract_second_occurrence() {
        let schema = EventField {
            occurrence: 2,
            ..FIRST_APPLICATION
        };
        assert_eq!(receipt().extract(&schema).cloned(), Some(EthValue::Uint(2)));
    }

    #[test]
    fn test_extract_absent_event() {
        let schema = EventField {
            event: "_Exit",
            field: "listingHash",
            occurrence: 1,
        };
        assert!(receipt().extract(&schema).is_none());
    }

    #[test]
    fn test_extract_absent_field() {
        let schema = EventField {
            event: "_Challenge",
            field: "data",
            occurrence: 1,
        };
        assert!(receipt().extract(&schema).is_none());
    }
}
