//! Built-in sample hierarchy.

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{EntityKind, EntityRecord, RecordSet};

const SAMPLE: &[(&str, &str, &str, &str)] = &[
    ("0", "Удачный", "-1", "obj"),
    ("1", "Николай Серебреников", "0", "person"),
    ("2", "Отдел Кулинария", "1", "department"),
    ("3", "Отдел IT", "1", "department"),
    ("4", "Матвей Точин", "3", "person"),
    ("5", "Ярослав Надточий", "4", "person"),
    ("6", "Алексей", "2", "person"),
    ("7", "Юлия Бойко", "6", "person"),
    ("8", "Юлия Олеговна", "6", "person"),
    ("9", "Бугры, кулинария", "7", "store"),
];

/// One store object with its staff, departments and a store.
pub fn sample_records() -> RecordSet {
    SAMPLE
        .iter()
        .map(|&(id, name, parent, tag)| {
            (
                id.to_string(),
                EntityRecord::new(name, parent, EntityKind::from(tag)),
            )
        })
        .collect()
}

/// The sample as pretty-printed JSON, in the input schema.
pub fn sample_json() -> ApplicationResult<String> {
    serde_json::to_string_pretty(&sample_records()).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize sample".to_string(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_sample_when_loading_then_has_single_object_root() {
        let records = sample_records();
        assert_eq!(records.len(), 10);
        assert_eq!(records["0"].kind, EntityKind::Object);
        assert_eq!(records["0"].parent, "-1");
    }

    #[test]
    fn given_sample_json_when_parsing_back_then_equals_records() {
        let parsed: RecordSet = serde_json::from_str(&sample_json().unwrap()).unwrap();
        assert_eq!(parsed, sample_records());
    }
}
