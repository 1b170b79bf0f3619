use std::path::Path;

use serde::Deserialize;

use crate::error::ForestError;
use crate::models::{StandRecord, StandResult};

/// Accepted JSON layouts: a bare array of stands or an object wrapping one.
#[derive(Deserialize)]
#[serde(untagged)]
enum StandDocument {
    List(Vec<StandRecord>),
    Wrapped { stands: Vec<StandRecord> },
}

fn parse_stands(content: &str) -> Result<Vec<StandRecord>, ForestError> {
    let document: StandDocument = serde_json::from_str(content)?;
    Ok(match document {
        StandDocument::List(stands) | StandDocument::Wrapped { stands } => stands,
    })
}

/// Read a stand snapshot from a JSON file.
pub fn read_stands_json(path: impl AsRef<Path>) -> Result<Vec<StandRecord>, ForestError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse_stands(&content)
}

/// Read a stand snapshot from JSON bytes.
pub fn read_stands_json_from_bytes(data: &[u8]) -> Result<Vec<StandRecord>, ForestError> {
    let content = std::str::from_utf8(data)
        .map_err(|e| ForestError::ParseError(format!("Invalid UTF-8: {e}")))?;
    parse_stands(content)
}

/// Write enriched stand results as a JSON array. Undefined values are `null`.
pub fn write_results_json(
    results: &[StandResult],
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), ForestError> {
    let content = if pretty {
        serde_json::to_string_pretty(results)?
    } else {
        serde_json::to_string(results)?
    };
    std::fs::write(path.as_ref(), content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_array() {
        let data = br#"[{"bestand_id": "1", "treslag": "Gran", "alder": 40, "bonitet": null}]"#;
        let records = read_stands_json_from_bytes(data).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].alder, Some(40.0));
        assert_eq!(records[0].bonitet, None);
    }

    #[test]
    fn test_read_wrapped() {
        let data = br#"{"stands": [{"bestand_id": "a"}, {"bestand_id": "b", "treslag": "Furu"}]}"#;
        let records = read_stands_json_from_bytes(data).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].treslag, "");
        assert_eq!(records[1].treslag, "Furu");
    }

    #[test]
    fn test_invalid_utf8() {
        let err = read_stands_json_from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ForestError::ParseError(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(read_stands_json_from_bytes(b"{\"stands\": 3}").is_err());
        assert!(read_stands_json_from_bytes(b"[{\"treslag\": \"Gran\"}]").is_err());
    }

    #[test]
    fn test_write_keeps_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let result = StandResult {
            bestand_id: "1".to_string(),
            ht40: Some(14.4),
            yield_requirement: 0.03,
            ..Default::default()
        };
        write_results_json(&[result], &path, true).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let row = &value[0];
        assert_eq!(row["Ht40"], 14.4);
        assert!(row["G2"].is_null());
        assert!(row["years_to_maturity"].is_null());
        assert_eq!(row["yield_requirement"], 0.03);
    }

    #[test]
    fn test_floats_read_back_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        let result = StandResult {
            bestand_id: "1".to_string(),
            volume: Some(102.67034104379515),
            volume_at_maturity_without_bark: Some(219.11912651373382),
            yield_requirement: 0.03,
            ..Default::default()
        };
        write_results_json(std::slice::from_ref(&result), &path, false).unwrap();

        let loaded: Vec<StandResult> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, vec![result]);
    }

    #[test]
    fn test_snapshot_seeds_read_exactly() {
        let data = br#"[{"bestand_id": "1", "srgrflate": 20.701092586344167, "srvolmb": 219.11912651373382}]"#;
        let records = read_stands_json_from_bytes(data).unwrap();
        assert_eq!(records[0].srgrflate, Some(20.701092586344167));
        assert_eq!(records[0].srvolmb, Some(219.11912651373382));
    }
}
