use std::{io, path::Path};

use serde::{Deserialize, Deserializer};
use tracing::debug;

/// Extra information about a vehicle from the dealer data file.
///
/// The file is a JSON array of these records; field names follow its wire
/// format. Ids in the file may be numbers or strings and are always compared
/// as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VehicleDetails {
    /// Id of the vehicle the record is about.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,

    /// Estimated market (FIPE) value.
    #[serde(rename = "valorFIPE")]
    pub fipe_value: Option<String>,

    /// Whether a recall is pending.
    #[serde(rename = "recallPendente")]
    pub pending_recall: Option<String>,

    /// Date of the last service on record with the dealer.
    #[serde(rename = "ultimaRevisaoAPI")]
    pub last_service: Option<String>,

    /// A maintenance tip for this vehicle.
    #[serde(rename = "dicaManutencao")]
    pub maintenance_tip: Option<String>,
}

/// Why the detail lookup failed.
#[derive(Debug, thiserror::Error)]
pub enum DetailsError {
    /// The detail file is missing or unreadable.
    #[error("failed to read the detail file")]
    Io(#[from] io::Error),

    /// The detail file is not the expected JSON array.
    #[error("the detail file is malformed")]
    Malformed(#[from] serde_json::Error),
}

/// Accepts either a JSON string or number and yields a string.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Looks a vehicle up in the detail file by string-compared id.
///
/// Returns `Ok(None)` when the file has no record for the id.
///
/// # Errors
///
/// Returns an error when the file is missing, unreadable, or malformed; the
/// caller reports it inline and carries on.
pub fn lookup_details(path: &Path, id: &str) -> Result<Option<VehicleDetails>, DetailsError> {
    let raw = std::fs::read_to_string(path)?;
    let records: Vec<VehicleDetails> = serde_json::from_str(&raw)?;
    debug!(records = records.len(), id, "detail file scanned");
    Ok(records.into_iter().find(|record| record.id == id))
}

#[cfg(test)]
mod tests {
    use super::lookup_details;

    const SAMPLE: &str = r#"[
        {
            "id": 1001,
            "valorFIPE": "R$ 25.000,00",
            "recallPendente": "Nenhum",
            "ultimaRevisaoAPI": "2023-11-20",
            "dicaManutencao": "Verificar velas a cada 10.000 km"
        },
        {
            "id": "abc-42",
            "valorFIPE": "R$ 480.000,00",
            "recallPendente": "Sim - airbag",
            "ultimaRevisaoAPI": null,
            "dicaManutencao": null
        }
    ]"#;

    #[test]
    fn matches_numeric_ids_as_strings() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vehicle_details.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let details = lookup_details(&path, "1001").unwrap().unwrap();
        assert_eq!(details.fipe_value.as_deref(), Some("R$ 25.000,00"));
    }

    #[test]
    fn matches_string_ids() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vehicle_details.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let details = lookup_details(&path, "abc-42").unwrap().unwrap();
        assert_eq!(details.pending_recall.as_deref(), Some("Sim - airbag"));
        assert_eq!(details.last_service, None);
    }

    #[test]
    fn unknown_id_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vehicle_details.json");
        std::fs::write(&path, SAMPLE).unwrap();

        assert_eq!(lookup_details(&path, "zzz").unwrap(), None);
    }

    #[test]
    fn missing_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vehicle_details.json");
        assert!(lookup_details(&path, "1001").is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("vehicle_details.json");
        std::fs::write(&path, "{\"not\": \"an array\"}").unwrap();
        assert!(lookup_details(&path, "1001").is_err());
    }
}
