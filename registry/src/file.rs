//! Loading a record set from a TOML file.
//!
//! ```toml
//! [[records]]
//! nin = "12345678901"
//! bvn = "10987654321"
//! firstName = "John"
//! lastName = "Doe"
//! middleName = "Michael"
//! gender = "Male"
//! image = "/placeholder.svg?height=200&width=200"
//! ```

use idcheck_types::Record;
use serde::Deserialize;
use std::path::Path;

use crate::{RegistryError, StaticRegistry};

#[derive(Deserialize)]
struct RecordFile {
    #[serde(default)]
    records: Vec<Record>,
}

/// Parse a TOML record set. Identifier formats are validated while parsing.
pub fn parse_records(s: &str) -> Result<StaticRegistry, RegistryError> {
    let file: RecordFile = toml::from_str(s).map_err(|e| RegistryError::Parse(e.to_string()))?;
    StaticRegistry::new(file.records)
}

/// Read and parse a TOML record set from disk.
pub fn load_records(path: impl AsRef<Path>) -> Result<StaticRegistry, RegistryError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let registry = parse_records(&content)?;
    tracing::info!(
        "Loaded {} records from {}",
        crate::RecordSource::len(&registry),
        path.display()
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordSource;
    use idcheck_types::{PrimaryId, Sex};
    use std::io::Write;

    const SAMPLE: &str = r#"
        [[records]]
        nin = "55555555555"
        bvn = "66666666666"
        firstName = "Grace"
        lastName = "Hopper"
        gender = "Female"
    "#;

    #[test]
    fn parses_records_with_defaults() {
        let reg = parse_records(SAMPLE).unwrap();
        let grace = reg
            .find_by_primary_id(&PrimaryId::parse("55555555555").unwrap())
            .unwrap();
        assert_eq!(grace.sex, Sex::Female);
        assert_eq!(grace.middle_name, "");
        assert_eq!(grace.portrait_ref.as_str(), idcheck_types::PortraitRef::PLACEHOLDER);
    }

    #[test]
    fn malformed_id_in_file_is_parse_error() {
        let bad = SAMPLE.replace("55555555555", "5555");
        assert!(matches!(parse_records(&bad), Err(RegistryError::Parse(_))));
    }

    #[test]
    fn empty_file_is_empty_registry() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let reg = load_records(file.path()).unwrap();
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_records("/nonexistent/records.toml").unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn sample_record_file_matches_demo_set() {
        let reg = parse_records(include_str!("../../demos/records.toml")).unwrap();
        let mut from_file: Vec<_> = reg.iter().cloned().collect();
        let mut demo = crate::demo_records();
        from_file.sort_by(|a, b| a.primary_id.as_str().cmp(b.primary_id.as_str()));
        demo.sort_by(|a, b| a.primary_id.as_str().cmp(b.primary_id.as_str()));
        assert_eq!(from_file, demo);
    }
}
