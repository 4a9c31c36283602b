//! Upload pipeline: detect format, parse, validate, type.

use crate::error::{Error, Result, ResultExt};
use crate::model::DeliveryPoint;
use crate::parse::{into_delivery_points, parse_csv, parse_json, RawRecord};
use crate::validation::validate_delivery_data;
use std::path::Path;
use tracing::{debug, info};

/// Upload formats understood locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Detect the format from a file name's extension (case-insensitive).
    ///
    /// Unknown extensions fail before anything is read.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::unsupported_format(&path.display().to_string())),
        }
    }

    /// MIME type used when uploading to the service
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
        }
    }

    /// Decode `text` into raw rows.
    pub fn parse(&self, text: &str) -> Result<Vec<RawRecord>> {
        match self {
            Self::Csv => parse_csv(text),
            Self::Json => parse_json(text),
        }
    }
}

/// Parse, validate and type an in-memory upload.
pub fn ingest_str(format: FileFormat, text: &str) -> Result<Vec<DeliveryPoint>> {
    let records = format.parse(text)?;
    let validation = validate_delivery_data(&records);
    debug!(
        rows = records.len(),
        errors = validation.total_errors,
        "Validated delivery rows"
    );
    validation.to_result()?;
    into_delivery_points(records)
}

/// Read and ingest a file from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<Vec<DeliveryPoint>> {
    let path = path.as_ref();
    let format = FileFormat::from_path(path)?;

    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::file_not_found(path),
        _ => Error::from(e),
    })?;

    let points = ingest_str(format, &text).context(format!("While loading {}", path.display()))?;
    info!(path = %path.display(), points = points.len(), "Loaded delivery data");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file(suffix: &str, contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_path("a.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_path("A.JSON").unwrap(), FileFormat::Json);
        assert_eq!(
            FileFormat::from_path("notes.txt").unwrap_err().code,
            ErrorCode::UnsupportedFormat
        );
        assert!(FileFormat::from_path("no_extension").is_err());
    }

    #[test]
    fn test_csv_upload_end_to_end() {
        let file = temp_file(
            ".csv",
            "id,customer_name,lat,lng,address\nD1,Acme,40.7128,-74.0060,1 Broadway\n",
        );
        let points = load_file(file.path()).unwrap();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].id, "D1");
        assert_eq!(points[0].address, "1 Broadway");
    }

    #[test]
    fn test_csv_upload_without_address_column() {
        let file = temp_file(".csv", "id,customer_name,lat,lng\nD1,Acme,40.7128,-74.0060\n");
        let err = load_file(file.path()).unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(!err.details.is_empty());
        assert!(err.details.iter().any(|d| d.contains("address")));
        assert!(err.context.unwrap().contains("While loading"));
    }

    #[test]
    fn test_json_single_object_upload() {
        let points = ingest_str(
            FileFormat::Json,
            r#"{"id": 1, "customer_name": "Acme", "lat": 0, "lng": 0, "address": "Null Island"}"#,
        )
        .unwrap();
        assert_eq!(points[0].id, "1");
        assert_eq!(points[0].lat, 0.0);
    }

    #[test]
    fn test_unsupported_format_reported_before_reading() {
        let err = load_file("/definitely/not/here.xlsx").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedFormat);
    }

    #[test]
    fn test_missing_file() {
        let err = load_file("/definitely/not/here.csv").unwrap_err();
        assert_eq!(err.code, ErrorCode::FileNotFound);
    }

    #[test]
    fn test_malformed_csv_aborts() {
        let err = ingest_str(FileFormat::Csv, "id,customer_name\nA,B,C\n").unwrap_err();
        assert_eq!(err.code, ErrorCode::MalformedCsv);
    }
}
