//! Delivery data and constraint validation
//!
//! Two entry points:
//! - [`validate_delivery_data`] checks parsed upload rows and reports a capped
//!   list of per-row messages
//! - [`validate_constraints`] checks the routing form and keys each error by
//!   field name
//!
//! Both are built on the fluent [`Validator`].
//!
//! # Example
//!
//! ```
//! use routeplan_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("start_location", "Depot 1")
//!     .at_least("max_stops_per_route", 0, 1)
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert!(result.error_for("max_stops_per_route").is_some());
//! ```

use crate::error::{Error, ErrorCode, Result};
use crate::model::{Constraints, REQUIRED_FIELDS};
use crate::parse::RawRecord;
use once_cell::sync::Lazy;
use regex::Regex;
use routeplan_geo::{is_valid_latitude, is_valid_longitude};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Maximum number of row messages reported back to the user.
pub const MAX_REPORTED_ERRORS: usize = 10;

static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid regex"));

/// Validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationError>,
}

impl ValidationResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationError] {
        &self.warnings
    }

    /// First error reported for `field`
    pub fn error_for(&self, field: &str) -> Option<&ValidationError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationError) {
        self.warnings.push(warning);
    }

    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let details: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::InvalidConstraint,
                format!("Invalid route constraints ({} problem(s))", details.len()),
            )
            .with_details(details))
        }
    }
}

/// Fluent validator builder
pub struct Validator {
    result: ValidationResult,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self {
            result: ValidationResult::new(),
        }
    }

    fn fail(
        mut self,
        field: &str,
        code: &str,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    ) -> Self {
        self.result.add_error(ValidationError {
            field: field.to_string(),
            message,
            code: code.to_string(),
            expected,
            actual,
        });
        self
    }

    /// Validate that a field is not empty
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.fail(
                field,
                "REQUIRED",
                "Field is required".to_string(),
                Some("non-empty value".to_string()),
                Some("empty".to_string()),
            );
        }
        self
    }

    /// Validate an integer lower bound
    pub fn at_least(self, field: &str, value: u32, min: u32) -> Self {
        if value < min {
            return self.fail(
                field,
                "MIN_VALUE",
                format!("Must be at least {}", min),
                Some(format!(">= {}", min)),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a numeric range
    pub fn range<T: PartialOrd + std::fmt::Display>(
        self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        // Written so NaN fails too.
        if !(value >= min && value <= max) {
            return self.fail(
                field,
                "RANGE",
                format!("Must be between {} and {}", min, max),
                Some(format!("{} - {}", min, max)),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Validate a `HH:MM` time of day
    pub fn time_of_day(self, field: &str, value: &str) -> Self {
        if !TIME_OF_DAY.is_match(value.trim()) {
            return self.fail(
                field,
                "TIME_FORMAT",
                "Must be a time of day (HH:MM)".to_string(),
                Some("HH:MM".to_string()),
                Some(value.to_string()),
            );
        }
        self
    }

    /// Add a custom validation
    pub fn custom<F>(self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        match f() {
            Some(message) => self.fail(field, "CUSTOM", message, None, None),
            None => self,
        }
    }

    /// Add a warning (non-blocking)
    pub fn warn_if(mut self, field: &str, condition: bool, message: &str) -> Self {
        if condition {
            self.result.add_warning(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "WARNING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

/// Outcome of checking uploaded delivery rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeliveryValidation {
    /// False if any problem was found
    pub is_valid: bool,
    /// At most [`MAX_REPORTED_ERRORS`] row messages
    pub errors: Vec<String>,
    /// Number of problems found before truncation
    pub total_errors: usize,
}

impl DeliveryValidation {
    /// Convert to Result type
    pub fn to_result(self) -> Result<()> {
        if self.is_valid {
            return Ok(());
        }
        if self.total_errors == 1 && self.errors.first().map(String::as_str) == Some(NO_DATA) {
            return Err(Error::no_data());
        }

        let hidden = self.total_errors.saturating_sub(self.errors.len());
        let mut err = Error::validation(format!(
            "Delivery data failed validation with {} error(s)",
            self.total_errors
        ))
        .with_details(self.errors);
        if hidden > 0 {
            err = err.with_context(format!("{} more error(s) not shown", hidden));
        }
        Err(err)
    }
}

const NO_DATA: &str = "No delivery data found";

/// Check parsed rows for required fields and coordinate ranges.
///
/// A value counts as missing when the key is absent, null, or a blank string;
/// a coordinate of exactly `0` is accepted. Every row is checked, but only the
/// first [`MAX_REPORTED_ERRORS`] messages are kept.
pub fn validate_delivery_data(records: &[RawRecord]) -> DeliveryValidation {
    if records.is_empty() {
        return DeliveryValidation {
            is_valid: false,
            errors: vec![NO_DATA.to_string()],
            total_errors: 1,
        };
    }

    let mut errors = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let row = i + 1;

        for field in REQUIRED_FIELDS {
            if is_missing(record.get(field)) {
                errors.push(format!("Row {}: Missing required field '{}'", row, field));
            }
        }

        check_coordinate(record.get("lat"), row, "latitude", 90.0, is_valid_latitude, &mut errors);
        check_coordinate(record.get("lng"), row, "longitude", 180.0, is_valid_longitude, &mut errors);
    }

    let total_errors = errors.len();
    errors.truncate(MAX_REPORTED_ERRORS);

    DeliveryValidation {
        is_valid: total_errors == 0,
        errors,
        total_errors,
    }
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

fn check_coordinate(
    value: Option<&Value>,
    row: usize,
    name: &str,
    limit: f64,
    in_range: fn(f64) -> bool,
    errors: &mut Vec<String>,
) {
    if is_missing(value) {
        return;
    }
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        None => errors.push(format!("Row {}: Invalid {} value", row, name)),
        Some(v) if !in_range(v) => errors.push(format!(
            "Row {}: Invalid {} (must be between -{} and {})",
            row, name, limit, limit
        )),
        Some(_) => {}
    }
}

/// Check the routing form. Errors are keyed by the serialized field name.
pub fn validate_constraints(constraints: &Constraints) -> ValidationResult {
    let mut validator = Validator::new()
        .at_least("max_stops_per_route", constraints.max_stops_per_route, 1)
        .at_least("vehicle_capacity", constraints.vehicle_capacity, 1)
        .required("start_location", &constraints.start_location)
        .time_of_day("delivery_window_start", &constraints.delivery_window_start)
        .time_of_day("delivery_window_end", &constraints.delivery_window_end);

    let start = constraints.delivery_window_start.trim();
    let end = constraints.delivery_window_end.trim();
    if TIME_OF_DAY.is_match(start) && TIME_OF_DAY.is_match(end) {
        // Zero-padded HH:MM compares correctly as text.
        validator = validator.custom("delivery_window_end", || {
            (end <= start).then(|| "Must be later than the window start".to_string())
        });
    }

    if let Some(lat) = constraints.start_lat {
        validator = validator.range("start_lat", lat, -90.0, 90.0);
    }
    if let Some(lng) = constraints.start_lng {
        validator = validator.range("start_lng", lng, -180.0, 180.0);
    }

    validator
        .warn_if(
            "start_lat",
            constraints.start_lat.is_some() != constraints.start_lng.is_some(),
            "Both start coordinates are needed; the depot position will be ignored",
        )
        .validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_csv;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn valid_record() -> RawRecord {
        record(json!({
            "id": "D1",
            "customer_name": "Acme",
            "lat": 40.7128,
            "lng": -74.0060,
            "address": "1 Broadway"
        }))
    }

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("name", "  ").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_range_validation_rejects_nan() {
        let result = Validator::new().range("lat", f64::NAN, -90.0, 90.0).validate();
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_time_of_day_validation() {
        assert!(Validator::new().time_of_day("t", "09:30").validate().is_valid());
        assert!(!Validator::new().time_of_day("t", "9:30").validate().is_valid());
        assert!(!Validator::new().time_of_day("t", "24:00").validate().is_valid());
    }

    #[test]
    fn test_empty_data_is_invalid() {
        let result = validate_delivery_data(&[]);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["No delivery data found".to_string()]);
        assert_eq!(result.to_result().unwrap_err().code, ErrorCode::NoData);
    }

    #[test]
    fn test_valid_record_passes() {
        let result = validate_delivery_data(&[valid_record()]);
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.to_result().is_ok());
    }

    #[test]
    fn test_one_message_per_missing_field() {
        let mut r = valid_record();
        r.remove("lat");
        r.remove("lng");
        r.remove("address");

        let result = validate_delivery_data(&[r]);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 3);
        for field in ["lat", "lng", "address"] {
            let expected = format!("Row 1: Missing required field '{}'", field);
            assert!(result.errors.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_blank_and_null_count_as_missing() {
        let mut r = valid_record();
        r.insert("customer_name".into(), json!("   "));
        r.insert("address".into(), Value::Null);

        let result = validate_delivery_data(&[r]);
        assert_eq!(result.total_errors, 2);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let mut r = valid_record();
        r.insert("lat".into(), json!(100));

        let result = validate_delivery_data(&[r]);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.contains("latitude")));
    }

    #[test]
    fn test_longitude_out_of_range_and_non_numeric() {
        let mut a = valid_record();
        a.insert("lng".into(), json!(-181.5));
        let mut b = valid_record();
        b.insert("lat".into(), json!("north"));

        let result = validate_delivery_data(&[a, b]);
        assert_eq!(
            result.errors,
            vec![
                "Row 1: Invalid longitude (must be between -180 and 180)".to_string(),
                "Row 2: Invalid latitude value".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_coordinates_are_accepted() {
        let mut r = valid_record();
        r.insert("lat".into(), json!(0));
        r.insert("lng".into(), json!(0.0));
        assert!(validate_delivery_data(&[r]).is_valid);
    }

    #[test]
    fn test_errors_truncated_but_counted() {
        let rows: Vec<RawRecord> = (0..8).map(|_| record(json!({"id": "X"}))).collect();

        let result = validate_delivery_data(&rows);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), MAX_REPORTED_ERRORS);
        assert_eq!(result.total_errors, 8 * 4);

        let err = result.to_result().unwrap_err();
        assert_eq!(err.details.len(), MAX_REPORTED_ERRORS);
        assert!(err.context.unwrap().contains("22 more"));
    }

    #[test]
    fn test_csv_without_address_column() {
        let records = parse_csv("id,customer_name,lat,lng\n1,Acme,40.7,-74.0\n").unwrap();
        let result = validate_delivery_data(&records);
        assert!(!result.is_valid);
        assert!(!result.errors.is_empty());
        assert!(result.errors.iter().any(|e| e.contains("address")));
    }

    #[test]
    fn test_default_constraints_are_valid() {
        let result = validate_constraints(&Constraints::default());
        assert!(result.is_valid());
        assert!(result.errors().is_empty());
    }

    #[test]
    fn test_zero_max_stops_is_keyed() {
        let c = Constraints {
            max_stops_per_route: 0,
            ..Constraints::default()
        };
        let result = validate_constraints(&c);
        assert!(!result.is_valid());
        assert!(result.error_for("max_stops_per_route").is_some());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_empty_start_location_is_keyed() {
        let c = Constraints {
            start_location: String::new(),
            ..Constraints::default()
        };
        let result = validate_constraints(&c);
        assert!(!result.is_valid());
        assert!(result.error_for("start_location").is_some());
    }

    #[test]
    fn test_window_must_be_ordered() {
        let c = Constraints {
            delivery_window_start: "17:00".into(),
            delivery_window_end: "09:00".into(),
            ..Constraints::default()
        };
        let result = validate_constraints(&c);
        assert!(result.error_for("delivery_window_end").is_some());
        assert!(result.error_for("delivery_window_start").is_none());
    }

    #[test]
    fn test_start_coordinates_checked_and_warned() {
        let c = Constraints {
            start_lat: Some(95.0),
            ..Constraints::default()
        };
        let result = validate_constraints(&c);
        assert!(result.error_for("start_lat").is_some());
        assert_eq!(result.warnings().len(), 1);

        let err = result.to_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConstraint);
        assert!(err.details[0].starts_with("start_lat"));
    }
}
