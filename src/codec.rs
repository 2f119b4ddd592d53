//! Delimited text codec for [`CarRecord`].
//!
//! One record per line, comma separated, no quoting:
//!
//! ```text
//! id,model,condition,pricePerDay,status
//! ```
//!
//! Legacy rows carry four fields (`model,condition,price,status`); the first
//! field doubles as the id. Fields beyond the fifth are ignored. The status
//! is kept verbatim, including an empty one.
//!
//! Text fields may not contain the delimiter or a line break, so every line
//! written here parses back to the same record.

use crate::error::{Result, StoreError};
use crate::record::{CarRecord, Condition, UnknownCondition};
use crate::validation::{Validate, ValidationError, format_errors};

/// Field separator.
pub const DELIMITER: char = ',';

/// Fewest fields a line may carry.
pub const MIN_FIELDS: usize = 4;

/// Parse one line.
///
/// Returns `Ok(None)` for an empty line, which callers skip.
///
/// # Errors
/// - [`StoreError::MalformedRecord`] when the line has fewer than four fields.
/// - [`StoreError::InvalidNumber`] when the price is not a decimal number.
/// - [`StoreError::ValidationFailed`] when the assembled record is invalid,
///   including an unknown condition.
///
/// # Example
/// ```
/// use fleetstore::codec::parse_line;
/// use fleetstore::Condition;
///
/// let car = parse_line("car-001,Horizon,excellent,2500,Available")?.unwrap();
/// assert_eq!(car.id, "car-001");
/// assert_eq!(car.condition, Condition::Excellent);
/// assert_eq!(car.price_per_day, 2500.0);
/// # Ok::<(), fleetstore::StoreError>(())
/// ```
pub fn parse_line(line: &str) -> Result<Option<CarRecord>> {
    if line.is_empty() {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return Err(StoreError::MalformedRecord {
            line: line.to_string(),
        });
    }

    // Five or more fields map directly; four fields are the legacy layout
    // with the model standing in for the id.
    let (id, model, condition, price, status) = if fields.len() > MIN_FIELDS {
        (fields[0], fields[1], fields[2], fields[3], fields[4])
    } else {
        (fields[0], fields[0], fields[1], fields[2], fields[3])
    };

    let price_per_day: f64 = price.trim().parse().map_err(|_| StoreError::InvalidNumber {
        value: price.to_string(),
        line: line.to_string(),
    })?;

    let condition: Condition = condition.parse().map_err(|e: UnknownCondition| {
        validation_failed(line, &[ValidationError::field("condition", e.to_string())])
    })?;

    let record = CarRecord {
        id: id.to_string(),
        model: model.to_string(),
        condition,
        price_per_day,
        status: status.to_string(),
    };

    record
        .validate()
        .map_err(|errors| validation_failed(line, &errors))?;

    Ok(Some(record))
}

/// Render a record as one line (no trailing newline).
///
/// Field order is id, model, condition, price, status.
///
/// # Errors
/// [`StoreError::ValidationFailed`] if the record is invalid, or if `id`,
/// `model` or `status` contains the delimiter or a line break; nothing is
/// rendered.
pub fn serialize_record(record: &CarRecord) -> Result<String> {
    record
        .validate()
        .map_err(|errors| validation_failed(&record.id, &errors))?;

    let unwritable: Vec<ValidationError> = [
        ("id", &record.id),
        ("model", &record.model),
        ("status", &record.status),
    ]
    .into_iter()
    .filter(|(_, value)| value.contains([DELIMITER, '\n', '\r']))
    .map(|(field, _)| ValidationError::field(field, "must not contain ',' or a line break"))
    .collect();
    if !unwritable.is_empty() {
        return Err(validation_failed(&record.id, &unwritable));
    }

    Ok(format!(
        "{}{d}{}{d}{}{d}{}{d}{}",
        record.id,
        record.model,
        record.condition,
        record.price_per_day,
        record.status,
        d = DELIMITER
    ))
}

fn validation_failed(line: &str, errors: &[ValidationError]) -> StoreError {
    StoreError::ValidationFailed {
        line: line.to_string(),
        reasons: format_errors(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_yields_nothing() {
        assert!(parse_line("").unwrap().is_none());
    }

    #[test]
    fn five_field_layout() {
        let r = parse_line("car-001,Horizon,excellent,2500,Available")
            .unwrap()
            .unwrap();
        assert_eq!(
            r,
            CarRecord::new("car-001", "Horizon", Condition::Excellent, 2500.0)
        );
    }

    #[test]
    fn legacy_four_field_layout_reuses_first_field_as_id() {
        let r = parse_line("Atlas,good,1800.5,Rented by user u1")
            .unwrap()
            .unwrap();
        assert_eq!(r.id, "Atlas");
        assert_eq!(r.model, "Atlas");
        assert_eq!(r.condition, Condition::Good);
        assert_eq!(r.price_per_day, 1800.5);
        assert_eq!(r.renter(), Some("u1"));
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let r = parse_line("car-001,Horizon,excellent,2500,Available,None")
            .unwrap()
            .unwrap();
        assert_eq!(r.status, "Available");
    }

    #[test]
    fn empty_status_is_kept() {
        let r = parse_line("c9,Vertex,fair,120,").unwrap().unwrap();
        assert_eq!(r.status, "");
        assert!(!r.is_available());

        let r = r.with_status("");
        assert_eq!(parse_line(&serialize_record(&r).unwrap()).unwrap().unwrap(), r);
    }

    #[test]
    fn serialize_rejects_embedded_delimiter_or_newline() {
        for r in [
            CarRecord::new("c1", "Atlas,GT", Condition::Good, 10.0),
            CarRecord::new("c1,x", "Atlas", Condition::Good, 10.0),
            CarRecord::new("c1", "Atlas", Condition::Good, 10.0).with_status("Rented\nby"),
        ] {
            match serialize_record(&r) {
                Err(StoreError::ValidationFailed { reasons, .. }) => {
                    assert!(reasons.contains("line break"), "{reasons}");
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let err = parse_line("a,b,c").unwrap_err();
        assert!(matches!(err, StoreError::MalformedRecord { .. }));
    }

    #[test]
    fn non_numeric_price() {
        let err = parse_line("c1,Falcon,good,cheap,Available").unwrap_err();
        match err {
            StoreError::InvalidNumber { value, .. } => assert_eq!(value, "cheap"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unknown_condition_fails_validation() {
        let err = parse_line("bad,unknown,1000,Available").unwrap_err();
        match err {
            StoreError::ValidationFailed { line, .. } => {
                assert_eq!(line, "bad,unknown,1000,Available");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn non_positive_price_fails_validation() {
        let err = parse_line("c1,Falcon,good,0,Available").unwrap_err();
        assert!(matches!(err, StoreError::ValidationFailed { .. }));
        let err = parse_line("c1,Falcon,good,inf,Available").unwrap_err();
        assert!(matches!(err, StoreError::ValidationFailed { .. }));
    }

    #[test]
    fn serialize_writes_canonical_order() {
        let r = CarRecord::new("c2", "Aurora", Condition::MinorDamages, 2500.0)
            .with_status("Rented by user 42");
        assert_eq!(
            serialize_record(&r).unwrap(),
            "c2,Aurora,minordamages,2500,Rented by user 42"
        );
    }

    #[test]
    fn serialize_rejects_invalid_record() {
        let r = CarRecord::new("c3", "", Condition::Good, 10.0);
        assert!(matches!(
            serialize_record(&r),
            Err(StoreError::ValidationFailed { .. })
        ));
    }
}
