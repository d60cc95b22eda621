//! Text ingest: raw delimited fields → numeric series.
//!
//! This module is responsible for turning the five pasted text fields into
//! per-dataset numeric vectors. It does not check how the series line up with
//! each other; that is `io::validate`'s job.
//!
//! Format:
//! - `;` separates datasets, `,` separates values within a dataset
//! - whitespace around tokens is ignored
//! - every token must parse as a finite `f64`, otherwise the whole parse fails
//!   (no partial results)

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::domain::{InputField, ParsedSeries, RawSeriesText};
use crate::error::{AppError, ParseError};

/// Dataset separator.
pub const SET_SEPARATOR: char = ';';
/// Value separator within a dataset.
pub const VALUE_SEPARATOR: char = ',';

/// Parse all five fields.
///
/// `time`, `density` and `trend_time` are required; `std_dev` and `names`
/// may be blank.
pub fn parse_raw(raw: &RawSeriesText) -> Result<ParsedSeries, ParseError> {
    let time_sets = parse_required(&raw.time, InputField::Time)?;
    let density_sets = parse_required(&raw.density, InputField::Density)?;
    let trend_time_sets = parse_required(&raw.trend_time, InputField::TrendTime)?;
    let std_dev_sets = parse_optional(&raw.std_dev, InputField::StdDev)?;
    let names = parse_names(&raw.names);

    debug!(
        time_sets = time_sets.len(),
        density_sets = density_sets.len(),
        trend_time_sets = trend_time_sets.len(),
        std_dev_sets = std_dev_sets.as_ref().map(Vec::len),
        names = names.as_ref().map(Vec::len),
        "parsed input text"
    );

    Ok(ParsedSeries {
        time_sets,
        density_sets,
        trend_time_sets,
        std_dev_sets,
        names,
    })
}

/// Load raw fields from a JSON file (`{"time": "...", "density": "...", ...}`).
pub fn load_raw_json(path: &Path) -> Result<RawSeriesText, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid input JSON: {e}")))
}

fn parse_required(text: &str, field: InputField) -> Result<Vec<Vec<f64>>, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::MissingField { field });
    }
    parse_sets(text, field)
}

fn parse_optional(text: &str, field: InputField) -> Result<Option<Vec<Vec<f64>>>, ParseError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_sets(text, field).map(Some)
}

fn parse_sets(text: &str, field: InputField) -> Result<Vec<Vec<f64>>, ParseError> {
    text.split(SET_SEPARATOR)
        .enumerate()
        .map(|(set_idx, set)| {
            set.split(VALUE_SEPARATOR)
                .enumerate()
                .map(|(pos, token)| parse_token(token, field, set_idx + 1, pos + 1))
                .collect()
        })
        .collect()
}

fn parse_token(token: &str, field: InputField, dataset: usize, position: usize) -> Result<f64, ParseError> {
    let token = token.trim();
    let value = token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        field,
        dataset,
        position,
        token: token.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ParseError::NonFinite {
            field,
            dataset,
            position,
            token: token.to_string(),
        });
    }
    Ok(value)
}

fn parse_names(text: &str) -> Option<Vec<String>> {
    if text.trim().is_empty() {
        return None;
    }
    Some(text.split(SET_SEPARATOR).map(|s| s.trim().to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(time: &str, density: &str, trend: &str) -> RawSeriesText {
        RawSeriesText {
            time: time.to_string(),
            density: density.to_string(),
            trend_time: trend.to_string(),
            ..RawSeriesText::default()
        }
    }

    #[test]
    fn splits_sets_and_values() {
        let parsed = parse_raw(&raw(
            "0, 30,60 ; 0,30",
            "0.1,0.2,0.4;0.1,0.3",
            "0,60;0,30",
        ))
        .unwrap();

        assert_eq!(parsed.time_sets, vec![vec![0.0, 30.0, 60.0], vec![0.0, 30.0]]);
        assert_eq!(parsed.density_sets[1], vec![0.1, 0.3]);
        assert_eq!(parsed.trend_time_sets.len(), 2);
        assert!(parsed.std_dev_sets.is_none());
        assert!(parsed.names.is_none());
    }

    #[test]
    fn set_and_value_counts_follow_tokens() {
        let parsed = parse_raw(&raw("1,2,3;4,5;6", "1,1,1;1,1;1", "1,2;4,5;6,6")).unwrap();
        let lens: Vec<usize> = parsed.time_sets.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![3, 2, 1]);
        assert_eq!(parsed.density_sets.len(), 3);
    }

    #[test]
    fn blank_required_field_is_missing() {
        let err = parse_raw(&raw("0,30", "   ", "0,30")).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                field: InputField::Density
            }
        );
    }

    #[test]
    fn bad_token_fails_whole_parse() {
        let err = parse_raw(&raw("0,30;0,abc", "0.1,0.2;0.1,0.2", "0,30;0,30")).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                field: InputField::Time,
                dataset: 2,
                position: 2,
                token: "abc".to_string(),
            }
        );
    }

    #[test]
    fn empty_token_and_trailing_separator_are_rejected() {
        assert!(matches!(
            parse_raw(&raw("0,,30", "0.1,0.2,0.3", "0,30")),
            Err(ParseError::InvalidNumber { position: 2, .. })
        ));
        assert!(matches!(
            parse_raw(&raw("0,30;", "0.1,0.2", "0,30")),
            Err(ParseError::InvalidNumber { dataset: 2, .. })
        ));
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let err = parse_raw(&raw("0,30", "0.1,inf", "0,30")).unwrap_err();
        assert!(matches!(err, ParseError::NonFinite { field: InputField::Density, .. }));
    }

    #[test]
    fn optional_fields_are_parsed_when_present() {
        let mut input = raw("0,30;0,30", "0.1,0.2;0.1,0.2", "0,30;0,30");
        input.std_dev = "0.01,0.02; 0.01,0.02".to_string();
        input.names = " A ; ;B".to_string();

        let parsed = parse_raw(&input).unwrap();
        assert_eq!(parsed.std_dev_sets.unwrap()[1], vec![0.01, 0.02]);
        assert_eq!(
            parsed.names.unwrap(),
            vec!["A".to_string(), String::new(), "B".to_string()]
        );
    }

    #[test]
    fn load_raw_json_defaults_optional_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, r#"{"time": "0,30", "density": "0.1,0.2", "trend_time": "0,30"}"#).unwrap();

        let loaded = load_raw_json(&path).unwrap();
        assert_eq!(loaded.time, "0,30");
        assert!(loaded.std_dev.is_empty());
        assert!(loaded.names.is_empty());
    }
}
