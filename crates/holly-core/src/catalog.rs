//! The static holiday catalog.
//!
//! Loaded once at startup, validated, and then shared read-only. A catalog
//! that fails validation is a fatal configuration error.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::{HollyError, Result};
use crate::types::HolidayRecord;

/// Catalog shipped with the binary.
const EMBEDDED_CATALOG: &str = include_str!("../data/holidays.json");

/// Ordered, immutable list of holidays.
#[derive(Debug, Clone)]
pub struct HolidayCatalog {
    records: Vec<HolidayRecord>,
}

impl HolidayCatalog {
    /// Build a catalog from records, enforcing every catalog invariant.
    pub fn new(records: Vec<HolidayRecord>) -> Result<Self> {
        validate(&records)?;
        Ok(Self { records })
    }

    /// Parse and validate a JSON array of holiday records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<HolidayRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load and validate a JSON catalog file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        info!(
            path = %path.display(),
            holidays = catalog.len(),
            "Holiday catalog loaded"
        );
        Ok(catalog)
    }

    /// The catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    /// All holidays in chronological order.
    pub fn all_holidays(&self) -> &[HolidayRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn validate(records: &[HolidayRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(HollyError::Catalog("catalog contains no holidays".into()));
    }

    let mut names = HashSet::new();
    let mut previous: Option<&HolidayRecord> = None;

    for record in records {
        let invalid = |reason: String| HollyError::InvalidRecord {
            name: record.name.clone(),
            reason,
        };

        if record.name.trim().is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if !(1..=12).contains(&record.month) {
            return Err(invalid(format!("month {} out of range", record.month)));
        }
        // 2000 is a leap year, so Feb 29 is accepted here.
        if chrono::NaiveDate::from_ymd_opt(2000, record.month, record.day).is_none() {
            return Err(invalid(format!(
                "day {} does not exist in month {}",
                record.day, record.month
            )));
        }
        let expected = format!("{:02}-{:02}", record.month, record.day);
        if record.date != expected {
            return Err(invalid(format!(
                "date '{}' does not match month/day {}",
                record.date, expected
            )));
        }
        if !names.insert(record.name.trim().to_lowercase()) {
            return Err(invalid("duplicate name".into()));
        }
        if let Some(prev) = previous {
            if record.month_day() <= prev.month_day() {
                return Err(invalid(format!(
                    "{} is not after '{}' ({})",
                    record.date, prev.name, prev.date
                )));
            }
        }
        previous = Some(record);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn records() -> Vec<HolidayRecord> {
        vec![
            HolidayRecord::new("New Year's Day", 1, 1),
            HolidayRecord::new("Independence Day", 7, 4),
            HolidayRecord::new("Labor Day", 9, 4),
            HolidayRecord::new("Christmas", 12, 25),
        ]
    }

    #[test]
    fn test_new_keeps_order() {
        let catalog = HolidayCatalog::new(records()).unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.all_holidays()[0].name, "New Year's Day");
        assert_eq!(catalog.all_holidays()[3].name, "Christmas");
    }

    #[test]
    fn test_embedded_catalog_is_valid() {
        let catalog = HolidayCatalog::embedded().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog
            .all_holidays()
            .iter()
            .any(|h| h.name == "Labor Day"));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = HolidayCatalog::new(vec![]).unwrap_err();
        assert!(matches!(err, HollyError::Catalog(_)));
    }

    #[test]
    fn test_out_of_order_rejected() {
        let mut recs = records();
        recs.swap(1, 2);
        let err = HolidayCatalog::new(recs).unwrap_err();
        assert!(matches!(err, HollyError::InvalidRecord { ref name, .. } if name == "Independence Day"));
    }

    #[test]
    fn test_duplicate_date_rejected() {
        let mut recs = records();
        recs.insert(2, HolidayRecord::new("Also Independence", 7, 4));
        let err = HolidayCatalog::new(recs).unwrap_err();
        assert!(matches!(err, HollyError::InvalidRecord { .. }));
    }

    #[test]
    fn test_duplicate_name_case_insensitive_rejected() {
        let mut recs = records();
        recs.push(HolidayRecord::new("christmas", 12, 31));
        let err = HolidayCatalog::new(recs).unwrap_err();
        assert!(err.to_string().contains("duplicate name"));
    }

    #[test]
    fn test_bad_month_rejected() {
        let recs = vec![HolidayRecord::new("Nowhere Day", 13, 1)];
        let err = HolidayCatalog::new(recs).unwrap_err();
        assert!(err.to_string().contains("month 13"));
    }

    #[test]
    fn test_bad_day_rejected() {
        let recs = vec![HolidayRecord::new("April Thirty-First", 4, 31)];
        assert!(HolidayCatalog::new(recs).is_err());
    }

    #[test]
    fn test_leap_day_accepted() {
        let recs = vec![HolidayRecord::new("Leap Day", 2, 29)];
        assert!(HolidayCatalog::new(recs).is_ok());
    }

    #[test]
    fn test_mismatched_date_string_rejected() {
        let mut record = HolidayRecord::new("Labor Day", 9, 4);
        record.date = "09-05".to_string();
        let err = HolidayCatalog::new(vec![record]).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = HolidayCatalog::from_json("[{ \"name\": 3 }]").unwrap_err();
        assert!(matches!(err, HollyError::Serialization(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&records()).unwrap().as_bytes())
            .unwrap();
        let catalog = HolidayCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = HolidayCatalog::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(HollyError::Io(_))));
    }
}
