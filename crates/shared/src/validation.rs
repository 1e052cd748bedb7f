//! Common validation utilities.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

/// Maximum length of free-text notes on a daily record.
pub const MAX_NOTES_LENGTH: usize = 1000;

/// Maximum number of students accepted in one bulk write.
pub const MAX_BULK_STUDENTS: usize = 100;

/// Maximum number of badge entries accepted per daily record.
pub const MAX_ENTRIES_PER_RECORD: usize = 20;

/// How far in the future a record day may lie (clock-skew tolerance).
const MAX_FUTURE_DAYS: i64 = 1;

lazy_static! {
    /// Student codes are 3-4 digit strings.
    static ref STUDENT_CODE_RE: Regex = Regex::new(r"^\d{3,4}$").unwrap();
}

/// Validates a student code (3-4 digit string).
pub fn validate_student_code(code: &str) -> Result<(), ValidationError> {
    if STUDENT_CODE_RE.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("student_code_format");
        err.message = Some("Student code must be a 3-4 digit string".into());
        Err(err)
    }
}

/// Validates a badge priority (1 to 10).
pub fn validate_priority(priority: &i32) -> Result<(), ValidationError> {
    if (1..=10).contains(priority) {
        Ok(())
    } else {
        let mut err = ValidationError::new("priority_range");
        err.message = Some("Priority must be between 1 and 10".into());
        Err(err)
    }
}

/// Validates a negative-outcome limit (1 to 10).
pub fn validate_negative_limit(limit: &i32) -> Result<(), ValidationError> {
    if (1..=10).contains(limit) {
        Ok(())
    } else {
        let mut err = ValidationError::new("negative_limit_range");
        err.message = Some("Negative-outcome limit must be between 1 and 10".into());
        Err(err)
    }
}

/// Validates free-text notes length.
pub fn validate_notes(notes: &str) -> Result<(), ValidationError> {
    if notes.len() <= MAX_NOTES_LENGTH {
        Ok(())
    } else {
        let mut err = ValidationError::new("notes_length");
        err.message = Some("Notes must not exceed 1000 characters".into());
        Err(err)
    }
}

/// Validates that a record day is not unreasonably far in the future.
pub fn validate_record_day(day: NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    if (day - today).num_days() <= MAX_FUTURE_DAYS {
        Ok(())
    } else {
        let mut err = ValidationError::new("record_day_future");
        err.message = Some("Record day must not be in the future".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_valid_student_codes() {
        assert!(validate_student_code("100").is_ok());
        assert!(validate_student_code("1042").is_ok());
    }

    #[test]
    fn test_invalid_student_codes() {
        assert!(validate_student_code("12").is_err());
        assert!(validate_student_code("12345").is_err());
        assert!(validate_student_code("12a4").is_err());
        assert!(validate_student_code("").is_err());
    }

    #[test]
    fn test_priority_range() {
        assert!(validate_priority(&1).is_ok());
        assert!(validate_priority(&10).is_ok());
        assert!(validate_priority(&0).is_err());
        assert!(validate_priority(&11).is_err());
    }

    #[test]
    fn test_negative_limit_range() {
        assert!(validate_negative_limit(&1).is_ok());
        assert!(validate_negative_limit(&10).is_ok());
        assert!(validate_negative_limit(&0).is_err());
        assert!(validate_negative_limit(&11).is_err());
    }

    #[test]
    fn test_notes_length() {
        assert!(validate_notes("short note").is_ok());
        assert!(validate_notes(&"x".repeat(MAX_NOTES_LENGTH)).is_ok());
        assert!(validate_notes(&"x".repeat(MAX_NOTES_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_record_day_today_ok() {
        assert!(validate_record_day(Utc::now().date_naive()).is_ok());
    }

    #[test]
    fn test_record_day_past_ok() {
        let past = Utc::now().date_naive() - Duration::days(90);
        assert!(validate_record_day(past).is_ok());
    }

    #[test]
    fn test_record_day_far_future_rejected() {
        let future = Utc::now().date_naive() + Duration::days(7);
        assert!(validate_record_day(future).is_err());
    }
}
