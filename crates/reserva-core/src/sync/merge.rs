//! Field merge rules for sync updates
//!
//! An incoming value wins only when it is present AND truthy: a
//! non-empty string, a non-zero number, or `true`. Anything else keeps
//! the stored value. A client therefore cannot clear a field through
//! the sync path; that is the contract existing callers rely on, not an
//! accident of implementation.

/// Merge a required text field
pub fn merge_text(incoming: Option<&str>, existing: String) -> String {
    match incoming {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => existing,
    }
}

/// Merge an optional text field
pub fn merge_opt_text(incoming: Option<&str>, existing: Option<String>) -> Option<String> {
    match incoming {
        Some(value) if !value.is_empty() => Some(value.to_string()),
        _ => existing,
    }
}

/// Merge an integer field; zero falls back to the stored value
pub fn merge_count(incoming: Option<i64>, existing: i64) -> i64 {
    match incoming {
        Some(value) if value != 0 => value,
        _ => existing,
    }
}

/// Merge a price field; zero falls back to the stored value
pub fn merge_price(incoming: Option<f64>, existing: f64) -> f64 {
    match incoming {
        Some(value) if value != 0.0 => value,
        _ => existing,
    }
}

/// Merge a boolean flag; `false` falls back to the stored value
pub fn merge_flag(incoming: Option<bool>, existing: bool) -> bool {
    match incoming {
        Some(true) => true,
        _ => existing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_present_wins() {
        assert_eq!(merge_text(Some("new"), "old".to_string()), "new");
    }

    #[test]
    fn text_missing_keeps_existing() {
        assert_eq!(merge_text(None, "old".to_string()), "old");
    }

    #[test]
    fn text_empty_does_not_clear() {
        assert_eq!(merge_text(Some(""), "old".to_string()), "old");
    }

    #[test]
    fn opt_text_empty_does_not_clear() {
        assert_eq!(
            merge_opt_text(Some(""), Some("old".to_string())),
            Some("old".to_string())
        );
        assert_eq!(merge_opt_text(None, None), None);
        assert_eq!(merge_opt_text(Some("new"), None), Some("new".to_string()));
    }

    #[test]
    fn count_zero_falls_back() {
        assert_eq!(merge_count(Some(0), 4), 4);
        assert_eq!(merge_count(Some(7), 4), 7);
        assert_eq!(merge_count(None, 4), 4);
    }

    #[test]
    fn price_zero_falls_back() {
        assert!((merge_price(Some(0.0), 9.5) - 9.5).abs() < f64::EPSILON);
        assert!((merge_price(Some(12.0), 9.5) - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flag_false_falls_back() {
        assert!(merge_flag(Some(false), true));
        assert!(merge_flag(None, true));
        assert!(merge_flag(Some(true), false));
        assert!(!merge_flag(Some(false), false));
    }
}
