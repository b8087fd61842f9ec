//! Work-shift time validation.
//!
//! Validates a shift form the way the backend expects it, entirely
//! client-side, so a bad form never reaches the wire. Issues are field-level
//! and all of them are reported at once.

use crate::cli::ShiftFormArgs;
use crate::domain::models::FieldIssue;
use chrono::NaiveTime;

/// Shifts may not end after this time.
const LATEST_END: &str = "22:00";
/// Shifts ending at or before this time have no lunch break.
const LUNCH_OPTIONAL_END: &str = "12:00";

fn issue(field: &'static str, message: impl Into<String>) -> FieldIssue {
    FieldIssue {
        field,
        message: message.into(),
    }
}

fn parse_hhmm(raw: &str) -> Option<NaiveTime> {
    // Strict HH:mm; chrono would also accept H:mm.
    if raw.len() != 5 || raw.as_bytes()[2] != b':' {
        return None;
    }
    NaiveTime::parse_from_str(raw, "%H:%M").ok()
}

fn name_is_valid(name: &str) -> bool {
    let len = name.chars().count();
    (3..=30).contains(&len)
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == ' ' || c == '-')
}

/// Ordered rules; returns every field issue found. Empty means valid.
pub fn validate_shift(form: &ShiftFormArgs) -> Vec<FieldIssue> {
    let mut issues = Vec::new();

    if !name_is_valid(&form.name) {
        issues.push(issue(
            "name",
            "name must be 3-30 letters, digits, spaces or hyphens",
        ));
    }

    let start = parse_hhmm(&form.start);
    let end = parse_hhmm(&form.end);
    if start.is_none() {
        issues.push(issue("start", "start must be a 24h HH:mm time"));
    }
    if end.is_none() {
        issues.push(issue("end", "end must be a 24h HH:mm time"));
    }
    let (Some(start), Some(end)) = (start, end) else {
        return issues;
    };

    let latest = parse_hhmm(LATEST_END).unwrap_or(NaiveTime::MIN);
    if end <= start {
        issues.push(issue("end", "end must be after start"));
    }
    if end > latest {
        issues.push(issue("end", "shifts may not end after 22:00"));
    }
    if !issues.iter().any(|i| i.field == "end") {
        validate_lunch(form, start, end, &mut issues);
    }

    issues
}

fn validate_lunch(
    form: &ShiftFormArgs,
    start: NaiveTime,
    end: NaiveTime,
    issues: &mut Vec<FieldIssue>,
) {
    let cutoff = parse_hhmm(LUNCH_OPTIONAL_END).unwrap_or(NaiveTime::MIN);
    let lunch_required = end > cutoff;

    if !lunch_required {
        // Lunch fields are meaningless for short shifts; supplied values are
        // rejected rather than silently dropped.
        if form.lunch_start.is_some() {
            issues.push(issue(
                "lunch_start",
                "lunch does not apply to shifts ending at or before 12:00",
            ));
        }
        if form.lunch_end.is_some() {
            issues.push(issue(
                "lunch_end",
                "lunch does not apply to shifts ending at or before 12:00",
            ));
        }
        return;
    }

    let lunch_start = match form.lunch_start.as_deref() {
        None => {
            issues.push(issue("lunch_start", "lunch start is required"));
            None
        }
        Some(raw) => {
            let parsed = parse_hhmm(raw);
            if parsed.is_none() {
                issues.push(issue("lunch_start", "lunch start must be a 24h HH:mm time"));
            }
            parsed
        }
    };
    let lunch_end = match form.lunch_end.as_deref() {
        None => {
            issues.push(issue("lunch_end", "lunch end is required"));
            None
        }
        Some(raw) => {
            let parsed = parse_hhmm(raw);
            if parsed.is_none() {
                issues.push(issue("lunch_end", "lunch end must be a 24h HH:mm time"));
            }
            parsed
        }
    };
    let (Some(ls), Some(le)) = (lunch_start, lunch_end) else {
        return;
    };

    if !(start < ls && ls < end) {
        issues.push(issue(
            "lunch_start",
            "lunch start must fall strictly inside the shift",
        ));
    }
    if !(start < le && le < end) {
        issues.push(issue(
            "lunch_end",
            "lunch end must fall strictly inside the shift",
        ));
    }
    if ls >= le {
        issues.push(issue("lunch_start", "lunch start must precede lunch end"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(
        name: &str,
        start: &str,
        end: &str,
        lunch_start: Option<&str>,
        lunch_end: Option<&str>,
    ) -> ShiftFormArgs {
        ShiftFormArgs {
            name: name.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            lunch_start: lunch_start.map(str::to_string),
            lunch_end: lunch_end.map(str::to_string),
        }
    }

    #[test]
    fn noon_shift_without_lunch_is_valid() {
        let issues = validate_shift(&form("Morning", "08:00", "12:00", None, None));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn noon_shift_with_lunch_values_is_invalid() {
        let issues = validate_shift(&form(
            "Morning",
            "08:00",
            "12:00",
            Some("10:00"),
            Some("10:30"),
        ));
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.message.contains("does not apply")));
    }

    #[test]
    fn afternoon_shift_requires_lunch() {
        let issues = validate_shift(&form("Full day", "08:00", "17:00", None, None));
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["lunch_start", "lunch_end"]);
    }

    #[test]
    fn afternoon_shift_with_contained_lunch_is_valid() {
        let issues = validate_shift(&form(
            "Full day",
            "08:00",
            "17:00",
            Some("12:00"),
            Some("13:00"),
        ));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn end_not_after_start_is_invalid() {
        assert!(!validate_shift(&form("Night", "17:00", "17:00", None, None)).is_empty());
        assert!(!validate_shift(&form("Night", "17:00", "09:00", None, None)).is_empty());
    }

    #[test]
    fn end_after_twenty_two_is_invalid() {
        let issues = validate_shift(&form(
            "Late",
            "14:00",
            "22:01",
            Some("17:00"),
            Some("18:00"),
        ));
        assert!(issues.iter().any(|i| i.message.contains("22:00")));
    }

    #[test]
    fn end_at_twenty_two_exactly_is_allowed() {
        let issues = validate_shift(&form(
            "Late",
            "14:00",
            "22:00",
            Some("17:00"),
            Some("18:00"),
        ));
        assert!(issues.is_empty(), "{issues:?}");
    }

    #[test]
    fn lunch_outside_shift_is_invalid() {
        let issues = validate_shift(&form(
            "Full day",
            "08:00",
            "17:00",
            Some("08:00"),
            Some("18:00"),
        ));
        assert!(issues.iter().any(|i| i.field == "lunch_start"));
        assert!(issues.iter().any(|i| i.field == "lunch_end"));
    }

    #[test]
    fn inverted_lunch_is_invalid() {
        let issues = validate_shift(&form(
            "Full day",
            "08:00",
            "17:00",
            Some("14:00"),
            Some("13:00"),
        ));
        assert!(issues
            .iter()
            .any(|i| i.message.contains("precede lunch end")));
    }

    #[test]
    fn name_rules() {
        assert!(!validate_shift(&form("ab", "08:00", "12:00", None, None)).is_empty());
        assert!(!validate_shift(&form("bad!name", "08:00", "12:00", None, None)).is_empty());
        assert!(validate_shift(&form("Turno-1", "08:00", "12:00", None, None)).is_empty());
    }

    #[test]
    fn malformed_times_short_circuit_cross_checks() {
        let issues = validate_shift(&form("Morning", "8am", "noon", None, None));
        let fields: Vec<_> = issues.iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["start", "end"]);
    }
}
