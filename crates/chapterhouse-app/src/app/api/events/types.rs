use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use chapterhouse_core::recurrence::{EventDraft, MonthlyPattern, RecurrenceRule};

/// ## Summary
/// Create event request payload
#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub working_group_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    /// Recurrence rule; absent means a one-off event.
    pub recurrence: Option<String>,
    /// Only meaningful for monthly recurrence; anything but "weekday"
    /// falls back to the same-date pattern.
    pub monthly_pattern: Option<String>,
    pub series_end_at: Option<DateTime<Utc>>,
}

/// A request that passed validation, ready for the expander.
#[derive(Debug)]
pub struct ValidatedEvent {
    pub draft: EventDraft,
    pub rule: RecurrenceRule,
    pub monthly_pattern: MonthlyPattern,
    pub series_end: Option<DateTime<Utc>>,
}

impl CreateEventRequest {
    /// ## Summary
    /// Validates the request: trimmed non-empty name, description, and
    /// location, `end_at > start_at`, and a recognized recurrence rule. An
    /// unknown monthly pattern value is coerced to the same-date pattern
    /// rather than rejected.
    ///
    /// The working-group existence check is left to the handler, which has a
    /// database connection.
    ///
    /// ## Errors
    /// Returns a message suitable for the response body when a field is
    /// invalid.
    pub fn validate(self) -> Result<ValidatedEvent, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required");
        }

        let description = self.description.trim();
        if description.is_empty() {
            return Err("Description is required");
        }

        let location = self.location.trim();
        if location.is_empty() {
            return Err("Location is required");
        }

        if self.end_at <= self.start_at {
            return Err("end_at must be after start_at");
        }

        let rule = match &self.recurrence {
            None => RecurrenceRule::None,
            Some(raw) => {
                RecurrenceRule::parse_str(raw.trim()).ok_or("Unknown recurrence rule")?
            }
        };

        let monthly_pattern = match self.monthly_pattern.as_deref().map(str::trim) {
            Some("weekday") => MonthlyPattern::Weekday,
            _ => MonthlyPattern::Date,
        };

        Ok(ValidatedEvent {
            draft: EventDraft {
                name: name.to_string(),
                description: description.to_string(),
                location: location.to_string(),
                working_group_id: self.working_group_id,
                start_at: self.start_at,
                end_at: self.end_at,
            },
            rule,
            monthly_pattern,
            series_end: self.series_end_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> CreateEventRequest {
        CreateEventRequest {
            name: "  Monthly assembly  ".to_string(),
            description: "Agenda to follow".to_string(),
            location: "Main hall".to_string(),
            working_group_id: Uuid::now_v7(),
            start_at: Utc.with_ymd_and_hms(2026, 6, 1, 18, 0, 0).unwrap(),
            end_at: Utc.with_ymd_and_hms(2026, 6, 1, 20, 0, 0).unwrap(),
            recurrence: Some("monthly".to_string()),
            monthly_pattern: Some("weekday".to_string()),
            series_end_at: None,
        }
    }

    #[test_log::test]
    fn valid_request_passes_with_trimmed_name() {
        let validated = request().validate().expect("request should validate");
        assert_eq!(validated.draft.name, "Monthly assembly");
        assert_eq!(validated.rule, RecurrenceRule::Monthly);
        assert_eq!(validated.monthly_pattern, MonthlyPattern::Weekday);
    }

    #[test_log::test]
    fn blank_name_is_rejected() {
        let mut req = request();
        req.name = "   ".to_string();
        assert_eq!(req.validate().unwrap_err(), "Name is required");
    }

    #[test_log::test]
    fn blank_description_is_rejected() {
        let mut req = request();
        req.description = String::new();
        assert_eq!(req.validate().unwrap_err(), "Description is required");
    }

    #[test_log::test]
    fn blank_location_is_rejected() {
        let mut req = request();
        req.location = "  ".to_string();
        assert_eq!(req.validate().unwrap_err(), "Location is required");
    }

    #[test_log::test]
    fn end_before_start_is_rejected() {
        let mut req = request();
        req.end_at = req.start_at;
        assert_eq!(req.validate().unwrap_err(), "end_at must be after start_at");
    }

    #[test_log::test]
    fn unknown_rule_is_rejected() {
        let mut req = request();
        req.recurrence = Some("yearly".to_string());
        assert_eq!(req.validate().unwrap_err(), "Unknown recurrence rule");
    }

    #[test_log::test]
    fn missing_rule_means_one_off() {
        let mut req = request();
        req.recurrence = None;
        let validated = req.validate().expect("request should validate");
        assert_eq!(validated.rule, RecurrenceRule::None);
    }

    #[test_log::test]
    fn unknown_monthly_pattern_coerces_to_date() {
        let mut req = request();
        req.monthly_pattern = Some("fortnightly".to_string());
        let validated = req.validate().expect("request should validate");
        assert_eq!(validated.monthly_pattern, MonthlyPattern::Date);
    }
}
