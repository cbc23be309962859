//! Recurring-event expansion.
//!
//! Given a user-submitted event draft and a recurrence configuration, this
//! module produces the full set of concrete occurrences for the series. The
//! expander is a pure function over already-validated inputs: the HTTP layer
//! rejects malformed drafts before it runs, and the database layer persists
//! whatever it returns. All timestamps are UTC.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc, Weekday};
use uuid::Uuid;

/// Cadence governing series generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RecurrenceRule {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parses the wire representation, returning `None` for anything outside
    /// the four enumerated values.
    #[must_use]
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sub-mode of monthly recurrence: fixed day-of-month or nth-weekday-of-month.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MonthlyPattern {
    #[default]
    Date,
    Weekday,
}

impl MonthlyPattern {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Weekday => "weekday",
        }
    }
}

impl std::fmt::Display for MonthlyPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-submitted template for a series.
///
/// Invariant (enforced by the caller): `end_at > start_at`, text fields
/// trimmed and non-empty, `working_group_id` references an existing group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub working_group_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Recurrence configuration accompanying a draft.
///
/// `series_uuid` is generated by the caller whenever `rule != None` so that
/// every persisted occurrence of one expansion can be selected together
/// later (bulk delete, bulk attendance).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceConfig {
    pub rule: RecurrenceRule,
    pub monthly_pattern: MonthlyPattern,
    pub series_end: Option<DateTime<Utc>>,
    pub series_uuid: Option<Uuid>,
}

impl RecurrenceConfig {
    /// Configuration for a one-off event.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            rule: RecurrenceRule::None,
            monthly_pattern: MonthlyPattern::Date,
            series_end: None,
            series_uuid: None,
        }
    }
}

/// One concrete event instance produced by the expander.
///
/// Within one expansion only `start_at`/`end_at` vary; every other field is
/// shared across the series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOccurrence {
    pub name: String,
    pub description: String,
    pub location: String,
    pub working_group_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub series_uuid: Option<Uuid>,
    pub recurrence: RecurrenceRule,
    pub series_end_at: Option<DateTime<Utc>>,
}

/// ## Summary
/// Expands a draft and recurrence configuration into the ordered sequence of
/// concrete occurrences for the series.
///
/// The base occurrence is always emitted first, with the draft's timestamps
/// untouched. For a recurring rule with a series end, subsequent occurrences
/// are generated by stepping the start cursor until the next candidate would
/// pass `series_end`; a candidate exactly equal to `series_end` is included.
/// Every occurrence keeps the base duration (`end_at - start_at`).
///
/// The expander assumes pre-validated input and performs no validation of
/// its own.
#[must_use]
pub fn expand(draft: &EventDraft, config: &RecurrenceConfig) -> Vec<EventOccurrence> {
    let duration = draft.end_at - draft.start_at;

    let mut occurrences = vec![occurrence_at(draft, config, draft.start_at, duration)];

    let Some(series_end) = config.series_end else {
        return occurrences;
    };
    if config.rule == RecurrenceRule::None {
        return occurrences;
    }

    // The nth-weekday anchor is fixed from the original base start. It must
    // not be recomputed from the cursor: after a fallback month the cursor's
    // own week index would differ and silently change the series.
    let week_index = (draft.start_at.day() - 1) / 7 + 1;
    let weekday = draft.start_at.weekday();
    let time_of_day = draft.start_at.time();

    let mut cursor = draft.start_at;
    loop {
        let next = match config.rule {
            RecurrenceRule::None => None,
            RecurrenceRule::Daily => cursor.checked_add_signed(TimeDelta::days(1)),
            RecurrenceRule::Weekly => cursor.checked_add_signed(TimeDelta::days(7)),
            RecurrenceRule::Monthly => match config.monthly_pattern {
                MonthlyPattern::Date => next_month_same_date(cursor),
                MonthlyPattern::Weekday => {
                    nth_weekday_of_next_month(cursor, week_index, weekday, time_of_day)
                }
            },
        };

        let Some(next) = next else {
            break;
        };
        if next > series_end {
            break;
        }

        occurrences.push(occurrence_at(draft, config, next, duration));
        cursor = next;
    }

    occurrences
}

fn occurrence_at(
    draft: &EventDraft,
    config: &RecurrenceConfig,
    start_at: DateTime<Utc>,
    duration: TimeDelta,
) -> EventOccurrence {
    EventOccurrence {
        name: draft.name.clone(),
        description: draft.description.clone(),
        location: draft.location.clone(),
        working_group_id: draft.working_group_id,
        start_at,
        end_at: start_at + duration,
        series_uuid: config.series_uuid,
        recurrence: config.rule,
        series_end_at: config.series_end,
    }
}

/// Number of days in the given month.
fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map_or(28, |d| d.day())
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Same day-of-month and time in the following month, rolling forward when
/// the target month is too short. Jan 31 + 1 month lands in early March,
/// mirroring the rollover (non-clamping) calendar arithmetic the series
/// semantics require.
fn next_month_same_date(cursor: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let (year, month) = month_after(cursor.year(), cursor.month());
    let day = cursor.day();

    let date = if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
        date
    } else {
        // Spill the excess days into the month after the target. The excess
        // is at most 3 (day 31 into a 28-day February), so the result is
        // always a valid date.
        let overflow = day - days_in_month(year, month);
        let (spill_year, spill_month) = month_after(year, month);
        NaiveDate::from_ymd_opt(spill_year, spill_month, overflow)?
    };

    Some(date.and_time(cursor.time()).and_utc())
}

/// The `week_index`-th `weekday` of the month after the cursor's month, at
/// the series' base time of day. When that month has no such occurrence the
/// previous week is used instead.
fn nth_weekday_of_next_month(
    cursor: DateTime<Utc>,
    week_index: u32,
    weekday: Weekday,
    time_of_day: chrono::NaiveTime,
) -> Option<DateTime<Utc>> {
    let (year, month) = month_after(cursor.year(), cursor.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let offset =
        (weekday.num_days_from_monday() + 7 - first.weekday().num_days_from_monday()) % 7;
    let mut day = 1 + offset + (week_index - 1) * 7;
    if day > days_in_month(year, month) {
        day -= 7;
    }

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.and_time(time_of_day).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn draft(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> EventDraft {
        EventDraft {
            name: "General Meeting".to_string(),
            description: "Monthly sync for everyone".to_string(),
            location: "Main hall".to_string(),
            working_group_id: Uuid::now_v7(),
            start_at,
            end_at,
        }
    }

    fn recurring(
        rule: RecurrenceRule,
        monthly_pattern: MonthlyPattern,
        series_end: DateTime<Utc>,
    ) -> RecurrenceConfig {
        RecurrenceConfig {
            rule,
            monthly_pattern,
            series_end: Some(series_end),
            series_uuid: Some(Uuid::now_v7()),
        }
    }

    #[test_log::test]
    fn days_in_month_counts_februaries_and_year_end() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
    }

    #[test_log::test]
    fn rule_none_yields_exactly_the_base() {
        let base = draft(utc(2026, 3, 10, 18, 0), utc(2026, 3, 10, 20, 0));
        let occurrences = expand(&base, &RecurrenceConfig::single());

        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].start_at, base.start_at);
        assert_eq!(occurrences[0].end_at, base.end_at);
        assert_eq!(occurrences[0].series_uuid, None);
        assert_eq!(occurrences[0].recurrence, RecurrenceRule::None);
    }

    #[test_log::test]
    fn missing_series_end_yields_exactly_the_base() {
        let base = draft(utc(2026, 3, 10, 18, 0), utc(2026, 3, 10, 20, 0));
        let config = RecurrenceConfig {
            rule: RecurrenceRule::Daily,
            monthly_pattern: MonthlyPattern::Date,
            series_end: None,
            series_uuid: Some(Uuid::now_v7()),
        };

        assert_eq!(expand(&base, &config).len(), 1);
    }

    #[test_log::test]
    fn series_end_before_base_yields_exactly_the_base() {
        let base = draft(utc(2026, 3, 10, 18, 0), utc(2026, 3, 10, 20, 0));
        let config = recurring(
            RecurrenceRule::Weekly,
            MonthlyPattern::Date,
            utc(2026, 3, 1, 0, 0),
        );

        let occurrences = expand(&base, &config);
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].start_at, base.start_at);
    }

    #[test_log::test]
    fn daily_steps_one_calendar_day() {
        let base = draft(utc(2026, 1, 1, 10, 0), utc(2026, 1, 1, 11, 30));
        let config = recurring(
            RecurrenceRule::Daily,
            MonthlyPattern::Date,
            utc(2026, 1, 5, 23, 0),
        );

        let occurrences = expand(&base, &config);
        assert_eq!(occurrences.len(), 5);
        for (k, occurrence) in occurrences.iter().enumerate() {
            let k = i64::try_from(k).unwrap();
            assert_eq!(occurrence.start_at, base.start_at + TimeDelta::days(k));
            assert_eq!(occurrence.end_at - occurrence.start_at, TimeDelta::minutes(90));
        }
    }

    #[test_log::test]
    fn weekly_steps_seven_calendar_days() {
        let base = draft(utc(2026, 1, 6, 19, 0), utc(2026, 1, 6, 21, 0));
        let config = recurring(
            RecurrenceRule::Weekly,
            MonthlyPattern::Date,
            utc(2026, 2, 3, 19, 0),
        );

        let occurrences = expand(&base, &config);
        // Jan 6, 13, 20, 27, Feb 3 (boundary is inclusive).
        assert_eq!(occurrences.len(), 5);
        for (k, occurrence) in occurrences.iter().enumerate() {
            let k = i64::try_from(k).unwrap();
            assert_eq!(occurrence.start_at, base.start_at + TimeDelta::days(7 * k));
        }
    }

    #[test_log::test]
    fn boundary_exactly_at_series_end_is_included() {
        let base = draft(utc(2026, 1, 1, 10, 0), utc(2026, 1, 1, 11, 0));
        let config = recurring(
            RecurrenceRule::Daily,
            MonthlyPattern::Date,
            utc(2026, 1, 3, 10, 0),
        );

        let occurrences = expand(&base, &config);
        assert_eq!(occurrences.len(), 3);
        assert_eq!(occurrences[2].start_at, utc(2026, 1, 3, 10, 0));
    }

    #[test_log::test]
    fn occurrences_are_strictly_ascending_and_preserve_duration() {
        let base = draft(utc(2026, 1, 31, 10, 0), utc(2026, 1, 31, 12, 15));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Date,
            utc(2026, 12, 31, 0, 0),
        );

        let occurrences = expand(&base, &config);
        assert!(occurrences.len() > 2);
        let duration = base.end_at - base.start_at;
        for pair in occurrences.windows(2) {
            assert!(pair[1].start_at > pair[0].start_at);
        }
        for occurrence in &occurrences {
            assert_eq!(occurrence.end_at - occurrence.start_at, duration);
        }
    }

    #[test_log::test]
    fn occurrence_count_grows_with_series_end() {
        let base = draft(utc(2026, 1, 1, 10, 0), utc(2026, 1, 1, 11, 0));
        let mut previous = 0;
        for days_out in [0, 3, 10, 30, 90] {
            let config = recurring(
                RecurrenceRule::Daily,
                MonthlyPattern::Date,
                base.start_at + TimeDelta::days(days_out),
            );
            let count = expand(&base, &config).len();
            assert!(count >= previous);
            previous = count;
        }
    }

    #[test_log::test]
    fn monthly_by_date_rolls_over_short_months() {
        // Jan 31 2024: February 2024 has 29 days, so the Feb candidate
        // rolls over to Mar 2; the cursor then continues on the 2nd.
        let base = draft(utc(2024, 1, 31, 10, 0), utc(2024, 1, 31, 11, 0));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Date,
            utc(2024, 4, 30, 0, 0),
        );

        let occurrences = expand(&base, &config);
        let starts: Vec<_> = occurrences.iter().map(|o| o.start_at).collect();
        assert_eq!(
            starts,
            vec![
                utc(2024, 1, 31, 10, 0),
                utc(2024, 3, 2, 10, 0),
                utc(2024, 4, 2, 10, 0),
            ]
        );
    }

    #[test_log::test]
    fn monthly_by_date_rolls_over_non_leap_february() {
        let base = draft(utc(2026, 1, 31, 9, 0), utc(2026, 1, 31, 10, 0));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Date,
            utc(2026, 3, 31, 0, 0),
        );

        let occurrences = expand(&base, &config);
        // Feb 2026 has 28 days: 31 - 28 = 3 days spill into March.
        assert_eq!(occurrences[1].start_at, utc(2026, 3, 3, 9, 0));
    }

    #[test_log::test]
    fn monthly_by_weekday_tracks_first_monday() {
        // 2026-06-01 is the first Monday of June 2026.
        let base = draft(utc(2026, 6, 1, 9, 0), utc(2026, 6, 1, 10, 0));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Weekday,
            utc(2026, 9, 30, 0, 0),
        );

        let occurrences = expand(&base, &config);
        let starts: Vec<_> = occurrences.iter().map(|o| o.start_at).collect();
        assert_eq!(
            starts,
            vec![
                utc(2026, 6, 1, 9, 0),
                utc(2026, 7, 6, 9, 0),
                utc(2026, 8, 3, 9, 0),
                utc(2026, 9, 7, 9, 0),
            ]
        );
    }

    #[test_log::test]
    fn monthly_by_weekday_falls_back_when_month_lacks_nth_weekday() {
        // 2026-03-30 is the fifth Monday of March 2026. April and May 2026
        // have only four Mondays each, so both months fall back one week.
        let base = draft(utc(2026, 3, 30, 19, 0), utc(2026, 3, 30, 21, 0));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Weekday,
            utc(2026, 5, 31, 0, 0),
        );

        let occurrences = expand(&base, &config);
        let starts: Vec<_> = occurrences.iter().map(|o| o.start_at).collect();
        assert_eq!(
            starts,
            vec![
                utc(2026, 3, 30, 19, 0),
                utc(2026, 4, 27, 19, 0),
                utc(2026, 5, 25, 19, 0),
            ]
        );
    }

    #[test_log::test]
    fn monthly_by_weekday_anchor_stays_on_base_not_cursor() {
        // After the April fallback the cursor sits on a fourth Monday; the
        // anchor must stay at week five so June (which has five Mondays
        // again: 1, 8, 15, 22, 29) returns to the fifth.
        let base = draft(utc(2026, 3, 30, 19, 0), utc(2026, 3, 30, 20, 0));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Weekday,
            utc(2026, 6, 30, 0, 0),
        );

        let occurrences = expand(&base, &config);
        assert_eq!(occurrences.last().map(|o| o.start_at), Some(utc(2026, 6, 29, 19, 0)));
    }

    #[test_log::test]
    fn shared_fields_are_identical_across_the_series() {
        let base = draft(utc(2026, 1, 1, 10, 0), utc(2026, 1, 1, 11, 0));
        let series_uuid = Uuid::now_v7();
        let series_end = utc(2026, 1, 10, 10, 0);
        let config = RecurrenceConfig {
            rule: RecurrenceRule::Daily,
            monthly_pattern: MonthlyPattern::Date,
            series_end: Some(series_end),
            series_uuid: Some(series_uuid),
        };

        for occurrence in expand(&base, &config) {
            assert_eq!(occurrence.name, base.name);
            assert_eq!(occurrence.description, base.description);
            assert_eq!(occurrence.location, base.location);
            assert_eq!(occurrence.working_group_id, base.working_group_id);
            assert_eq!(occurrence.series_uuid, Some(series_uuid));
            assert_eq!(occurrence.recurrence, RecurrenceRule::Daily);
            assert_eq!(occurrence.series_end_at, Some(series_end));
        }
    }

    #[test_log::test]
    fn rule_parsing_covers_the_four_values() {
        assert_eq!(RecurrenceRule::parse_str("none"), Some(RecurrenceRule::None));
        assert_eq!(RecurrenceRule::parse_str("daily"), Some(RecurrenceRule::Daily));
        assert_eq!(RecurrenceRule::parse_str("weekly"), Some(RecurrenceRule::Weekly));
        assert_eq!(
            RecurrenceRule::parse_str("monthly"),
            Some(RecurrenceRule::Monthly)
        );
        assert_eq!(RecurrenceRule::parse_str("yearly"), None);
        assert_eq!(RecurrenceRule::parse_str(""), None);
    }

    #[test_log::test]
    fn monthly_pattern_defaults_to_date() {
        assert_eq!(MonthlyPattern::default(), MonthlyPattern::Date);
    }

    #[test_log::test]
    fn december_cursor_wraps_into_january() {
        let base = draft(utc(2025, 12, 15, 8, 0), utc(2025, 12, 15, 9, 0));
        let config = recurring(
            RecurrenceRule::Monthly,
            MonthlyPattern::Date,
            utc(2026, 2, 28, 0, 0),
        );

        let occurrences = expand(&base, &config);
        let starts: Vec<_> = occurrences.iter().map(|o| o.start_at).collect();
        assert_eq!(
            starts,
            vec![
                utc(2025, 12, 15, 8, 0),
                utc(2026, 1, 15, 8, 0),
                utc(2026, 2, 15, 8, 0),
            ]
        );
    }
}
