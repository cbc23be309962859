use diesel::{pg::Pg, prelude::*};

use chapterhouse_core::recurrence::EventOccurrence;

use crate::db::{enums::RecurrenceRule, schema};

/// One persisted event occurrence. Rows belonging to the same recurring
/// series share a `series_uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = schema::event)]
#[diesel(check_for_backend(Pg))]
pub struct Event {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub working_group_id: uuid::Uuid,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub series_uuid: Option<uuid::Uuid>,
    pub recurrence: RecurrenceRule,
    pub series_end_at: Option<chrono::DateTime<chrono::Utc>>,
    pub alert_sent: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::event)]
pub struct NewEvent {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub location: String,
    pub working_group_id: uuid::Uuid,
    pub start_at: chrono::DateTime<chrono::Utc>,
    pub end_at: chrono::DateTime<chrono::Utc>,
    pub series_uuid: Option<uuid::Uuid>,
    pub recurrence: RecurrenceRule,
    pub series_end_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl NewEvent {
    /// Maps an expander occurrence to an insert row with a fresh id.
    #[must_use]
    pub fn from_occurrence(occurrence: EventOccurrence) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            name: occurrence.name,
            description: occurrence.description,
            location: occurrence.location,
            working_group_id: occurrence.working_group_id,
            start_at: occurrence.start_at,
            end_at: occurrence.end_at,
            series_uuid: occurrence.series_uuid,
            recurrence: occurrence.recurrence.into(),
            series_end_at: occurrence.series_end_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapterhouse_core::recurrence::RecurrenceRule as CoreRule;
    use chrono::TimeZone;

    #[test_log::test]
    fn from_occurrence_carries_series_fields() {
        let series_uuid = uuid::Uuid::now_v7();
        let start_at = chrono::Utc.with_ymd_and_hms(2026, 4, 1, 18, 0, 0).unwrap();
        let end_at = start_at + chrono::TimeDelta::hours(2);
        let series_end_at = chrono::Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        let row = NewEvent::from_occurrence(EventOccurrence {
            name: "Board meeting".to_string(),
            description: "Quarterly planning".to_string(),
            location: "Annex".to_string(),
            working_group_id: uuid::Uuid::now_v7(),
            start_at,
            end_at,
            series_uuid: Some(series_uuid),
            recurrence: CoreRule::Weekly,
            series_end_at: Some(series_end_at),
        });

        assert_eq!(row.series_uuid, Some(series_uuid));
        assert_eq!(row.recurrence, RecurrenceRule::Weekly);
        assert_eq!(row.start_at, start_at);
        assert_eq!(row.end_at, end_at);
        assert_eq!(row.series_end_at, Some(series_end_at));
    }
}
