//! Event series orchestration.
//!
//! The HTTP layer validates the draft and hands it here; this module wires
//! the pure recurrence expander to the event store: expansion, row mapping,
//! and transactional persistence of the whole series.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use diesel_async::AsyncConnection;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use chapterhouse_core::recurrence::{
    EventDraft, MonthlyPattern, RecurrenceConfig, RecurrenceRule, expand,
};
use chapterhouse_db::db::connection::DbConnection;
use chapterhouse_db::db::enums::AttendanceStatus;
use chapterhouse_db::db::query::{attendance, event};
use chapterhouse_db::model::attendance::NewEventAttendance;
use chapterhouse_db::model::event::{Event, NewEvent};

/// ## Summary
/// Expands a validated draft into its series and persists every occurrence
/// in one transaction. A fresh series uuid is generated whenever the rule is
/// recurring; one-off events carry none.
///
/// Returns the stored rows in chronological order.
///
/// ## Side Effects
/// - Inserts one `event` row per occurrence.
///
/// ## Errors
/// Returns an error if the database operations fail.
#[tracing::instrument(skip(conn, draft), fields(
    working_group_id = %draft.working_group_id,
    rule = %rule,
    pattern = %monthly_pattern,
    has_series_end = series_end.is_some()
))]
pub async fn create_event(
    conn: &mut DbConnection<'_>,
    draft: &EventDraft,
    rule: RecurrenceRule,
    monthly_pattern: MonthlyPattern,
    series_end: Option<DateTime<Utc>>,
) -> Result<Vec<Event>> {
    let recurring = rule != RecurrenceRule::None;
    let config = RecurrenceConfig {
        rule,
        monthly_pattern,
        series_end: if recurring { series_end } else { None },
        series_uuid: recurring.then(Uuid::now_v7),
    };

    let occurrences = expand(draft, &config);
    tracing::debug!(occurrence_count = occurrences.len(), "Expanded event series");

    let rows: Vec<NewEvent> = occurrences
        .into_iter()
        .map(NewEvent::from_occurrence)
        .collect();

    conn.transaction::<_, anyhow::Error, _>(move |tx| {
        async move {
            event::insert_batch(tx, &rows)
                .await
                .context("failed to insert event series")
        }
        .scope_boxed()
    })
    .await
}

/// ## Summary
/// Deletes every occurrence of a series. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
#[tracing::instrument(skip(conn))]
pub async fn delete_series(conn: &mut DbConnection<'_>, series_uuid: Uuid) -> Result<usize> {
    let removed = event::delete_by_series(conn, series_uuid)
        .await
        .context("failed to delete event series")?;
    tracing::info!(removed, %series_uuid, "Deleted event series");
    Ok(removed)
}

/// ## Summary
/// Records one member's attendance status across every occurrence of a
/// series, in a single transaction. Returns the number of occurrences
/// touched.
///
/// ## Errors
/// Returns an error if the database operations fail.
#[tracing::instrument(skip(conn))]
pub async fn set_series_attendance(
    conn: &mut DbConnection<'_>,
    series_uuid: Uuid,
    member_id: Uuid,
    status: AttendanceStatus,
) -> Result<usize> {
    let event_ids = event::ids_by_series(conn, series_uuid)
        .await
        .context("failed to list series occurrences")?;

    let recorded_at = Utc::now();
    let rows: Vec<NewEventAttendance> = event_ids
        .iter()
        .map(|&event_id| NewEventAttendance {
            event_id,
            member_id,
            status,
            recorded_at,
        })
        .collect();

    let touched = rows.len();
    conn.transaction::<_, anyhow::Error, _>(move |tx| {
        async move {
            attendance::upsert_batch(tx, &rows)
                .await
                .context("failed to record series attendance")
        }
        .scope_boxed()
    })
    .await?;

    Ok(touched)
}
