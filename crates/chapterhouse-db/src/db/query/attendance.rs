//! Query composition for `event_attendance`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::event_attendance;
use crate::model::attendance::{EventAttendance, NewEventAttendance};

/// ## Summary
/// Records a member's status for one occurrence, overwriting an earlier
/// answer for the same occurrence.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn upsert(conn: &mut DbConnection<'_>, row: &NewEventAttendance) -> QueryResult<()> {
    diesel::insert_into(event_attendance::table)
        .values(row)
        .on_conflict((event_attendance::event_id, event_attendance::member_id))
        .do_update()
        .set((
            event_attendance::status.eq(row.status),
            event_attendance::recorded_at.eq(row.recorded_at),
        ))
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Records a member's status across a whole series in one round trip per
/// occurrence batch.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn upsert_batch(
    conn: &mut DbConnection<'_>,
    rows: &[NewEventAttendance],
) -> QueryResult<()> {
    if rows.is_empty() {
        return Ok(());
    }

    // Batched INSERT .. ON CONFLICT cannot reference per-row excluded values
    // through the diesel DSL with a composite target, so rows are applied
    // individually inside the caller's transaction.
    for row in rows {
        upsert(conn, row).await?;
    }
    Ok(())
}

/// ## Summary
/// Lists attendance answers for one occurrence.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_for_event(
    conn: &mut DbConnection<'_>,
    event_id: Uuid,
) -> QueryResult<Vec<EventAttendance>> {
    event_attendance::table
        .filter(event_attendance::event_id.eq(event_id))
        .order(event_attendance::recorded_at.asc())
        .select(EventAttendance::as_select())
        .load(conn)
        .await
}
