//! Query composition for `event`.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::event;
use crate::model::event::{Event, NewEvent};

/// ## Summary
/// Inserts all rows of one expansion in a batch and returns the stored rows
/// in insertion order.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert_batch(conn: &mut DbConnection<'_>, rows: &[NewEvent]) -> QueryResult<Vec<Event>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    diesel::insert_into(event::table)
        .values(rows)
        .returning(Event::as_select())
        .get_results(conn)
        .await
}

/// ## Summary
/// Looks up an event occurrence by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Event>> {
    event::table
        .find(id)
        .select(Event::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists event occurrences in chronological order, optionally restricted to
/// one working group.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list(
    conn: &mut DbConnection<'_>,
    working_group_id: Option<Uuid>,
) -> QueryResult<Vec<Event>> {
    let mut query = event::table.into_boxed();
    if let Some(group_id) = working_group_id {
        query = query.filter(event::working_group_id.eq(group_id));
    }
    query
        .order(event::start_at.asc())
        .select(Event::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Lists the occurrence ids belonging to a series.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn ids_by_series(
    conn: &mut DbConnection<'_>,
    series_uuid: Uuid,
) -> QueryResult<Vec<Uuid>> {
    event::table
        .filter(event::series_uuid.eq(series_uuid))
        .select(event::id)
        .load(conn)
        .await
}

/// ## Summary
/// Deletes an event occurrence. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(event::table.find(id)).execute(conn).await
}

/// ## Summary
/// Deletes every occurrence of a series. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_by_series(conn: &mut DbConnection<'_>, series_uuid: Uuid) -> QueryResult<usize> {
    diesel::delete(event::table.filter(event::series_uuid.eq(series_uuid)))
        .execute(conn)
        .await
}

/// ## Summary
/// Selects events starting inside `[now, now + lead]` that have not been
/// alerted yet, marking them sent in the same statement so a concurrent
/// scanner pass cannot pick them up again.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn claim_due_alerts(
    conn: &mut DbConnection<'_>,
    now: DateTime<Utc>,
    lead: chrono::TimeDelta,
) -> QueryResult<Vec<Event>> {
    diesel::update(
        event::table
            .filter(event::alert_sent.eq(false))
            .filter(event::start_at.ge(now))
            .filter(event::start_at.le(now + lead)),
    )
    .set(event::alert_sent.eq(true))
    .returning(Event::as_select())
    .get_results(conn)
    .await
}
