//! Query composition for `announcement`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::announcement;
use crate::model::announcement::{Announcement, AnnouncementUpdate, NewAnnouncement};

/// ## Summary
/// Inserts an announcement and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    row: &NewAnnouncement<'_>,
) -> QueryResult<Announcement> {
    diesel::insert_into(announcement::table)
        .values(row)
        .returning(Announcement::as_select())
        .get_result(conn)
        .await
}

/// ## Summary
/// Looks up an announcement by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    id: Uuid,
) -> QueryResult<Option<Announcement>> {
    announcement::table
        .find(id)
        .select(Announcement::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists announcements, newest first.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list(conn: &mut DbConnection<'_>) -> QueryResult<Vec<Announcement>> {
    announcement::table
        .order(announcement::created_at.desc())
        .select(Announcement::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Applies an edit to an announcement and returns the updated row, or `None`
/// if the id does not exist.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn update(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    changes: &AnnouncementUpdate<'_>,
) -> QueryResult<Option<Announcement>> {
    diesel::update(announcement::table.find(id))
        .set(changes)
        .returning(Announcement::as_select())
        .get_result(conn)
        .await
        .optional()
}

/// ## Summary
/// Deletes an announcement. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(announcement::table.find(id)).execute(conn).await
}
