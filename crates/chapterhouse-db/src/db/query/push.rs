//! Query composition for `push_registration`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::push_registration;
use crate::model::push::{NewPushRegistration, PushRegistration};

/// ## Summary
/// Registers a push target; re-registering the same token for a member is a
/// no-op.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    row: &NewPushRegistration<'_>,
) -> QueryResult<()> {
    diesel::insert_into(push_registration::table)
        .values(row)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Removes a push registration owned by the given member. Returns the number
/// of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete_owned(
    conn: &mut DbConnection<'_>,
    id: Uuid,
    member_id: Uuid,
) -> QueryResult<usize> {
    diesel::delete(
        push_registration::table
            .find(id)
            .filter(push_registration::member_id.eq(member_id)),
    )
    .execute(conn)
    .await
}

/// ## Summary
/// Lists the push targets of a set of members.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list_for_members(
    conn: &mut DbConnection<'_>,
    member_ids: &[Uuid],
) -> QueryResult<Vec<PushRegistration>> {
    if member_ids.is_empty() {
        return Ok(Vec::new());
    }

    push_registration::table
        .filter(push_registration::member_id.eq_any(member_ids))
        .select(PushRegistration::as_select())
        .load(conn)
        .await
}
