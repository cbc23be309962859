//! Query composition for `working_group` and its membership table.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::{working_group, working_group_member};
use crate::model::working_group::{NewWorkingGroup, NewWorkingGroupMember, WorkingGroup};

/// ## Summary
/// Inserts a working group and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(
    conn: &mut DbConnection<'_>,
    row: &NewWorkingGroup<'_>,
) -> QueryResult<WorkingGroup> {
    diesel::insert_into(working_group::table)
        .values(row)
        .returning(WorkingGroup::as_select())
        .get_result(conn)
        .await
}

/// ## Summary
/// Looks up a working group by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_id(
    conn: &mut DbConnection<'_>,
    id: Uuid,
) -> QueryResult<Option<WorkingGroup>> {
    working_group::table
        .find(id)
        .select(WorkingGroup::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Lists all working groups ordered by name.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn list(conn: &mut DbConnection<'_>) -> QueryResult<Vec<WorkingGroup>> {
    working_group::table
        .order(working_group::name.asc())
        .select(WorkingGroup::as_select())
        .load(conn)
        .await
}

/// ## Summary
/// Deletes a working group. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn delete(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<usize> {
    diesel::delete(working_group::table.find(id)).execute(conn).await
}

/// ## Summary
/// Adds a member to a working group; a repeated add is a no-op.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn add_member(
    conn: &mut DbConnection<'_>,
    row: &NewWorkingGroupMember,
) -> QueryResult<()> {
    diesel::insert_into(working_group_member::table)
        .values(row)
        .on_conflict_do_nothing()
        .execute(conn)
        .await?;
    Ok(())
}

/// ## Summary
/// Removes a member from a working group. Returns the number of rows removed.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn remove_member(
    conn: &mut DbConnection<'_>,
    working_group_id: Uuid,
    member_id: Uuid,
) -> QueryResult<usize> {
    diesel::delete(
        working_group_member::table
            .filter(working_group_member::working_group_id.eq(working_group_id))
            .filter(working_group_member::member_id.eq(member_id)),
    )
    .execute(conn)
    .await
}

/// ## Summary
/// Lists the member ids of a working group.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn member_ids(
    conn: &mut DbConnection<'_>,
    working_group_id: Uuid,
) -> QueryResult<Vec<Uuid>> {
    working_group_member::table
        .filter(working_group_member::working_group_id.eq(working_group_id))
        .select(working_group_member::member_id)
        .load(conn)
        .await
}
