//! Query composition for `member`.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::db::connection::DbConnection;
use crate::db::schema::member;
use crate::model::member::{Member, NewMember};

/// ## Summary
/// Inserts a member and returns the stored row.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn insert(conn: &mut DbConnection<'_>, row: &NewMember<'_>) -> QueryResult<Member> {
    diesel::insert_into(member::table)
        .values(row)
        .returning(Member::as_select())
        .get_result(conn)
        .await
}

/// ## Summary
/// Looks up a member by id.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_id(conn: &mut DbConnection<'_>, id: Uuid) -> QueryResult<Option<Member>> {
    member::table
        .find(id)
        .select(Member::as_select())
        .first(conn)
        .await
        .optional()
}

/// ## Summary
/// Looks up a member by email.
///
/// ## Errors
/// Returns an error if the database operation fails.
pub async fn find_by_email(conn: &mut DbConnection<'_>, email: &str) -> QueryResult<Option<Member>> {
    member::table
        .filter(member::email.eq(email))
        .select(Member::as_select())
        .first(conn)
        .await
        .optional()
}
