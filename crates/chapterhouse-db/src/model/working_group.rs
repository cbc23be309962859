use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, AsChangeset, serde::Serialize)]
#[diesel(table_name = schema::working_group)]
#[diesel(check_for_backend(Pg))]
pub struct WorkingGroup {
    pub id: uuid::Uuid,
    pub name: String,
    pub description: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::working_group)]
pub struct NewWorkingGroup<'a> {
    pub id: uuid::Uuid,
    pub name: &'a str,
    pub description: &'a str,
}

/// Membership link between a working group and a member.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::working_group_member)]
pub struct NewWorkingGroupMember {
    pub working_group_id: uuid::Uuid,
    pub member_id: uuid::Uuid,
}
