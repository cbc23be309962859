use diesel::{pg::Pg, prelude::*};

use crate::db::schema;

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable, serde::Serialize)]
#[diesel(table_name = schema::announcement)]
#[diesel(check_for_backend(Pg))]
pub struct Announcement {
    pub id: uuid::Uuid,
    pub title: String,
    pub body: String,
    pub author_id: uuid::Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::announcement)]
pub struct NewAnnouncement<'a> {
    pub id: uuid::Uuid,
    pub title: &'a str,
    pub body: &'a str,
    pub author_id: uuid::Uuid,
}

/// Changeset for editing an announcement; bumps `updated_at`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schema::announcement)]
pub struct AnnouncementUpdate<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
