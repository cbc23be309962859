use diesel::{pg::Pg, prelude::*};

use crate::db::{enums::Platform, schema};

/// A registered push target: a mobile provider token or a web-push
/// subscription endpoint (with its keys stored alongside).
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = schema::push_registration)]
#[diesel(check_for_backend(Pg))]
pub struct PushRegistration {
    pub id: uuid::Uuid,
    pub member_id: uuid::Uuid,
    pub platform: Platform,
    pub token: String,
    pub web_push_keys: Option<serde_json::Value>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::push_registration)]
pub struct NewPushRegistration<'a> {
    pub id: uuid::Uuid,
    pub member_id: uuid::Uuid,
    pub platform: Platform,
    pub token: &'a str,
    pub web_push_keys: Option<&'a serde_json::Value>,
}
