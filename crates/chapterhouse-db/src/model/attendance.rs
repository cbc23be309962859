use diesel::{pg::Pg, prelude::*};

use crate::db::{enums::AttendanceStatus, schema};

#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, serde::Serialize)]
#[diesel(table_name = schema::event_attendance)]
#[diesel(check_for_backend(Pg))]
pub struct EventAttendance {
    pub event_id: uuid::Uuid,
    pub member_id: uuid::Uuid,
    pub status: AttendanceStatus,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::event_attendance)]
pub struct NewEventAttendance {
    pub event_id: uuid::Uuid,
    pub member_id: uuid::Uuid,
    pub status: AttendanceStatus,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}
