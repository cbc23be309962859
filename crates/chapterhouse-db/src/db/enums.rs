//! Database enum types with Diesel serialization.
//!
//! This module provides type-safe enum wrappers for database CHECK constraints.
//! Each enum implements `ToSql` and `FromSql` for automatic conversion between Rust and `PostgreSQL`.

use diesel::deserialize::{self, FromSql, FromSqlRow};
use diesel::expression::AsExpression;
use diesel::pg::{Pg, PgValue};
use diesel::serialize::{self, IsNull, Output, ToSql};
use diesel::sql_types::Text;
use std::fmt;
use std::io::Write;

/// Recurrence cadence of an event row.
///
/// Maps to `event.recurrence` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceRule {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl ToSql<Text, Pg> for RecurrenceRule {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for RecurrenceRule {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"none" => Ok(Self::None),
            b"daily" => Ok(Self::Daily),
            b"weekly" => Ok(Self::Weekly),
            b"monthly" => Ok(Self::Monthly),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl RecurrenceRule {
    /// Returns the database string representation of this recurrence rule.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<chapterhouse_core::recurrence::RecurrenceRule> for RecurrenceRule {
    fn from(core_rule: chapterhouse_core::recurrence::RecurrenceRule) -> Self {
        use chapterhouse_core::recurrence::RecurrenceRule as CoreRule;
        match core_rule {
            CoreRule::None => Self::None,
            CoreRule::Daily => Self::Daily,
            CoreRule::Weekly => Self::Weekly,
            CoreRule::Monthly => Self::Monthly,
        }
    }
}

impl From<RecurrenceRule> for chapterhouse_core::recurrence::RecurrenceRule {
    fn from(db_rule: RecurrenceRule) -> Self {
        match db_rule {
            RecurrenceRule::None => Self::None,
            RecurrenceRule::Daily => Self::Daily,
            RecurrenceRule::Weekly => Self::Weekly,
            RecurrenceRule::Monthly => Self::Monthly,
        }
    }
}

/// Member role classification.
///
/// Maps to `member.role` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Member,
    Board,
}

impl ToSql<Text, Pg> for MemberRole {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for MemberRole {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"member" => Ok(Self::Member),
            b"board" => Ok(Self::Board),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl MemberRole {
    /// Returns the database string representation of this member role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Board => "board",
        }
    }

    /// Parses the database string representation.
    #[must_use]
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Self::Member),
            "board" => Some(Self::Board),
            _ => None,
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendance status for an event occurrence.
///
/// Maps to `event_attendance.status` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Going,
    NotGoing,
    Attended,
}

impl ToSql<Text, Pg> for AttendanceStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for AttendanceStatus {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"going" => Ok(Self::Going),
            b"not_going" => Ok(Self::NotGoing),
            b"attended" => Ok(Self::Attended),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl AttendanceStatus {
    /// Returns the database string representation of this attendance status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Going => "going",
            Self::NotGoing => "not_going",
            Self::Attended => "attended",
        }
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Push delivery platform for a registered device.
///
/// Maps to `push_registration.platform` CHECK constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsExpression,
    FromSqlRow,
    serde::Serialize,
    serde::Deserialize,
)]
#[diesel(sql_type = Text)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
}

impl ToSql<Text, Pg> for Platform {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(IsNull::No)
    }
}

impl FromSql<Text, Pg> for Platform {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        match bytes.as_bytes() {
            b"ios" => Ok(Self::Ios),
            b"android" => Ok(Self::Android),
            b"web" => Ok(Self::Web),
            _ => Err("Unrecognized enum variant".into()),
        }
    }
}

impl Platform {
    /// Returns the database string representation of this platform.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        }
    }

    /// True for platforms delivered through the mobile push gateway.
    #[must_use]
    pub const fn is_mobile(self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapterhouse_core::recurrence::RecurrenceRule as CoreRule;

    #[test_log::test]
    fn recurrence_rule_round_trips_through_core() {
        for core in [
            CoreRule::None,
            CoreRule::Daily,
            CoreRule::Weekly,
            CoreRule::Monthly,
        ] {
            let db: RecurrenceRule = core.into();
            assert_eq!(db.as_str(), core.as_str());
            assert_eq!(CoreRule::from(db), core);
        }
    }

    #[test_log::test]
    fn enums_serialize_to_their_database_strings() {
        for rule in [
            RecurrenceRule::None,
            RecurrenceRule::Daily,
            RecurrenceRule::Weekly,
            RecurrenceRule::Monthly,
        ] {
            assert_eq!(
                serde_json::to_value(rule).expect("rule should serialize"),
                serde_json::Value::String(rule.as_str().to_string())
            );
        }
        assert_eq!(
            serde_json::to_value(AttendanceStatus::NotGoing).expect("status should serialize"),
            serde_json::Value::String("not_going".to_string())
        );
        assert_eq!(
            serde_json::to_value(MemberRole::Board).expect("role should serialize"),
            serde_json::Value::String("board".to_string())
        );
    }

    #[test_log::test]
    fn member_role_parses_its_own_representation() {
        for role in [MemberRole::Member, MemberRole::Board] {
            assert_eq!(MemberRole::parse_str(role.as_str()), Some(role));
        }
        assert_eq!(MemberRole::parse_str("admin"), None);
    }

    #[test_log::test]
    fn mobile_platforms_are_ios_and_android() {
        assert!(Platform::Ios.is_mobile());
        assert!(Platform::Android.is_mobile());
        assert!(!Platform::Web.is_mobile());
    }
}
