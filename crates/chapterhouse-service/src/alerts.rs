//! Periodic alert scanning.
//!
//! A background task wakes on a fixed interval, claims event rows whose
//! start falls inside the lead window, and notifies the registered devices
//! of the owning working group's members. Claiming flips `alert_sent` in
//! the same statement that selects the rows, so two scanner passes cannot
//! both pick up the same event.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};

use chapterhouse_core::config::Settings;
use chapterhouse_db::db::DbProvider;
use chapterhouse_db::db::query::{event, push, working_group};
use chapterhouse_db::model::event::Event;

use crate::push::{PushClient, PushMessage};

/// Builds the reminder notification for one upcoming occurrence.
#[must_use]
pub fn reminder_message(event: &Event) -> PushMessage {
    PushMessage {
        title: event.name.clone(),
        body: format!(
            "Starts {} at {}",
            event.start_at.format("%Y-%m-%d %H:%M UTC"),
            event.location
        ),
    }
}

/// ## Summary
/// Runs one scanner pass: claims due events and dispatches reminders.
/// Returns the number of events alerted.
///
/// ## Errors
/// Returns an error if database access fails; push delivery failures are
/// logged by the dispatcher and do not fail the pass.
#[tracing::instrument(skip(provider, settings, push_client))]
pub async fn scan_once(
    provider: &dyn DbProvider,
    settings: &Settings,
    push_client: &PushClient,
) -> Result<usize> {
    let mut conn = provider
        .get_connection()
        .await
        .context("failed to get connection for alert scan")?;

    let lead = TimeDelta::minutes(settings.push.alert_lead_minutes);
    let due = event::claim_due_alerts(&mut conn, Utc::now(), lead)
        .await
        .context("failed to claim due alerts")?;

    if due.is_empty() {
        tracing::trace!("No events due for alerting");
        return Ok(0);
    }

    let alerted = due.len();
    for event_row in due {
        let member_ids = working_group::member_ids(&mut conn, event_row.working_group_id)
            .await
            .context("failed to list working group members")?;
        let registrations = push::list_for_members(&mut conn, &member_ids)
            .await
            .context("failed to list push registrations")?;

        let message = reminder_message(&event_row);
        let summary = push_client.dispatch(&registrations, &message).await;
        tracing::info!(
            event_id = %event_row.id,
            sent = summary.sent,
            failed = summary.failed,
            "Dispatched event reminder"
        );
    }

    Ok(alerted)
}

/// ## Summary
/// Runs the scanner forever on the configured interval. Intended to be
/// spawned as a background task next to the HTTP server.
pub async fn run_alert_scanner(
    provider: Arc<dyn DbProvider>,
    settings: Arc<Settings>,
    push_client: PushClient,
) {
    let period = std::time::Duration::from_secs(settings.push.scan_interval_seconds.max(1));
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::info!(
        interval_seconds = period.as_secs(),
        lead_minutes = settings.push.alert_lead_minutes,
        "Alert scanner started"
    );

    loop {
        interval.tick().await;
        match scan_once(provider.as_ref(), &settings, &push_client).await {
            Ok(0) => {}
            Ok(alerted) => tracing::debug!(alerted, "Alert scan pass complete"),
            Err(err) => tracing::warn!(error = ?err, "Alert scan pass failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapterhouse_db::db::enums::RecurrenceRule;
    use chrono::TimeZone;

    #[test_log::test]
    fn reminder_message_names_the_event_and_location() {
        let event = Event {
            id: uuid::Uuid::now_v7(),
            name: "General Meeting".to_string(),
            description: "Monthly sync".to_string(),
            location: "Main hall".to_string(),
            working_group_id: uuid::Uuid::now_v7(),
            start_at: chrono::Utc.with_ymd_and_hms(2026, 5, 4, 18, 30, 0).unwrap(),
            end_at: chrono::Utc.with_ymd_and_hms(2026, 5, 4, 20, 0, 0).unwrap(),
            series_uuid: None,
            recurrence: RecurrenceRule::None,
            series_end_at: None,
            alert_sent: false,
            created_at: chrono::Utc::now(),
        };

        let message = reminder_message(&event);
        assert_eq!(message.title, "General Meeting");
        assert_eq!(message.body, "Starts 2026-05-04 18:30 UTC at Main hall");
    }
}
