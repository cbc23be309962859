//! Push notification dispatch.
//!
//! Mobile tokens are batched into chunked requests against the configured
//! push gateway; web-push subscriptions are posted individually to their own
//! endpoint. Delivery is best effort: individual failures are logged and
//! counted, never propagated as request failures.

use serde::Serialize;

use chapterhouse_core::config::PushConfig;
use chapterhouse_db::db::enums::Platform;
use chapterhouse_db::model::push::PushRegistration;

use crate::error::ServiceResult;

/// Notification content shared by every delivery platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

/// One gateway request carrying a batch of mobile tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MobileBatch<'a> {
    pub to: Vec<&'a str>,
    pub title: &'a str,
    pub body: &'a str,
}

/// Payload posted to a web-push subscription endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebPushPayload<'a> {
    pub title: &'a str,
    pub body: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<&'a serde_json::Value>,
}

/// Counts of a dispatch pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchSummary {
    pub sent: usize,
    pub failed: usize,
}

/// ## Summary
/// Splits the mobile registrations into gateway batches of at most
/// `batch_size` tokens, preserving registration order.
#[must_use]
pub fn build_mobile_batches<'a>(
    registrations: &'a [PushRegistration],
    message: &'a PushMessage,
    batch_size: usize,
) -> Vec<MobileBatch<'a>> {
    let tokens: Vec<&str> = registrations
        .iter()
        .filter(|registration| registration.platform.is_mobile())
        .map(|registration| registration.token.as_str())
        .collect();

    tokens
        .chunks(batch_size.max(1))
        .map(|chunk| MobileBatch {
            to: chunk.to_vec(),
            title: &message.title,
            body: &message.body,
        })
        .collect()
}

/// HTTP client for push delivery.
pub struct PushClient {
    http: reqwest::Client,
    gateway_url: String,
    batch_size: usize,
}

impl PushClient {
    /// ## Summary
    /// Builds a push client from the configured gateway settings.
    ///
    /// ## Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &PushConfig) -> ServiceResult<Self> {
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            gateway_url: config.gateway_url.clone(),
            batch_size: config.batch_size,
        })
    }

    /// ## Summary
    /// Delivers a message to every given registration: mobile tokens in
    /// chunked gateway batches, web subscriptions one POST per endpoint.
    ///
    /// Failed deliveries are logged and tallied; the call itself only fails
    /// on programmer error, never on provider errors.
    #[tracing::instrument(skip(self, registrations, message), fields(
        registration_count = registrations.len()
    ))]
    pub async fn dispatch(
        &self,
        registrations: &[PushRegistration],
        message: &PushMessage,
    ) -> DispatchSummary {
        let mut summary = DispatchSummary::default();

        for batch in build_mobile_batches(registrations, message, self.batch_size) {
            let token_count = batch.to.len();
            match self.http.post(&self.gateway_url).json(&batch).send().await {
                Ok(response) if response.status().is_success() => {
                    summary.sent += token_count;
                }
                Ok(response) => {
                    tracing::warn!(status = %response.status(), "Push gateway rejected batch");
                    summary.failed += token_count;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Push gateway request failed");
                    summary.failed += token_count;
                }
            }
        }

        for registration in registrations
            .iter()
            .filter(|registration| registration.platform == Platform::Web)
        {
            let payload = WebPushPayload {
                title: &message.title,
                body: &message.body,
                keys: registration.web_push_keys.as_ref(),
            };
            match self
                .http
                .post(&registration.token)
                .json(&payload)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => summary.sent += 1,
                Ok(response) => {
                    tracing::warn!(
                        status = %response.status(),
                        registration_id = %registration.id,
                        "Web push endpoint rejected payload"
                    );
                    summary.failed += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        registration_id = %registration.id,
                        "Web push request failed"
                    );
                    summary.failed += 1;
                }
            }
        }

        tracing::debug!(sent = summary.sent, failed = summary.failed, "Dispatch pass complete");
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chapterhouse_db::db::enums::Platform;

    fn registration(platform: Platform, token: &str) -> PushRegistration {
        PushRegistration {
            id: uuid::Uuid::now_v7(),
            member_id: uuid::Uuid::now_v7(),
            platform,
            token: token.to_string(),
            web_push_keys: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn message() -> PushMessage {
        PushMessage {
            title: "Event reminder".to_string(),
            body: "General Meeting starts soon".to_string(),
        }
    }

    #[test_log::test]
    fn batches_respect_the_configured_size() {
        let registrations: Vec<_> = (0..5)
            .map(|i| registration(Platform::Android, &format!("token-{i}")))
            .collect();

        let message = message();
        let batches = build_mobile_batches(&registrations, &message, 2);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].to, vec!["token-0", "token-1"]);
        assert_eq!(batches[2].to, vec!["token-4"]);
    }

    #[test_log::test]
    fn web_registrations_are_excluded_from_mobile_batches() {
        let registrations = vec![
            registration(Platform::Ios, "ios-token"),
            registration(Platform::Web, "https://push.example/sub/1"),
            registration(Platform::Android, "android-token"),
        ];

        let message = message();
        let batches = build_mobile_batches(&registrations, &message, 100);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].to, vec!["ios-token", "android-token"]);
    }

    #[test_log::test]
    fn no_mobile_registrations_means_no_batches() {
        let registrations = vec![registration(Platform::Web, "https://push.example/sub/2")];
        assert!(build_mobile_batches(&registrations, &message(), 10).is_empty());
    }

    #[test_log::test]
    fn web_payload_omits_missing_keys() {
        let msg = message();
        let payload = WebPushPayload {
            title: &msg.title,
            body: &msg.body,
            keys: None,
        };
        let json = serde_json::to_value(&payload).expect("payload should serialize");
        assert!(json.get("keys").is_none());
    }
}
