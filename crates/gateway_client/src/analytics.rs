//! Best-effort analytics side channel.
//!
//! Failures are caught and discarded at this boundary so they never leak
//! into the protocol's error taxonomy.

use error_stack::{IntoReport, ResultExt};
use serde::Serialize;

use crate::{
    client::GatewayClient,
    consts,
    errors::{ApiClientError, CustomResult},
    request::{Method, RequestBuilder},
    services,
};

#[derive(Debug, Serialize)]
struct AnalyticsRequest<'a> {
    analytics: [AnalyticsEvent<'a>; 1],
    #[serde(rename = "_meta")]
    meta: Meta<'a>,
}

#[derive(Debug, Serialize)]
struct AnalyticsEvent<'a> {
    kind: &'a str,
    timestamp: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Meta<'a> {
    platform: &'static str,
    sdk_version: &'static str,
    integration: &'a str,
}

impl GatewayClient {
    /// Posts one analytics event to the session's analytics endpoint.
    ///
    /// A no-op when analytics is disabled. Encoding and transport failures
    /// are logged at debug level and swallowed; this channel never
    /// interrupts the caller.
    pub async fn send_analytics_event(&self, event: &str, integration_type: &str) {
        if !self.auth().analytics_enabled() {
            return;
        }
        if let Err(error) = self.post_analytics_event(event, integration_type).await {
            tracing::debug!(?error, event, "dropping analytics event");
        }
    }

    async fn post_analytics_event(
        &self,
        event: &str,
        integration_type: &str,
    ) -> CustomResult<(), ApiClientError> {
        let Some(url) = self.auth().analytics_url() else {
            return Ok(());
        };

        let payload = AnalyticsRequest {
            analytics: [AnalyticsEvent {
                kind: event,
                timestamp: time::OffsetDateTime::now_utc().unix_timestamp(),
            }],
            meta: Meta {
                platform: consts::ANALYTICS_PLATFORM,
                sdk_version: consts::SDK_VERSION,
                integration: integration_type,
            },
        };
        let params = serde_json::to_value(&payload)
            .into_report()
            .change_context(ApiClientError::BodyEncodingFailed)?
            .as_object()
            .cloned()
            .unwrap_or_default();

        let request = RequestBuilder::new()
            .method(Method::Post)
            .url(url.as_str())
            .params(params)
            .build();

        services::send_request(self.http_client(), self.auth(), request).await?;
        Ok(())
    }
}
