//! Device-data collection seam for fraud identification.
//!
//! The collector itself is a black-box collaborator owned by the host
//! environment; the client only supplies the merchant identifier and
//! collector URL and passes the opaque device identifier through.

use crate::client::GatewayClient;

/// External collaborator producing an opaque device identifier.
pub trait DeviceDataCollector {
    /// Collects device data for the given merchant and collector endpoint.
    fn collect_device_data(&self, merchant_id: &str, collector_url: &str) -> String;
}

/// Environments recognized by the device-data collector, with their
/// aggregate merchant presets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GatewayEnvironment {
    /// Internal QA environment.
    Qa,
    /// Public sandbox.
    Sandbox,
    /// Production.
    Production,
}

impl GatewayEnvironment {
    /// Aggregate fraud merchant id for this environment.
    pub fn merchant_id(&self) -> &'static str {
        "600000"
    }

    /// Fraud collector URL for this environment.
    pub fn collector_url(&self) -> &'static str {
        match self {
            Self::Qa => "https://assets.qa.braintreegateway.com/data",
            Self::Sandbox => "https://assets.sandbox.braintreegateway.com/data",
            Self::Production => "https://assets.braintreegateway.com/data",
        }
    }
}

impl GatewayClient {
    /// Collects device data using the environment's aggregate presets.
    pub fn collect_device_data(
        &self,
        collector: &dyn DeviceDataCollector,
        environment: GatewayEnvironment,
    ) -> String {
        self.collect_device_data_with(
            collector,
            environment.merchant_id(),
            environment.collector_url(),
        )
    }

    /// Collects device data with an explicit merchant id and collector URL,
    /// for use with a non-aggregate fraud id.
    pub fn collect_device_data_with(
        &self,
        collector: &dyn DeviceDataCollector,
        merchant_id: &str,
        collector_url: &str,
    ) -> String {
        collector.collect_device_data(merchant_id, collector_url)
    }
}
