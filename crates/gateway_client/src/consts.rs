//! Constants used throughout the client.

/// Version prefix of every gateway API path.
pub const API_VERSION: &str = "v1";

/// Collection endpoint for tokenized payment methods.
pub const PAYMENT_METHODS_ENDPOINT: &str = "payment_methods";

/// Wire key under which the authorization fingerprint travels, as a query
/// parameter on GET requests and as a body field on POST requests.
pub const AUTHORIZATION_FINGERPRINT_KEY: &str = "authorizationFingerprint";

/// Platform identifier reported in analytics metadata.
pub(crate) const ANALYTICS_PLATFORM: &str = "rust";

/// Client version reported in analytics metadata.
pub(crate) const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");
