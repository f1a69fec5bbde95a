//! Controller connection configuration.

/// Controller connection configuration.
///
/// Built once by the caller and handed to [`crate::ApiClient::connect`];
/// nothing here is read from process-wide state.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Controller DNS name or IP.
    pub host: String,

    /// REST API version segment.
    pub version: String,

    /// Username for token retrieval.
    pub username: String,

    /// Password for token retrieval.
    pub password: String,

    /// Skip TLS certificate verification. Lab controllers commonly run with
    /// self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl ControllerConfig {
    /// Create a configuration with the default API version and strict TLS.
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            version: "v1".to_string(),
            username: username.into(),
            password: password.into(),
            accept_invalid_certs: false,
        }
    }

    /// Override the API version segment.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Accept self-signed controller certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Token-retrieval endpoint.
    pub fn auth_url(&self) -> String {
        format!(
            "https://{}/api/system/{}/auth/token",
            self.host, self.version
        )
    }

    /// Full URL for an API path, e.g. `task/t1`.
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "https://{}/api/{}/{}",
            self.host,
            self.version,
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_the_api_convention() {
        let config = ControllerConfig::new("dnac.lab", "admin", "secret");
        assert_eq!(config.auth_url(), "https://dnac.lab/api/system/v1/auth/token");
        assert_eq!(config.api_url("task/t1"), "https://dnac.lab/api/v1/task/t1");
        assert_eq!(config.api_url("/task/t1"), "https://dnac.lab/api/v1/task/t1");
    }

    #[test]
    fn test_version_override() {
        let config = ControllerConfig::new("dnac.lab", "admin", "secret").with_version("v2");
        assert_eq!(config.api_url("network-device"), "https://dnac.lab/api/v2/network-device");
    }
}
