//! Endpoint and connection settings.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use url::{Host, Url};

use crate::Error;

/// Port memcached listens on unless told otherwise.
pub const DEFAULT_PORT: u16 = 11211;

/// The single server a [`Client`](crate::Client) talks to.
///
/// Parsed from `<host>:<port>` or `tcp://<host>:<port>`; the port defaults to 11211.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Creates an endpoint from its parts.
    pub fn new<S: Into<String>>(host: S, port: u16) -> Endpoint {
        Endpoint {
            host: host.into(),
            port,
        }
    }

    /// Host name or IP address, without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// TCP port.
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    fn from_str(dsn: &str) -> Result<Endpoint, Error> {
        let dsn = dsn.trim();
        let invalid = || Error::InvalidEndpoint(dsn.to_string());

        let url = if dsn.contains("://") {
            Url::parse(dsn)
        } else {
            Url::parse(&format!("tcp://{}", dsn))
        }
        .map_err(|_| invalid())?;

        if url.scheme() != "tcp" {
            return Err(invalid());
        }

        let host = match url.host() {
            Some(Host::Domain(d)) if !d.is_empty() => d.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => return Err(invalid()),
        };

        Ok(Endpoint {
            host,
            port: url.port().unwrap_or(DEFAULT_PORT),
        })
    }
}

impl TryFrom<&str> for Endpoint {
    type Error = Error;

    fn try_from(dsn: &str) -> Result<Endpoint, Error> {
        dsn.parse()
    }
}

impl<S: Into<String>> From<(S, u16)> for Endpoint {
    fn from((host, port): (S, u16)) -> Endpoint {
        Endpoint::new(host, port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Connection settings for a [`Client`](crate::Client).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Deadline for establishing the TCP connection.
    pub connect_timeout: Option<Duration>,
    /// Deadline covering the write and read of each request.
    ///
    /// Expiry surfaces as [`Error::Connection`] and closes the connection.
    pub io_timeout: Option<Duration>,
    /// Whether to disable Nagle's algorithm on the socket.
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Duration::from_secs(5)),
            io_timeout: None,
            nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Creates a new config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Sets the connect deadline; `None` waits for the operating system.
    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the per-request deadline.
    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.io_timeout = timeout;
        self
    }

    /// Sets `TCP_NODELAY`.
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.config.nodelay = nodelay;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_endpoints() {
        let cases = [
            ("127.0.0.1:11211", "127.0.0.1", 11211),
            ("tcp://192.168.142.252:11211", "192.168.142.252", 11211),
            ("localhost", "localhost", DEFAULT_PORT),
            ("tcp://cache.internal:22122", "cache.internal", 22122),
            ("[::1]:11300", "::1", 11300),
            ("  localhost:1234 ", "localhost", 1234),
        ];

        for (dsn, host, port) in cases {
            let endpoint: Endpoint = dsn.parse().unwrap();
            assert_eq!(endpoint.host(), host, "host of {}", dsn);
            assert_eq!(endpoint.port(), port, "port of {}", dsn);
        }
    }

    #[test]
    fn test_reject_bad_endpoints() {
        for dsn in ["", "unix:///tmp/memcached.sock", "udp://127.0.0.1:11211", "localhost:http"] {
            assert_eq!(
                dsn.parse::<Endpoint>(),
                Err(Error::InvalidEndpoint(dsn.to_string())),
                "{} should be rejected",
                dsn
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Endpoint::new("127.0.0.1", 11211).to_string(), "127.0.0.1:11211");
        assert_eq!(Endpoint::from(("::1", 11211)).to_string(), "[::1]:11211");
    }

    #[test]
    fn test_builder() {
        let config = ClientConfig::builder()
            .io_timeout(Some(Duration::from_millis(250)))
            .nodelay(false)
            .build();

        assert_eq!(config.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.io_timeout, Some(Duration::from_millis(250)));
        assert!(!config.nodelay);
    }
}
