//! A Tokio-based memcached binary protocol client.
//!
//! [`Client`] owns a single connection to a single server and runs one request at a time.
//! Requests are issued through the [`BinaryProtocol`] trait; [`blocking::Client`] wraps the
//! same operations for callers without a runtime.
#![warn(missing_docs)]
use std::io;

use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, trace, warn};

pub mod blocking;

pub mod config;
pub use self::config::{ClientConfig, ClientConfigBuilder, Endpoint};

mod connection;
use self::connection::Connection;

mod error;
pub use self::error::{Error, KeyError, ProtocolError};

mod parser;
use self::parser::{frame_length, parse_binary_response, Response, HEADER_LEN};
pub use self::parser::{Ack, Opcode, Status, Value};

mod proto;
use self::proto::Request;
pub use self::proto::BinaryProtocol;

mod value_serializer;
pub use self::value_serializer::AsMemcachedValue;

/// Longest key the server accepts.
pub const MAX_KEY_LENGTH: usize = 250; // reference in memcached documentation: https://github.com/memcached/memcached/wiki/BinaryProtocolRevamped

/// Memcached binary protocol client.
///
/// [`Client`] is mapped one-to-one with a connection to a memcached server. Requests are
/// strictly sequential: each one is written and its single response read before the call
/// returns, so the client needs `&mut` access and must be wrapped in a mutex to be shared.
pub struct Client {
    endpoint: Endpoint,
    config: ClientConfig,
    buf: BytesMut,
    next_opaque: u32,
    conn: Option<Connection>,
}

impl Client {
    /// Connects to the given data source string with the default [`ClientConfig`].
    ///
    /// The DSN should be in the format of `tcp://<host>:<port>` or `<host>:<port>`.
    pub async fn connect<S: AsRef<str>>(dsn: S) -> Result<Client, Error> {
        let endpoint = dsn.as_ref().parse()?;
        Self::with_config(endpoint, ClientConfig::default()).await
    }

    /// Connects to `endpoint` using the given settings.
    ///
    /// Refusal, resolution failures and an elapsed connect deadline are all reported as
    /// [`Error::Connection`].
    pub async fn with_config(endpoint: Endpoint, config: ClientConfig) -> Result<Client, Error> {
        let conn = Connection::new(&endpoint, &config).await?;
        debug!(%endpoint, "connected");

        Ok(Client {
            endpoint,
            config,
            buf: BytesMut::new(),
            next_opaque: 0,
            conn: Some(conn),
        })
    }

    /// The server this client was created for.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Whether the connection is still open.
    ///
    /// Turns false after [`Client::close`] or after any connection or protocol error.
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Closes the connection. Calling it again is a no-op.
    pub async fn close(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            self.buf.clear();
            debug!(endpoint = %self.endpoint, "closing connection");
            if let Err(e) = conn.close().await {
                debug!(endpoint = %self.endpoint, error = %e, "shutdown failed");
            }
        }
    }

    pub(crate) fn validate_key_length(key: &[u8]) -> Result<&[u8], Error> {
        if key.is_empty() {
            return Err(KeyError::Empty.into());
        }
        if key.len() > MAX_KEY_LENGTH {
            return Err(KeyError::TooLong(key.len()).into());
        }
        Ok(key)
    }

    pub(crate) fn next_opaque(&mut self) -> u32 {
        let opaque = self.next_opaque;
        self.next_opaque = self.next_opaque.wrapping_add(1);
        opaque
    }

    /// Drops the connection if `e` means the stream can no longer be trusted.
    pub(crate) fn fail(&mut self, e: Error) -> Error {
        if e.invalidates_connection() && self.conn.take().is_some() {
            self.buf.clear();
            warn!(endpoint = %self.endpoint, error = %e, "connection invalidated");
        }
        e
    }

    /// Sends `request` and reads back its response, within the configured deadline.
    pub(crate) async fn execute(&mut self, request: Request<'_>) -> Result<Response, Error> {
        let io_timeout = self.config.io_timeout;
        let result = match io_timeout {
            Some(limit) => tokio::time::timeout(limit, self.round_trip(&request))
                .await
                .unwrap_or_else(|_| Err(Error::timed_out())),
            None => self.round_trip(&request).await,
        };

        result.map_err(|e| self.fail(e))
    }

    async fn round_trip(&mut self, request: &Request<'_>) -> Result<Response, Error> {
        let conn = self.conn.as_mut().ok_or_else(Error::not_connected)?;

        let mut frame = BytesMut::new();
        request.encode(&mut frame);
        trace!(
            opcode = ?request.opcode,
            opaque = request.opaque,
            body_len = request.body_len(),
            "sending request"
        );

        conn.write_all(&frame).await?;
        conn.flush().await?;

        let response = self.drive_receive(parse_binary_response).await?;
        check_correlation(request, &response)?;

        Ok(response)
    }

    pub(crate) async fn drive_receive<R, F>(&mut self, op: F) -> Result<R, Error>
    where
        F: Fn(&[u8]) -> Result<Option<(usize, R)>, ProtocolError>,
    {
        loop {
            // Try and parse out a response from what we already have.
            if !self.buf.is_empty() {
                if let Some((n, response)) = op(&self.buf)? {
                    let _ = self.buf.split_to(n);
                    return Ok(response);
                }
            }

            let conn = self.conn.as_mut().ok_or_else(Error::not_connected)?;
            self.buf.reserve(1024);
            let n = conn.read_buf(&mut self.buf).await?;
            if n == 0 {
                if self.buf.is_empty() {
                    return Err(Error::Connection(io::ErrorKind::UnexpectedEof.into()));
                }

                return Err(ProtocolError::Truncated {
                    needed: frame_length(&self.buf).unwrap_or(HEADER_LEN),
                    available: self.buf.len(),
                }
                .into());
            }
        }
    }
}

fn check_correlation(request: &Request<'_>, response: &Response) -> Result<(), ProtocolError> {
    if response.header.opaque != request.opaque {
        return Err(ProtocolError::OpaqueMismatch {
            expected: request.opaque,
            actual: response.header.opaque,
        });
    }

    if response.header.opcode != request.opcode as u8 {
        return Err(ProtocolError::UnexpectedOpcode {
            expected: request.opcode as u8,
            actual: response.header.opcode,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key_length() {
        let longest = "k".repeat(MAX_KEY_LENGTH);
        let too_long = "k".repeat(MAX_KEY_LENGTH + 1);

        assert!(Client::validate_key_length(longest.as_bytes()).is_ok());
        assert_eq!(
            Client::validate_key_length(too_long.as_bytes()),
            Err(Error::InvalidKey(KeyError::TooLong(251)))
        );
        assert_eq!(
            Client::validate_key_length(b""),
            Err(Error::InvalidKey(KeyError::Empty))
        );
    }

    fn response_for(opcode: u8, opaque: u32) -> Response {
        let frame: Vec<u8> = [
            &[0x81, opcode, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0][..],
            &opaque.to_be_bytes()[..],
            &[0u8; 8][..],
        ]
        .concat();

        parse_binary_response(&frame).unwrap().unwrap().1
    }

    #[test]
    fn test_correlation_checks_opaque_before_opcode() {
        let request = Request::get(b"foo", 5);

        assert_eq!(check_correlation(&request, &response_for(0x00, 5)), Ok(()));
        assert_eq!(
            check_correlation(&request, &response_for(0x01, 6)),
            Err(ProtocolError::OpaqueMismatch {
                expected: 5,
                actual: 6
            })
        );
        assert_eq!(
            check_correlation(&request, &response_for(0x01, 5)),
            Err(ProtocolError::UnexpectedOpcode {
                expected: 0x00,
                actual: 0x01
            })
        );
    }
}
