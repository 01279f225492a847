use crate::parser::Status;
use std::io;

/// Error type for [`Client`](crate::Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure: refused, reset, timed out, closed or not connected.
    ///
    /// The connection is torn down when this is returned; the caller must reconnect.
    #[error("connection: {0}")]
    Connection(#[source] io::Error),
    /// A frame that does not match the binary protocol.
    ///
    /// The byte stream can no longer be trusted, so the connection is torn down as well.
    #[error("protocol: {0}")]
    Protocol(#[from] ProtocolError),
    /// A well-formed response carrying a non-success status.  The connection stays usable.
    #[error("server: {0}")]
    Server(Status),
    /// The key was rejected before anything was written to the wire.
    #[error("invalid key: {0}")]
    InvalidKey(#[from] KeyError),
    /// The endpoint string could not be understood.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl Error {
    /// Whether this error closed the connection it was raised on.
    pub fn invalidates_connection(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Protocol(_))
    }

    pub(crate) fn not_connected() -> Self {
        Error::Connection(io::Error::new(
            io::ErrorKind::NotConnected,
            "connection closed",
        ))
    }

    pub(crate) fn timed_out() -> Self {
        Error::Connection(io::Error::new(
            io::ErrorKind::TimedOut,
            "request deadline elapsed",
        ))
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Connection(e1), Self::Connection(e2)) => e1.kind() == e2.kind(),
            (Self::Protocol(p1), Self::Protocol(p2)) => p1 == p2,
            (Self::Server(s1), Self::Server(s2)) => s1 == s2,
            (Self::InvalidKey(k1), Self::InvalidKey(k2)) => k1 == k2,
            (Self::InvalidEndpoint(d1), Self::InvalidEndpoint(d2)) => d1 == d2,
            _ => false,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Connection(e)
    }
}

impl From<Status> for Error {
    fn from(s: Status) -> Self {
        Error::Server(s)
    }
}

/// A response frame that violates the binary protocol or does not answer the outstanding
/// request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    /// The first header byte was not the response magic.
    #[error("invalid magic byte: {0:#04x}")]
    InvalidMagic(u8),
    /// The response echoed an opcode other than the one requested.
    #[error("unexpected opcode: expected {expected:#04x}, got {actual:#04x}")]
    UnexpectedOpcode {
        /// Opcode of the outstanding request.
        expected: u8,
        /// Opcode found in the response.
        actual: u8,
    },
    /// The response carried an opaque token other than the outstanding request's.
    #[error("opaque mismatch: expected {expected}, got {actual}")]
    OpaqueMismatch {
        /// Token of the outstanding request.
        expected: u32,
        /// Token found in the response.
        actual: u32,
    },
    /// The declared total body length cannot hold the declared extras and key.
    #[error("body length {total} is shorter than extras ({extras}) plus key ({key})")]
    BodyLengthMismatch {
        /// Declared total body length.
        total: u32,
        /// Declared extras length.
        extras: u8,
        /// Declared key length.
        key: u16,
    },
    /// The extras segment has the wrong size for this response.
    #[error("unexpected extras length: expected {expected}, got {actual}")]
    UnexpectedExtras {
        /// Extras length the response type requires.
        expected: usize,
        /// Extras length found in the response.
        actual: usize,
    },
    /// The connection closed part way through a frame.
    #[error("truncated frame: needed {needed} bytes, {available} available")]
    Truncated {
        /// Bytes the frame declares, header included.
        needed: usize,
        /// Bytes received before the connection closed.
        available: usize,
    },
    /// A parsing error surfaced from nom.
    #[error("parse error: {0:?}")]
    Parse(nom::error::ErrorKind),
}

impl From<nom::error::ErrorKind> for ProtocolError {
    fn from(e: nom::error::ErrorKind) -> Self {
        ProtocolError::Parse(e)
    }
}

/// Reasons a key is refused client-side.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Keys must contain at least one byte.
    #[error("key is empty")]
    Empty,
    /// Keys are limited to 250 bytes.
    #[error("key is {0} bytes, the limit is 250")]
    TooLong(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalidates_connection() {
        assert!(Error::not_connected().invalidates_connection());
        assert!(Error::timed_out().invalidates_connection());
        assert!(Error::Protocol(ProtocolError::InvalidMagic(0x80)).invalidates_connection());
        assert!(!Error::Server(Status::KeyExists).invalidates_connection());
        assert!(!Error::InvalidKey(KeyError::Empty).invalidates_connection());
    }

    #[test]
    fn test_io_errors_compare_by_kind() {
        let a = Error::Connection(io::Error::new(io::ErrorKind::TimedOut, "a"));
        let b = Error::Connection(io::Error::new(io::ErrorKind::TimedOut, "b"));
        assert_eq!(a, b);
        assert_ne!(a, Error::not_connected());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::Protocol(ProtocolError::OpaqueMismatch {
                expected: 7,
                actual: 8
            })
            .to_string(),
            "protocol: opaque mismatch: expected 7, got 8"
        );
        assert_eq!(
            Error::Server(Status::ValueTooLarge).to_string(),
            "server: value too large"
        );
        assert_eq!(
            Error::InvalidKey(KeyError::TooLong(251)).to_string(),
            "invalid key: key is 251 bytes, the limit is 250"
        );
        assert_eq!(
            ProtocolError::InvalidMagic(0x80).to_string(),
            "invalid magic byte: 0x80"
        );
    }
}
