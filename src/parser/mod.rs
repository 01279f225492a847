use std::fmt;
mod binary;
pub use binary::{frame_length, parse_binary_response};

/// Size of every request and response header.
pub const HEADER_LEN: usize = 24;

/// Magic byte opening a request frame.
pub const REQUEST_MAGIC: u8 = 0x80;

/// Magic byte opening a response frame.
pub const RESPONSE_MAGIC: u8 = 0x81;

/// An item read back from the server.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    /// The key that was requested.
    pub key: Vec<u8>,
    /// Item version assigned by the server.
    pub cas: u64,
    /// Client metadata stored alongside the item.
    pub flags: u32,
    /// The stored bytes.
    pub data: Vec<u8>,
}

/// Acknowledgement of a successful store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ack {
    /// Version the server assigned to the stored item.
    pub cas: u64,
}

/// Opcodes this client puts on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Fetch an item.
    Get = 0x00,
    /// Store an item unconditionally.
    Set = 0x01,
}

/// Response status codes of the binary protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The request succeeded.
    NoError,
    /// No item is stored under the key.
    KeyNotFound,
    /// The item exists and a CAS check failed.
    KeyExists,
    /// The value exceeds the server's item size limit.
    ValueTooLarge,
    /// The request was malformed.
    InvalidArguments,
    /// The item was not stored.
    ItemNotStored,
    /// Increment or decrement on a non-numeric value.
    NonNumericValue,
    /// The vbucket belongs to another server.
    WrongVbucket,
    /// Authentication failed.
    AuthError,
    /// Authentication needs another step.
    AuthContinue,
    /// The server does not know the opcode.
    UnknownCommand,
    /// The server ran out of memory.
    OutOfMemory,
    /// The command is not supported.
    NotSupported,
    /// The server hit an internal error.
    InternalError,
    /// The server is busy.
    Busy,
    /// A temporary failure; the request may be retried.
    TempFailure,
    /// A code outside the documented table.
    Other(u16),
}

impl Status {
    /// Maps a wire status code, keeping unknown codes as [`Status::Other`].
    pub fn from_u16(code: u16) -> Status {
        match code {
            0x0000 => Status::NoError,
            0x0001 => Status::KeyNotFound,
            0x0002 => Status::KeyExists,
            0x0003 => Status::ValueTooLarge,
            0x0004 => Status::InvalidArguments,
            0x0005 => Status::ItemNotStored,
            0x0006 => Status::NonNumericValue,
            0x0007 => Status::WrongVbucket,
            0x0008 => Status::AuthError,
            0x0009 => Status::AuthContinue,
            0x0081 => Status::UnknownCommand,
            0x0082 => Status::OutOfMemory,
            0x0083 => Status::NotSupported,
            0x0084 => Status::InternalError,
            0x0085 => Status::Busy,
            0x0086 => Status::TempFailure,
            other => Status::Other(other),
        }
    }

    /// The wire status code.
    pub fn code(&self) -> u16 {
        match self {
            Status::NoError => 0x0000,
            Status::KeyNotFound => 0x0001,
            Status::KeyExists => 0x0002,
            Status::ValueTooLarge => 0x0003,
            Status::InvalidArguments => 0x0004,
            Status::ItemNotStored => 0x0005,
            Status::NonNumericValue => 0x0006,
            Status::WrongVbucket => 0x0007,
            Status::AuthError => 0x0008,
            Status::AuthContinue => 0x0009,
            Status::UnknownCommand => 0x0081,
            Status::OutOfMemory => 0x0082,
            Status::NotSupported => 0x0083,
            Status::InternalError => 0x0084,
            Status::Busy => 0x0085,
            Status::TempFailure => 0x0086,
            Status::Other(code) => *code,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoError => write!(f, "no error"),
            Self::KeyNotFound => write!(f, "key not found"),
            Self::KeyExists => write!(f, "key exists"),
            Self::ValueTooLarge => write!(f, "value too large"),
            Self::InvalidArguments => write!(f, "invalid arguments"),
            Self::ItemNotStored => write!(f, "item not stored"),
            Self::NonNumericValue => write!(f, "incr/decr on non-numeric value"),
            Self::WrongVbucket => write!(f, "wrong vbucket"),
            Self::AuthError => write!(f, "auth error"),
            Self::AuthContinue => write!(f, "auth continue"),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::OutOfMemory => write!(f, "out of memory"),
            Self::NotSupported => write!(f, "not supported"),
            Self::InternalError => write!(f, "internal error"),
            Self::Busy => write!(f, "busy"),
            Self::TempFailure => write!(f, "temporary failure"),
            Self::Other(code) => write!(f, "status {:#06x}", code),
        }
    }
}

/// The fixed 24-byte header of a response frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResponseHeader {
    pub magic: u8,
    pub opcode: u8,
    pub key_length: u16,
    pub extras_length: u8,
    pub data_type: u8,
    pub status: u16,
    pub total_body_length: u32,
    pub opaque: u32,
    pub cas: u64,
}

impl ResponseHeader {
    /// Length of the value segment implied by the header.
    ///
    /// Only meaningful once the header has passed length validation.
    pub fn value_length(&self) -> usize {
        self.total_body_length as usize - self.extras_length as usize - self.key_length as usize
    }
}

/// A fully buffered response frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Response {
    pub header: ResponseHeader,
    pub extras: Vec<u8>,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl Response {
    pub fn status(&self) -> Status {
        Status::from_u16(self.header.status)
    }
}
