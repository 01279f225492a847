mod binary_protocol;
pub use binary_protocol::BinaryProtocol;

mod request;
pub(crate) use request::Request;
