use std::future::Future;

use tracing::debug;

use super::Request;
use crate::parser::Response;
use crate::{Ack, AsMemcachedValue, Client, Error, ProtocolError, Status, Value};

/// Length of the flags carried in the extras of a successful Get response.
const GET_EXTRAS_LENGTH: usize = 4;

/// Trait defining binary protocol methods for the Client.
pub trait BinaryProtocol {
    /// Gets the given key.
    ///
    /// If the key is found, `Some(Value)` is returned, describing the metadata and data of the key.
    /// A miss is `None`, not an error.
    ///
    /// Otherwise, [`Error`] is returned.
    fn get<K: AsRef<[u8]>>(&mut self, key: K)
        -> impl Future<Output = Result<Option<Value>, Error>>;

    /// Sets the given key.
    ///
    /// If `flags` or `ttl` are not specified, they will default to 0. A `ttl` above 30 days is
    /// read by the server as an absolute Unix timestamp. On success the [`Ack`] carries the CAS
    /// the server assigned; a non-success status is returned as [`Error::Server`].
    fn set<K, V>(
        &mut self,
        key: K,
        value: V,
        flags: Option<u32>,
        ttl: Option<u32>,
    ) -> impl Future<Output = Result<Ack, Error>>
    where
        K: AsRef<[u8]>,
        V: AsMemcachedValue;
}

impl BinaryProtocol for Client {
    async fn get<K: AsRef<[u8]>>(&mut self, key: K) -> Result<Option<Value>, Error> {
        let kr = Self::validate_key_length(key.as_ref())?;
        let opaque = self.next_opaque();

        let response = self.execute(Request::get(kr, opaque)).await?;

        match response.status() {
            Status::NoError => {
                let flags = match <[u8; GET_EXTRAS_LENGTH]>::try_from(response.extras.as_slice()) {
                    Ok(extras) => u32::from_be_bytes(extras),
                    Err(_) => {
                        let e = ProtocolError::UnexpectedExtras {
                            expected: GET_EXTRAS_LENGTH,
                            actual: response.extras.len(),
                        };
                        return Err(self.fail(e.into()));
                    }
                };

                Ok(Some(Value {
                    key: kr.to_vec(),
                    cas: response.header.cas,
                    flags,
                    data: response.value,
                }))
            }
            Status::KeyNotFound => Ok(None),
            s => Err(server_error(s, &response)),
        }
    }

    async fn set<K, V>(
        &mut self,
        key: K,
        value: V,
        flags: Option<u32>,
        ttl: Option<u32>,
    ) -> Result<Ack, Error>
    where
        K: AsRef<[u8]>,
        V: AsMemcachedValue,
    {
        let kr = Self::validate_key_length(key.as_ref())?;
        let vr = value.as_bytes();
        let opaque = self.next_opaque();

        let request = Request::set(kr, &vr, flags.unwrap_or(0), ttl.unwrap_or(0), opaque);
        let response = self.execute(request).await?;

        match response.status() {
            Status::NoError => Ok(Ack {
                cas: response.header.cas,
            }),
            s => Err(server_error(s, &response)),
        }
    }
}

fn server_error(status: Status, response: &Response) -> Error {
    debug!(
        %status,
        code = status.code(),
        message = %String::from_utf8_lossy(&response.value),
        "server returned an error"
    );
    Error::Server(status)
}
