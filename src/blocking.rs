//! A blocking facade over the async [`Client`](crate::Client).
//!
//! Each call parks the calling thread until the response frame has been read, driving the
//! request on a private current-thread runtime. Must not be used from within an async context.

use tokio::runtime::{Builder, Runtime};

use crate::{Ack, AsMemcachedValue, BinaryProtocol, ClientConfig, Endpoint, Error, Value};

/// Blocking memcached binary protocol client.
pub struct Client {
    inner: crate::Client,
    runtime: Runtime,
}

impl Client {
    /// Connects to the given data source string with the default [`ClientConfig`].
    pub fn connect<S: AsRef<str>>(dsn: S) -> Result<Client, Error> {
        let endpoint = dsn.as_ref().parse()?;
        Self::with_config(endpoint, ClientConfig::default())
    }

    /// Connects to `endpoint` using the given settings.
    pub fn with_config(endpoint: Endpoint, config: ClientConfig) -> Result<Client, Error> {
        let runtime = Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
            .map_err(Error::Connection)?;
        let inner = runtime.block_on(crate::Client::with_config(endpoint, config))?;

        Ok(Client { inner, runtime })
    }

    /// The server this client was created for.
    pub fn endpoint(&self) -> &Endpoint {
        self.inner.endpoint()
    }

    /// Whether the connection is still open.
    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// Gets the given key, see [`BinaryProtocol::get`].
    pub fn get<K: AsRef<[u8]>>(&mut self, key: K) -> Result<Option<Value>, Error> {
        self.runtime.block_on(self.inner.get(key))
    }

    /// Sets the given key, see [`BinaryProtocol::set`].
    pub fn set<K, V>(
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
        self.runtime
            .block_on(self.inner.set(key, value, flags, ttl))
    }

    /// Closes the connection. Calling it again is a no-op.
    pub fn close(&mut self) {
        self.runtime.block_on(self.inner.close())
    }
}
