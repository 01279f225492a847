use bytes::{BufMut, BytesMut};

use crate::parser::{Opcode, HEADER_LEN, REQUEST_MAGIC};

/// Extras segment of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Extras {
    None,
    /// Flags followed by expiration, as carried by Set.
    Storage { flags: u32, expiration: u32 },
}

impl Extras {
    fn len(&self) -> usize {
        match self {
            Extras::None => 0,
            Extras::Storage { .. } => 8,
        }
    }
}

/// A request frame borrowing its key and value from the caller.
#[derive(Debug)]
pub(crate) struct Request<'a> {
    pub opcode: Opcode,
    pub opaque: u32,
    pub extras: Extras,
    pub key: &'a [u8],
    pub value: &'a [u8],
}

impl<'a> Request<'a> {
    pub fn get(key: &'a [u8], opaque: u32) -> Self {
        Request {
            opcode: Opcode::Get,
            opaque,
            extras: Extras::None,
            key,
            value: &[],
        }
    }

    pub fn set(key: &'a [u8], value: &'a [u8], flags: u32, expiration: u32, opaque: u32) -> Self {
        Request {
            opcode: Opcode::Set,
            opaque,
            extras: Extras::Storage { flags, expiration },
            key,
            value,
        }
    }

    pub fn body_len(&self) -> usize {
        self.extras.len() + self.key.len() + self.value.len()
    }

    /// Appends the encoded frame to `buf`.
    ///
    /// The key must already have been validated; its length has to fit the 16-bit header field.
    pub fn encode(&self, buf: &mut BytesMut) {
        buf.reserve(HEADER_LEN + self.body_len());

        buf.put_u8(REQUEST_MAGIC);
        buf.put_u8(self.opcode as u8);
        buf.put_u16(self.key.len() as u16);
        buf.put_u8(self.extras.len() as u8);
        // data type and vbucket id
        buf.put_u8(0);
        buf.put_u16(0);
        buf.put_u32(self.body_len() as u32);
        buf.put_u32(self.opaque);
        // cas
        buf.put_u64(0);

        if let Extras::Storage { flags, expiration } = self.extras {
            buf.put_u32(flags);
            buf.put_u32(expiration);
        }
        buf.put_slice(self.key);
        buf.put_slice(self.value);
    }
}
