use std::borrow::Cow;

use itoa::Buffer;

mod private {
    pub trait Sealed {}
}

/// A trait for serializing multiple types of values in to memcached values.
pub trait AsMemcachedValue: private::Sealed {
    /// Returns the bytes stored on the server for this value.
    fn as_bytes(&self) -> Cow<'_, [u8]>;
}

impl private::Sealed for [u8] {}
impl private::Sealed for Vec<u8> {}
impl private::Sealed for str {}
impl private::Sealed for String {}
impl private::Sealed for u8 {}
impl private::Sealed for u16 {}
impl private::Sealed for u32 {}
impl private::Sealed for u64 {}
impl private::Sealed for usize {}
impl<T: private::Sealed + ?Sized> private::Sealed for &T {}

impl AsMemcachedValue for [u8] {
    fn as_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self)
    }
}

impl AsMemcachedValue for Vec<u8> {
    fn as_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(self.as_slice())
    }
}

impl AsMemcachedValue for str {
    fn as_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(str::as_bytes(self))
    }
}

impl AsMemcachedValue for String {
    fn as_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(String::as_bytes(self))
    }
}

impl<T: AsMemcachedValue + ?Sized> AsMemcachedValue for &T {
    fn as_bytes(&self) -> Cow<'_, [u8]> {
        (**self).as_bytes()
    }
}

macro_rules! impl_as_memcached_value_for_uint {
    ($ty:ident) => {
        impl AsMemcachedValue for $ty {
            fn as_bytes(&self) -> Cow<'_, [u8]> {
                let mut buf = Buffer::new();

                Cow::Owned(buf.format(*self).as_bytes().to_vec())
            }
        }
    };
}

impl_as_memcached_value_for_uint!(u8);
impl_as_memcached_value_for_uint!(u16);
impl_as_memcached_value_for_uint!(u32);
impl_as_memcached_value_for_uint!(u64);
impl_as_memcached_value_for_uint!(usize);

#[cfg(test)]
mod tests {
    use super::AsMemcachedValue;

    fn bytes_of<V: AsMemcachedValue>(value: V) -> Vec<u8> {
        value.as_bytes().into_owned()
    }

    #[test]
    fn test_string_like_values() {
        let owned = String::from("this is a value");

        assert_eq!(bytes_of("this is a value"), b"this is a value");
        assert_eq!(bytes_of(&owned), b"this is a value");
        assert_eq!(bytes_of(owned), b"this is a value");
        assert_eq!(bytes_of(&b"\x00\xff"[..]), vec![0x00, 0xff]);
        assert_eq!(bytes_of(vec![1u8, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn test_integers_are_stored_as_decimal_text() {
        assert_eq!(bytes_of(0u8), b"0");
        assert_eq!(bytes_of(65535u16), b"65535");
        assert_eq!(bytes_of(u64::MAX), b"18446744073709551615");
        assert_eq!(bytes_of(&42usize), b"42");
    }
}
