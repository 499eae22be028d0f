//! Binary parameter encoding.
use bytes::{BufMut, BytesMut};
use std::net::IpAddr;
use time::{Date, OffsetDateTime};

use crate::{
    endian::BigEndian,
    pg_type::{oid, Oid, PgType},
    wtext::WText,
};

/// Zero instant of the binary `timestamptz` representation.
pub(crate) const PG_EPOCH: OffsetDateTime = time::macros::datetime!(2000-01-01 0:00 UTC);

/// Day zero of the binary `date` representation.
pub(crate) const PG_EPOCH_DATE: Date = time::macros::date!(2000-01-01);

/// Postgres-internal address family tag for IPv6 in the `inet` binary layout.
///
/// Not the POSIX constant of the same name.
pub(crate) const PGSQL_AF_INET6: u8 = 3;

/// A value that can be encoded as a binary query parameter.
///
/// Encoding is infallible; the only conversion that can fail is wide text to
/// UTF-8, which logs a warning and produces an empty value instead.
pub trait Encode: PgType {
    /// Append the binary wire image of `self` to `buf`.
    fn encode(&self, buf: &mut BytesMut);
}

impl Encode for bool {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(*self as u8);
    }
}

macro_rules! encode_scalar {
    ($ty:ty) => {
        impl Encode for $ty {
            fn encode(&self, buf: &mut BytesMut) {
                buf.put_slice(BigEndian::new(*self).as_bytes());
            }
        }
    };
}

encode_scalar!(i16);
encode_scalar!(i32);
encode_scalar!(i64);
encode_scalar!(f32);
encode_scalar!(f64);

impl Encode for String {
    // no trailing nul on the wire
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self.as_bytes());
    }
}

impl Encode for WText {
    fn encode(&self, buf: &mut BytesMut) {
        match String::from_utf16(self.as_units()) {
            Ok(text) => buf.put_slice(text.as_bytes()),
            Err(_) => log::warn!("code conversion to utf8 failed in sql parameter"),
        }
    }
}

impl Encode for Vec<u8> {
    fn encode(&self, buf: &mut BytesMut) {
        buf.put_slice(self);
    }
}

impl Encode for OffsetDateTime {
    /// Signed microseconds since 2000-01-01T00:00:00Z, big-endian.
    fn encode(&self, buf: &mut BytesMut) {
        let micros = (*self - PG_EPOCH).whole_microseconds() as i64;
        buf.put_slice(BigEndian::new(micros).as_bytes());
    }
}

impl Encode for Date {
    /// Signed days since 2000-01-01, big-endian.
    fn encode(&self, buf: &mut BytesMut) {
        let days = (*self - PG_EPOCH_DATE).whole_days() as i32;
        buf.put_slice(BigEndian::new(days).as_bytes());
    }
}

impl Encode for IpAddr {
    /// Always the 20-byte IPv6 form; IPv4 addresses go out IPv6-mapped.
    fn encode(&self, buf: &mut BytesMut) {
        let address = match self {
            IpAddr::V4(v4) => v4.to_ipv6_mapped(),
            IpAddr::V6(v6) => *v6,
        };
        buf.put_u8(PGSQL_AF_INET6);
        buf.put_u8(128); // prefix bits
        buf.put_u8(0); // is_cidr
        buf.put_u8(16); // address length
        buf.put_slice(&address.octets());
    }
}

/// Write the one-dimensional array header: ndim, hasNull, element oid,
/// dimension and lower bound, all int32 big-endian.
pub(crate) fn put_array_header(buf: &mut BytesMut, element_oid: Oid, len: usize) {
    buf.put_i32(1);
    buf.put_i32(0);
    buf.put_u32(element_oid);
    buf.put_i32(len as i32);
    buf.put_i32(1);
}

macro_rules! encode_numeric_array {
    ($elem:ty) => {
        impl Encode for Vec<$elem> {
            fn encode(&self, buf: &mut BytesMut) {
                put_array_header(buf, <$elem>::OID, self.len());
                for value in self {
                    buf.put_i32(size_of::<$elem>() as i32);
                    buf.put_slice(BigEndian::new(*value).as_bytes());
                }
            }
        }
    };
}

encode_numeric_array!(i16);
encode_numeric_array!(i32);
encode_numeric_array!(i64);
encode_numeric_array!(f32);
encode_numeric_array!(f64);

impl Encode for Vec<String> {
    fn encode(&self, buf: &mut BytesMut) {
        put_array_header(buf, oid::TEXT, self.len());
        for text in self {
            buf.put_i32(text.len() as i32);
            buf.put_slice(text.as_bytes());
        }
    }
}

impl Encode for Vec<WText> {
    /// Every element is converted to UTF-8 up front; past that the wire image
    /// is identical to a `text` array.
    fn encode(&self, buf: &mut BytesMut) {
        let mut texts = Vec::with_capacity(self.len());
        for wide in self {
            match String::from_utf16(wide.as_units()) {
                Ok(text) => texts.push(text),
                Err(_) => {
                    log::warn!("array code conversion to utf8 failed in sql parameter");
                    texts.clear();
                    break;
                }
            }
        }
        texts.encode(buf);
    }
}
