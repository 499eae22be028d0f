//! Binary result decoding.
use bytes::Buf;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use time::{Date, Duration, OffsetDateTime};

use crate::{
    encode::{PG_EPOCH, PG_EPOCH_DATE},
    endian::BigEndian,
    pg_type::{oid, Oid, PgType},
    wtext::WText,
};

/// Best-effort decode of a binary result field.
///
/// Decoders are total: malformed input logs a warning and produces a
/// zero or empty value. A field of a mismatching type is only reported
/// through [`Results::verify`][crate::Results::verify].
pub trait Decode: PgType + Sized {
    /// Decode the raw field bytes.
    fn decode(raw: &[u8]) -> Self;
}

impl Decode for bool {
    fn decode(raw: &[u8]) -> Self {
        raw.first().is_some_and(|byte| *byte != 0)
    }
}

macro_rules! decode_scalar {
    ($ty:ty, $name:literal) => {
        impl Decode for $ty {
            fn decode(raw: &[u8]) -> Self {
                match BigEndian::read(raw) {
                    Some(value) => value,
                    None => {
                        if !raw.is_empty() {
                            log::warn!(concat!($name, " result field is too short"));
                        }
                        <$ty>::default()
                    }
                }
            }
        }
    };
}

decode_scalar!(i16, "int2");
decode_scalar!(i32, "int4");
decode_scalar!(i64, "int8");
decode_scalar!(f32, "float4");
decode_scalar!(f64, "float8");

impl Decode for String {
    fn decode(raw: &[u8]) -> Self {
        match std::str::from_utf8(raw) {
            Ok(text) => text.to_owned(),
            Err(_) => {
                log::warn!("text result field is not valid utf8");
                String::from_utf8_lossy(raw).into_owned()
            }
        }
    }
}

impl Decode for WText {
    fn decode(raw: &[u8]) -> Self {
        match std::str::from_utf8(raw) {
            Ok(text) => WText::from(text),
            Err(_) => {
                log::warn!("code conversion from utf8 failed in sql result");
                WText::default()
            }
        }
    }
}

impl Decode for Vec<u8> {
    fn decode(raw: &[u8]) -> Self {
        raw.to_vec()
    }
}

impl Decode for OffsetDateTime {
    fn decode(raw: &[u8]) -> Self {
        let micros: i64 = match BigEndian::read(raw) {
            Some(value) => value,
            None => {
                if !raw.is_empty() {
                    log::warn!("timestamptz result field is too short");
                }
                0
            }
        };
        match PG_EPOCH.checked_add(Duration::microseconds(micros)) {
            Some(value) => value,
            None => {
                log::warn!("timestamptz result field is out of range");
                PG_EPOCH
            }
        }
    }
}

impl Decode for Date {
    fn decode(raw: &[u8]) -> Self {
        let days: i32 = match BigEndian::read(raw) {
            Some(value) => value,
            None => {
                if !raw.is_empty() {
                    log::warn!("date result field is too short");
                }
                0
            }
        };
        match PG_EPOCH_DATE.checked_add(Duration::days(days as i64)) {
            Some(value) => value,
            None => {
                log::warn!("date result field is out of range");
                PG_EPOCH_DATE
            }
        }
    }
}

impl Decode for IpAddr {
    /// The server sends 8 bytes for IPv4 and 20 for IPv6; both canonicalize
    /// to a 16-byte IPv6 address. Any other length yields the unspecified
    /// address.
    fn decode(raw: &[u8]) -> Self {
        match raw.len() {
            8 => {
                let v4 = Ipv4Addr::new(raw[4], raw[5], raw[6], raw[7]);
                IpAddr::V6(v4.to_ipv6_mapped())
            }
            20 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(&raw[4..20]);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
            _ => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        }
    }
}

/// Validate a one-dimensional array header and return the element count,
/// leaving `buf` at the first element length field.
fn array_header(buf: &mut &[u8], name: &str, element_oid: Oid) -> Option<i32> {
    if buf.remaining() < 5 * size_of::<i32>() {
        log::warn!("sql result array for {name} is truncated");
        return None;
    }
    let ndim = buf.get_i32();
    if ndim != 1 {
        log::warn!("sql result array for {name} has ndim != 1");
        return None;
    }
    let has_null = buf.get_i32();
    if has_null != 0 {
        log::warn!("sql result array for {name} has hasNull != 0");
        return None;
    }
    let element = buf.get_u32();
    if element != element_oid {
        log::warn!("sql result array for {name} has the wrong element type");
        return None;
    }
    let dim = buf.get_i32();
    buf.advance(size_of::<i32>()); // lower bound
    Some(dim)
}

/// Split the next `(length, payload)` element off an encoded text array.
fn next_element<'a>(buf: &mut &'a [u8], name: &str) -> Option<&'a [u8]> {
    if buf.remaining() < size_of::<i32>() {
        log::warn!("sql result array for {name} is truncated");
        return None;
    }
    let length = buf.get_i32().max(0) as usize;
    if buf.remaining() < length {
        log::warn!("sql result array for {name} is truncated");
        return None;
    }
    let whole: &'a [u8] = *buf;
    let (element, rest) = whole.split_at(length);
    *buf = rest;
    Some(element)
}

macro_rules! decode_numeric_array {
    ($elem:ty, $name:literal) => {
        impl Decode for Vec<$elem> {
            fn decode(raw: &[u8]) -> Self {
                let mut buf = raw;
                let Some(dim) = array_header(&mut buf, $name, <$elem>::OID) else {
                    return Vec::new();
                };
                let mut values = Vec::new();
                for _ in 0..dim {
                    if buf.remaining() < size_of::<i32>() {
                        log::warn!(concat!("sql result array for ", $name, " is truncated"));
                        break;
                    }
                    let length = buf.get_i32();
                    if length != size_of::<$elem>() as i32 {
                        log::warn!(concat!(
                            "sql result array for ",
                            $name,
                            " has an element of the wrong size"
                        ));
                        let skip = (length.max(0) as usize).min(buf.remaining());
                        buf.advance(skip);
                        continue;
                    }
                    match BigEndian::read(buf) {
                        Some(value) => {
                            values.push(value);
                            buf.advance(size_of::<$elem>());
                        }
                        None => {
                            log::warn!(concat!("sql result array for ", $name, " is truncated"));
                            break;
                        }
                    }
                }
                values
            }
        }
    };
}

decode_numeric_array!(i16, "int2[]");
decode_numeric_array!(i32, "int4[]");
decode_numeric_array!(i64, "int8[]");
decode_numeric_array!(f32, "float4[]");
decode_numeric_array!(f64, "float8[]");

impl Decode for Vec<String> {
    fn decode(raw: &[u8]) -> Self {
        let mut buf = raw;
        let Some(dim) = array_header(&mut buf, "text[]", oid::TEXT) else {
            return Vec::new();
        };
        let mut values = Vec::new();
        for _ in 0..dim {
            let Some(bytes) = next_element(&mut buf, "text[]") else {
                break;
            };
            values.push(String::decode(bytes));
        }
        values
    }
}

impl Decode for Vec<WText> {
    fn decode(raw: &[u8]) -> Self {
        let mut buf = raw;
        let Some(dim) = array_header(&mut buf, "wtext[]", oid::TEXT) else {
            return Vec::new();
        };
        let mut values = Vec::new();
        for _ in 0..dim {
            let Some(bytes) = next_element(&mut buf, "wtext[]") else {
                break;
            };
            match std::str::from_utf8(bytes) {
                Ok(text) => values.push(WText::from(text)),
                Err(_) => {
                    // abandon the rest of the array, keep what decoded
                    log::warn!("array code conversion from utf8 failed in sql result");
                    break;
                }
            }
        }
        values
    }
}
