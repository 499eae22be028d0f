//! Postgres type catalog.
use std::net::IpAddr;
use time::{Date, OffsetDateTime};

use crate::{handle::QueryResult, wtext::WText};

/// Postgres object identifier.
///
/// The oid type is implemented as an unsigned four-byte integer.
///
/// <https://www.postgresql.org/docs/current/datatype-oid.html>
pub type Oid = u32;

/// Catalog oids of the supported types.
///
/// Reference: <https://github.com/postgres/postgres/blob/master/src/include/catalog/pg_type.dat>
pub mod oid {
    use super::Oid;

    pub const BOOL: Oid = 16;
    pub const BYTEA: Oid = 17;
    pub const INT8: Oid = 20;
    pub const INT2: Oid = 21;
    pub const INT4: Oid = 23;
    pub const TEXT: Oid = 25;
    pub const FLOAT4: Oid = 700;
    pub const FLOAT8: Oid = 701;
    pub const INET: Oid = 869;
    pub const INT2_ARRAY: Oid = 1005;
    pub const INT4_ARRAY: Oid = 1007;
    pub const TEXT_ARRAY: Oid = 1009;
    pub const INT8_ARRAY: Oid = 1016;
    pub const FLOAT4_ARRAY: Oid = 1021;
    pub const FLOAT8_ARRAY: Oid = 1022;
    pub const DATE: Oid = 1082;
    pub const TIMESTAMPTZ: Oid = 1184;
}

/// A type that has a corresponding postgres oid and binary wire layout.
pub trait PgType {
    /// Catalog oid of the type.
    const OID: Oid;

    /// Declared wire size for fixed-width types, `None` when variable.
    const FIXED_SIZE: Option<i32> = None;

    /// Check a result column against this type.
    ///
    /// The declared column oid must match, and for fixed-width types so must
    /// the declared field size.
    fn verify<R: QueryResult + ?Sized>(res: &R, column: usize) -> bool {
        res.field_type(column) == Self::OID
            && Self::FIXED_SIZE.map_or(true, |size| res.field_size(column) == size)
    }
}

macro_rules! pg_type {
    ($ty:ty, $oid:expr, $size:expr $(, $doc:literal)?) => {
        impl PgType for $ty {
            $(#[doc = $doc])?
            const OID: Oid = $oid;
            const FIXED_SIZE: Option<i32> = $size;
        }
    };
}

pg_type!(bool, oid::BOOL, Some(1));
pg_type!(i64, oid::INT8, Some(8), "`int8` ~18 digit integer, 8-byte storage");
pg_type!(i16, oid::INT2, Some(2), "`int2` -32 thousand to 32 thousand, 2-byte storage");
pg_type!(i32, oid::INT4, Some(4), "`int4` -2 billion to 2 billion integer, 4-byte storage");
pg_type!(String, oid::TEXT, None, "`text` variable-length string, no limit specified");
pg_type!(WText, oid::TEXT, None, "`text` variable-length string, converted from wide text");
pg_type!(Vec<u8>, oid::BYTEA, None, "`bytea` variable-length binary string");
pg_type!(f32, oid::FLOAT4, Some(4), "`float4` single-precision floating point number, 4-byte storage");
pg_type!(f64, oid::FLOAT8, Some(8), "`float8` double-precision floating point number, 8-byte storage");
pg_type!(IpAddr, oid::INET, None, "`inet` host address");
pg_type!(OffsetDateTime, oid::TIMESTAMPTZ, Some(8), "`timestamptz` date and time with time zone");
pg_type!(Date, oid::DATE, Some(4), "`date` calendar date");
pg_type!(Vec<i16>, oid::INT2_ARRAY, None);
pg_type!(Vec<i32>, oid::INT4_ARRAY, None);
pg_type!(Vec<i64>, oid::INT8_ARRAY, None);
pg_type!(Vec<f32>, oid::FLOAT4_ARRAY, None);
pg_type!(Vec<f64>, oid::FLOAT8_ARRAY, None);
pg_type!(Vec<String>, oid::TEXT_ARRAY, None);
pg_type!(Vec<WText>, oid::TEXT_ARRAY, None);
