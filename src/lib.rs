//! Binary value codec for the postgres extended-query protocol.
//!
//! Encodes typed parameter tuples into the four parallel arrays a `Bind`
//! message consumes, and decodes result columns back into typed tuples with
//! schema verification. Values travel in binary format (format code 1);
//! integers and floats go network order, timestamps count microseconds from
//! 2000-01-01T00:00:00Z, arrays carry the documented one-dimensional header.
//!
//! # Examples
//!
//! Encoding parameters:
//!
//! ```
//! use pgcodec::Parameters;
//!
//! let mut params = Parameters::new((420i32, String::from("Foo")));
//! params.build();
//!
//! assert_eq!(params.oids(), &[23, 25]);
//! assert_eq!(params.sizes(), &[4, 3]);
//! assert_eq!(params.formats(), &[1, 1]);
//! assert_eq!(params.raws()[0], Some(&[0, 0, 1, 164][..]));
//! ```
//!
//! Marking a column null:
//!
//! ```
//! use pgcodec::Parameters;
//!
//! let mut params = Parameters::new((14i16, false));
//! params.set_null(1);
//! params.build();
//!
//! assert!(params.is_null(1));
//! assert_eq!(params.raws()[1], None);
//! ```

// Byte order
mod endian;

// Type catalog
pub mod pg_type;
mod wtext;

// Result boundary
pub mod handle;

// Encoding
pub mod encode;
pub mod params;

// Decoding
pub mod decode;
pub mod results;

pub use endian::{BigEndian, Scalar};
pub use pg_type::{Oid, PgType};
pub use wtext::WText;

#[doc(inline)]
pub use handle::QueryResult;

#[doc(inline)]
pub use encode::Encode;
#[doc(inline)]
pub use params::{Parameter, Parameters};

#[doc(inline)]
pub use decode::Decode;
#[doc(inline)]
pub use results::{Results, RowTuple, Status};
