//! Typed result tuples over an opaque query result.
use std::{fmt, marker::PhantomData};

use crate::{
    decode::Decode,
    handle::{status_code, QueryResult},
    pg_type::PgType,
};

/// Query result status.
///
/// Mapped from the status code the result handle reports; see
/// [`Status::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No result has been bound.
    NoResult,
    EmptyQuery,
    CommandOk,
    RowsOk,
    CopyOut,
    CopyIn,
    BadResponse,
    NonfatalError,
    CopyBoth,
    SingleTuple,
    /// Fatal server error, or a status code this crate does not know.
    FatalError,
}

impl Status {
    /// Map a raw status code; unknown codes collapse to
    /// [`FatalError`][Status::FatalError].
    pub fn from_code(code: i32) -> Status {
        match code {
            status_code::EMPTY_QUERY => Status::EmptyQuery,
            status_code::COMMAND_OK => Status::CommandOk,
            status_code::TUPLES_OK => Status::RowsOk,
            status_code::COPY_OUT => Status::CopyOut,
            status_code::COPY_IN => Status::CopyIn,
            status_code::BAD_RESPONSE => Status::BadResponse,
            status_code::NONFATAL_ERROR => Status::NonfatalError,
            status_code::COPY_BOTH => Status::CopyBoth,
            status_code::SINGLE_TUPLE => Status::SingleTuple,
            _ => Status::FatalError,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::NoResult => "No Result",
            Status::EmptyQuery => "Empty Query",
            Status::CommandOk => "Command OK",
            Status::RowsOk => "Rows OK",
            Status::CopyOut => "Copy Out",
            Status::CopyIn => "Copy In",
            Status::BadResponse => "Bad Response",
            Status::NonfatalError => "Non-fatal Error",
            Status::CopyBoth => "Copy Both",
            Status::SingleTuple => "Single Tuple",
            Status::FatalError => "Fatal Error",
        })
    }
}

/// A typed row schema: a tuple of decodable column types.
///
/// Implemented for tuples up to arity 16, and for `()` as the empty schema.
pub trait RowTuple: Sized {
    /// Number of columns in the schema.
    const COLUMNS: usize;

    /// Decode every column of `row`.
    fn decode_row<R: QueryResult>(res: &R, row: u32) -> Self;

    /// Index of the first column whose declared type disagrees with the
    /// schema, or `None` when all columns verify.
    fn verify<R: QueryResult>(res: &R) -> Option<usize>;
}

impl RowTuple for () {
    const COLUMNS: usize = 0;

    fn decode_row<R: QueryResult>(_: &R, _: u32) -> Self {}

    fn verify<R: QueryResult>(_: &R) -> Option<usize> {
        None
    }
}

macro_rules! row_tuple {
    ($($t:ident $i:tt),+) => {
        impl<$($t: Decode),+> RowTuple for ($($t,)+) {
            const COLUMNS: usize = [$(stringify!($t)),+].len();

            fn decode_row<R: QueryResult>(res: &R, row: u32) -> Self {
                ($($t::decode(res.value(row, $i)),)+)
            }

            fn verify<R: QueryResult>(res: &R) -> Option<usize> {
                $(
                    if !<$t as PgType>::verify(res, $i) {
                        return Some($i);
                    }
                )+
                None
            }
        }
    };
}

row_tuple!(T0 0);
row_tuple!(T0 0, T1 1);
row_tuple!(T0 0, T1 1, T2 2);
row_tuple!(T0 0, T1 1, T2 2, T3 3);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12, T13 13);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12, T13 13, T14 14);
row_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12, T13 13, T14 14, T15 15);

/// A typed view over a server query result.
///
/// Starts *empty*: [`status`][Results::status] reports
/// [`Status::NoResult`] until [`bind`][Results::bind] attaches the handle
/// received from the connection. Once bound, rows decode through the schema
/// `R` and the handle is released when the `Results` drops.
pub struct Results<R, H> {
    handle: Option<H>,
    _row: PhantomData<fn() -> R>,
}

impl<R: RowTuple, H: QueryResult> Results<R, H> {
    /// An empty result.
    pub fn new() -> Self {
        Self { handle: None, _row: PhantomData }
    }

    /// Take ownership of a populated query result.
    ///
    /// Binding is one-shot per result; binding over an existing handle
    /// releases the old one.
    pub fn bind(&mut self, handle: H) {
        self.handle = Some(handle);
    }

    /// Result status, [`Status::NoResult`] while unbound.
    pub fn status(&self) -> Status {
        match &self.handle {
            None => Status::NoResult,
            Some(handle) => Status::from_code(handle.status()),
        }
    }

    /// Number of rows in the result.
    pub fn rows(&self) -> u32 {
        self.handle.as_ref().map_or(0, |handle| handle.ntuples())
    }

    /// Number of columns in the result.
    pub fn columns(&self) -> usize {
        self.handle.as_ref().map_or(0, |handle| handle.nfields())
    }

    /// Rows affected by the command, parsed from the command tag.
    pub fn affected_rows(&self) -> u32 {
        self.handle.as_ref().map_or(0, |handle| atoi(handle.cmd_tuples()))
    }

    /// Null check on a single cell. An unbound result is all null.
    pub fn null(&self, row: u32, column: usize) -> bool {
        self.handle.as_ref().map_or(true, |handle| handle.is_null(row, column))
    }

    /// Error message from the server, empty when there is none.
    pub fn error_message(&self) -> &str {
        self.handle.as_ref().map_or("", |handle| handle.error_message())
    }

    /// Decode row `row` through the schema.
    ///
    /// `None` when unbound or when `row` is out of range.
    pub fn row(&self, row: u32) -> Option<R> {
        let handle = self.handle.as_ref()?;
        (row < handle.ntuples()).then(|| R::decode_row(handle, row))
    }

    /// Scan all columns against the schema.
    ///
    /// `None` when the column count equals the schema arity and every column
    /// verifies; otherwise the zero-based index of the first mismatched
    /// column.
    pub fn verify(&self) -> Option<usize> {
        match &self.handle {
            None if R::COLUMNS == 0 => None,
            None => Some(0),
            Some(handle) => {
                let columns = handle.nfields();
                if columns != R::COLUMNS {
                    return Some(columns.min(R::COLUMNS));
                }
                R::verify(handle)
            }
        }
    }
}

impl<R: RowTuple, H: QueryResult> Default for Results<R, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// Leading decimal digits of a command tag, `atoi` style.
fn atoi(tag: &str) -> u32 {
    tag.bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .fold(0, |n: u32, digit| {
            n.wrapping_mul(10).wrapping_add(u32::from(digit - b'0'))
        })
}
