//! The [`QueryResult`] trait.
use crate::pg_type::Oid;

/// Result status codes as reported by [`QueryResult::status`].
///
/// Numerically the `ExecStatusType` values of the C client library, which is
/// what connection engines hand through the boundary.
pub mod status_code {
    pub const EMPTY_QUERY: i32 = 0;
    pub const COMMAND_OK: i32 = 1;
    pub const TUPLES_OK: i32 = 2;
    pub const COPY_OUT: i32 = 3;
    pub const COPY_IN: i32 = 4;
    pub const BAD_RESPONSE: i32 = 5;
    pub const NONFATAL_ERROR: i32 = 6;
    pub const FATAL_ERROR: i32 = 7;
    pub const COPY_BOTH: i32 = 8;
    pub const SINGLE_TUPLE: i32 = 9;
}

/// Access to a populated server query result.
///
/// The connection engine implements this over its native result object and
/// hands the handle to a [`Results`][crate::Results], which owns it from then
/// on. Releasing the underlying resource belongs in the implementor's `Drop`.
///
/// Row and column arguments are only ever taken from the result's own
/// dimensions; implementations may panic on out-of-range access.
pub trait QueryResult {
    /// Raw result status code, see [`status_code`].
    fn status(&self) -> i32;

    /// Number of rows in the result.
    fn ntuples(&self) -> u32;

    /// Number of columns in the result.
    fn nfields(&self) -> usize;

    /// Declared type oid of a column.
    fn field_type(&self, column: usize) -> Oid;

    /// Declared byte size of a column, negative when variable.
    fn field_size(&self, column: usize) -> i32;

    /// Raw value bytes of a cell. Empty for SQL NULL.
    fn value(&self, row: u32, column: usize) -> &[u8];

    /// SQL NULL check on a cell.
    fn is_null(&self, row: u32, column: usize) -> bool;

    /// Command tag of the completed command, e.g. the affected row count.
    fn cmd_tuples(&self) -> &str;

    /// Error message of the result, empty when there is none.
    fn error_message(&self) -> &str;
}
