//! Query parameter tuples and their wire arrays.
//!
//! - [`Parameter`], one encoded value owning its bytes
//! - [`Parameters`], a tuple of them plus the parallel arrays a `Bind`
//!   message consumes
use bytes::BytesMut;
use std::marker::PhantomData;

use crate::{
    encode::Encode,
    endian::BigEndian,
    pg_type::Oid,
    wtext::WText,
};

/// Byte offset of the first element length field in an encoded array.
const ARRAY_ELEMS: usize = 5 * size_of::<i32>();

/// A single bound parameter, owning its encoded wire bytes.
///
/// Assignment through [`set`][Parameter::set] re-encodes from scratch.
pub struct Parameter<T> {
    data: BytesMut,
    _value: PhantomData<T>,
}

impl<T: Encode> Parameter<T> {
    /// Encode `value` into a fresh parameter.
    pub fn new(value: &T) -> Self {
        let mut data = BytesMut::new();
        value.encode(&mut data);
        Self { data, _value: PhantomData }
    }

    /// Replace the contained value, re-encoding it.
    pub fn set(&mut self, value: &T) {
        self.data.clear();
        value.encode(&mut self.data);
    }

    /// Parameter type oid.
    pub fn oid(&self) -> Oid {
        T::OID
    }

    /// The encoded wire bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Encoded length in bytes.
    pub fn size(&self) -> i32 {
        self.data.len() as i32
    }
}

macro_rules! array_index {
    ($elem:ty) => {
        impl Parameter<Vec<$elem>> {
            /// Read the `i`-th element back out of the encoded image.
            ///
            /// Panics when `i` is out of range.
            pub fn get(&self, i: usize) -> $elem {
                let offset = ARRAY_ELEMS
                    + i * (size_of::<i32>() + size_of::<$elem>())
                    + size_of::<i32>();
                BigEndian::read(&self.data[offset..]).expect("array element index out of range")
            }

            /// Overwrite the `i`-th big-endian element in place.
            ///
            /// Panics when `i` is out of range.
            pub fn set_element(&mut self, i: usize, value: $elem) {
                let offset = ARRAY_ELEMS
                    + i * (size_of::<i32>() + size_of::<$elem>())
                    + size_of::<i32>();
                self.data[offset..offset + size_of::<$elem>()]
                    .copy_from_slice(BigEndian::new(value).as_bytes());
            }
        }
    };
}

array_index!(i16);
array_index!(i32);
array_index!(i64);
array_index!(f32);
array_index!(f64);

impl Parameter<Vec<String>> {
    /// Read the `i`-th element back out of the encoded image.
    ///
    /// Panics when `i` is out of range.
    pub fn get(&self, i: usize) -> String {
        String::from_utf8_lossy(element(&self.data, i)).into_owned()
    }
}

impl Parameter<Vec<WText>> {
    /// Read the `i`-th element back out of the encoded image, converting
    /// from UTF-8.
    ///
    /// Panics when `i` is out of range.
    pub fn get(&self, i: usize) -> WText {
        WText::from(String::from_utf8_lossy(element(&self.data, i)).as_ref())
    }
}

/// Walk an encoded text array to the payload of element `i`.
fn element(data: &[u8], i: usize) -> &[u8] {
    let mut offset = ARRAY_ELEMS;
    let mut n = 0;
    loop {
        let length = BigEndian::<i32>::read(&data[offset..])
            .expect("array element index out of range") as usize;
        offset += size_of::<i32>();
        if n == i {
            return &data[offset..offset + length];
        }
        offset += length;
        n += 1;
    }
}

/// A heterogeneous tuple of encoded parameters.
///
/// Implemented for tuples of [`Parameter`] up to arity 16.
pub trait ParamTuple {
    /// Number of parameters.
    const LEN: usize;

    /// Catalog oid of every column, in order.
    fn oids() -> Vec<Oid>;

    /// Encoded bytes of the parameter at `column`.
    ///
    /// Panics when `column` is out of range.
    fn data(&self, column: usize) -> &[u8];

    /// Encoded length of the parameter at `column`.
    ///
    /// Panics when `column` is out of range.
    fn size(&self, column: usize) -> i32;
}

/// Conversion of a tuple of application values into a parameter tuple.
pub trait IntoParams {
    /// The parameter tuple produced.
    type Tuple: ParamTuple;

    /// Encode every value.
    fn into_params(self) -> Self::Tuple;
}

impl ParamTuple for () {
    const LEN: usize = 0;

    fn oids() -> Vec<Oid> {
        Vec::new()
    }

    fn data(&self, column: usize) -> &[u8] {
        panic!("parameter column {column} out of range")
    }

    fn size(&self, column: usize) -> i32 {
        panic!("parameter column {column} out of range")
    }
}

impl IntoParams for () {
    type Tuple = ();

    fn into_params(self) -> Self::Tuple {}
}

macro_rules! param_tuple {
    ($($t:ident $i:tt),+) => {
        impl<$($t: Encode),+> ParamTuple for ($(Parameter<$t>,)+) {
            const LEN: usize = [$(stringify!($t)),+].len();

            fn oids() -> Vec<Oid> {
                vec![$($t::OID),+]
            }

            fn data(&self, column: usize) -> &[u8] {
                match column {
                    $($i => self.$i.data(),)+
                    _ => panic!("parameter column {column} out of range"),
                }
            }

            fn size(&self, column: usize) -> i32 {
                match column {
                    $($i => self.$i.size(),)+
                    _ => panic!("parameter column {column} out of range"),
                }
            }
        }

        impl<$($t: Encode),+> IntoParams for ($($t,)+) {
            type Tuple = ($(Parameter<$t>,)+);

            fn into_params(self) -> Self::Tuple {
                ($(Parameter::new(&self.$i),)+)
            }
        }
    };
}

param_tuple!(T0 0);
param_tuple!(T0 0, T1 1);
param_tuple!(T0 0, T1 1, T2 2);
param_tuple!(T0 0, T1 1, T2 2, T3 3);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12, T13 13);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12, T13 13, T14 14);
param_tuple!(T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7, T8 8, T9 9, T10 10, T11 11, T12 12, T13 13, T14 14, T15 15);

/// A tuple of parameters bound to a query, exposing the parallel arrays the
/// extended protocol consumes.
///
/// Construct from a tuple of application values, then call
/// [`build`][Parameters::build] before reading the arrays:
///
/// ```
/// use pgcodec::Parameters;
///
/// let mut params = Parameters::new((14i16, String::from("foo")));
/// params.set_null(0);
/// params.build();
///
/// assert_eq!(params.oids(), &[21, 25]);
/// assert_eq!(params.raws(), [None, Some(&b"foo"[..])]);
/// ```
pub struct Parameters<T> {
    params: T,
    nulls: Vec<bool>,
    oids: Vec<Oid>,
    sizes: Vec<i32>,
    formats: Vec<i16>,
}

impl<T: ParamTuple> Parameters<T> {
    /// Encode a tuple of application values.
    pub fn new(values: impl IntoParams<Tuple = T>) -> Self {
        Self {
            params: values.into_params(),
            nulls: vec![false; T::LEN],
            oids: T::oids(),
            sizes: Vec::new(),
            formats: vec![1; T::LEN],
        }
    }

    /// Populate the size array from the contained encoders.
    ///
    /// Idempotent; call again after mutating parameters through
    /// [`tuple_mut`][Parameters::tuple_mut].
    pub fn build(&mut self) {
        self.sizes.clear();
        self.sizes.extend((0..T::LEN).map(|i| self.params.size(i)));
    }

    /// Parameter type oids, one per column.
    pub fn oids(&self) -> &[Oid] {
        &self.oids
    }

    /// Encoded byte lengths, one per column.
    ///
    /// Not valid until [`build`][Parameters::build] is called.
    pub fn sizes(&self) -> &[i32] {
        &self.sizes
    }

    /// Format codes, one per column. Every parameter is binary (`1`).
    pub fn formats(&self) -> &[i16] {
        &self.formats
    }

    /// Raw encoded bytes, one per column; `None` marks an SQL NULL.
    ///
    /// The slices borrow the parameters' owned buffers.
    pub fn raws(&self) -> Vec<Option<&[u8]>> {
        (0..T::LEN)
            .map(|i| (!self.nulls[i]).then(|| self.params.data(i)))
            .collect()
    }

    /// Number of parameters in the tuple.
    pub fn len(&self) -> usize {
        T::LEN
    }

    /// Returns `true` when the tuple has no parameters.
    pub fn is_empty(&self) -> bool {
        T::LEN == 0
    }

    /// Send the column as SQL NULL (zero indexed).
    ///
    /// Panics when `column` is out of range.
    pub fn set_null(&mut self, column: usize) {
        self.nulls[column] = true;
    }

    /// Null check on a single column (zero indexed).
    ///
    /// Panics when `column` is out of range.
    pub fn is_null(&self, column: usize) -> bool {
        self.nulls[column]
    }

    /// The typed parameter tuple.
    pub fn tuple(&self) -> &T {
        &self.params
    }

    /// Mutable access to the typed parameter tuple, for reassignment.
    pub fn tuple_mut(&mut self) -> &mut T {
        &mut self.params
    }
}
