//! Network byte order storage.
use std::fmt;

mod sealed {
    pub trait Sealed {}
}

/// Numeric scalar with a fixed-width network-order wire image.
///
/// Implemented for the scalar types postgres transmits big-endian:
/// `i16`, `i32`, `i64`, `f32` and `f64`.
pub trait Scalar: Copy + sealed::Sealed {
    /// Wire width in bytes.
    const WIDTH: usize;

    /// The `[u8; WIDTH]` array type.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Copy + Default;

    /// Network-order bytes of `self`.
    fn to_be(self) -> Self::Bytes;

    /// Value of network-order `bytes`.
    fn from_be(bytes: Self::Bytes) -> Self;
}

macro_rules! scalar {
    ($ty:ty) => {
        impl sealed::Sealed for $ty {}

        impl Scalar for $ty {
            const WIDTH: usize = size_of::<$ty>();

            type Bytes = [u8; size_of::<$ty>()];

            fn to_be(self) -> Self::Bytes {
                self.to_be_bytes()
            }

            fn from_be(bytes: Self::Bytes) -> Self {
                Self::from_be_bytes(bytes)
            }
        }
    };
}

scalar!(i16);
scalar!(i32);
scalar!(i64);
scalar!(f32);
scalar!(f64);

/// Fixed-width big-endian storage for a numeric scalar.
///
/// The storage is the on-wire bytes; values convert on [`get`][BigEndian::get]
/// and [`set`][BigEndian::set]. No allocation involved.
#[derive(Clone, Copy)]
pub struct BigEndian<T: Scalar> {
    bytes: T::Bytes,
}

impl<T: Scalar> BigEndian<T> {
    /// Store `value` in network order.
    pub fn new(value: T) -> Self {
        Self { bytes: value.to_be() }
    }

    /// Load the stored value.
    pub fn get(&self) -> T {
        T::from_be(self.bytes)
    }

    /// Overwrite the storage with `value` in network order.
    pub fn set(&mut self, value: T) {
        self.bytes = value.to_be();
    }

    /// The wire bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Load a value from the head of `raw`.
    ///
    /// `None` when `raw` is shorter than the wire width.
    pub fn read(raw: &[u8]) -> Option<T> {
        if raw.len() < T::WIDTH {
            return None;
        }
        let mut bytes = T::Bytes::default();
        bytes.as_mut().copy_from_slice(&raw[..T::WIDTH]);
        Some(T::from_be(bytes))
    }
}

impl<T: Scalar + fmt::Debug> fmt::Debug for BigEndian<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BigEndian").field(&self.get()).finish()
    }
}
