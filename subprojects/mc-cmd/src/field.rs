//! Bit-addressed field codec for command parameter words.
//!
//! Every value carried by an MC command lives at a fixed position inside one
//! of the seven 64-bit parameter words:
//!
//! ```text
//!  word N
//!  63                          offset+width   offset          0
//!  ┌──────────────────────────────┬──────────────┬─────────────┐
//!  │        other fields          │    value     │ other fields│
//!  └──────────────────────────────┴──────────────┴─────────────┘
//! ```
//!
//! A [`Field`] names that position. Its constructor is a `const fn` that
//! rejects impossible geometry, so a bad descriptor declared as a `const`
//! fails the build instead of corrupting a buffer at runtime.
//!
//! Writes are masked: only the `width` bits at `offset` change, which lets
//! several fields share a word without clobbering each other.

use crate::command::MC_CMD_NUM_OF_PARAMS;

/// Position of a value inside the parameter words of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    word: u8,
    offset: u8,
    width: u8,
}

impl Field {
    /// Creates a field descriptor.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `width` is zero or
    /// larger than 64, if `offset + width` exceeds 64, or if `word` is not one
    /// of the parameter words.
    pub const fn new(word: usize, offset: u32, width: u32) -> Self {
        assert!(word < MC_CMD_NUM_OF_PARAMS, "field word index out of range");
        assert!(width >= 1 && width <= 64, "field width must be 1..=64");
        assert!(offset + width <= 64, "field crosses a word boundary");

        Self {
            word: word as u8,
            offset: offset as u8,
            width: width as u8,
        }
    }

    /// Index of the parameter word holding this field.
    #[inline]
    pub const fn word(self) -> usize {
        self.word as usize
    }

    /// Bit offset of the field's least significant bit.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.offset as u32
    }

    /// Width of the field in bits.
    #[inline]
    pub const fn width(self) -> u32 {
        self.width as u32
    }

    /// Mask of the field's bits, not shifted.
    #[inline]
    pub const fn mask(self) -> u64 {
        low_mask(self.width as u32)
    }

    /// Writes `value` into `words`, leaving every other bit untouched.
    #[inline]
    pub fn write<T: FieldValue>(self, words: &mut [u64; MC_CMD_NUM_OF_PARAMS], value: T) {
        let word = &mut words[self.word()];
        *word = pack_bits(*word, self.offset(), self.width(), value.into_bits());
    }

    /// Reads the field from `words`, extending it to `T`.
    #[inline]
    pub fn read<T: FieldValue>(self, words: &[u64; MC_CMD_NUM_OF_PARAMS]) -> T {
        let bits = unpack_bits(words[self.word()], self.offset(), self.width());
        T::from_bits(bits, self.width())
    }
}

#[inline]
const fn low_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Replaces `width` bits of `word` at `offset` with the low bits of `value`.
///
/// Bits of `value` above `width` are discarded.
#[inline]
pub fn pack_bits(word: u64, offset: u32, width: u32, value: u64) -> u64 {
    debug_assert!(width >= 1 && offset + width <= 64, "invalid field geometry");
    let offset = offset & 63;
    let mask = low_mask(width.min(64 - offset));
    (word & !(mask << offset)) | ((value & mask) << offset)
}

/// Extracts `width` bits of `word` at `offset`, right-aligned.
#[inline]
pub fn unpack_bits(word: u64, offset: u32, width: u32) -> u64 {
    debug_assert!(width >= 1 && offset + width <= 64, "invalid field geometry");
    let offset = offset & 63;
    (word >> offset) & low_mask(width.min(64 - offset))
}

/// Scalar types that can be stored in a [`Field`].
///
/// Unsigned integers and `bool` are zero-extended on read; signed integers
/// are sign-extended from the field width.
pub trait FieldValue: Copy {
    /// Returns the two's complement bit pattern of the value.
    fn into_bits(self) -> u64;

    /// Rebuilds a value from the right-aligned `width` bits of a field.
    fn from_bits(bits: u64, width: u32) -> Self;
}

macro_rules! impl_unsigned_field {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            #[inline]
            fn into_bits(self) -> u64 {
                self as u64
            }

            #[inline]
            fn from_bits(bits: u64, _width: u32) -> Self {
                bits as $ty
            }
        }
    )*};
}

macro_rules! impl_signed_field {
    ($($ty:ty),*) => {$(
        impl FieldValue for $ty {
            #[inline]
            fn into_bits(self) -> u64 {
                self as i64 as u64
            }

            #[inline]
            fn from_bits(bits: u64, width: u32) -> Self {
                let shift = 64 - width.clamp(1, 64);
                (((bits << shift) as i64) >> shift) as $ty
            }
        }
    )*};
}

impl_unsigned_field!(u8, u16, u32, u64);
impl_signed_field!(i8, i16, i32, i64);

impl FieldValue for bool {
    #[inline]
    fn into_bits(self) -> u64 {
        self as u64
    }

    #[inline]
    fn from_bits(bits: u64, _width: u32) -> Self {
        bits != 0
    }
}
