//! Object type names.
//!
//! MC object types are short lowercase ASCII strings (`"dprc"`, `"dpbp"`,
//! `"dpseci"`). They are stored inline in a fixed 16-byte array so they can
//! be compared and copied without allocation.

use core::fmt;

use static_assertions::const_assert_eq;

/// Fixed-capacity ASCII name of an MC object type (max 15 bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(C)]
pub struct ObjectTypeName {
    name: [u8; 16],
}

const_assert_eq!(size_of::<ObjectTypeName>(), 16);

impl ObjectTypeName {
    /// Maximum length of an object type name, excluding the terminator.
    pub const MAX_LEN: usize = 15;

    /// Creates a name from a string slice.
    ///
    /// Returns `None` if the name is empty, longer than [`Self::MAX_LEN`] or
    /// not ASCII.
    pub const fn new(name: &str) -> Option<Self> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > Self::MAX_LEN {
            return None;
        }

        let mut result = [0u8; 16];
        let mut c = 0;
        while c < bytes.len() {
            if !bytes[c].is_ascii() || bytes[c] == 0 {
                return None;
            }
            result[c] = bytes[c];
            c += 1;
        }
        Some(Self { name: result })
    }

    /// Creates a name from a string literal.
    ///
    /// # Panics
    ///
    /// Panics (at compile time in a `const`) if the name is invalid.
    pub const fn from_static(name: &'static str) -> Self {
        match Self::new(name) {
            Some(name) => name,
            None => panic!("invalid object type name"),
        }
    }

    /// Returns the length of the name.
    pub const fn len(&self) -> usize {
        let mut i = 0;
        while i < Self::MAX_LEN {
            if self.name[i] == 0 {
                return i;
            }
            i += 1;
        }
        Self::MAX_LEN
    }

    /// Returns whether the name is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.name[0] == 0
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII.
        core::str::from_utf8(&self.name[..self.len()]).unwrap_or("")
    }
}

impl fmt::Display for ObjectTypeName {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.as_str().fmt(f)
    }
}

impl PartialEq<str> for ObjectTypeName {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for ObjectTypeName {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let name = ObjectTypeName::new("dpseci").unwrap();
        assert_eq!(name.len(), 6);
        assert_eq!(name, "dpseci");
        assert_eq!(name.as_str(), "dpseci");
    }

    #[test]
    fn test_new_rejects_empty_and_long() {
        assert!(ObjectTypeName::new("").is_none());
        assert!(ObjectTypeName::new("0123456789abcdef").is_none());
        assert!(ObjectTypeName::new("0123456789abcde").is_some());
    }

    #[test]
    fn test_new_rejects_non_ascii() {
        assert!(ObjectTypeName::new("dpbé").is_none());
    }

    #[test]
    fn test_from_static_in_const() {
        const DPRC: ObjectTypeName = ObjectTypeName::from_static("dprc");
        assert_eq!(DPRC, "dprc");
        assert!(!DPRC.is_empty());
    }
}
