//! Opaque 64-bit object handles.

use std::fmt;

/// Opaque identity of a client-visible object.
///
/// Two handles are equal iff they denote the same object instance within the
/// same registry partition. The value 0 conventionally denotes "no object".
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(pub u64);

impl Handle {
    /// The null handle ("no object").
    pub const NULL: Handle = Handle(0);

    /// Returns true if this is the null handle.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The raw 64-bit value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl From<u64> for Handle {
    fn from(raw: u64) -> Self {
        Handle(raw)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(0x{:x})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handle_is_zero() {
        assert!(Handle::NULL.is_null());
        assert!(!Handle(1).is_null());
        assert_eq!(Handle::NULL.raw(), 0);
    }

    #[test]
    fn display_is_hex() {
        assert_eq!(Handle(0xdead).to_string(), "0xdead");
    }
}
