//! Wire identifiers.
//!
//! Circuits number their wires contiguously from zero, so an id doubles as
//! the position of the wire in a statevector index or a counts key.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! wire_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Zero-based position of the wire.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<u32> for $name {
            fn from(index: u32) -> Self {
                Self(index)
            }
        }
    };
}

wire_id!(
    /// A qubit. Bit `k` of a statevector index is the value of qubit `k`.
    QubitId,
    "q"
);

wire_id!(
    /// A classical bit. Character `k` of a counts key is classical bit `k`.
    ClbitId,
    "c"
);

/// A quantum or classical wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wire {
    /// A qubit.
    Qubit(QubitId),
    /// A classical bit.
    Clbit(ClbitId),
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wire::Qubit(q) => q.fmt(f),
            Wire::Clbit(c) => c.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(QubitId(3).to_string(), "q3");
        assert_eq!(ClbitId(0).to_string(), "c0");
        assert_eq!(Wire::Clbit(ClbitId(2)).to_string(), "c2");
    }

    #[test]
    fn test_serde_is_transparent() {
        assert_eq!(serde_json::to_string(&QubitId(4)).unwrap(), "4");
        let id: ClbitId = serde_json::from_str("7").unwrap();
        assert_eq!(id.index(), 7);
    }
}
