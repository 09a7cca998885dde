//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Nodes and agents live in arenas
//! (`Vec`s owned by the graph and the agent store); an id is the index into
//! its arena, so no object references ever cross the node/agent boundary.

use std::fmt;

/// Generate a typed ID wrapper around a `u32` arena index.
///
/// `$tag` is the short prefix used by `Display` (`a3`, `n17`, …) which keeps
/// tick-level log lines compact.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident, $tag:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub u32);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(u32::MAX);

            /// Cast to `usize` for direct use as an arena index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Inverse of [`index`](Self::index).
            ///
            /// # Panics
            /// Panics in debug mode if `i` does not fit in a `u32`.
            #[inline(always)]
            pub fn from_index(i: usize) -> Self {
                debug_assert!(i < u32::MAX as usize);
                $name(i as u32)
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, concat!($tag, "{}"), self.0)
                } else {
                    f.write_str(concat!($tag, "-"))
                }
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }
    };
}

typed_id! {
    /// Index of an agent in the agent store.  Also the agent's position in
    /// the controller's fixed move order.
    pub struct AgentId, "a";
}

typed_id! {
    /// Index of a passable grid cell in the graph's node arena.
    pub struct NodeId, "n";
}
