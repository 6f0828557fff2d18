//! Strongly-typed rank newtypes for the seismic volume axes.
//!
//! A rank is a position in the sorted list of distinct coordinates along
//! one axis, as opposed to the survey coordinate itself. Keeping them as
//! distinct types prevents passing an inline rank where a crossline rank
//! or a sample index is expected.

use std::fmt;

/// Macro to generate rank newtypes with common functionality.
macro_rules! define_rank {
    (
        $(#[$meta:meta])*
        $name:ident, $display_prefix:literal
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(usize);

        impl $name {
            /// Create a new rank.
            #[inline]
            pub const fn new(rank: usize) -> Self {
                Self(rank)
            }

            /// Get the raw rank value.
            #[inline]
            pub const fn get(self) -> usize {
                self.0
            }

            /// First rank (0).
            pub const ZERO: Self = Self(0);

            /// Iterate over ranks [0, n).
            pub fn iter(n: usize) -> impl ExactSizeIterator<Item = $name> {
                (0..n).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, self.0)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(rank: usize) -> Self {
                Self(rank)
            }
        }

        impl From<$name> for usize {
            #[inline]
            fn from(rank: $name) -> usize {
                rank.0
            }
        }
    };
}

define_rank!(
    /// Position of an inline in the volume's sorted distinct inline list.
    ///
    /// # Example
    ///
    /// ```
    /// use seisterra::types::InlineRank;
    ///
    /// let rank = InlineRank::new(3);
    /// assert_eq!(rank.get(), 3);
    /// ```
    InlineRank,
    "IL#"
);

define_rank!(
    /// Position of a crossline in the volume's sorted distinct crossline list.
    CrosslineRank,
    "XL#"
);

define_rank!(
    /// Index into the volume's depth/time sample vector.
    SampleIndex,
    "S#"
);
