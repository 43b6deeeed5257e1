//! The bounded-lattice trait for integrity values, and the totally ordered
//! variants [`Singleton`] and [`Linear`].
//!
//! An integrity is a value from a bounded lattice: a partially ordered set
//! with a join (`+`, least upper bound), a meet (`*`, greatest lower bound),
//! a least element and a greatest element. The partial order is exposed
//! through [`PartialOrd`], so incomparable values answer `None` from
//! `partial_cmp`.

use std::fmt;

/// A value from a bounded lattice, used as the trust label of an entity.
///
/// Implementations must satisfy the lattice laws for all `a`, `b`, `c`:
///
/// * idempotence: `a.join(a) == a`, `a.meet(a) == a`;
/// * commutativity and associativity of `join` and `meet`;
/// * absorption: `a.join(&a.meet(b)) == a`, `a.meet(&a.join(b)) == a`;
/// * consistency with the order: `a <= b` iff `a.join(b) == b` iff
///   `a.meet(b) == a`;
/// * bounds: `Self::min() <= a <= Self::max()`.
///
/// `Display` provides the textual form used for diagnostics.
pub trait Integrity: Clone + PartialEq + PartialOrd + fmt::Display {
    /// The lattice join (least upper bound).
    #[must_use]
    fn join(&self, other: &Self) -> Self;

    /// The lattice meet (greatest lower bound).
    #[must_use]
    fn meet(&self, other: &Self) -> Self;

    /// The least element of the lattice.
    fn min() -> Self;

    /// The greatest element of the lattice.
    fn max() -> Self;

    /// Whether `self` is less than or equal to `other` in the lattice order.
    fn leq(&self, other: &Self) -> bool {
        self <= other
    }
}

/// Error raised when an integrity value cannot be constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    /// A [`Linear`] value outside its closed interval.
    OutOfRange {
        /// The rejected value.
        value: i64,
        /// Lower bound of the interval.
        lo: i64,
        /// Upper bound of the interval.
        hi: i64,
    },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { value, lo, hi } => {
                write!(f, "integrity value {} outside [{}, {}]", value, lo, hi)
            }
        }
    }
}

impl std::error::Error for IntegrityError {}

/// The one-element lattice. Join, meet, minimum and maximum all coincide.
///
/// Useful as the degenerate label when flow decisions should depend on
/// access controllers alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Singleton;

impl fmt::Display for Singleton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("()")
    }
}

impl Integrity for Singleton {
    fn join(&self, _other: &Self) -> Self {
        Singleton
    }

    fn meet(&self, _other: &Self) -> Self {
        Singleton
    }

    fn min() -> Self {
        Singleton
    }

    fn max() -> Self {
        Singleton
    }
}

/// A totally ordered integrity over the closed interval `[LO, HI]`.
///
/// Join is the numeric maximum and meet the numeric minimum. Constructing a
/// value outside the interval is the only failure mode of the integrity
/// algebra and yields [`IntegrityError::OutOfRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Linear<const LO: i64, const HI: i64> {
    value: i64,
}

impl<const LO: i64, const HI: i64> Linear<LO, HI> {
    const ORDERED: () = assert!(LO <= HI, "Linear requires LO <= HI");

    /// Creates a value, rejecting anything outside `[LO, HI]`.
    pub fn new(value: i64) -> Result<Self, IntegrityError> {
        let () = Self::ORDERED;
        if value < LO || value > HI {
            return Err(IntegrityError::OutOfRange {
                value,
                lo: LO,
                hi: HI,
            });
        }
        Ok(Self { value })
    }

    /// The underlying numeric value.
    pub const fn value(self) -> i64 {
        self.value
    }
}

impl<const LO: i64, const HI: i64> Default for Linear<LO, HI> {
    fn default() -> Self {
        <Self as Integrity>::min()
    }
}

impl<const LO: i64, const HI: i64> fmt::Display for Linear<LO, HI> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<const LO: i64, const HI: i64> Integrity for Linear<LO, HI> {
    fn join(&self, other: &Self) -> Self {
        Self {
            value: self.value.max(other.value),
        }
    }

    fn meet(&self, other: &Self) -> Self {
        Self {
            value: self.value.min(other.value),
        }
    }

    fn min() -> Self {
        let () = Self::ORDERED;
        Self { value: LO }
    }

    fn max() -> Self {
        let () = Self::ORDERED;
        Self { value: HI }
    }
}

#[cfg(feature = "serde")]
impl<const LO: i64, const HI: i64> serde::Serialize for Linear<LO, HI> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value)
    }
}

#[cfg(feature = "serde")]
impl<'de, const LO: i64, const HI: i64> serde::Deserialize<'de> for Linear<LO, HI> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
