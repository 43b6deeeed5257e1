//! Structural sharing of integrity values.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::integrity::Integrity;

/// An integrity wrapper that shares storage between equal values.
///
/// Semantically identical to the wrapped lattice `J`; the only difference is
/// that cloning copies a handle, and `join`/`meet` return a handle sharing
/// the operand whenever the result equals it. Sharing is read-only: a shared
/// value is never mutated in place.
#[derive(Debug)]
pub struct Shared<J> {
    inner: Arc<J>,
}

impl<J> Shared<J> {
    /// Wraps a value.
    pub fn new(value: J) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Whether two handles share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<J> Clone for Shared<J> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<J> Deref for Shared<J> {
    type Target = J;

    fn deref(&self) -> &J {
        &self.inner
    }
}

impl<J> From<J> for Shared<J> {
    fn from(value: J) -> Self {
        Self::new(value)
    }
}

impl<J: PartialEq> PartialEq for Shared<J> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.inner == *other.inner
    }
}

impl<J: Eq> Eq for Shared<J> {}

impl<J: PartialOrd> PartialOrd for Shared<J> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.ptr_eq(other) {
            return Some(Ordering::Equal);
        }
        self.inner.partial_cmp(&other.inner)
    }
}

impl<J: fmt::Display> fmt::Display for Shared<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl<J: Integrity> Integrity for Shared<J> {
    fn join(&self, other: &Self) -> Self {
        let result = self.inner.join(&other.inner);
        if result == *self.inner {
            self.clone()
        } else if result == *other.inner {
            other.clone()
        } else {
            Self::new(result)
        }
    }

    fn meet(&self, other: &Self) -> Self {
        let result = self.inner.meet(&other.inner);
        if result == *self.inner {
            self.clone()
        } else if result == *other.inner {
            other.clone()
        } else {
            Self::new(result)
        }
    }

    fn min() -> Self {
        Self::new(J::min())
    }

    fn max() -> Self {
        Self::new(J::max())
    }
}

#[cfg(feature = "serde")]
impl<J: serde::Serialize> serde::Serialize for Shared<J> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, J: serde::Deserialize<'de>> serde::Deserialize<'de> for Shared<J> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        J::deserialize(deserializer).map(Self::new)
    }
}
