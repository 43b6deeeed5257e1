//! Integrity values made of arbitrary label sets, with a distinguished
//! `universe` above every finite set.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use crate::integrity::Integrity;

/// An integrity that is either a finite set of labels or the universe.
///
/// Join is union and meet is intersection; `Universe` absorbs joins and is
/// the identity of meets. The order is the subset relation, with `Universe`
/// strictly greater than every finite set — even a set that happens to
/// enumerate every inhabitant of a finite `T`.
///
/// Labels are kept in a [`BTreeSet`] so the textual and serialized forms are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelSet<T: Ord> {
    /// A finite set of labels.
    Set(BTreeSet<T>),
    /// The greatest element, above every finite set.
    Universe,
}

impl<T: Ord> LabelSet<T> {
    /// The empty set (the least element).
    pub fn empty() -> Self {
        Self::Set(BTreeSet::new())
    }

    /// The universe (the greatest element).
    pub fn universe() -> Self {
        Self::Universe
    }

    /// Whether this value is the universe.
    pub fn is_universe(&self) -> bool {
        matches!(self, Self::Universe)
    }

    /// The labels of a finite set, or `None` for the universe.
    pub fn labels(&self) -> Option<&BTreeSet<T>> {
        match self {
            Self::Set(labels) => Some(labels),
            Self::Universe => None,
        }
    }
}

impl<T: Ord> Default for LabelSet<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Ord> From<BTreeSet<T>> for LabelSet<T> {
    fn from(labels: BTreeSet<T>) -> Self {
        Self::Set(labels)
    }
}

impl<T: Ord> FromIterator<T> for LabelSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Set(iter.into_iter().collect())
    }
}

impl<T: Ord> PartialOrd for LabelSet<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Universe, Self::Universe) => Some(Ordering::Equal),
            (Self::Universe, Self::Set(_)) => Some(Ordering::Greater),
            (Self::Set(_), Self::Universe) => Some(Ordering::Less),
            (Self::Set(a), Self::Set(b)) => {
                if a == b {
                    Some(Ordering::Equal)
                } else if a.is_subset(b) {
                    Some(Ordering::Less)
                } else if b.is_subset(a) {
                    Some(Ordering::Greater)
                } else {
                    None
                }
            }
        }
    }
}

impl<T: Ord + fmt::Display> fmt::Display for LabelSet<T> {
    /// `{a,b,c}` for finite sets, `universe` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universe => f.write_str("universe"),
            Self::Set(labels) => {
                f.write_str("{")?;
                for (index, label) in labels.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{label}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl<T: Ord + Clone + fmt::Display> Integrity for LabelSet<T> {
    fn join(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Universe, _) | (_, Self::Universe) => Self::Universe,
            (Self::Set(a), Self::Set(b)) => Self::Set(a.union(b).cloned().collect()),
        }
    }

    fn meet(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Universe, _) => other.clone(),
            (_, Self::Universe) => self.clone(),
            (Self::Set(a), Self::Set(b)) => Self::Set(a.intersection(b).cloned().collect()),
        }
    }

    fn min() -> Self {
        Self::empty()
    }

    fn max() -> Self {
        Self::Universe
    }
}

#[cfg(feature = "serde")]
impl<T: Ord + serde::Serialize> serde::Serialize for LabelSet<T> {
    /// The string `"universe"`, or a sequence of labels.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Universe => serializer.serialize_str("universe"),
            Self::Set(labels) => serializer.collect_seq(labels),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, T: Ord + serde::Deserialize<'de>> serde::Deserialize<'de> for LabelSet<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use std::marker::PhantomData;

        struct LabelSetVisitor<T>(PhantomData<T>);

        impl<'de, T: Ord + serde::Deserialize<'de>> serde::de::Visitor<'de> for LabelSetVisitor<T> {
            type Value = LabelSet<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("the string \"universe\" or an array of labels")
            }

            fn visit_str<E: serde::de::Error>(self, text: &str) -> Result<Self::Value, E> {
                if text == "universe" {
                    Ok(LabelSet::Universe)
                } else {
                    Err(E::invalid_value(serde::de::Unexpected::Str(text), &self))
                }
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut labels = BTreeSet::new();
                while let Some(label) = seq.next_element()? {
                    labels.insert(label);
                }
                Ok(LabelSet::Set(labels))
            }
        }

        deserializer.deserialize_any(LabelSetVisitor(PhantomData))
    }
}
