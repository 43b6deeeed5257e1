//! Integrity-modification functions.
//!
//! Each entity carries three of these, one per role: the **test** function
//! (how the reader's integrity reacts to an incoming flow), the **providing**
//! function (what the writer is willing to provide) and the **receiving**
//! function (what the reader is willing to accept). A function maps
//! `(integrity, limit, operation)` to an integrity and declares whether it is
//! *safe*: guaranteed to return a value at most `limit`. The engine clamps
//! the result of unsafe functions by meeting it with the relevant bound.

use std::fmt;
use std::sync::Arc;

use crate::integrity::Integrity;
use crate::op::Operation;

/// Signature of a user-supplied integrity function.
pub type CustomFn<I> = dyn Fn(&I, &I, &dyn Operation) -> I + Send + Sync;

/// A closed family of integrity-modification functions.
///
/// The built-in variants are all safe by construction; only
/// [`IntegrityFun::Custom`] can declare itself unsafe, in which case the
/// engine meets its result with the limit at every call site that requires
/// the bound.
#[derive(Clone)]
pub enum IntegrityFun<I> {
    /// Always returns the lattice minimum.
    Min,
    /// Returns the input meeted with the limit.
    Identity,
    /// Returns the limit.
    Max,
    /// A table of rules `(threshold, grant)`. Every rule whose threshold is
    /// less than or equal to the input joins its grant into the result; a
    /// rule without a grant joins the input itself. The accumulated result
    /// is meeted with the limit, so the table is always safe.
    Table(Vec<(I, Option<I>)>),
    /// A user-supplied function with a declared safety.
    Custom {
        /// The function.
        fun: Arc<CustomFn<I>>,
        /// Whether the function promises `fun(i, limit, op) <= limit`.
        safe: bool,
    },
}

impl<I: Integrity> IntegrityFun<I> {
    /// Wraps a closure with the given safety declaration.
    pub fn custom<F>(fun: F, safe: bool) -> Self
    where
        F: Fn(&I, &I, &dyn Operation) -> I + Send + Sync + 'static,
    {
        Self::Custom {
            fun: Arc::new(fun),
            safe,
        }
    }

    /// Whether the engine may trust the result to respect the limit.
    pub fn safe(&self) -> bool {
        match self {
            Self::Min | Self::Identity | Self::Max | Self::Table(_) => true,
            Self::Custom { safe, .. } => *safe,
        }
    }

    /// Evaluates the function.
    pub fn apply(&self, i: &I, limit: &I, op: &dyn Operation) -> I {
        match self {
            Self::Min => I::min(),
            Self::Identity => i.meet(limit),
            Self::Max => limit.clone(),
            Self::Table(rules) => {
                let mut result = I::min();
                for (threshold, grant) in rules {
                    if threshold <= i {
                        result = result.join(grant.as_ref().unwrap_or(i));
                    }
                }
                result.meet(limit)
            }
            Self::Custom { fun, .. } => fun(i, limit, op),
        }
    }
}

impl<I> Default for IntegrityFun<I> {
    fn default() -> Self {
        Self::Min
    }
}

impl<I: fmt::Debug> fmt::Debug for IntegrityFun<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => f.write_str("Min"),
            Self::Identity => f.write_str("Identity"),
            Self::Max => f.write_str("Max"),
            Self::Table(rules) => f.debug_tuple("Table").field(rules).finish(),
            Self::Custom { safe, .. } => f
                .debug_struct("Custom")
                .field("safe", safe)
                .finish_non_exhaustive(),
        }
    }
}

impl<I: PartialEq> PartialEq for IntegrityFun<I> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Min, Self::Min) | (Self::Identity, Self::Identity) | (Self::Max, Self::Max) => {
                true
            }
            (Self::Table(a), Self::Table(b)) => a == b,
            (Self::Custom { fun: a, safe: sa }, Self::Custom { fun: b, safe: sb }) => {
                sa == sb && Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

#[cfg(feature = "serde")]
impl<I: serde::Serialize> serde::Serialize for IntegrityFun<I> {
    /// `"min"`, `"identity"`, `"max"`, or `{"table": [[threshold, grant],…]}`.
    ///
    /// [`IntegrityFun::Custom`] carries a closure and cannot cross a store
    /// boundary; serializing it is an error.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        match self {
            Self::Min => serializer.serialize_str("min"),
            Self::Identity => serializer.serialize_str("identity"),
            Self::Max => serializer.serialize_str("max"),
            Self::Table(rules) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("table", rules)?;
                map.end()
            }
            Self::Custom { .. } => Err(serde::ser::Error::custom(
                "a custom integrity function is not serializable",
            )),
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, I: serde::Deserialize<'de>> serde::Deserialize<'de> for IntegrityFun<I> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use std::marker::PhantomData;

        struct FunVisitor<I>(PhantomData<I>);

        impl<'de, I: serde::Deserialize<'de>> serde::de::Visitor<'de> for FunVisitor<I> {
            type Value = IntegrityFun<I>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("\"min\", \"identity\", \"max\", or {\"table\": …}")
            }

            fn visit_str<E: serde::de::Error>(self, text: &str) -> Result<Self::Value, E> {
                match text {
                    "min" => Ok(IntegrityFun::Min),
                    "identity" => Ok(IntegrityFun::Identity),
                    "max" => Ok(IntegrityFun::Max),
                    other => Err(E::invalid_value(serde::de::Unexpected::Str(other), &self)),
                }
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                use serde::de::Error;
                let Some(key) = access.next_key::<String>()? else {
                    return Err(A::Error::custom("expected a \"table\" entry"));
                };
                if key != "table" {
                    return Err(A::Error::custom(format!("unknown function kind {key:?}")));
                }
                let rules = access.next_value::<Vec<(I, Option<I>)>>()?;
                Ok(IntegrityFun::Table(rules))
            }
        }

        deserializer.deserialize_any(FunVisitor(PhantomData))
    }
}
