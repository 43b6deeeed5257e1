//! Access controllers: monotone predicates over integrity.
//!
//! An access controller decides whether a proposed operation is permitted,
//! given the integrity of the acting side. The same type doubles as the
//! minimum-integrity floor of an entity; the [`AclKind`] argument only names
//! the role a test is performed in.

use std::collections::BTreeMap;

use crate::integrity::Integrity;
use crate::op::Operation;
use crate::verdict::Verdict;

/// The role an access-controller test is performed in.
///
/// Carries intent only; the provided controllers decide identically in every
/// role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AclKind {
    /// Gating an operation on an object.
    Access,
    /// Testing the subject's prospective integrity against its floor.
    MinSubject,
    /// Testing the object's prospective integrity against its floor.
    MinObject,
}

/// A closed hierarchy of access controllers.
///
/// All variants are monotone in the tested integrity: if `test` passes for
/// `i` it passes for every `i' >= i`. Controllers hold no mutable state, so
/// the property holds across calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Acl<I> {
    /// Denies everything. This is also what an absent per-op entry means.
    Deny,
    /// Passes integrities greater than or equal to a single floor.
    Single(I),
    /// Passes integrities greater than or equal to any listed floor.
    /// An empty list denies.
    List(Vec<I>),
    /// Dispatches on the operation key.
    PerOp {
        /// Controller per operation key; a [`Acl::Deny`] entry denies that
        /// operation explicitly.
        ops: BTreeMap<String, Acl<I>>,
        /// Controller for keys without an entry.
        default: Box<Acl<I>>,
    },
}

impl<I> Default for Acl<I> {
    fn default() -> Self {
        Self::Deny
    }
}

impl<I: Integrity> Acl<I> {
    /// A controller that passes every integrity (floor at the lattice
    /// minimum).
    pub fn allow_all() -> Self {
        Self::Single(I::min())
    }

    /// A per-op controller with the given default and no per-op entries.
    pub fn per_op_default(default: Acl<I>) -> Self {
        Self::PerOp {
            ops: BTreeMap::new(),
            default: Box::new(default),
        }
    }

    /// Adds a per-op entry, turning `self` into a [`Acl::PerOp`] if needed.
    ///
    /// A non-per-op controller becomes the default of the new dispatch
    /// table.
    pub fn with_op(self, key: impl Into<String>, acl: Acl<I>) -> Self {
        let (mut ops, default) = match self {
            Self::PerOp { ops, default } => (ops, default),
            other => (BTreeMap::new(), Box::new(other)),
        };
        ops.insert(key.into(), acl);
        Self::PerOp { ops, default }
    }

    /// Tests whether `subject` may proceed for `op` in the given role.
    ///
    /// Dispatch for [`Acl::PerOp`]: an entry for `op.key()` delegates to it
    /// (a [`Acl::Deny`] entry denies); without an entry the default decides.
    pub fn test(
        &self,
        subject: &I,
        op: &dyn Operation,
        verdict: &mut Verdict,
        kind: AclKind,
    ) -> bool {
        match self {
            Self::Deny => false,
            Self::Single(floor) => subject >= floor,
            Self::List(floors) => floors.iter().any(|floor| subject >= floor),
            Self::PerOp { ops, default } => match ops.get(op.key()) {
                Some(entry) => entry.test(subject, op, verdict, kind),
                None => default.test(subject, op, verdict, kind),
            },
        }
    }
}

#[cfg(feature = "serde")]
impl<I: serde::Serialize> serde::Serialize for Acl<I> {
    /// `Deny` is an empty array, `Single` a one-element array, `List` an
    /// array of integrities, and `PerOp` a map of key to controller with the
    /// default under the empty key.
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self {
            Self::Deny => serializer.serialize_seq(Some(0))?.end(),
            Self::Single(floor) => {
                let mut seq = serializer.serialize_seq(Some(1))?;
                seq.serialize_element(floor)?;
                seq.end()
            }
            Self::List(floors) => serializer.collect_seq(floors),
            Self::PerOp { ops, default } => {
                let extra = usize::from(!matches!(**default, Self::Deny));
                let mut map = serializer.serialize_map(Some(ops.len() + extra))?;
                if extra == 1 {
                    map.serialize_entry("", default)?;
                }
                for (key, entry) in ops {
                    map.serialize_entry(key, entry)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(feature = "serde")]
impl<'de, I: serde::Deserialize<'de>> serde::Deserialize<'de> for Acl<I> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use std::fmt;
        use std::marker::PhantomData;

        struct AclVisitor<I>(PhantomData<I>);

        impl<'de, I: serde::Deserialize<'de>> serde::de::Visitor<'de> for AclVisitor<I> {
            type Value = Acl<I>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of integrities or a map of operation keys to controllers")
            }

            fn visit_seq<A: serde::de::SeqAccess<'de>>(
                self,
                mut seq: A,
            ) -> Result<Self::Value, A::Error> {
                let mut floors = Vec::new();
                while let Some(floor) = seq.next_element()? {
                    floors.push(floor);
                }
                // An empty list denies; keep that as the first-class variant
                // so serialization round-trips.
                if floors.is_empty() {
                    Ok(Acl::Deny)
                } else {
                    Ok(Acl::List(floors))
                }
            }

            fn visit_map<A: serde::de::MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut ops = BTreeMap::new();
                let mut default = Box::new(Acl::Deny);
                while let Some((key, entry)) = access.next_entry::<String, Acl<I>>()? {
                    if key.is_empty() {
                        default = Box::new(entry);
                    } else {
                        ops.insert(key, entry);
                    }
                }
                Ok(Acl::PerOp { ops, default })
            }
        }

        deserializer.deserialize_any(AclVisitor(PhantomData))
    }
}
