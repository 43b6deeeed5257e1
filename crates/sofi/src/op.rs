//! Operation descriptors.
//!
//! An operation is identified by a stable key (used for per-op ACL lookup)
//! and classified by its read/write flags. The two flags give four flow
//! classes: no-flow, read, write, and read-write. Only the key and the flow
//! class influence the engine's algorithm; everything else an operation does
//! lives in its [`Execute`] body.

use crate::verdict::Verdict;

/// The capability surface of an operation the engine and the ACLs consult.
pub trait Operation {
    /// Stable key used for per-op ACL dispatch.
    fn key(&self) -> &str;

    /// Whether information flows from the object to the subject.
    fn is_read(&self) -> bool {
        false
    }

    /// Whether information flows from the subject to the object.
    fn is_write(&self) -> bool {
        false
    }

    /// Display name for diagnostics; defaults to the key.
    fn name(&self) -> &str {
        self.key()
    }
}

/// The body of an operation, run by the engine after an allowed decision.
///
/// The body may mutate domain data on both entities and record extended
/// outcomes (`error`, `destroy`) in the verdict. It runs after the new
/// integrities are committed, and its failures never roll the commit back.
pub trait Execute<E> {
    /// Runs the operation body.
    fn execute(&self, _subject: &mut E, _object: &mut E, _verdict: &mut Verdict) {}
}

/// A plain value-semantic operation descriptor with an empty body.
///
/// Handy for tests and for operation sets whose bodies live elsewhere; the
/// four constructors cover the four flow classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpDesc {
    key: String,
    read: bool,
    write: bool,
    name: Option<String>,
}

impl OpDesc {
    /// A no-flow operation.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            read: false,
            write: false,
            name: None,
        }
    }

    /// A read operation.
    pub fn read(key: impl Into<String>) -> Self {
        Self {
            read: true,
            ..Self::new(key)
        }
    }

    /// A write operation.
    pub fn write(key: impl Into<String>) -> Self {
        Self {
            write: true,
            ..Self::new(key)
        }
    }

    /// A read-write operation.
    pub fn read_write(key: impl Into<String>) -> Self {
        Self {
            read: true,
            write: true,
            ..Self::new(key)
        }
    }

    /// Overrides the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Operation for OpDesc {
    fn key(&self) -> &str {
        &self.key
    }

    fn is_read(&self) -> bool {
        self.read
    }

    fn is_write(&self) -> bool {
        self.write
    }

    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

impl<E> Execute<E> for OpDesc {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_classes() {
        assert!(!OpDesc::new("no_op").is_read() && !OpDesc::new("no_op").is_write());
        assert!(OpDesc::read("read").is_read() && !OpDesc::read("read").is_write());
        assert!(!OpDesc::write("write").is_read() && OpDesc::write("write").is_write());
        let swap = OpDesc::read_write("swap");
        assert!(swap.is_read() && swap.is_write());
    }

    #[test]
    fn name_defaults_to_key() {
        let op = OpDesc::new("no_op");
        assert_eq!(op.name(), "no_op");
        let op = op.with_name("do nothing");
        assert_eq!(op.name(), "do nothing");
        assert_eq!(op.key(), "no_op");
    }
}
