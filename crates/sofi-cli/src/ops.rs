//! The demonstration operation table.
//!
//! Twelve operations over [`DemoEntity`] payloads. The table is the driver's
//! configuration: the engine itself only sees the key and the read/write
//! flags, and the store keeps its request feed in terms of the same keys.

use thiserror::Error;

use sofi::{Acl, Execute, Operation, Verdict};

use crate::entity::{DemoEntity, DemoIntegrity};

/// The twelve operation kinds of the demonstration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// No flow, no effect.
    NoOp,
    /// Copy the object's data to the subject.
    Read,
    /// Copy the subject's data to the object.
    Write,
    /// Append the object's data to the subject.
    ReadAppend,
    /// Append the subject's data to the object.
    WriteAppend,
    /// Replace the object's data with the argument.
    WriteArg,
    /// Append the argument to the object's data.
    AppendArg,
    /// Exchange the data of subject and object.
    Swap,
    /// Replace the object's integrity with the argument (JSON form).
    SetIntegrity,
    /// Replace the object's minimum-integrity controller with the argument
    /// (JSON array of integrities).
    SetMinIntegrity,
    /// Ask the driver to store a copy of the object under the argument name.
    Clone,
    /// Ask the driver to delete the object.
    Destroy,
}

/// Raised when a request names an operation key outside the table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown operation key {key:?}")]
pub struct UnknownOpError {
    /// The unrecognized key.
    pub key: String,
}

impl OpKind {
    /// Every operation in table order.
    pub const ALL: [OpKind; 12] = [
        OpKind::NoOp,
        OpKind::Read,
        OpKind::Write,
        OpKind::ReadAppend,
        OpKind::WriteAppend,
        OpKind::WriteArg,
        OpKind::AppendArg,
        OpKind::Swap,
        OpKind::SetIntegrity,
        OpKind::SetMinIntegrity,
        OpKind::Clone,
        OpKind::Destroy,
    ];

    /// The stable key of this operation.
    pub fn key(self) -> &'static str {
        match self {
            OpKind::NoOp => "no_op",
            OpKind::Read => "read",
            OpKind::Write => "write",
            OpKind::ReadAppend => "read_append",
            OpKind::WriteAppend => "write_append",
            OpKind::WriteArg => "write_arg",
            OpKind::AppendArg => "append_arg",
            OpKind::Swap => "swap",
            OpKind::SetIntegrity => "set_integrity",
            OpKind::SetMinIntegrity => "set_min_integrity",
            OpKind::Clone => "clone",
            OpKind::Destroy => "destroy",
        }
    }

    /// Looks an operation up by key.
    pub fn from_key(key: &str) -> Result<Self, UnknownOpError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == key)
            .ok_or_else(|| UnknownOpError {
                key: key.to_string(),
            })
    }

    fn is_read(self) -> bool {
        matches!(self, OpKind::Read | OpKind::ReadAppend | OpKind::Swap)
    }

    fn is_write(self) -> bool {
        matches!(
            self,
            OpKind::Write
                | OpKind::WriteAppend
                | OpKind::WriteArg
                | OpKind::AppendArg
                | OpKind::Swap
                | OpKind::SetIntegrity
                | OpKind::SetMinIntegrity
        )
    }
}

/// An operation instance: a kind plus the request argument.
#[derive(Debug, Clone)]
pub struct DemoOp {
    kind: OpKind,
    arg: String,
}

impl DemoOp {
    /// Binds an operation kind to a request argument.
    pub fn new(kind: OpKind, arg: impl Into<String>) -> Self {
        Self {
            kind,
            arg: arg.into(),
        }
    }

    /// The operation kind.
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// The bound argument.
    pub fn arg(&self) -> &str {
        &self.arg
    }
}

impl Operation for DemoOp {
    fn key(&self) -> &str {
        self.kind.key()
    }

    fn is_read(&self) -> bool {
        self.kind.is_read()
    }

    fn is_write(&self) -> bool {
        self.kind.is_write()
    }
}

impl Execute<DemoEntity> for DemoOp {
    fn execute(&self, subject: &mut DemoEntity, object: &mut DemoEntity, verdict: &mut Verdict) {
        match self.kind {
            OpKind::NoOp | OpKind::Clone => {}
            OpKind::Read => subject.data = object.data.clone(),
            OpKind::Write => object.data = subject.data.clone(),
            OpKind::ReadAppend => subject.data.push_str(&object.data),
            OpKind::WriteAppend => object.data.push_str(&subject.data),
            OpKind::WriteArg => object.data = self.arg.clone(),
            OpKind::AppendArg => object.data.push_str(&self.arg),
            OpKind::Swap => std::mem::swap(&mut subject.data, &mut object.data),
            OpKind::SetIntegrity => match serde_json::from_str::<DemoIntegrity>(&self.arg) {
                Ok(integrity) => object.sofi.integrity = integrity,
                Err(_) => verdict.error = true,
            },
            OpKind::SetMinIntegrity => {
                match serde_json::from_str::<Vec<DemoIntegrity>>(&self.arg) {
                    Ok(floors) => {
                        object.sofi.min_integrity = if floors.is_empty() {
                            Acl::Deny
                        } else {
                            Acl::List(floors)
                        };
                    }
                    Err(_) => verdict.error = true,
                }
            }
            OpKind::Destroy => verdict.destroy = true,
        }
    }
}
