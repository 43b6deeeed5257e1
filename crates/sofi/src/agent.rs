//! Agents: bridges between the engine and an external entity store.
//!
//! An agent serializes entities into messages for a remote side and
//! materializes entities out of received messages. The core treats both the
//! message format and the trust decision as opaque; only a non-success
//! result short-circuits the surrounding request.

use std::marker::PhantomData;

/// Result of an agent export or import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentResult {
    /// The operation succeeded.
    #[default]
    Success,
    /// The operation failed.
    Error,
    /// On export: the remote side is not trusted to receive the entity.
    /// On import: the authenticity of the message could not be verified.
    Untrusted,
}

impl AgentResult {
    /// Whether the result is a success.
    pub fn ok(self) -> bool {
        self == Self::Success
    }
}

/// A stateless bridge to an external entity store.
pub trait Agent {
    /// The entity type crossing the boundary.
    type Entity;
    /// The message type carrying an entity.
    type Message;

    /// Serializes `entity` into `message` for transmission.
    fn export_msg(&self, entity: &Self::Entity, message: &mut Self::Message) -> AgentResult;

    /// Materializes `entity` from `message`.
    fn import_msg(&self, message: &Self::Message, entity: &mut Self::Entity) -> AgentResult;
}

/// An agent that exports and imports by plain copy.
///
/// The message type is the entity type itself, and the result of either
/// direction is programmable, which makes this the natural test double for
/// the `error` and `untrusted` short-circuit paths.
#[derive(Debug, Clone)]
pub struct CopyAgent<E> {
    /// Result returned by [`Agent::export_msg`]; the copy happens only on
    /// success.
    pub export_result: AgentResult,
    /// Result returned by [`Agent::import_msg`]; the copy happens only on
    /// success.
    pub import_result: AgentResult,
    _entity: PhantomData<E>,
}

impl<E> Default for CopyAgent<E> {
    fn default() -> Self {
        Self {
            export_result: AgentResult::Success,
            import_result: AgentResult::Success,
            _entity: PhantomData,
        }
    }
}

impl<E> CopyAgent<E> {
    /// An agent that succeeds in both directions.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Clone> Agent for CopyAgent<E> {
    type Entity = E;
    type Message = E;

    fn export_msg(&self, entity: &E, message: &mut E) -> AgentResult {
        if self.export_result.ok() {
            message.clone_from(entity);
        }
        self.export_result
    }

    fn import_msg(&self, message: &E, entity: &mut E) -> AgentResult {
        if self.import_result.ok() {
            entity.clone_from(message);
        }
        self.import_result
    }
}
