//! # SOFI
//!
//! A reference implementation of the **Subject–Object–Flow–Integrity** model
//! of information-flow control.
//!
//! Every entity carries an *integrity*: a value from a bounded lattice that
//! labels how much the information held by the entity can be trusted. When a
//! subject asks to perform an operation on an object, the engine decides the
//! request in four fixed steps:
//!
//! ```text
//! request ──► access test (object ACL)
//!                 │ denied ──► verdict (nothing changed)
//!                 ▼
//!            integrity propagation (test / providing / receiving functions)
//!                 ▼
//!            minimum-integrity test (subject + object floors)
//!                 │ denied ──► verdict (nothing changed)
//!                 ▼
//!            commit new integrities, run the operation body ──► verdict
//! ```
//!
//! The three axes of the model are each a closed sum type:
//!
//! * integrity values — [`Singleton`], [`Linear`], [`Bitset`], [`LabelSet`]
//!   and the structural-sharing wrapper [`Shared`], all implementing the
//!   [`Integrity`] lattice trait;
//! * access controllers — the [`Acl`] hierarchy (`Deny`, `Single`, `List`,
//!   `PerOp`), monotone predicates over integrity;
//! * integrity-modification functions — [`IntegrityFun`] (`Min`, `Identity`,
//!   `Max`, `Table`, `Custom`) with a safety contract the engine clamps
//!   against.
//!
//! ## Quick start
//!
//! ```rust
//! use sofi::{Acl, Engine, EntityCore, LabelSet, OpDesc};
//!
//! type Label = LabelSet<String>;
//!
//! let mut subject = EntityCore::<Label>::default();
//! subject.integrity = Label::universe();
//! subject.min_integrity = Acl::List(vec![Label::empty()]);
//!
//! let mut object = EntityCore::<Label>::default();
//! object.min_integrity = Acl::List(vec![Label::empty()]);
//! object.access_ctrl = Acl::Single(Label::empty());
//!
//! let engine = Engine::new();
//! let read = OpDesc::read("read");
//! let verdict = engine.operation(&mut subject, &mut object, &read, true);
//! assert!(verdict.allowed());
//! ```
//!
//! Denied operations leave both entities untouched; allowed operations commit
//! the propagated integrities before the operation body runs. The engine is
//! single-threaded cooperative: one call to [`Engine::operation`] is one
//! uninterruptible logical step.

#![deny(missing_docs)]
#![deny(unsafe_code)]

mod acl;
mod agent;
pub mod audit;
mod bitset;
mod engine;
mod entity;
mod feed;
mod fun;
mod integrity;
mod op;
mod set;
mod shared;
mod verdict;

pub use acl::{Acl, AclKind};
pub use agent::{Agent, AgentResult, CopyAgent};
pub use audit::{DecisionLog, DecisionRecord, RecordingObserver};
pub use bitset::Bitset;
pub use engine::{Engine, EngineObserver, NoopObserver, TracingObserver};
pub use entity::{Entity, EntityCore};
pub use feed::{OpOutcome, OpRequest, OutcomeSink, RequestSource};
pub use fun::IntegrityFun;
pub use integrity::{Integrity, IntegrityError, Linear, Singleton};
pub use op::{Execute, OpDesc, Operation};
pub use set::LabelSet;
pub use shared::Shared;
pub use verdict::Verdict;
