//! The SOFI engine: access tests, integrity propagation and commit.

use tracing::{debug, trace};

use crate::acl::AclKind;
use crate::entity::Entity;
use crate::integrity::Integrity;
use crate::op::{Execute, Operation};
use crate::verdict::Verdict;

/// Observation points of [`Engine::operation`].
///
/// The hooks exist for logging and auditing and for stashing additional
/// information into the verdict; they are called at fixed points of the
/// algorithm and must not change its outcome. Every method has an empty
/// default body.
pub trait EngineObserver {
    /// Called on the freshly created verdict, before any test.
    fn init_verdict<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        _op: &dyn Operation,
        _execute: bool,
        _verdict: &mut Verdict,
    ) {
    }

    /// Called after the access-controller result is stored in the verdict.
    fn after_test_access<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        _op: &dyn Operation,
        _execute: bool,
        _verdict: &mut Verdict,
        _allow: bool,
    ) {
    }

    /// Called after the minimum-integrity result is stored in the verdict.
    ///
    /// `i_subj` and `i_obj` are the prospective integrities (absent when the
    /// operation does not read or write, respectively), and the two flags
    /// report whether each absent-or-tested side passed.
    #[allow(clippy::too_many_arguments)]
    fn after_test_min<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        _op: &dyn Operation,
        _execute: bool,
        _verdict: &mut Verdict,
        _i_subj: Option<&E::Integrity>,
        _allow_min_subj: bool,
        _i_obj: Option<&E::Integrity>,
        _allow_min_obj: bool,
    ) {
    }

    /// Called after the operation body ran, integrities already committed.
    fn execute_op<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        _op: &dyn Operation,
        _verdict: &mut Verdict,
    ) {
    }
}

/// The do-nothing observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopObserver;

impl EngineObserver for NoopObserver {}

/// An observer that emits `tracing` events at every hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl EngineObserver for TracingObserver {
    fn init_verdict<E: Entity>(
        &self,
        subject: &E,
        object: &E,
        op: &dyn Operation,
        execute: bool,
        _verdict: &mut Verdict,
    ) {
        trace!(
            op = op.name(),
            execute,
            subject = %subject.integrity(),
            object = %object.integrity(),
            "operation requested"
        );
    }

    fn after_test_access<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        op: &dyn Operation,
        execute: bool,
        _verdict: &mut Verdict,
        allow: bool,
    ) {
        debug!(op = op.name(), execute, allow, "access test");
    }

    fn after_test_min<E: Entity>(
        &self,
        _subject: &E,
        _object: &E,
        op: &dyn Operation,
        execute: bool,
        _verdict: &mut Verdict,
        i_subj: Option<&E::Integrity>,
        allow_min_subj: bool,
        i_obj: Option<&E::Integrity>,
        allow_min_obj: bool,
    ) {
        debug!(
            op = op.name(),
            execute,
            allow_min_subj,
            allow_min_obj,
            i_subj = i_subj.map(tracing::field::display),
            i_obj = i_obj.map(tracing::field::display),
            "minimum-integrity test"
        );
    }

    fn execute_op<E: Entity>(
        &self,
        subject: &E,
        object: &E,
        op: &dyn Operation,
        verdict: &mut Verdict,
    ) {
        debug!(
            op = op.name(),
            subject = %subject.integrity(),
            object = %object.integrity(),
            error = verdict.error,
            destroy = verdict.destroy,
            "operation executed"
        );
    }
}

/// The SOFI decision engine.
///
/// One engine instance drives one request at a time; the whole of
/// [`Engine::operation`] is a single uninterruptible logical step. Several
/// engines may run in parallel over disjoint entity sets.
#[derive(Debug, Clone, Default)]
pub struct Engine<Obs = NoopObserver> {
    observer: Obs,
}

impl Engine<NoopObserver> {
    /// An engine without observation.
    pub fn new() -> Self {
        Self {
            observer: NoopObserver,
        }
    }
}

impl<Obs: EngineObserver> Engine<Obs> {
    /// An engine reporting to the given observer.
    pub fn with_observer(observer: Obs) -> Self {
        Self { observer }
    }

    /// The attached observer.
    pub fn observer(&self) -> &Obs {
        &self.observer
    }

    /// Decides, and optionally performs, a SOFI operation.
    ///
    /// The algorithm runs four steps in order:
    ///
    /// 1. the object's access controller tests the subject's integrity; a
    ///    denial returns immediately, before any propagation;
    /// 2. prospective integrities are computed with [`Engine::pass_integrity`]
    ///    — for the object if the operation writes, for the subject if it
    ///    reads;
    /// 3. each prospective integrity must pass its entity's minimum-integrity
    ///    controller; a denial returns with both entities untouched;
    /// 4. only when `execute` is true: the prospective integrities are
    ///    committed and the operation body runs.
    ///
    /// With `execute == false` the full decision is made and reported but
    /// nothing is mutated. A returned verdict with `allowed() == false`
    /// always implies unchanged entities.
    pub fn operation<E, O>(&self, subject: &mut E, object: &mut E, op: &O, execute: bool) -> Verdict
    where
        E: Entity,
        O: Operation + Execute<E>,
    {
        let mut verdict = Verdict::default();
        self.observer
            .init_verdict(subject, object, op, execute, &mut verdict);

        let allow = object
            .access_ctrl()
            .test(subject.integrity(), op, &mut verdict, AclKind::Access);
        verdict.record_access(allow);
        self.observer
            .after_test_access(subject, object, op, execute, &mut verdict, allow);
        if !allow {
            return verdict;
        }

        let i_obj = if op.is_write() {
            Some(self.pass_integrity(subject, object, op))
        } else {
            None
        };
        let i_subj = if op.is_read() {
            Some(self.pass_integrity(object, subject, op))
        } else {
            None
        };

        let allow_min_subj = i_subj.as_ref().map_or(true, |i| {
            subject
                .min_integrity()
                .test(i, op, &mut verdict, AclKind::MinSubject)
        });
        let allow_min_obj = i_obj.as_ref().map_or(true, |i| {
            object
                .min_integrity()
                .test(i, op, &mut verdict, AclKind::MinObject)
        });
        verdict.record_min(allow_min_subj && allow_min_obj);
        self.observer.after_test_min(
            subject,
            object,
            op,
            execute,
            &mut verdict,
            i_subj.as_ref(),
            allow_min_subj,
            i_obj.as_ref(),
            allow_min_obj,
        );
        if !verdict.min_test() {
            return verdict;
        }

        if execute {
            if let Some(integrity) = i_subj {
                subject.set_integrity(integrity);
            }
            if let Some(integrity) = i_obj {
                object.set_integrity(integrity);
            }
            op.execute(subject, object, &mut verdict);
            self.observer
                .execute_op(subject, object, op, &mut verdict);
        }
        verdict
    }

    /// Computes the prospective integrity of the reader of a flow.
    ///
    /// The reader's test function reacts to the writer's integrity, bounded
    /// by the reader's own; the writer's providing function then offers an
    /// integrity bounded by the writer's own, and whatever the reader's
    /// receiving function accepts of it (bounded by the offer) is joined in.
    /// A providing or receiving result at the lattice minimum contributes
    /// nothing and short-circuits the rest of the chain.
    ///
    /// Unsafe functions are clamped by meeting with the relevant bound; when
    /// all three functions are safe the result never exceeds the reader's
    /// current integrity joined with the writer's offer.
    pub fn pass_integrity<E: Entity>(
        &self,
        writer: &E,
        reader: &E,
        op: &dyn Operation,
    ) -> E::Integrity {
        let mut passed = reader
            .test_fun()
            .apply(writer.integrity(), reader.integrity(), op);
        if !reader.test_fun().safe() {
            passed = passed.meet(reader.integrity());
        }

        let mut provided = writer
            .prov_fun()
            .apply(writer.integrity(), writer.integrity(), op);
        if provided != E::Integrity::min() {
            if !writer.prov_fun().safe() {
                // The writer cannot provide integrity exceeding its own.
                provided = provided.meet(writer.integrity());
            }
            let mut received = reader.recv_fun().apply(&provided, &provided, op);
            if received != E::Integrity::min() {
                if !reader.recv_fun().safe() {
                    received = received.meet(&provided);
                }
                passed = passed.join(&received);
            }
        }
        passed
    }
}
