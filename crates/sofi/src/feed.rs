//! The request feed: typed operation records flowing into a driver and
//! outcome records flowing back out.
//!
//! A driver that persists state drains an ordered stream of [`OpRequest`]
//! records, resolves the named entities through its agent, runs each
//! operation on the engine and reports an [`OpOutcome`] per request.
//! Requests must be processed in feed order; the engine never reorders.

use crate::verdict::Verdict;

/// One requested operation between two named entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OpRequest {
    /// Request identifier, echoed in the outcome.
    pub id: i64,
    /// Name of the subject entity.
    pub subject: String,
    /// Name of the object entity.
    pub object: String,
    /// Operation key; the driver's operation table resolves it.
    pub op: String,
    /// Operation argument.
    pub arg: String,
    /// Free-form comment, echoed in the outcome.
    pub comment: String,
}

/// The reported result of one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OpOutcome {
    /// Request identifier.
    pub id: i64,
    /// Name of the subject entity.
    pub subject: String,
    /// Name of the object entity.
    pub object: String,
    /// Operation key.
    pub op: String,
    /// Operation argument.
    pub arg: String,
    /// Free-form comment.
    pub comment: String,
    /// Whether the operation was allowed.
    pub allowed: bool,
    /// Access-controller test result.
    pub access: bool,
    /// Minimum-integrity test result.
    pub min: bool,
    /// Whether the request failed outside the flow decision (operation body
    /// failure, unknown key, agent failure).
    pub error: bool,
    /// Whether the object was destroyed.
    pub destroy: bool,
}

impl OpOutcome {
    /// An outcome echoing `request` with the decision taken from `verdict`.
    pub fn from_verdict(request: &OpRequest, verdict: &Verdict) -> Self {
        Self {
            id: request.id,
            subject: request.subject.clone(),
            object: request.object.clone(),
            op: request.op.clone(),
            arg: request.arg.clone(),
            comment: request.comment.clone(),
            allowed: verdict.allowed(),
            access: verdict.access_test(),
            min: verdict.min_test(),
            error: verdict.error,
            destroy: verdict.destroy,
        }
    }

    /// A denied outcome with `error` set, for requests that never reached
    /// the engine.
    pub fn failed(request: &OpRequest) -> Self {
        Self {
            error: true,
            ..Self::from_verdict(request, &Verdict::default())
        }
    }
}

/// An ordered source of requests.
pub trait RequestSource {
    /// The next request, or `None` when the feed is drained.
    fn next_request(&mut self) -> Option<OpRequest>;
}

/// Any iterator over requests is a source.
impl<I: Iterator<Item = OpRequest>> RequestSource for I {
    fn next_request(&mut self) -> Option<OpRequest> {
        self.next()
    }
}

/// A sink for reported outcomes.
pub trait OutcomeSink {
    /// Records one outcome.
    fn record_outcome(&mut self, outcome: OpOutcome);
}

impl OutcomeSink for Vec<OpOutcome> {
    fn record_outcome(&mut self, outcome: OpOutcome) {
        self.push(outcome);
    }
}
