//! The engine's decision object.

/// The outcome of one engine decision.
///
/// A verdict carries the result of the access-controller test and of the
/// minimum-integrity test; the operation is allowed only when both passed.
/// The engine sets each flag exactly once, so a verdict observed before both
/// tests ran still reports `allowed() == false`. Default construction is a
/// denial.
///
/// The `error` and `destroy` fields are extended outcomes written by
/// operation bodies: an execution failure unrelated to the flow decision,
/// and a request to destroy the object. Neither affects `allowed()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    access: bool,
    min: bool,
    /// The operation body failed for a reason outside the flow decision.
    pub error: bool,
    /// The operation body asked for the object to be destroyed.
    pub destroy: bool,
}

impl Verdict {
    /// Whether the operation is allowed: both tests passed.
    pub fn allowed(&self) -> bool {
        self.access && self.min
    }

    /// Result of the access-controller test.
    pub fn access_test(&self) -> bool {
        self.access
    }

    /// Result of the minimum-integrity test.
    pub fn min_test(&self) -> bool {
        self.min
    }

    pub(crate) fn record_access(&mut self, allow: bool) {
        self.access = allow;
    }

    pub(crate) fn record_min(&mut self, allow: bool) {
        self.min = allow;
    }
}
