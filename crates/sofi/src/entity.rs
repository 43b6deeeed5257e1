//! Entities: the subjects and objects of SOFI operations.

use crate::acl::Acl;
use crate::fun::IntegrityFun;
use crate::integrity::Integrity;

/// The accessor surface the engine needs from an entity.
///
/// Implement this for domain entity types that embed an [`EntityCore`] (or
/// provide the same record by other means). The engine only ever mutates an
/// entity through [`Entity::set_integrity`] and through the operation body;
/// everything else is read-only.
pub trait Entity {
    /// The integrity lattice this entity is labeled with.
    type Integrity: Integrity;

    /// Current integrity.
    fn integrity(&self) -> &Self::Integrity;

    /// Replaces the integrity. Called by the engine when committing an
    /// allowed operation.
    fn set_integrity(&mut self, integrity: Self::Integrity);

    /// The floor controller a prospective new integrity must pass.
    fn min_integrity(&self) -> &Acl<Self::Integrity>;

    /// Replaces the floor controller.
    fn set_min_integrity(&mut self, min_integrity: Acl<Self::Integrity>);

    /// The controller gating operations that act on this entity as the
    /// object.
    fn access_ctrl(&self) -> &Acl<Self::Integrity>;

    /// The test function, applied by this entity as the reader to the
    /// writer's integrity.
    fn test_fun(&self) -> &IntegrityFun<Self::Integrity>;

    /// The providing function, applied by this entity as the writer to its
    /// own integrity.
    fn prov_fun(&self) -> &IntegrityFun<Self::Integrity>;

    /// The receiving function, applied by this entity as the reader to the
    /// provided integrity.
    fn recv_fun(&self) -> &IntegrityFun<Self::Integrity>;
}

/// The plain record bundling everything the SOFI model attaches to an
/// entity.
///
/// Defaults are deny-by-default: minimum integrity, a denying access
/// controller, a denying floor, the identity test function and minimum
/// providing/receiving functions (nothing offered, nothing accepted).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityCore<I> {
    /// Current integrity.
    pub integrity: I,
    /// Floor for prospective integrities.
    pub min_integrity: Acl<I>,
    /// Gate for operations acting on this entity as the object.
    pub access_ctrl: Acl<I>,
    /// Reader-side test function.
    pub test_fun: IntegrityFun<I>,
    /// Writer-side providing function.
    pub prov_fun: IntegrityFun<I>,
    /// Reader-side receiving function.
    pub recv_fun: IntegrityFun<I>,
}

impl<I: Integrity> Default for EntityCore<I> {
    fn default() -> Self {
        Self {
            integrity: I::min(),
            min_integrity: Acl::Deny,
            access_ctrl: Acl::Deny,
            test_fun: IntegrityFun::Identity,
            prov_fun: IntegrityFun::Min,
            recv_fun: IntegrityFun::Min,
        }
    }
}

impl<I: Integrity> EntityCore<I> {
    /// An entity with the default record.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<I: Integrity> Entity for EntityCore<I> {
    type Integrity = I;

    fn integrity(&self) -> &I {
        &self.integrity
    }

    fn set_integrity(&mut self, integrity: I) {
        self.integrity = integrity;
    }

    fn min_integrity(&self) -> &Acl<I> {
        &self.min_integrity
    }

    fn set_min_integrity(&mut self, min_integrity: Acl<I>) {
        self.min_integrity = min_integrity;
    }

    fn access_ctrl(&self) -> &Acl<I> {
        &self.access_ctrl
    }

    fn test_fun(&self) -> &IntegrityFun<I> {
        &self.test_fun
    }

    fn prov_fun(&self) -> &IntegrityFun<I> {
        &self.prov_fun
    }

    fn recv_fun(&self) -> &IntegrityFun<I> {
        &self.recv_fun
    }
}
