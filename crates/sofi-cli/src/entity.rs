//! The demonstration entity: a named SOFI entity carrying a string payload.

use serde::{Deserialize, Serialize};
use sofi::{Acl, Entity, EntityCore, IntegrityFun, LabelSet};

/// Integrities in the demonstration are sets of strings.
pub type DemoIntegrity = LabelSet<String>;

/// A named entity with a data payload the operations act on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemoEntity {
    /// The name, used as the primary key in the store.
    pub name: String,
    /// Data usable by operations.
    #[serde(default)]
    pub data: String,
    /// The SOFI record: integrity, controllers and functions.
    #[serde(flatten)]
    pub sofi: EntityCore<DemoIntegrity>,
}

impl DemoEntity {
    /// A named entity with the default (deny-everything) record.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Entity for DemoEntity {
    type Integrity = DemoIntegrity;

    fn integrity(&self) -> &DemoIntegrity {
        &self.sofi.integrity
    }

    fn set_integrity(&mut self, integrity: DemoIntegrity) {
        self.sofi.integrity = integrity;
    }

    fn min_integrity(&self) -> &Acl<DemoIntegrity> {
        &self.sofi.min_integrity
    }

    fn set_min_integrity(&mut self, min_integrity: Acl<DemoIntegrity>) {
        self.sofi.min_integrity = min_integrity;
    }

    fn access_ctrl(&self) -> &Acl<DemoIntegrity> {
        &self.sofi.access_ctrl
    }

    fn test_fun(&self) -> &IntegrityFun<DemoIntegrity> {
        &self.sofi.test_fun
    }

    fn prov_fun(&self) -> &IntegrityFun<DemoIntegrity> {
        &self.sofi.prov_fun
    }

    fn recv_fun(&self) -> &IntegrityFun<DemoIntegrity> {
        &self.sofi.recv_fun
    }
}
