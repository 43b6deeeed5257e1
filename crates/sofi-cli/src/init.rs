//! The `init` subcommand: seed a fresh store with sample entities.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use sofi::Acl;

use crate::entity::{DemoEntity, DemoIntegrity};
use crate::store::EntityStore;

/// Arguments of the `init` subcommand.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Path of the store document to create.
    pub store: PathBuf,

    /// Overwrite an existing store document.
    #[arg(long)]
    pub force: bool,
}

fn labels(names: &[&str]) -> DemoIntegrity {
    names.iter().map(|name| name.to_string()).collect()
}

/// The sample population: two subjects with different clearances and two
/// data carriers, all with open per-op access and open floors, plus one
/// locked-down vault only a universe-labeled subject could touch.
fn sample_entities() -> Vec<DemoEntity> {
    let open_floor = Acl::List(vec![DemoIntegrity::empty()]);
    let open_acl = Acl::per_op_default(Acl::List(vec![DemoIntegrity::empty()]));

    let mut alice = DemoEntity::named("alice");
    alice.sofi.integrity = labels(&["i1", "i2", "i3"]);
    alice.sofi.min_integrity = open_floor.clone();
    alice.sofi.access_ctrl = open_acl.clone();

    let mut bob = DemoEntity::named("bob");
    bob.sofi.integrity = labels(&["i1"]);
    bob.sofi.min_integrity = open_floor.clone();
    bob.sofi.access_ctrl = open_acl.clone();

    let mut notes = DemoEntity::named("notes");
    notes.data = "initial notes".into();
    notes.sofi.integrity = labels(&["i1", "i2"]);
    notes.sofi.min_integrity = open_floor.clone();
    notes.sofi.access_ctrl = open_acl.clone();

    let mut scratch = DemoEntity::named("scratch");
    scratch.sofi.min_integrity = open_floor;
    scratch.sofi.access_ctrl = open_acl;

    let mut vault = DemoEntity::named("vault");
    vault.data = "sealed".into();
    vault.sofi.integrity = DemoIntegrity::universe();
    vault.sofi.min_integrity = Acl::List(vec![DemoIntegrity::universe()]);
    vault.sofi.access_ctrl =
        Acl::per_op_default(Acl::List(vec![DemoIntegrity::universe()]));

    vec![alice, bob, notes, scratch, vault]
}

/// Creates the store document.
pub fn cmd_init(args: &InitArgs) -> anyhow::Result<()> {
    if args.store.exists() && !args.force {
        anyhow::bail!(
            "store {} already exists (use --force to overwrite)",
            args.store.display()
        );
    }

    let mut store = EntityStore::new();
    for entity in sample_entities() {
        store
            .insert(&entity)
            .with_context(|| format!("seeding entity {}", entity.name))?;
    }
    store
        .save(&args.store)
        .with_context(|| format!("writing store {}", args.store.display()))?;

    info!(store = %args.store.display(), entities = store.names().count(), "store initialized");
    Ok(())
}
