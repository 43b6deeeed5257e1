//! The request-feed drain loop.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use sofi::{Agent, Engine, OpOutcome, OpRequest, TracingObserver};

use crate::entity::DemoEntity;
use crate::ops::{DemoOp, OpKind};
use crate::store::{EntityStore, StoreAgent};

/// Arguments of the `run` subcommand.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Path of the entity store document.
    pub store: PathBuf,

    /// Path of the request feed (a JSON array of requests).
    pub requests: PathBuf,

    /// Where to write the outcomes; stdout when omitted.
    #[arg(short, long)]
    pub outcomes: Option<PathBuf>,
}

/// Drains the request feed against the store.
pub fn cmd_run(args: &RunArgs) -> anyhow::Result<()> {
    let store = EntityStore::load(&args.store)
        .with_context(|| format!("loading store {}", args.store.display()))?;
    let store = RefCell::new(store);

    let text = fs::read_to_string(&args.requests)
        .with_context(|| format!("reading requests {}", args.requests.display()))?;
    let requests: Vec<OpRequest> = serde_json::from_str(&text).context("parsing requests")?;

    let engine = Engine::with_observer(TracingObserver);
    let agent = StoreAgent::new(&store);

    let mut outcomes = Vec::with_capacity(requests.len());
    for request in &requests {
        let outcome = process_request(&engine, &agent, &store, request);
        outcomes.push(outcome);
    }

    store
        .borrow()
        .save(&args.store)
        .with_context(|| format!("saving store {}", args.store.display()))?;

    let report = serde_json::to_string_pretty(&outcomes).context("encoding outcomes")?;
    match &args.outcomes {
        Some(path) => fs::write(path, report)
            .with_context(|| format!("writing outcomes {}", path.display()))?,
        None => println!("{report}"),
    }

    info!(
        requests = requests.len(),
        allowed = outcomes.iter().filter(|outcome| outcome.allowed).count(),
        "feed drained"
    );
    Ok(())
}

/// Runs one request through the engine.
///
/// The subject and the object are imported as independent copies, the way
/// they would arrive from a remote store; when a request names the same
/// entity on both sides, the object copy is exported last and wins.
/// Non-engine failures (unknown key, agent errors) produce a denied outcome
/// with `error` set and leave the store untouched.
pub fn process_request(
    engine: &Engine<TracingObserver>,
    agent: &StoreAgent<'_>,
    store: &RefCell<EntityStore>,
    request: &OpRequest,
) -> OpOutcome {
    let kind = match OpKind::from_key(&request.op) {
        Ok(kind) => kind,
        Err(error) => {
            warn!(id = request.id, %error, "request rejected");
            return OpOutcome::failed(request);
        }
    };
    let op = DemoOp::new(kind, request.arg.clone());

    let mut subject = DemoEntity::default();
    if !agent.import_msg(&request.subject, &mut subject).ok() {
        warn!(id = request.id, subject = %request.subject, "subject import failed");
        return OpOutcome::failed(request);
    }
    let mut object = DemoEntity::default();
    if !agent.import_msg(&request.object, &mut object).ok() {
        warn!(id = request.id, object = %request.object, "object import failed");
        return OpOutcome::failed(request);
    }

    let verdict = engine.operation(&mut subject, &mut object, &op, true);
    let outcome = OpOutcome::from_verdict(request, &verdict);

    if verdict.allowed() {
        let mut message = String::new();
        if !agent.export_msg(&subject, &mut message).ok() {
            warn!(id = request.id, subject = %subject.name, "subject export failed");
            return OpOutcome {
                error: true,
                ..outcome
            };
        }
        if verdict.destroy {
            store.borrow_mut().remove(&object.name);
        } else if !agent.export_msg(&object, &mut message).ok() {
            warn!(id = request.id, object = %object.name, "object export failed");
            return OpOutcome {
                error: true,
                ..outcome
            };
        }
        if kind == OpKind::Clone && !verdict.error {
            let mut cloned = object.clone();
            cloned.name = request.arg.clone();
            if !agent.export_msg(&cloned, &mut message).ok() {
                warn!(id = request.id, clone = %cloned.name, "clone export failed");
                return OpOutcome {
                    error: true,
                    ..outcome
                };
            }
        }
    }
    outcome
}
