//! End-to-end engine scenarios over `LabelSet<String>` integrities with
//! per-op access controllers and the built-in integrity functions.

use sofi::{Acl, Engine, EntityCore, Integrity, IntegrityFun, LabelSet, OpDesc, Operation};

type Label = LabelSet<String>;

fn labels(names: &[&str]) -> Label {
    names.iter().map(|name| name.to_string()).collect()
}

/// A minimum-integrity controller passing everything.
fn open_floor() -> Acl<Label> {
    Acl::List(vec![Label::empty()])
}

/// An access controller with an open default and no per-op entries.
fn open_acl() -> Acl<Label> {
    Acl::per_op_default(Acl::List(vec![Label::empty()]))
}

fn entity(integrity: Label) -> EntityCore<Label> {
    EntityCore {
        integrity,
        min_integrity: open_floor(),
        access_ctrl: open_acl(),
        ..EntityCore::default()
    }
}

#[test]
fn no_flow_operation_is_allowed_and_changes_nothing() {
    let engine = Engine::new();
    let mut subject = entity(labels(&["i1"]));
    let mut object = entity(labels(&["i1"]));

    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::new("no_op"), true);
    assert!(verdict.access_test());
    assert!(verdict.min_test());
    assert!(verdict.allowed());
    assert_eq!(subject.integrity, labels(&["i1"]));
    assert_eq!(object.integrity, labels(&["i1"]));
}

#[test]
fn read_narrows_the_subject_and_leaves_the_object() {
    let engine = Engine::new();
    // Defaults: test = identity, prov = recv = min.
    let mut subject = entity(labels(&["i1", "i3"]));
    let mut object = entity(labels(&["i1", "i2"]));

    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::read("read"), true);
    assert!(verdict.allowed());
    assert_eq!(subject.integrity, labels(&["i1"]));
    assert_eq!(object.integrity, labels(&["i1", "i2"]));
}

#[test]
fn write_is_denied_by_the_object_floor() {
    let engine = Engine::new();
    let mut subject = entity(labels(&["i1", "i3"]));
    let mut object = entity(labels(&["i1", "i2"]));
    object.min_integrity = Acl::List(vec![labels(&["i1", "i2"])]);

    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::write("write"), true);
    assert!(verdict.access_test());
    assert!(!verdict.min_test());
    assert!(!verdict.allowed());
    assert_eq!(subject.integrity, labels(&["i1", "i3"]));
    assert_eq!(object.integrity, labels(&["i1", "i2"]));
}

#[test]
fn per_op_entry_overrides_the_default() {
    let engine = Engine::new();
    let mut subject = entity(labels(&["i2"]));
    let mut object = entity(labels(&["i2"]));
    object.access_ctrl = Acl::per_op_default(Acl::List(vec![Label::universe()]))
        .with_op("read", Acl::List(vec![labels(&["i2"])]));

    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::read("read"), true);
    assert!(verdict.allowed());

    // The write falls through to the default, which requires universe.
    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::write("write"), true);
    assert!(!verdict.access_test());
    assert!(!verdict.allowed());
}

#[test]
fn read_write_updates_both_sides() {
    let engine = Engine::new();
    let mut subject = entity(labels(&["i1", "i3", "i4"]));
    subject.min_integrity = Acl::List(vec![labels(&["i4"])]);
    let mut object = entity(labels(&["i1", "i2", "i4"]));
    object.min_integrity = Acl::List(vec![labels(&["i1"])]);

    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::read_write("swap"), true);
    assert!(verdict.allowed());
    assert_eq!(subject.integrity, labels(&["i1", "i4"]));
    assert_eq!(object.integrity, labels(&["i1", "i4"]));
}

#[test]
fn providing_and_receiving_narrow_the_flow() {
    let engine = Engine::new();
    let mut subject = entity(labels(&["i1", "i2", "i3", "i4"]));
    subject.prov_fun = IntegrityFun::custom(
        |i: &Label, _limit: &Label, _op: &dyn Operation| i.meet(&labels(&["i2", "i3"])),
        true,
    );
    let mut object = entity(labels(&["i1"]));
    object.recv_fun = IntegrityFun::custom(
        |i: &Label, _limit: &Label, _op: &dyn Operation| i.meet(&labels(&["i2", "i4"])),
        true,
    );

    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::write("write"), true);
    assert!(verdict.allowed());
    // The offer {i2,i3} is filtered to {i2} by the receiver and joined onto
    // the tested {i1}.
    assert_eq!(object.integrity, labels(&["i1", "i2"]));
    assert_eq!(subject.integrity, labels(&["i1", "i2", "i3", "i4"]));
}

#[test]
fn read_write_floors_deny_jointly() {
    let engine = Engine::new();
    let mut subject = entity(labels(&["i1", "i3"]));
    subject.min_integrity = Acl::List(vec![labels(&["i3"])]);
    let mut object = entity(labels(&["i1", "i2"]));

    // The prospective subject integrity {i1} drops below its floor {i3},
    // so the whole read-write is denied even though the object side passes.
    let verdict = engine.operation(&mut subject, &mut object, &OpDesc::read_write("swap"), true);
    assert!(verdict.access_test());
    assert!(!verdict.min_test());
    assert_eq!(subject.integrity, labels(&["i1", "i3"]));
    assert_eq!(object.integrity, labels(&["i1", "i2"]));
}
