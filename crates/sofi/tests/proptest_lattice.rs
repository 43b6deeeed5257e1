//! Property-based tests for the integrity algebra, the access controllers
//! and the engine invariants.

use proptest::prelude::*;
use sofi::{
    Acl, AclKind, Bitset, Engine, Entity, EntityCore, Integrity, IntegrityFun, LabelSet, Linear,
    OpDesc, Operation, Shared, Verdict,
};

type Label = LabelSet<String>;
type Level = Linear<0, 9>;
type Bits = Bitset<8>;

// Strategy for generating arbitrary LabelSet<String>
fn arb_label_set() -> impl Strategy<Value = Label> {
    prop_oneof![
        9 => proptest::collection::btree_set("i[1-5]", 0..5).prop_map(Label::from),
        1 => Just(Label::universe()),
    ]
}

// Strategy for generating arbitrary Bitset<8>
fn arb_bitset() -> impl Strategy<Value = Bits> {
    any::<u8>().prop_map(|bits| Bits::from_bits(bits as u128))
}

// Strategy for generating arbitrary Linear<0, 9>
fn arb_linear() -> impl Strategy<Value = Level> {
    (0i64..=9).prop_map(|value| Level::new(value).unwrap())
}

// Strategy for generating arbitrary Shared<LabelSet<String>>
fn arb_shared() -> impl Strategy<Value = Shared<Label>> {
    arb_label_set().prop_map(Shared::new)
}

// Strategy for generating arbitrary access controllers
fn arb_acl() -> impl Strategy<Value = Acl<Label>> {
    let leaf = prop_oneof![
        Just(Acl::Deny),
        arb_label_set().prop_map(Acl::Single),
        proptest::collection::vec(arb_label_set(), 0..3).prop_map(Acl::List),
    ];
    (
        leaf.clone(),
        proptest::collection::btree_map("(no_op|read|write|swap)", leaf.clone(), 0..3),
    )
        .prop_map(|(default, ops)| Acl::PerOp {
            ops,
            default: Box::new(default),
        })
        .boxed()
        .prop_union(leaf.boxed())
}

// Strategy for generating the serializable integrity functions
fn arb_fun() -> impl Strategy<Value = IntegrityFun<Label>> {
    prop_oneof![
        Just(IntegrityFun::Min),
        Just(IntegrityFun::Identity),
        Just(IntegrityFun::Max),
        proptest::collection::vec(
            (arb_label_set(), proptest::option::of(arb_label_set())),
            0..3
        )
        .prop_map(IntegrityFun::Table),
    ]
}

// Strategy for generating entities with open access
fn arb_entity() -> impl Strategy<Value = EntityCore<Label>> {
    (
        arb_label_set(),
        proptest::collection::vec(arb_label_set(), 0..2),
        arb_fun(),
        arb_fun(),
        arb_fun(),
    )
        .prop_map(|(integrity, floors, test_fun, prov_fun, recv_fun)| EntityCore {
            integrity,
            min_integrity: Acl::List(floors),
            access_ctrl: Acl::allow_all(),
            test_fun,
            prov_fun,
            recv_fun,
        })
}

// Strategy for generating one of the four flow classes
fn arb_op() -> impl Strategy<Value = OpDesc> {
    prop_oneof![
        Just(OpDesc::new("no_op")),
        Just(OpDesc::read("read")),
        Just(OpDesc::write("write")),
        Just(OpDesc::read_write("swap")),
    ]
}

proptest! {
    // ============================================
    // LabelSet lattice laws
    // ============================================

    #[test]
    fn label_join_is_idempotent_commutative(a in arb_label_set(), b in arb_label_set()) {
        prop_assert_eq!(a.join(&a), a.clone());
        prop_assert_eq!(a.join(&b), b.join(&a));
    }

    #[test]
    fn label_meet_is_idempotent_commutative(a in arb_label_set(), b in arb_label_set()) {
        prop_assert_eq!(a.meet(&a), a.clone());
        prop_assert_eq!(a.meet(&b), b.meet(&a));
    }

    #[test]
    fn label_join_meet_are_associative(
        a in arb_label_set(),
        b in arb_label_set(),
        c in arb_label_set()
    ) {
        prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        prop_assert_eq!(a.meet(&b).meet(&c), a.meet(&b.meet(&c)));
    }

    #[test]
    fn label_absorption(a in arb_label_set(), b in arb_label_set()) {
        prop_assert_eq!(a.join(&a.meet(&b)), a.clone());
        prop_assert_eq!(a.meet(&a.join(&b)), a.clone());
    }

    #[test]
    fn label_bounds(a in arb_label_set()) {
        prop_assert!(Label::min() <= a);
        prop_assert!(a <= Label::max());
        prop_assert_eq!(Label::min().join(&a), a.clone());
        prop_assert_eq!(Label::max().meet(&a), a.clone());
    }

    #[test]
    fn label_order_is_consistent_with_join_and_meet(
        a in arb_label_set(),
        b in arb_label_set()
    ) {
        prop_assert_eq!(a <= b, a.join(&b) == b);
        prop_assert_eq!(a <= b, a.meet(&b) == a);
    }

    #[test]
    fn label_meet_is_glb_join_is_lub(a in arb_label_set(), b in arb_label_set()) {
        let met = a.meet(&b);
        prop_assert!(met <= a && met <= b);
        let joined = a.join(&b);
        prop_assert!(a <= joined && b <= joined);
    }

    // ============================================
    // Bitset lattice laws
    // ============================================

    #[test]
    fn bitset_join_meet_laws(a in arb_bitset(), b in arb_bitset(), c in arb_bitset()) {
        prop_assert_eq!(a.join(&a), a);
        prop_assert_eq!(a.meet(&a), a);
        prop_assert_eq!(a.join(&b), b.join(&a));
        prop_assert_eq!(a.meet(&b), b.meet(&a));
        prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        prop_assert_eq!(a.meet(&b).meet(&c), a.meet(&b.meet(&c)));
    }

    #[test]
    fn bitset_absorption_and_bounds(a in arb_bitset(), b in arb_bitset()) {
        prop_assert_eq!(a.join(&a.meet(&b)), a);
        prop_assert_eq!(a.meet(&a.join(&b)), a);
        prop_assert!(Bits::min() <= a && a <= Bits::max());
    }

    #[test]
    fn bitset_order_is_consistent(a in arb_bitset(), b in arb_bitset()) {
        prop_assert_eq!(a <= b, a.join(&b) == b);
        prop_assert_eq!(a <= b, a.meet(&b) == a);
    }

    // ============================================
    // Linear lattice laws
    // ============================================

    #[test]
    fn linear_laws(a in arb_linear(), b in arb_linear(), c in arb_linear()) {
        prop_assert_eq!(a.join(&a), a);
        prop_assert_eq!(a.join(&b), b.join(&a));
        prop_assert_eq!(a.meet(&b), b.meet(&a));
        prop_assert_eq!(a.join(&b).join(&c), a.join(&b.join(&c)));
        prop_assert_eq!(a.join(&a.meet(&b)), a);
        prop_assert!(<Level as Integrity>::min() <= a && a <= <Level as Integrity>::max());
        prop_assert_eq!(a <= b, a.join(&b) == b);
    }

    // ============================================
    // Shared wrapper: semantically identical to the inner lattice
    // ============================================

    #[test]
    fn shared_agrees_with_inner(a in arb_shared(), b in arb_shared()) {
        prop_assert_eq!(a.join(&b), Shared::new((*a).join(&b)));
        prop_assert_eq!(a.meet(&b), Shared::new((*a).meet(&b)));
        prop_assert_eq!(a.partial_cmp(&b), (*a).partial_cmp(&b));
    }

    #[test]
    fn shared_results_share_absorbed_operands(a in arb_shared(), b in arb_shared()) {
        let joined = a.join(&b);
        if joined == a {
            prop_assert!(joined.ptr_eq(&a) || joined.ptr_eq(&b));
        }
    }

    // ============================================
    // Access-controller monotonicity
    // ============================================

    #[test]
    fn acl_test_is_monotone(acl in arb_acl(), low in arb_label_set(), extra in arb_label_set(), op in arb_op()) {
        let high = low.join(&extra);
        let mut verdict = Verdict::default();
        let low_passes = acl.test(&low, &op, &mut verdict, AclKind::Access);
        let high_passes = acl.test(&high, &op, &mut verdict, AclKind::Access);
        prop_assert!(!low_passes || high_passes);
    }

    // ============================================
    // Integrity-function safety
    // ============================================

    #[test]
    fn builtin_functions_respect_the_limit(
        fun in arb_fun(),
        i in arb_label_set(),
        limit in arb_label_set()
    ) {
        prop_assert!(fun.safe());
        let result = fun.apply(&i, &limit, &OpDesc::new("no_op"));
        prop_assert!(result <= limit);
    }

    // ============================================
    // Engine invariants
    // ============================================

    #[test]
    fn denied_operations_change_nothing(
        mut subject in arb_entity(),
        mut object in arb_entity(),
        acl in arb_acl(),
        op in arb_op()
    ) {
        object.access_ctrl = acl;
        let before_subject = subject.clone();
        let before_object = object.clone();

        let engine = Engine::new();
        let verdict = engine.operation(&mut subject, &mut object, &op, true);
        if !verdict.allowed() {
            prop_assert_eq!(subject, before_subject);
            prop_assert_eq!(object, before_object);
        }
    }

    #[test]
    fn flow_class_bounds_the_mutation(
        mut subject in arb_entity(),
        mut object in arb_entity(),
        op in arb_op()
    ) {
        let before_subject = subject.integrity.clone();
        let before_object = object.integrity.clone();

        let engine = Engine::new();
        let verdict = engine.operation(&mut subject, &mut object, &op, true);
        if verdict.allowed() {
            if !op.is_write() {
                prop_assert_eq!(object.integrity, before_object);
            }
            if !op.is_read() {
                prop_assert_eq!(subject.integrity, before_subject);
            }
        }
    }

    #[test]
    fn decide_only_never_mutates(
        mut subject in arb_entity(),
        mut object in arb_entity(),
        op in arb_op()
    ) {
        let before_subject = subject.clone();
        let before_object = object.clone();

        let engine = Engine::new();
        let _ = engine.operation(&mut subject, &mut object, &op, false);
        prop_assert_eq!(subject, before_subject);
        prop_assert_eq!(object, before_object);
    }

    #[test]
    fn safe_pass_is_bounded_by_reader_and_writer(
        writer in arb_entity(),
        reader in arb_entity(),
        op in arb_op()
    ) {
        // All generated functions are safe, so the test component is bounded
        // by the reader and the received component by the writer's offer.
        let engine = Engine::new();
        let passed = engine.pass_integrity(&writer, &reader, &op);
        let bound = reader.integrity().join(writer.integrity());
        prop_assert!(passed <= bound);
    }

    #[test]
    fn pass_without_an_offer_is_bounded_by_the_reader(
        mut writer in arb_entity(),
        mut reader in arb_entity(),
        op in arb_op()
    ) {
        writer.prov_fun = IntegrityFun::Min;
        reader.test_fun = IntegrityFun::Identity;

        let engine = Engine::new();
        let passed = engine.pass_integrity(&writer, &reader, &op);
        prop_assert!(&passed <= reader.integrity());
    }
}
