use docrev_proposal::{
    allowed_transitions, validate_transition, ProposalKind, ProposalPayload, ProposalRegistry,
    ProposalState, RegistryError,
};
use proptest::prelude::*;

#[test]
fn test_idle_transitions() {
    let k = ProposalKind::Rewrite;
    assert!(validate_transition(k, ProposalState::Idle, ProposalState::Pending, "begin").is_ok());

    // Invalid
    assert!(validate_transition(k, ProposalState::Idle, ProposalState::Ready, "complete").is_err());
    assert!(validate_transition(k, ProposalState::Idle, ProposalState::Applied, "apply").is_err());
}

#[test]
fn test_applied_transitions() {
    // Applied is terminal for the instance; only a fresh cycle leaves it.
    let k = ProposalKind::Summary;
    assert!(
        validate_transition(k, ProposalState::Applied, ProposalState::Pending, "begin").is_ok()
    );

    assert!(validate_transition(k, ProposalState::Applied, ProposalState::Idle, "discard").is_err());
}

fn any_state() -> impl Strategy<Value = ProposalState> {
    prop_oneof![
        Just(ProposalState::Idle),
        Just(ProposalState::Pending),
        Just(ProposalState::Ready),
        Just(ProposalState::Applied),
    ]
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(from in any_state(), to in any_state()) {
        let res = validate_transition(ProposalKind::Questions, from, to, "test");
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            assert!(allowed.contains(&to));
        } else {
            assert!(!allowed.contains(&to));
        }
    }
}

/// Operations a caller can issue against one registry slot
#[derive(Debug, Clone, Copy)]
enum Op {
    Begin,
    Complete,
    Fail,
    Toggle(usize),
    Discard,
    Apply,
}

fn any_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Begin),
        Just(Op::Complete),
        Just(Op::Fail),
        (0usize..2).prop_map(Op::Toggle),
        Just(Op::Discard),
        Just(Op::Apply),
    ]
}

fn two_items() -> ProposalPayload {
    ProposalPayload::Questions(vec![
        docrev_proposal::QaItem::new("q0", "a0"),
        docrev_proposal::QaItem::new("q1", "a1"),
    ])
}

proptest! {
    /// Random operation sequences never leave the transition table: every
    /// operation either performs a listed move or errors and leaves the
    /// state where it was.
    #[test]
    fn prop_registry_never_leaves_transition_table(ops in proptest::collection::vec(any_op(), 1..40)) {
        let reg = ProposalRegistry::new();
        let kind = ProposalKind::Questions;

        for op in ops {
            let before = reg.state(kind);
            let result = match op {
                Op::Begin => reg.begin(kind),
                Op::Complete => reg.complete(kind, two_items()),
                Op::Fail => reg.fail(kind),
                Op::Toggle(i) => reg.toggle_accept(kind, i).map(|_| ()),
                Op::Discard => reg.discard(kind),
                Op::Apply => reg.apply(kind).map(|_| ()),
            };
            let after = reg.state(kind);

            match result {
                Ok(()) => {
                    // Toggle is not a transition; discard from Idle stays
                    // Idle; every other success is a listed move.
                    if before != after {
                        assert!(allowed_transitions(before).contains(&after));
                    } else {
                        match op {
                            Op::Toggle(_) => assert_eq!(before, ProposalState::Ready),
                            Op::Discard => assert_eq!(before, ProposalState::Idle),
                            other => panic!("{other:?} succeeded without a transition"),
                        }
                    }
                }
                Err(RegistryError::NoSelection { .. }) => {
                    // Validation error: slot must stay Ready
                    assert_eq!(before, ProposalState::Ready);
                    assert_eq!(after, ProposalState::Ready);
                }
                Err(_) => assert_eq!(before, after),
            }
        }
    }
}
