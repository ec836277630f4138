//! Property-based tests for the result builder
//!
//! These tests verify key invariants hold across arbitrary call sequences.

use super::wire::WireAction;
use super::*;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// One builder call
#[derive(Debug, Clone)]
enum Call {
    Speak(String),
    SendSms(String, String, String),
    Connect(String, bool),
    Merge(Vec<(String, i64)>),
    PostProcess,
}

fn arb_number() -> impl Strategy<Value = String> {
    "\\+1555[0-9]{7}"
}

fn arb_call() -> impl Strategy<Value = Call> {
    prop_oneof![
        "[a-zA-Z ]{1,20}".prop_map(Call::Speak),
        (arb_number(), arb_number(), "[a-zA-Z0-9 ]{1,30}")
            .prop_map(|(to, from, body)| Call::SendSms(to, from, body)),
        (arb_number(), prop::bool::weighted(0.3)).prop_map(|(t, f)| Call::Connect(t, f)),
        proptest::collection::vec(("[a-d]", 0i64..10), 1..4).prop_map(Call::Merge),
        Just(Call::PostProcess),
    ]
}

fn expected_wire(call: &Call) -> Option<WireAction> {
    match call {
        Call::Speak(text) => Some(WireAction::Say { text: text.clone() }),
        Call::SendSms(to, from, body) => Some(WireAction::SendSms {
            to: to.clone(),
            from: from.clone(),
            body: body.clone(),
        }),
        Call::Connect(target, is_final) => Some(WireAction::Connect {
            target: target.clone(),
            is_final: *is_final,
        }),
        Call::Merge(_) | Call::PostProcess => None,
    }
}

fn patch_value(entries: &[(String, i64)]) -> Value {
    let map: Map<String, Value> = entries
        .iter()
        .map(|(k, v)| (k.clone(), json!(v)))
        .collect();
    Value::Object(map)
}

/// Apply a call, returning whether the builder accepted it
fn apply(builder: &mut ResultBuilder, call: &Call) -> Result<(), ResultError> {
    match call {
        Call::Speak(text) => builder.add_speak(text.clone()).map(|_| ()),
        Call::SendSms(to, from, body) => builder
            .add_send_sms(to.clone(), from.clone(), body.clone())
            .map(|_| ()),
        Call::Connect(target, is_final) => builder.add_connect(target.clone(), *is_final).map(|_| ()),
        Call::Merge(entries) => builder.merge_global_data(patch_value(entries)).map(|_| ()),
        Call::PostProcess => builder.mark_post_process().map(|_| ()),
    }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Serialized actions are exactly the accepted calls, in call order
    #[test]
    fn prop_actions_preserve_insertion_order(calls in proptest::collection::vec(arb_call(), 0..20)) {
        let mut builder = ResultBuilder::new("reply");
        let mut expected = Vec::new();
        for call in &calls {
            if apply(&mut builder, call).is_ok() {
                expected.extend(expected_wire(call));
            }
        }
        let wire = builder.build().unwrap().to_wire();
        prop_assert_eq!(wire.actions, expected);
    }

    /// `final` is set iff a terminating connect was accepted
    #[test]
    fn prop_final_iff_terminating_connect(calls in proptest::collection::vec(arb_call(), 0..20)) {
        let mut builder = ResultBuilder::new("");
        let mut saw_final = false;
        for call in &calls {
            let accepted = apply(&mut builder, call).is_ok();
            if accepted && matches!(call, Call::Connect(_, true)) {
                saw_final = true;
            }
        }
        let sealed = builder.build().unwrap();
        prop_assert_eq!(sealed.is_final(), saw_final);
        let terminating = sealed.actions().iter().filter(|a| a.ends_call()).count();
        prop_assert!(terminating <= 1);
        prop_assert_eq!(terminating == 1, saw_final);
    }

    /// Once final, every append is rejected as a chain-state error
    #[test]
    fn prop_no_appends_after_final(calls in proptest::collection::vec(arb_call(), 0..20)) {
        let mut builder = ResultBuilder::new("");
        builder.add_connect("+15551234567", true).unwrap();
        for call in &calls {
            let result = apply(&mut builder, call);
            if matches!(call, Call::PostProcess) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(result.unwrap_err().is_chain_state());
            }
        }
        prop_assert_eq!(builder.actions().len(), 1);
    }

    /// The accumulated patch equals a last-write-wins fold of every merge
    #[test]
    fn prop_patch_is_last_write_wins(merges in proptest::collection::vec(
        proptest::collection::vec(("[a-d]", 0i64..10), 1..4), 0..6)
    ) {
        let mut builder = ResultBuilder::new("");
        let mut expected = Map::new();
        for entries in &merges {
            builder.merge_global_data(patch_value(entries)).unwrap();
            for (k, v) in entries {
                expected.insert(k.clone(), json!(v));
            }
        }
        let sealed = builder.build().unwrap();
        prop_assert_eq!(sealed.global_data().as_map(), &expected);
    }

    /// A sealed builder rejects any call and the snapshot stays unchanged
    #[test]
    fn prop_sealed_rejects_all(
        before in proptest::collection::vec(arb_call(), 0..8),
        after in proptest::collection::vec(arb_call(), 1..8),
    ) {
        let mut builder = ResultBuilder::new("reply");
        for call in &before {
            let _ = apply(&mut builder, call);
        }
        let sealed = builder.build().unwrap();
        let snapshot = sealed.clone();
        for call in &after {
            prop_assert!(apply(&mut builder, call).unwrap_err().is_chain_state());
        }
        prop_assert_eq!(sealed, snapshot);
    }
}
