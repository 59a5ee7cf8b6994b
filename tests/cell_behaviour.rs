//! Delivery guarantees of the value cell.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use reactive_cell::cell::{Subscription, ValueCell};

mod common;
use common::DeliveryLog;

#[test]
fn test_end_to_end_scenario() {
    let cell = ValueCell::new("initial".to_string());
    let log = DeliveryLog::new();

    let _o1 = cell.subscribe(log.observer("o1"));
    assert_eq!(log.entries(), vec![("o1", "initial".to_string())]);

    cell.set("new value".to_string()).unwrap();
    let _o2 = cell.reader().subscribe(log.observer("o2"));
    cell.set("final".to_string()).unwrap();

    assert_eq!(
        log.entries(),
        vec![
            ("o1", "initial".to_string()),
            ("o1", "new value".to_string()),
            ("o2", "new value".to_string()),
            ("o1", "final".to_string()),
            ("o2", "final".to_string()),
        ]
    );
}

#[test]
fn test_late_subscription_replays_without_writes() {
    let cell = ValueCell::new(1);
    cell.set(42).unwrap();

    let log = DeliveryLog::new();
    let _sub = cell.subscribe(log.observer("late"));
    assert_eq!(log.values_for("late"), vec![42]);
}

#[test]
fn test_double_unsubscribe_leaves_others_alone() {
    let cell = ValueCell::new('a');
    let log = DeliveryLog::new();
    let first = cell.subscribe(log.observer("first"));
    let _second = cell.subscribe(log.observer("second"));
    let _third = cell.subscribe(log.observer("third"));

    first.unsubscribe();
    first.unsubscribe();
    assert_eq!(cell.subscriber_count(), 2);

    cell.set('b').unwrap();
    assert_eq!(log.values_for("first"), vec!['a']);
    assert_eq!(log.values_for("second"), vec!['a', 'b']);
    assert_eq!(log.values_for("third"), vec!['a', 'b']);
}

#[test]
fn test_failing_subscriber_does_not_block_later_ones() {
    let cell = ValueCell::new(0);
    let bad = cell
        .try_subscribe(|v: &i32| {
            if *v == 0 {
                Ok(())
            } else {
                Err(format!("cannot render {}", v))
            }
        })
        .unwrap();
    let log = DeliveryLog::new();
    let _good = cell.subscribe(log.observer("good"));

    let err = cell.set(7).unwrap_err();
    assert_eq!(err.failed_ids(), vec![bad.id()]);
    assert_eq!(err.failures[0].source.to_string(), "cannot render 7");
    assert_eq!(log.values_for("good"), vec![0, 7]);
    assert_eq!(cell.get(), 7);

    // The failing subscriber stays registered.
    assert!(bad.is_active());
    assert!(cell.set(8).is_err());
}

#[test]
fn test_equal_writes_notify_every_time() {
    let cell = ValueCell::new("x");
    let log = DeliveryLog::new();
    let _sub = cell.subscribe(log.observer("o"));
    cell.set("x").unwrap();
    cell.set("x").unwrap();
    assert_eq!(log.values_for("o"), vec!["x", "x", "x"]);
}

#[test]
fn test_self_unsubscribe_from_callback() {
    let cell = ValueCell::new(0);
    let own: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
    let seen = Rc::new(RefCell::new(Vec::new()));

    let (own_c, seen_c) = (own.clone(), seen.clone());
    let sub = cell.subscribe(move |v: &i32| {
        seen_c.borrow_mut().push(*v);
        if *v >= 2 {
            if let Some(sub) = own_c.borrow().as_ref() {
                sub.unsubscribe();
            }
        }
    });
    *own.borrow_mut() = Some(sub);

    for v in 1..=4 {
        cell.set(v).unwrap();
    }
    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(cell.subscriber_count(), 0);
}

#[test]
fn test_guard_scopes_subscription() {
    let cell = ValueCell::new(0);
    let log = DeliveryLog::new();
    {
        let _guard = cell.subscribe(log.observer("scoped")).into_guard();
        cell.set(1).unwrap();
    }
    cell.set(2).unwrap();
    assert_eq!(log.values_for("scoped"), vec![0, 1]);
}

proptest! {
    /// A subscriber registered before a run of writes sees exactly those
    /// writes, in order, after the replayed initial value.
    #[test]
    fn prop_prior_subscriber_sees_every_write(
        initial in any::<i64>(),
        writes in proptest::collection::vec(any::<i64>(), 0..64),
    ) {
        let cell = ValueCell::new(initial);
        let log = DeliveryLog::new();
        let _a = cell.subscribe(log.observer("a"));
        let _b = cell.subscribe(log.observer("b"));

        for w in &writes {
            cell.set(*w).unwrap();
        }

        let mut expected = vec![initial];
        expected.extend(writes.iter().copied());
        prop_assert_eq!(log.values_for("a"), expected.clone());
        prop_assert_eq!(log.values_for("b"), expected);

        // Within each write, "a" is notified before "b".
        let entries = log.entries();
        for pair in entries.chunks(2) {
            prop_assert_eq!(pair[0].0, "a");
            prop_assert_eq!(pair[1].0, "b");
        }
    }
}
