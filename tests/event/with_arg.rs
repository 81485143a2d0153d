//! Tests for `EventWithArg<T>` — payload delivery, reentrancy, propagation.

use std::sync::{Arc, Mutex};

use weak_event::{EventWithArg, Handler};

/// Helper: create a shared call-log that handlers append to.
fn make_log() -> Arc<Mutex<Vec<String>>> {
    Arc::new(Mutex::new(Vec::new()))
}

// ============================================================================
// Payload delivery
// ============================================================================

#[test]
fn handlers_receive_the_emitted_payload() {
    let event: EventWithArg<i32> = EventWithArg::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);

    let _handle = event.register_fn(move |n| {
        log_clone.lock().unwrap().push(format!("{n}"));
    });

    event.emit(&42);
    event.emit(&7);

    assert_eq!(*log.lock().unwrap(), vec!["42", "7"]);
}

#[test]
fn payload_is_shared_across_handlers_in_registration_order() {
    let event: EventWithArg<String> = EventWithArg::new();
    let log = make_log();

    let handles: Vec<Handler<String>> = ["a", "b", "c"]
        .iter()
        .map(|tag| {
            let log = Arc::clone(&log);
            let tag = tag.to_string();
            event.register_fn(move |payload: &String| {
                log.lock().unwrap().push(format!("{tag}:{payload}"));
            })
        })
        .collect();

    event.emit(&"x".to_string());

    // Weak-preferred storage visits in insertion order.
    assert_eq!(*log.lock().unwrap(), vec!["a:x", "b:x", "c:x"]);
    drop(handles);
}

#[test]
fn once_receives_the_payload_and_fires_once() {
    let event: EventWithArg<i32> = EventWithArg::new();
    let log = make_log();
    let log_clone = Arc::clone(&log);

    let _wrapper = event.once_fn(move |n| {
        log_clone.lock().unwrap().push(format!("{n}"));
    });

    event.emit(&1);
    event.emit(&2);

    assert_eq!(*log.lock().unwrap(), vec!["1"]);
}

// ============================================================================
// Reentrancy — snapshot semantics during emit
// ============================================================================

#[test]
fn handler_registered_during_emit_is_not_called_in_that_round() {
    let event: Arc<EventWithArg<i32>> = Arc::new(EventWithArg::new());
    let log = make_log();
    // Handles registered mid-emission must outlive the round, so park them
    // somewhere the closure can reach.
    let extra_handles: Arc<Mutex<Vec<Handler<i32>>>> = Arc::new(Mutex::new(Vec::new()));

    let event_clone = Arc::clone(&event);
    let log_clone = Arc::clone(&log);
    let extra_clone = Arc::clone(&extra_handles);
    let _first = event.register_fn(move |_| {
        log_clone.lock().unwrap().push("first".to_string());
        let log2 = Arc::clone(&log_clone);
        let handle = event_clone.register_fn(move |_| {
            log2.lock().unwrap().push("second".to_string());
        });
        extra_clone.lock().unwrap().push(handle);
    });

    event.emit(&1);

    {
        let log_guard = log.lock().unwrap();
        assert_eq!(*log_guard, vec!["first"], "snapshot excludes mid-round adds");
    }

    // The next round sees both.
    event.emit(&2);
    assert_eq!(*log.lock().unwrap(), vec!["first", "first", "second"]);
}

#[test]
fn handler_unregistered_during_emit_is_still_called_that_round() {
    let event: Arc<EventWithArg<i32>> = Arc::new(EventWithArg::new());
    let log = make_log();

    // The target is registered *after* the remover, so when the remover runs
    // the target has not fired yet. Snapshot semantics mean it still fires
    // in this round, and only disappears from the next one.
    let log_clone = Arc::clone(&log);
    let target: Handler<i32> = Arc::new(move |_| {
        log_clone.lock().unwrap().push("target".to_string());
    });

    let event_clone = Arc::clone(&event);
    let target_clone = Arc::clone(&target);
    let log_clone = Arc::clone(&log);
    let _remover = event.register_fn(move |_| {
        log_clone.lock().unwrap().push("remover".to_string());
        event_clone.unregister(&target_clone);
    });
    let target = event.register(target);

    event.emit(&1);
    assert_eq!(*log.lock().unwrap(), vec!["remover", "target"]);

    event.emit(&2);
    assert_eq!(
        *log.lock().unwrap(),
        vec!["remover", "target", "remover"],
        "the removed handler must not fire in later rounds"
    );
    drop(target);
}

#[test]
fn handler_may_reenter_emit() {
    let event: Arc<EventWithArg<i32>> = Arc::new(EventWithArg::new());
    let log = make_log();

    let event_clone = Arc::clone(&event);
    let log_clone = Arc::clone(&log);
    let _handle = event.register_fn(move |n| {
        log_clone.lock().unwrap().push(format!("{n}"));
        if *n == 1 {
            event_clone.emit(&2);
        }
    });

    event.emit(&1);

    assert_eq!(*log.lock().unwrap(), vec!["1", "2"]);
}

// ============================================================================
// Propagation — emit does not catch handler panics
// ============================================================================

#[test]
fn panicking_handler_aborts_the_remainder_of_the_pass() {
    let event: EventWithArg<i32> = EventWithArg::new();
    let log = make_log();

    let panicker = event.register_fn(|_| panic!("first panics"));
    let log_clone = Arc::clone(&log);
    let _second = event.register_fn(move |_| {
        log_clone.lock().unwrap().push("second".to_string());
    });

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        event.emit(&1);
    }));

    assert!(result.is_err(), "emit should propagate handler panics");
    assert!(
        log.lock().unwrap().is_empty(),
        "handlers after the panicking one must not run in that pass"
    );

    // Already-invoked handlers and the event itself are unaffected.
    event.unregister(&panicker);
    event.emit(&2);
    assert_eq!(*log.lock().unwrap(), vec!["second"]);
}
