//! Tests for handler registration and dispatch

use amesh_observer::{DispatchSummary, Event, EventKind, Observer};
use chrono::Local;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[test]
fn test_handlers_run_in_registration_order() {
    // Given: three handlers, the first one being the slowest
    let mut observer = Observer::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for (name, delay_ms) in [("h1", 30u64), ("h2", 0), ("h3", 10)] {
        let order = order.clone();
        observer.on(EventKind::Rain, move |_| {
            std::thread::sleep(Duration::from_millis(delay_ms));
            order.lock().unwrap().push(name);
            Ok(())
        });
    }

    // When: one event is dispatched
    let summary = observer.dispatch(&Event::rain(Local::now()));

    // Then: handlers ran in the order they were registered
    assert_eq!(summary, DispatchSummary { invoked: 3, failed: 0 });
    assert_eq!(*order.lock().unwrap(), vec!["h1", "h2", "h3"]);
}

#[test]
fn test_failing_handler_does_not_stop_others() {
    // Given: h1 fails, h2 and h3 count their calls
    let mut observer = Observer::new();
    let h2_calls = Arc::new(AtomicUsize::new(0));
    let h3_calls = Arc::new(AtomicUsize::new(0));

    observer.on(EventKind::Rain, |_| Err(anyhow::anyhow!("slack is down")));
    let counter = h2_calls.clone();
    observer.on(EventKind::Rain, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let counter = h3_calls.clone();
    observer.on(EventKind::Rain, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    // When
    let summary = observer.dispatch(&Event::rain(Local::now()));

    // Then: both later handlers still ran
    assert_eq!(summary, DispatchSummary { invoked: 3, failed: 1 });
    assert_eq!(h2_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h3_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_dispatch_without_handlers_is_noop() {
    let mut observer = Observer::new();

    let summary = observer.dispatch(&Event::rain(Local::now()));

    assert_eq!(summary, DispatchSummary::default());
    assert_eq!(observer.handler_count(EventKind::Rain), 0);
}

#[test]
fn test_failures_are_isolated_across_events() {
    // A handler that fails once keeps being invoked on later events
    let mut observer = Observer::new();
    let attempts = Arc::new(AtomicUsize::new(0));

    let counter = attempts.clone();
    observer.on(EventKind::Rain, move |_| {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            anyhow::bail!("first call fails");
        }
        Ok(())
    });

    assert_eq!(observer.dispatch(&Event::rain(Local::now())).failed, 1);
    assert_eq!(observer.dispatch(&Event::rain(Local::now())).failed, 0);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
