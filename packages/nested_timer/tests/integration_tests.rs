//! Integration tests for `nested_timer` against the real clock.

use std::thread;
use std::time::Duration;

use nested_timer::{Error, Timer};

fn silent_timer() -> Timer {
    Timer::builder().echo(false).build()
}

#[test]
#[cfg_attr(miri, ignore)] // Sleeping under Miri is extremely slow.
fn real_clock_measures_sleep() {
    let timer = silent_timer();

    let completed = {
        let event = timer.start_event("SLEEP");
        thread::sleep(Duration::from_millis(20));
        timer.stop_event(event).unwrap()
    };

    assert!(
        completed.millis() >= 20,
        "expected at least 20 ms, got {completed:?}"
    );
    assert!(
        completed.duration() < Duration::from_secs(10),
        "expected a reasonable duration, got {completed:?}"
    );

    let summary = timer.summary("SLEEP").unwrap();
    assert_eq!(summary.count(), 1);
    assert!(summary.mean() >= 20.0);
    assert!(summary.stdv() == 0.0);
}

#[test]
#[cfg_attr(miri, ignore)] // Sleeping under Miri is extremely slow.
fn outer_event_covers_inner_event() {
    let timer = silent_timer();

    timer
        .measure("OUTER", || {
            timer
                .measure("INNER", || thread::sleep(Duration::from_millis(10)))
                .unwrap();
            thread::sleep(Duration::from_millis(5));
        })
        .unwrap();

    let outer = timer.summary("OUTER").unwrap();
    let inner = timer.summary("OUTER.INNER").unwrap();
    assert!(outer.mean() >= inner.mean());
    assert!(inner.mean() >= 10.0);
}

#[test]
fn repeated_session_report() {
    let timer = silent_timer();

    for _ in 0..10 {
        let _total = timer.span("XOR_TOTAL");
        drop(timer.span("DIRECT_READ"));
        let _xor = timer.span("XOR");
    }

    for _ in 0..5 {
        let _xor = timer.span("XOR");
    }

    let report = timer.report().unwrap();
    let keys: Vec<_> = report.summaries().map(|summary| summary.name()).collect();
    assert_eq!(
        keys,
        vec![
            "DIRECT_READ",
            "XOR",
            "XOR_TOTAL",
            "XOR_TOTAL.DIRECT_READ",
            "XOR_TOTAL.XOR",
        ]
    );

    assert_eq!(report.get("XOR").unwrap().count(), 15);
    assert_eq!(report.get("XOR_TOTAL.XOR").unwrap().count(), 10);
    assert_eq!(report.get("DIRECT_READ").unwrap().count(), 10);

    let text = report.to_string();
    assert!(text.starts_with("\nTotal\n=====\n"), "{text}");
    assert_eq!(text.lines().count(), 8);
}

#[test]
fn stopping_outer_before_inner_fails() {
    let timer = silent_timer();

    let a = timer.start_event("A");
    let b = timer.start_event("B");

    let error = timer.stop_event(a).unwrap_err();
    assert!(matches!(error, Error::StackDiscipline { .. }));
    assert!(error.to_string().contains("A.B"));

    timer.stop_event(b).unwrap();
    assert_eq!(timer.open_paths(), vec!["A".to_string()]);
    assert!(matches!(
        timer.report(),
        Err(Error::UnbalancedSession { .. })
    ));
}

#[test]
fn independent_timers_do_not_share_statistics() {
    let timer1 = silent_timer();
    let timer2 = silent_timer();

    timer1.measure("A", || ()).unwrap();

    assert!(timer1.summary("A").is_some());
    assert!(timer2.summary("A").is_none());
    assert!(timer2.is_empty());
}
