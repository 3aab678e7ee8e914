//! Listener shutdown paths: stop signal, closed input, source failures.

use std::{thread, time::Duration};

use keytap_core::{ReaderConfig, Token};
use keytap_harness::{ChaoticSource, ManualClock, scripted};
use keytap_term::{Handoff, KeystrokeReader, ListenerError, Listener};

const POLL: Duration = Duration::from_millis(2);
const LIFETIME: Duration = Duration::from_secs(60);

fn config() -> ReaderConfig {
    ReaderConfig { poll_interval: POLL, ..ReaderConfig::default() }
}

fn wait_until_stopped(is_running: impl Fn() -> bool) {
    for _ in 0..2000 {
        if !is_running() {
            return;
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("listener still running");
}

#[test]
fn read_failure_ends_listener_with_mode_restored() {
    let (source, handle) = scripted();
    let reader = KeystrokeReader::with_source(source, ManualClock::new(), config()).unwrap();

    handle.feed(b"a");
    assert_eq!(reader.read_keystroke(), "a");

    handle.fail_next_read();
    wait_until_stopped(|| reader.is_listening());

    assert!(!handle.is_raw());
    assert_eq!(handle.restore_count(), 1);
    assert_eq!(reader.try_read_keystroke(), None);
}

#[test]
fn raw_mode_failure_ends_listener_without_restore() {
    let (source, handle) = scripted();
    handle.fail_raw_mode();

    let reader = KeystrokeReader::with_source(source, ManualClock::new(), config()).unwrap();
    wait_until_stopped(|| reader.is_listening());

    assert!(!handle.is_raw());
    assert_eq!(handle.raw_entries(), 0);
    assert_eq!(handle.restore_count(), 0);
}

#[test]
fn closed_input_ends_listener() {
    let (source, mut handle) = scripted();
    let handoff = Handoff::new(ManualClock::new(), LIFETIME);
    let mut listener = Listener::spawn(source, handoff.clone(), POLL).unwrap();

    handle.feed(b"\x1b[B");
    handle.close();
    wait_until_stopped(|| listener.is_running());

    // Queued bytes are still decoded before end of input
    assert_eq!(handoff.get(), Some(Token::Escape("\u{1b}[B".into())));
    assert!(!handle.is_raw());
    assert_eq!(handle.restore_count(), 1);

    listener.stop();
    assert_eq!(handle.restore_count(), 1);
}

#[test]
fn chaotic_source_failure_restores_mode() {
    let (inner, handle) = scripted();
    let source = ChaoticSource::new(inner, 1.0);
    let stats = source.stats();

    let reader = KeystrokeReader::with_source(source, ManualClock::new(), config()).unwrap();
    wait_until_stopped(|| reader.is_listening());

    assert_eq!(stats.injected(), 1);
    assert_eq!(handle.raw_entries(), 1);
    assert_eq!(handle.restore_count(), 1);
    assert!(!handle.is_raw());
}

#[test]
fn quiet_chaos_passes_keys_through() {
    let (inner, handle) = scripted();
    let source = ChaoticSource::new(inner, 0.0);
    let stats = source.stats();

    let mut reader = KeystrokeReader::with_source(source, ManualClock::new(), config()).unwrap();
    handle.feed(b"k");
    assert_eq!(reader.read_keystroke(), "k");

    reader.stop();
    assert_eq!(stats.injected(), 0);
    assert!(stats.operations() >= 2);
    assert_eq!(handle.restore_count(), 1);
}

#[test]
fn invalid_config_never_touches_source() {
    let (source, handle) = scripted();
    let config = ReaderConfig { poll_interval: Duration::ZERO, ..ReaderConfig::default() };

    let result = KeystrokeReader::with_source(source, ManualClock::new(), config);
    assert!(matches!(result, Err(ListenerError::Config(_))));
    assert_eq!(handle.raw_entries(), 0);
}
