// crates/logging/tests/subscriber_builder.rs

use logging::{DebugFlag, LogFormat, SubscriberConfig};
use std::path::PathBuf;

#[test]
fn builder_sets_fields() {
    let cfg = SubscriberConfig::builder()
        .format(LogFormat::Json)
        .verbose(2)
        .debug([DebugFlag::Fdpass])
        .quiet(true)
        .log_file(Some(PathBuf::from("log")))
        .colored(true)
        .timestamps(true)
        .build();

    assert_eq!(cfg.format, LogFormat::Json);
    assert_eq!(cfg.verbose, 2);
    assert_eq!(cfg.debug, vec![DebugFlag::Fdpass]);
    assert!(cfg.quiet);
    assert_eq!(cfg.log_file, Some(PathBuf::from("log")));
    assert!(cfg.colored);
    assert!(cfg.timestamps);
}

#[test]
fn debug_flags_sorted_and_deduped() {
    let cfg = SubscriberConfig::builder()
        .debug([DebugFlag::Handoff, DebugFlag::Clock, DebugFlag::Handoff])
        .build();
    assert_eq!(cfg.debug, vec![DebugFlag::Clock, DebugFlag::Handoff]);
}

#[test]
fn defaults_are_plain_text() {
    let cfg = SubscriberConfig::default();
    assert_eq!(cfg.format, LogFormat::Text);
    assert_eq!(cfg.verbose, 0);
    assert!(cfg.log_file.is_none());
    assert!(!cfg.colored);
}
