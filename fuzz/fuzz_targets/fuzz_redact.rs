//! Fuzz target for the redaction engine.
//!
//! Arbitrary text must never panic the engine, and the output must never
//! grow a placeholder out of nothing: clean input comes back borrowed.

#![no_main]

use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use scrub_redact::{RedactionEngine, PLACEHOLDER_PREFIX};
use std::borrow::Cow;

static ENGINE: Lazy<RedactionEngine> =
    Lazy::new(|| RedactionEngine::standard().expect("standard catalog compiles"));

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    match ENGINE.redact_cow(&text) {
        Cow::Borrowed(out) => assert_eq!(out, text.as_ref()),
        Cow::Owned(out) => assert!(out.contains(PLACEHOLDER_PREFIX)),
    }
});
