//! Fuzz target for rule file parsing.
//!
//! Arbitrary TOML or JSON must produce a config or an error, never a panic.
//! Configs that parse are compiled too, exercising the regex size limit.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scrub_redact::RedactionConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(mut config) = toml::from_str::<RedactionConfig>(text) {
        config.size_limit = Some(config.size_limit.unwrap_or(1 << 16).min(1 << 16));
        let _ = config.validate();
    }
    if let Ok(mut config) = serde_json::from_str::<RedactionConfig>(text) {
        config.size_limit = Some(config.size_limit.unwrap_or(1 << 16).min(1 << 16));
        let _ = config.validate();
    }
});
