#![no_main]

use libfuzzer_sys::fuzz_target;
use roller_core::css::{parse_time, transition_duration};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let duration = transition_duration(text);
    if let Some(duration) = duration {
        // The duration always comes from one of the whitespace tokens.
        assert!(
            text.split(|c: char| c.is_whitespace() || c == ',')
                .filter_map(parse_time)
                .any(|d| d == duration),
            "duration {duration:?} not found in {text:?}"
        );
    }
});
