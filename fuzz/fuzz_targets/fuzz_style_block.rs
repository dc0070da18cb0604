#![no_main]

use libfuzzer_sys::fuzz_target;
use roller_core::css::StyleMap;

fuzz_target!(|data: &[u8]| {
    let Ok(block) = std::str::from_utf8(data) else {
        return;
    };
    let map = StyleMap::parse(block);
    let Ok(serialized) = map.to_declaration_block() else {
        return;
    };
    // A block we wrote ourselves must read back to the same declarations.
    let reparsed = StyleMap::parse(&serialized);
    assert_eq!(reparsed.len(), map.len(), "declaration count changed: {serialized:?}");
    assert_eq!(
        reparsed.to_declaration_block().as_deref(),
        Ok(serialized.as_str()),
        "serialization not stable"
    );
});
