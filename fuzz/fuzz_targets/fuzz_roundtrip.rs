#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else { return };
    let Ok(diagram) = sw_parser::parse(input) else { return };

    let rendered = sw_codegen::render(&diagram);
    let reparsed = sw_parser::parse(&rendered).expect("regenerated diagram must reparse");
    assert_eq!(reparsed, diagram);
});
