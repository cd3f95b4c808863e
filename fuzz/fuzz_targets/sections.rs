#![no_main]
use libfuzzer_sys::fuzz_target;
use suite::parse_sections;

fuzz_target!(|data: &[u8]| {
    if let Ok(raw) = std::str::from_utf8(data) {
        // Either an error, or every token lands on exactly one side.
        if let Ok(parsed) = parse_sections(raw) {
            for section in &parsed.sections {
                assert!(!section.is_empty());
                assert!(!section.contains(['[', ']', ',']));
                assert!(!section.contains(char::is_whitespace));
            }
            for production in &parsed.productions {
                assert!(production.len() > 2);
                assert!(production.starts_with('[') && production.ends_with(']'));
                let inner = &production[1..production.len() - 1];
                assert!(!inner.contains(['[', ']', ',']));
                assert!(!inner.contains(char::is_whitespace));
            }
        }
    }
});
