//! Integration tests for the HTML entity table.

use moss_util::{entity_code_point, entity_name, escape, is_known_entity, unescape};

#[test]
fn test_known_entities() {
    assert!(is_known_entity('&'));
    assert!(is_known_entity('<'));
    assert!(is_known_entity('>'));
    assert!(is_known_entity('\u{00A9}')); // copy
    assert!(is_known_entity('\u{2660}')); // spades
    assert!(!is_known_entity('A'));
    assert!(!is_known_entity('\u{1F600}')); // outside the table's range
}

#[test]
fn test_name_lookup_both_directions() {
    assert_eq!(entity_name('\u{00E9}'), Some("eacute"));
    assert_eq!(entity_code_point("eacute"), Some('\u{00E9}'));
    assert_eq!(entity_code_point("Eacute"), Some('\u{00C9}'));
    assert_eq!(entity_code_point("bogus"), None);
}

#[test]
fn test_escape_basic() {
    assert_eq!(escape("<&>", false, false), "&lt;&amp;&gt;");
    assert_eq!(escape("plain text", false, false), "plain text");
}

#[test]
fn test_escape_pure_ascii() {
    // Without the flag, a non-entity non-ASCII character passes through.
    assert_eq!(escape("\u{0100}", false, false), "\u{0100}");
    // With it, anything >= U+0080 becomes a reference: named when known,
    // numeric otherwise.
    assert_eq!(escape("\u{00E9}\u{0100}", true, false), "&eacute;&#256;");
}

#[test]
fn test_escape_control_codes() {
    assert_eq!(escape("a\tb", false, false), "a\tb");
    assert_eq!(escape("a\tb", false, true), "a&#9;b");
}

#[test]
fn test_unescape_named_and_numeric() {
    assert_eq!(unescape("&lt;&amp;&gt;&#65;"), "<&>A");
    assert_eq!(unescape("&copy; 2024"), "\u{00A9} 2024");
}

#[test]
fn test_unescape_semicolon_optional() {
    assert_eq!(unescape("&amp"), "&");
    assert_eq!(unescape("&amp&amp;"), "&&");
    assert_eq!(unescape("&#65"), "A");
}

#[test]
fn test_unescape_invalid_copied_verbatim() {
    assert_eq!(unescape("&bogus;"), "&bogus;");
    assert_eq!(unescape("& loose"), "& loose");
    assert_eq!(unescape("&#;"), "&#;");
    // Out of Unicode range.
    assert_eq!(unescape("&#1114112;"), "&#1114112;");
    // Surrogate code point.
    assert_eq!(unescape("&#55296;"), "&#55296;");
}

#[test]
fn test_round_trip() {
    let samples = [
        "hello world",
        "<a href=\"x\">&amp;</a>",
        "caf\u{00E9} \u{2260} caf\u{00E8}",
        "\u{03B1}\u{03B2}\u{03B3} & \u{2211}",
    ];
    for sample in samples {
        assert_eq!(unescape(&escape(sample, false, false)), sample);
        assert_eq!(unescape(&escape(sample, true, true)), sample);
    }
}

#[test]
fn test_escape_output_is_well_formed() {
    // Every '&' in escaped output must introduce a valid reference.
    let escaped = escape("fish & chips < tea > & \u{00A0}", true, true);
    let mut rest = escaped.as_str();
    while let Some(pos) = rest.find('&') {
        let tail = &rest[pos + 1..];
        let end = tail.find(';').expect("reference must be terminated");
        let name = &tail[..end];
        assert!(
            name.strip_prefix('#')
                .map(|d| d.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or_else(|| entity_code_point(name).is_some()),
            "bad reference &{name};"
        );
        rest = &tail[end + 1..];
    }
}
