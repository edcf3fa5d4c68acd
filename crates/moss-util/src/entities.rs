//! HTML named-entity table.
//!
//! Bidirectional mapping between the HTML 4 named character references
//! (plus `apos`, which HTML 5 restored) and their code points, with an
//! O(1) membership test backed by a dense bit table.
//!
//! [§ 24 Character entity references](https://www.w3.org/TR/html401/sgml/entities.html)

use std::collections::HashMap;
use std::sync::LazyLock;

/// Every entity code point is below this bound, so a 16 Ki-bit table
/// covers the full set.
const BIT_TABLE_CODE_POINTS: usize = 0x4000;

/// Longest entity name in the table ("thetasym").
const MAX_NAME_LEN: usize = 8;

/// The named entity table: `(name, code point)`, one entry per name.
///
/// Ordered as the HTML 4 spec lists them: markup-significant and
/// internationalization characters, Latin-1, then symbols and Greek.
const ENTITIES: &[(&str, u32)] = &[
    // Markup-significant
    ("quot", 34),
    ("amp", 38),
    ("apos", 39),
    ("lt", 60),
    ("gt", 62),
    ("OElig", 338),
    ("oelig", 339),
    ("Scaron", 352),
    ("scaron", 353),
    ("Yuml", 376),
    ("circ", 710),
    ("tilde", 732),
    ("ensp", 8194),
    ("emsp", 8195),
    ("thinsp", 8201),
    ("zwnj", 8204),
    ("zwj", 8205),
    ("lrm", 8206),
    ("rlm", 8207),
    ("ndash", 8211),
    ("mdash", 8212),
    ("lsquo", 8216),
    ("rsquo", 8217),
    ("sbquo", 8218),
    ("ldquo", 8220),
    ("rdquo", 8221),
    ("bdquo", 8222),
    ("dagger", 8224),
    ("Dagger", 8225),
    ("permil", 8240),
    ("lsaquo", 8249),
    ("rsaquo", 8250),
    ("euro", 8364),
    // Latin-1
    ("nbsp", 160),
    ("iexcl", 161),
    ("cent", 162),
    ("pound", 163),
    ("curren", 164),
    ("yen", 165),
    ("brvbar", 166),
    ("sect", 167),
    ("uml", 168),
    ("copy", 169),
    ("ordf", 170),
    ("laquo", 171),
    ("not", 172),
    ("shy", 173),
    ("reg", 174),
    ("macr", 175),
    ("deg", 176),
    ("plusmn", 177),
    ("sup2", 178),
    ("sup3", 179),
    ("acute", 180),
    ("micro", 181),
    ("para", 182),
    ("middot", 183),
    ("cedil", 184),
    ("sup1", 185),
    ("ordm", 186),
    ("raquo", 187),
    ("frac14", 188),
    ("frac12", 189),
    ("frac34", 190),
    ("iquest", 191),
    ("Agrave", 192),
    ("Aacute", 193),
    ("Acirc", 194),
    ("Atilde", 195),
    ("Auml", 196),
    ("Aring", 197),
    ("AElig", 198),
    ("Ccedil", 199),
    ("Egrave", 200),
    ("Eacute", 201),
    ("Ecirc", 202),
    ("Euml", 203),
    ("Igrave", 204),
    ("Iacute", 205),
    ("Icirc", 206),
    ("Iuml", 207),
    ("ETH", 208),
    ("Ntilde", 209),
    ("Ograve", 210),
    ("Oacute", 211),
    ("Ocirc", 212),
    ("Otilde", 213),
    ("Ouml", 214),
    ("times", 215),
    ("Oslash", 216),
    ("Ugrave", 217),
    ("Uacute", 218),
    ("Ucirc", 219),
    ("Uuml", 220),
    ("Yacute", 221),
    ("THORN", 222),
    ("szlig", 223),
    ("agrave", 224),
    ("aacute", 225),
    ("acirc", 226),
    ("atilde", 227),
    ("auml", 228),
    ("aring", 229),
    ("aelig", 230),
    ("ccedil", 231),
    ("egrave", 232),
    ("eacute", 233),
    ("ecirc", 234),
    ("euml", 235),
    ("igrave", 236),
    ("iacute", 237),
    ("icirc", 238),
    ("iuml", 239),
    ("eth", 240),
    ("ntilde", 241),
    ("ograve", 242),
    ("oacute", 243),
    ("ocirc", 244),
    ("otilde", 245),
    ("ouml", 246),
    ("divide", 247),
    ("oslash", 248),
    ("ugrave", 249),
    ("uacute", 250),
    ("ucirc", 251),
    ("uuml", 252),
    ("yacute", 253),
    ("thorn", 254),
    ("yuml", 255),
    // Greek
    ("fnof", 402),
    ("Alpha", 913),
    ("Beta", 914),
    ("Gamma", 915),
    ("Delta", 916),
    ("Epsilon", 917),
    ("Zeta", 918),
    ("Eta", 919),
    ("Theta", 920),
    ("Iota", 921),
    ("Kappa", 922),
    ("Lambda", 923),
    ("Mu", 924),
    ("Nu", 925),
    ("Xi", 926),
    ("Omicron", 927),
    ("Pi", 928),
    ("Rho", 929),
    ("Sigma", 931),
    ("Tau", 932),
    ("Upsilon", 933),
    ("Phi", 934),
    ("Chi", 935),
    ("Psi", 936),
    ("Omega", 937),
    ("alpha", 945),
    ("beta", 946),
    ("gamma", 947),
    ("delta", 948),
    ("epsilon", 949),
    ("zeta", 950),
    ("eta", 951),
    ("theta", 952),
    ("iota", 953),
    ("kappa", 954),
    ("lambda", 955),
    ("mu", 956),
    ("nu", 957),
    ("xi", 958),
    ("omicron", 959),
    ("pi", 960),
    ("rho", 961),
    ("sigmaf", 962),
    ("sigma", 963),
    ("tau", 964),
    ("upsilon", 965),
    ("phi", 966),
    ("chi", 967),
    ("psi", 968),
    ("omega", 969),
    ("thetasym", 977),
    ("upsih", 978),
    ("piv", 982),
    // General punctuation and letterlike symbols
    ("bull", 8226),
    ("hellip", 8230),
    ("prime", 8242),
    ("Prime", 8243),
    ("oline", 8254),
    ("frasl", 8260),
    ("weierp", 8472),
    ("image", 8465),
    ("real", 8476),
    ("trade", 8482),
    ("alefsym", 8501),
    // Arrows
    ("larr", 8592),
    ("uarr", 8593),
    ("rarr", 8594),
    ("darr", 8595),
    ("harr", 8596),
    ("crarr", 8629),
    ("lArr", 8656),
    ("uArr", 8657),
    ("rArr", 8658),
    ("dArr", 8659),
    ("hArr", 8660),
    // Mathematical operators
    ("forall", 8704),
    ("part", 8706),
    ("exist", 8707),
    ("empty", 8709),
    ("nabla", 8711),
    ("isin", 8712),
    ("notin", 8713),
    ("ni", 8715),
    ("prod", 8719),
    ("sum", 8721),
    ("minus", 8722),
    ("lowast", 8727),
    ("radic", 8730),
    ("prop", 8733),
    ("infin", 8734),
    ("ang", 8736),
    ("and", 8743),
    ("or", 8744),
    ("cap", 8745),
    ("cup", 8746),
    ("int", 8747),
    ("there4", 8756),
    ("sim", 8764),
    ("cong", 8773),
    ("asymp", 8776),
    ("ne", 8800),
    ("equiv", 8801),
    ("le", 8804),
    ("ge", 8805),
    ("sub", 8834),
    ("sup", 8835),
    ("nsub", 8836),
    ("sube", 8838),
    ("supe", 8839),
    ("oplus", 8853),
    ("otimes", 8855),
    ("perp", 8869),
    ("sdot", 8901),
    // Technical and geometric
    ("lceil", 8968),
    ("rceil", 8969),
    ("lfloor", 8970),
    ("rfloor", 8971),
    ("lang", 9001),
    ("rang", 9002),
    ("loz", 9674),
    ("spades", 9824),
    ("clubs", 9827),
    ("hearts", 9829),
    ("diams", 9830),
];

/// Lookup structures derived from [`ENTITIES`].
struct Tables {
    by_name: HashMap<&'static str, char>,
    by_code_point: HashMap<char, &'static str>,
    bits: Box<[u64; BIT_TABLE_CODE_POINTS / 64]>,
}

static TABLES: LazyLock<Tables> = LazyLock::new(|| {
    let mut by_name = HashMap::with_capacity(ENTITIES.len());
    let mut by_code_point = HashMap::with_capacity(ENTITIES.len());
    let mut bits = Box::new([0u64; BIT_TABLE_CODE_POINTS / 64]);
    for &(name, code_point) in ENTITIES {
        debug_assert!((code_point as usize) < BIT_TABLE_CODE_POINTS);
        let c = char::from_u32(code_point).expect("entity table holds valid code points");
        let _ = by_name.insert(name, c);
        let _ = by_code_point.insert(c, name);
        bits[code_point as usize / 64] |= 1 << (code_point % 64);
    }
    Tables {
        by_name,
        by_code_point,
        bits,
    }
});

/// True if `c` has a named entity, in O(1) via the dense bit table.
#[must_use]
pub fn is_known_entity(c: char) -> bool {
    let code_point = c as usize;
    if code_point >= BIT_TABLE_CODE_POINTS {
        return false;
    }
    TABLES.bits[code_point / 64] & (1 << (code_point % 64)) != 0
}

/// The entity name (without `&`/`;`) for `c`, if one exists.
#[must_use]
pub fn entity_name(c: char) -> Option<&'static str> {
    TABLES.by_code_point.get(&c).copied()
}

/// The code point for an entity name (without `&`/`;`), if known.
/// Names are case-sensitive (`Prime` and `prime` differ).
#[must_use]
pub fn entity_code_point(name: &str) -> Option<char> {
    TABLES.by_name.get(name).copied()
}

/// Copy `text` to a new string, replacing every entity-eligible code point
/// with its named reference (`&name;`) when one exists, or a decimal
/// numeric reference (`&#NNN;`) otherwise.
///
/// A code point is entity-eligible when it has a known entity, when
/// `pure_ascii` is set and it is >= U+0080, or when `control_codes` is set
/// and it is below U+0020.
#[must_use]
pub fn escape(text: &str, pure_ascii: bool, control_codes: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let eligible = is_known_entity(c)
            || (pure_ascii && c as u32 >= 128)
            || (control_codes && (c as u32) < 32);
        if !eligible {
            out.push(c);
            continue;
        }
        match entity_name(c) {
            Some(name) => {
                out.push('&');
                out.push_str(name);
                out.push(';');
            }
            None => {
                out.push_str(&format!("&#{};", c as u32));
            }
        }
    }
    out
}

/// Reverse [`escape`]: decode `&name;`, `&name`, `&#DDDD;` and `&#DDDD`
/// references, treating the trailing semicolon as optional per HTML 5.
/// Invalid escapes are copied verbatim; numeric escapes outside the Unicode
/// range are invalid.
#[must_use]
pub fn unescape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '&' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match decode_reference(&chars[i + 1..]) {
            Some((c, consumed)) => {
                out.push(c);
                i += 1 + consumed;
            }
            None => {
                out.push('&');
                i += 1;
            }
        }
    }
    out
}

/// Decode one reference starting just after `&`. Returns the decoded
/// character and the number of input characters consumed (excluding the
/// `&` itself), or `None` if the text after `&` is not a valid reference.
fn decode_reference(rest: &[char]) -> Option<(char, usize)> {
    if rest.first() == Some(&'#') {
        return decode_numeric(&rest[1..]).map(|(c, n)| (c, n + 1));
    }

    // Named reference: take the longest alphanumeric run that could be a
    // name, then match greedily so "&notin;" resolves to notin, while
    // "&notx" still resolves its "not" prefix (semicolon optional).
    let run_len = rest
        .iter()
        .take(MAX_NAME_LEN)
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    for len in (1..=run_len).rev() {
        let name: String = rest[..len].iter().collect();
        if let Some(c) = entity_code_point(&name) {
            // Only the full run may claim a trailing semicolon.
            let semicolon = len == run_len && rest.get(len) == Some(&';');
            return Some((c, len + usize::from(semicolon)));
        }
    }
    None
}

/// Decode the digits of `&#DDDD` (after `&#`). Decimal only.
fn decode_numeric(rest: &[char]) -> Option<(char, usize)> {
    let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return None;
    }
    let text: String = rest[..digits].iter().collect();
    // Values outside [0, 0x110000) are invalid and copied verbatim.
    let value: u32 = text.parse().ok().filter(|&v| v < 0x0011_0000)?;
    let c = char::from_u32(value)?;
    let semicolon = rest.get(digits) == Some(&';');
    Some((c, digits + usize::from(semicolon)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_table_agrees_with_name_table() {
        for &(name, code_point) in ENTITIES {
            let c = char::from_u32(code_point).unwrap();
            assert!(is_known_entity(c), "bit table misses &{name};");
            assert_eq!(entity_name(c), Some(name));
            assert_eq!(entity_code_point(name), Some(c));
        }
        assert!(!is_known_entity('a'));
        assert!(!is_known_entity('\u{FFFD}'));
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(unescape("&notin;"), "\u{2209}");
        assert_eq!(unescape("&not"), "\u{00AC}");
    }
}
