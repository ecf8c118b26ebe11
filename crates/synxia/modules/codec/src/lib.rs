//! Class-name codec for utility tokens.
//!
//! A class attribute token may only safely carry ASCII letters and digits, so every
//! other character of a CSS property or value travels as `__<codepoint>__`, where
//! `<codepoint>` is the decimal Unicode scalar value. `~` is an extra, decode-only
//! spelling of a literal space.

#![forbid(unsafe_code)]

/// Marker that opens and closes an escaped code point.
const ESCAPE_FENCE: &str = "__";

/// Author spelling of a space inside a token.
const SPACE_PLACEHOLDER: char = '~';

/// Escape every character that is not an ASCII letter or digit.
///
/// ```
/// assert_eq!(synxia_codec::encode("#fff"), "__35__fff");
/// assert_eq!(synxia_codec::encode("10px"), "10px");
/// ```
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() {
            out.push(character);
        } else {
            out.push_str(ESCAPE_FENCE);
            out.push_str(&u32::from(character).to_string());
            out.push_str(ESCAPE_FENCE);
        }
    }
    out
}

/// Reverse [`encode`], then turn every remaining `~` into a space.
///
/// Escapes are matched left to right without overlap. An escape whose digits do not
/// name a Unicode scalar value is left in place as literal text.
///
/// `decode(encode(x)) == x` holds for every `x` without a `~`; an encoded `~`
/// decodes to a space like a literal one does.
pub fn decode(token: &str) -> String {
    let unescaped = unescape_code_points(token);
    if unescaped.contains(SPACE_PLACEHOLDER) {
        unescaped.replace(SPACE_PLACEHOLDER, " ")
    } else {
        unescaped
    }
}

/// Replace each `__<digits>__` with the character it names.
fn unescape_code_points(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut rest = token;
    while let Some(start) = rest.find(ESCAPE_FENCE) {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);
        if let Some((character, consumed)) = parse_escape(tail) {
            out.push(character);
            rest = tail.get(consumed..).unwrap_or_default();
        } else {
            // Not an escape here; retry one underscore further on.
            out.push('_');
            rest = tail.get(1..).unwrap_or_default();
        }
    }
    out.push_str(rest);
    out
}

/// Parse an escape at the start of `text`, returning the character and the byte
/// length of the escape.
fn parse_escape(text: &str) -> Option<(char, usize)> {
    let body = text.strip_prefix(ESCAPE_FENCE)?;
    let digits_len = body.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let (digits, after) = body.split_at(digits_len);
    if !after.starts_with(ESCAPE_FENCE) {
        return None;
    }
    let code_point = digits.parse::<u32>().ok()?;
    let character = char::from_u32(code_point)?;
    Some((character, ESCAPE_FENCE.len() * 2 + digits_len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_pass_through() {
        assert_eq!(encode("color"), "color");
        assert_eq!(encode("Z9"), "Z9");
        assert_eq!(decode("color"), "color");
    }

    #[test]
    fn punctuation_becomes_decimal_code_points() {
        assert_eq!(encode("-"), "__45__");
        assert_eq!(encode("--accent"), "__45____45__accent");
        assert_eq!(encode("1.5rem"), "1__46__5rem");
        assert_eq!(encode("_"), "__95__");
        assert_eq!(encode(" "), "__32__");
    }

    #[test]
    fn non_ascii_uses_the_scalar_value() {
        assert_eq!(encode("é"), "__233__");
        assert_eq!(decode("__233__"), "é");
        assert_eq!(decode("__128512__"), "\u{1F600}");
    }

    #[test]
    fn decode_reverses_encode_without_tilde() {
        for sample in [
            "#fff",
            "rgba(0, 0, 0, .5)",
            "calc(100% - 2px)",
            "a_b:c@d.e",
            "__45__",
            "--x",
            "",
        ] {
            assert_eq!(decode(&encode(sample)), sample, "sample {sample:?}");
        }
    }

    #[test]
    fn every_printable_character_round_trips() {
        let alphabet: String = (' '..='}')
            .chain(['é', 'ß', '\u{3b1}', '\u{4e2d}', '\u{1F600}', '\u{a0}'])
            .collect();
        for character in alphabet.chars() {
            let single = character.to_string();
            assert_eq!(decode(&encode(&single)), single, "character {character:?}");
        }
        assert_eq!(decode(&encode(&alphabet)), alphabet);
        let reversed: String = alphabet.chars().rev().collect();
        assert_eq!(decode(&encode(&reversed)), reversed);
    }

    #[test]
    fn tilde_is_a_decode_only_space() {
        assert_eq!(decode("1px~solid~red"), "1px solid red");
        assert_eq!(decode(&encode("~")), " ");
        assert_eq!(encode(" "), "__32__");
    }

    #[test]
    fn unmatched_fences_stay_literal() {
        assert_eq!(decode("__"), "__");
        assert_eq!(decode("__x__"), "__x__");
        assert_eq!(decode("__45_"), "__45_");
        assert_eq!(decode("a__b"), "a__b");
    }

    #[test]
    fn escape_search_restarts_one_underscore_later() {
        assert_eq!(decode("___65__"), "_A");
        assert_eq!(decode("__65____66__"), "AB");
    }

    #[test]
    fn out_of_range_code_points_stay_literal() {
        assert_eq!(decode("__1114112__"), "__1114112__");
        assert_eq!(decode("__55296__"), "__55296__");
        assert_eq!(decode("__99999999999__"), "__99999999999__");
    }
}
