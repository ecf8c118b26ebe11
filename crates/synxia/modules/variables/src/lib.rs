//! Custom property shorthand for utility values.
//! Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
//!
//! Authors write a bare `--name` inside a value and get `var(--name)` in the
//! emitted declaration.

#![forbid(unsafe_code)]

/// Wrap every bare custom property reference in `value` in a `var()` call.
///
/// A reference is `--` followed by the longest run of characters other than `$`,
/// `{`, `}` and whitespace that ends on a word boundary. The run gives characters
/// back from its end until it does, so `--gap)` rewrites to `var(--gap))`. Text that
/// is not a reference is copied unchanged and nothing is resolved or validated.
///
/// ```
/// assert_eq!(synxia_variables::rewrite_vars("--accent"), "var(--accent)");
/// ```
pub fn rewrite_vars(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len().saturating_add(8));
    let mut index = 0;
    while let Some(&current) = chars.get(index) {
        if let Some(name_end) = reference_end(&chars, index) {
            out.push_str("var(");
            out.extend(chars.get(index..name_end).unwrap_or_default());
            out.push(')');
            index = name_end;
        } else {
            out.push(current);
            index = index.saturating_add(1);
        }
    }
    out
}

/// If a custom property reference starts at `start`, return the index one past its
/// last character.
fn reference_end(chars: &[char], start: usize) -> Option<usize> {
    let name_start = start.saturating_add(2);
    if chars.get(start..name_start) != Some(&['-', '-'][..]) {
        return None;
    }
    let run = chars
        .iter()
        .skip(name_start)
        .take_while(|character| is_name_char(**character))
        .count();
    (1..=run)
        .rev()
        .map(|len| name_start.saturating_add(len))
        .find(|&end| is_word_boundary(chars, end))
}

/// Characters allowed in the name part of a reference.
fn is_name_char(character: char) -> bool {
    !matches!(character, '$' | '{' | '}') && !character.is_whitespace()
}

/// ASCII word characters, as used for boundary detection.
const fn is_word_char(character: char) -> bool {
    character.is_ascii_alphanumeric() || character == '_'
}

/// Whether `position` sits between a word character and a non-word character.
/// The ends of the string count as non-word.
fn is_word_boundary(chars: &[char], position: usize) -> bool {
    let before = position
        .checked_sub(1)
        .and_then(|prev| chars.get(prev))
        .is_some_and(|character| is_word_char(*character));
    let after = chars
        .get(position)
        .is_some_and(|character| is_word_char(*character));
    before != after
}
