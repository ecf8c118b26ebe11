//! Utility token grammar.
//!
//! A utility token reads, left to right:
//!
//! ```text
//! [breakpoint@][dark.|light.][pseudo:]*property_value
//! ```
//!
//! [`TokenParser`] walks a token through a fixed sequence of states, each
//! consuming one kind of prefix:
//!
//! ```text
//! Start -> BreakpointChecked -> ModeChecked -> PseudoChainChecked -> Split -> Done
//!                                                                  \-> Invalid
//! ```
//!
//! Only the first occurrence of every separator matters, so raw `_` or `:` meant to be
//! part of a value misparse; authors escape them with the codec first.

#![forbid(unsafe_code)]

use log::trace;
use synxia_codec::{decode, encode};
use synxia_media_queries::{Breakpoint, ColorScheme, ColorSchemeMatch, MediaCondition};

/// Separates a breakpoint name from the rest of the token.
const BREAKPOINT_SEPARATOR: char = '@';
/// Ends one pseudo-class name in the chain.
const PSEUDO_SEPARATOR: char = ':';
/// Separates the property half from the value half.
const DECLARATION_SEPARATOR: char = '_';

/// One declaration recovered from a utility token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedDirective {
    /// Decoded property name. Never empty.
    pub property: String,
    /// Decoded value, before custom property rewriting. Never empty.
    pub value: String,
    /// Condition the rule is wrapped in, if any.
    pub media: Option<MediaCondition>,
    /// Pseudo-class chain appended to the class selector, e.g. `:hover:focus`.
    pub selector: String,
}

impl ParsedDirective {
    /// The canonical class name: both halves re-encoded and joined with `_`.
    ///
    /// For a token whose halves were already canonical this is the token with its
    /// prefixes removed.
    pub fn resolved_class_name(&self) -> String {
        [
            encode(&self.property),
            DECLARATION_SEPARATOR.to_string(),
            encode(&self.value),
        ]
        .concat()
    }

    /// The media expression, if the directive is conditional.
    pub fn media_expression(&self) -> Option<&'static str> {
        self.media.map(MediaCondition::expression)
    }
}

/// Why a token produced no directive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropReason {
    /// No `_` left once the prefixes were stripped.
    MissingSeparator,
    /// Nothing before the first `_`.
    EmptyProperty,
    /// Nothing after the first `_`.
    EmptyValue,
}

/// States of the token parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseState {
    /// Nothing consumed yet.
    Start,
    /// A breakpoint prefix was consumed, or there was none.
    BreakpointChecked,
    /// A color-scheme marker was consumed, or there was none.
    ModeChecked,
    /// Every pseudo-class ahead of the first `_` was consumed.
    PseudoChainChecked,
    /// The remainder split into two non-empty halves.
    Split,
    /// A directive is ready.
    Done,
    /// The token cannot produce a directive.
    Invalid(DropReason),
}

impl ParseState {
    /// Whether no further transition is possible.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Invalid(_))
    }
}

/// Small-step parser over a single utility token.
///
/// Each [`TokenParser::step`] performs one transition; [`TokenParser::finish`] runs
/// the remaining transitions and hands back the directive.
#[derive(Clone, Debug)]
pub struct TokenParser<'token> {
    state: ParseState,
    rest: &'token str,
    media: Option<MediaCondition>,
    selector: String,
    halves: Option<(&'token str, &'token str)>,
    color_scheme_match: ColorSchemeMatch,
}

impl<'token> TokenParser<'token> {
    /// Start parsing `token` with the default (substring) color-scheme matching.
    pub fn new(token: &'token str) -> Self {
        Self::with_color_scheme_match(token, ColorSchemeMatch::default())
    }

    /// Start parsing `token` with an explicit color-scheme matching mode.
    pub fn with_color_scheme_match(token: &'token str, matching: ColorSchemeMatch) -> Self {
        Self {
            state: ParseState::Start,
            rest: token,
            media: None,
            selector: String::new(),
            halves: None,
            color_scheme_match: matching,
        }
    }

    /// The current state.
    pub const fn state(&self) -> &ParseState {
        &self.state
    }

    /// The part of the token not consumed yet.
    pub const fn remaining(&self) -> &'token str {
        self.rest
    }

    /// The condition collected so far.
    pub const fn media(&self) -> Option<MediaCondition> {
        self.media
    }

    /// The pseudo-class chain collected so far.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Perform one transition and return the state reached.
    /// Terminal states are left unchanged.
    pub fn step(&mut self) -> &ParseState {
        self.state = match self.state {
            ParseState::Start => {
                self.strip_breakpoint();
                ParseState::BreakpointChecked
            }
            ParseState::BreakpointChecked => {
                self.strip_color_scheme();
                ParseState::ModeChecked
            }
            ParseState::ModeChecked => {
                self.strip_pseudo_chain();
                ParseState::PseudoChainChecked
            }
            ParseState::PseudoChainChecked => match split_declaration(self.rest) {
                Ok(halves) => {
                    self.halves = Some(halves);
                    ParseState::Split
                }
                Err(reason) => ParseState::Invalid(reason),
            },
            ParseState::Split | ParseState::Done => ParseState::Done,
            ParseState::Invalid(reason) => ParseState::Invalid(reason),
        };
        &self.state
    }

    /// Run to a terminal state.
    ///
    /// # Errors
    /// Returns the reason the token was rejected when it does not reduce to a
    /// non-empty property/value pair.
    pub fn finish(mut self) -> Result<ParsedDirective, DropReason> {
        while !self.state.is_terminal() {
            self.step();
        }
        match (self.state, self.halves) {
            (ParseState::Done, Some((property, value))) => Ok(ParsedDirective {
                property: decode(property),
                value: decode(value),
                media: self.media,
                selector: self.selector,
            }),
            (ParseState::Invalid(reason), _) => Err(reason),
            // Done is only reachable through Split, which stores the halves.
            _ => Err(DropReason::MissingSeparator),
        }
    }

    /// `name@rest`: consume a known breakpoint name.
    /// An unknown name leaves the token untouched.
    fn strip_breakpoint(&mut self) {
        let Some((prefix, rest)) = self.rest.split_once(BREAKPOINT_SEPARATOR) else {
            return;
        };
        if let Some(breakpoint) = Breakpoint::from_name(prefix) {
            self.media = Some(MediaCondition::Breakpoint(breakpoint));
            self.rest = rest;
        }
    }

    /// `dark.` / `light.`: replaces any breakpoint condition.
    fn strip_color_scheme(&mut self) {
        if let Some((scheme, rest)) = ColorScheme::detect(self.rest, self.color_scheme_match) {
            self.media = Some(MediaCondition::ColorScheme(scheme));
            self.rest = rest;
        }
    }

    /// `name:` repeated, as long as the `:` comes before the first `_`.
    fn strip_pseudo_chain(&mut self) {
        while let Some(colon) = self.rest.find(PSEUDO_SEPARATOR)
            && let Some(underscore) = self.rest.find(DECLARATION_SEPARATOR)
            && colon < underscore
        {
            let (name, rest) = self.rest.split_at(colon);
            self.selector.push(PSEUDO_SEPARATOR);
            self.selector.push_str(name);
            self.rest = rest.get(PSEUDO_SEPARATOR.len_utf8()..).unwrap_or_default();
        }
    }
}

/// Split on the first `_`, requiring both halves to be non-empty.
fn split_declaration(rest: &str) -> Result<(&str, &str), DropReason> {
    let (property, value) = rest
        .split_once(DECLARATION_SEPARATOR)
        .ok_or(DropReason::MissingSeparator)?;
    if property.is_empty() {
        return Err(DropReason::EmptyProperty);
    }
    if value.is_empty() {
        return Err(DropReason::EmptyValue);
    }
    Ok((property, value))
}

/// Parse one utility token with the default grammar.
///
/// ```
/// let directive = synxia_syntax::parse_token("pc@hover:color_red").unwrap();
/// assert_eq!(directive.property, "color");
/// assert_eq!(directive.selector, ":hover");
/// ```
pub fn parse_token(token: &str) -> Option<ParsedDirective> {
    parse_token_with(token, ColorSchemeMatch::default())
}

/// Parse one utility token with an explicit color-scheme matching mode.
pub fn parse_token_with(token: &str, matching: ColorSchemeMatch) -> Option<ParsedDirective> {
    match TokenParser::with_color_scheme_match(token, matching).finish() {
        Ok(directive) => Some(directive),
        Err(reason) => {
            trace!(target: "synxia::syntax", "dropping token {token:?}: {reason:?}");
            None
        }
    }
}

/// Split a class attribute into raw tokens, in source order.
pub fn tokens(class_attr: &str) -> impl Iterator<Item = &str> {
    class_attr.split_whitespace()
}
