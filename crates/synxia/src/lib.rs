//! Synxia: runtime atomic CSS compiler.
//!
//! Class tokens such as `pc@hover:color_red` or `dark.background___45____45__bg` are
//! compiled on the fly into CSS rules and rewritten into canonical, selector-safe class
//! names. The work is split across crates:
//!
//! - `synxia_codec`: selector-safe encoding of arbitrary text.
//! - `synxia_variables`: `--name` shorthand to `var(--name)`.
//! - `synxia_media_queries`: breakpoints and color schemes.
//! - `synxia_syntax`: the token grammar.
//! - `synxia_orchestrator`: rule synthesis, stylesheet sinks and configuration.
//!
//! This crate adds [`ClassRewriter`], which keeps a document's class attributes compiled
//! as it changes.

#![forbid(unsafe_code)]

mod driver;

pub use driver::{ClassEvent, ClassRewriter};
pub use synxia_codec::{decode, encode};
pub use synxia_media_queries::{
    Breakpoint, ColorScheme, ColorSchemeMatch, MediaCondition, wrap_in_media,
};
pub use synxia_orchestrator::{
    DropReason, MemorySheet, ParsedDirective, RuleSynthesizer, STYLE_ELEMENT_ID,
    StyleElementSink, StylesheetSink, SynxiaConfig, rule_text,
};
pub use synxia_syntax::{ParseState, TokenParser, parse_token, parse_token_with, tokens};
pub use synxia_variables::rewrite_vars;
