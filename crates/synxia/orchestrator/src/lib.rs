//! Orchestrator of the synxia compiler.
//!
//! Ties the grammar (`synxia_syntax`), the codec, custom property rewriting and media
//! wrapping together into rule synthesis, and defines where the synthesized rules go.
//!
//! - [`RuleSynthesizer`] turns class attributes into resolved names plus rules.
//! - [`StylesheetSink`] is the append-only destination, with an in-memory
//!   ([`MemorySheet`]) and a document-backed ([`StyleElementSink`]) implementation.
//! - [`SynxiaConfig`] holds the runtime knobs.

#![forbid(unsafe_code)]

pub mod config;
pub mod sink;
mod synthesizer;

pub use config::{STYLE_ELEMENT_ID, SynxiaConfig};
pub use sink::{MemorySheet, StyleElementSink, StylesheetSink};
pub use synthesizer::{RuleSynthesizer, rule_text};
pub use synxia_syntax::{DropReason, ParsedDirective};
