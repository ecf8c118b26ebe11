//! Rule synthesis: parsed directives become CSS rule text and resolved class names.

use crate::config::SynxiaConfig;
use crate::sink::StylesheetSink;
use log::trace;
use synxia_media_queries::wrap_in_media;
use synxia_syntax::{ParsedDirective, TokenParser, tokens};
use synxia_variables::rewrite_vars;

/// Build the full rule text for a directive without emitting it.
///
/// The selector uses the resolved (re-encoded) class name; the declaration uses the
/// decoded value with custom property shorthand rewritten:
///
/// ```text
/// [@media only screen and <media>{].<class><selector>{<property>:<value>}[}]
/// ```
pub fn rule_text(directive: &ParsedDirective) -> String {
    let class_name = directive.resolved_class_name();
    let declaration = [
        directive.property.as_str(),
        ":",
        &rewrite_vars(&directive.value),
    ]
    .concat();
    let rule = [
        ".",
        &class_name,
        &directive.selector,
        "{",
        &declaration,
        "}",
    ]
    .concat();
    match directive.media {
        Some(condition) => wrap_in_media(&rule, condition),
        None => rule,
    }
}

/// Turns utility tokens into rules appended to a sink.
///
/// Emission order follows call order, and within [`RuleSynthesizer::apply_class_string`]
/// follows token order, so later tokens win the cascade for overlapping declarations.
/// Nothing is cached: resolving the same token twice appends the rule twice.
#[derive(Debug)]
pub struct RuleSynthesizer<S: StylesheetSink> {
    sink: S,
    config: SynxiaConfig,
}

impl<S: StylesheetSink> RuleSynthesizer<S> {
    /// Create a synthesizer with the default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SynxiaConfig::default())
    }

    pub const fn with_config(sink: S, config: SynxiaConfig) -> Self {
        Self { sink, config }
    }

    pub const fn sink(&self) -> &S {
        &self.sink
    }

    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Emit the rule for `directive` and return its resolved class name.
    pub fn synthesize(&mut self, directive: &ParsedDirective) -> String {
        let rule = rule_text(directive);
        trace!(target: "synxia::orchestrator", "emit {rule}");
        self.sink.append_rule(rule);
        directive.resolved_class_name()
    }

    /// Parse one token and, if it is valid, emit its rule.
    ///
    /// Returns the resolved class name, or `None` when the token was dropped.
    pub fn resolve_token(&mut self, token: &str) -> Option<String> {
        match TokenParser::with_color_scheme_match(token, self.config.color_scheme_match).finish()
        {
            Ok(directive) => Some(self.synthesize(&directive)),
            Err(reason) => {
                if self.config.trace_dropped_tokens {
                    trace!(target: "synxia::orchestrator", "dropped {token:?}: {reason:?}");
                }
                None
            }
        }
    }

    /// Resolve every token of a class attribute in order and return the rewritten
    /// attribute: resolved names joined by single spaces, dropped tokens omitted.
    pub fn apply_class_string(&mut self, class_attr: &str) -> String {
        let resolved: Vec<String> = tokens(class_attr)
            .filter_map(|token| self.resolve_token(token))
            .collect();
        resolved.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySheet;
    use synxia_media_queries::ColorSchemeMatch;

    #[test]
    fn plain_rule() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        assert_eq!(synth.resolve_token("color_red"), Some("color_red".to_owned()));
        assert_eq!(synth.sink().rules(), [".color_red{color:red}"]);
    }

    #[test]
    fn declaration_uses_decoded_value_and_class_uses_encoded_one() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        let resolved = synth.resolve_token("color___35__fff");
        assert_eq!(resolved.as_deref(), Some("color___35__fff"));
        assert_eq!(synth.sink().rules(), [".color___35__fff{color:#fff}"]);
    }

    #[test]
    fn custom_properties_become_var_calls() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        synth.resolve_token("color___45____45__accent");
        assert_eq!(
            synth.sink().rules(),
            [".color___45____45__accent{color:var(--accent)}"]
        );
    }

    #[test]
    fn tilde_spaces_reach_the_declaration() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        let resolved = synth.resolve_token("border_1px~solid~red");
        assert_eq!(
            resolved.as_deref(),
            Some("border_1px__32__solid__32__red")
        );
        assert_eq!(
            synth.sink().rules(),
            [".border_1px__32__solid__32__red{border:1px solid red}"]
        );
    }

    #[test]
    fn media_and_pseudo_chain_wrap_the_rule() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        synth.resolve_token("pc@hover:color_red");
        synth.resolve_token("dark.focus:color_white");
        assert_eq!(
            synth.sink().rules(),
            [
                "@media only screen and (min-width: 1025px){.color_red:hover{color:red}}",
                "@media only screen and (prefers-color-scheme: dark){.color_white:focus{color:white}}",
            ]
        );
    }

    #[test]
    fn class_string_keeps_order_and_drops_invalid_tokens() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        let rewritten = synth.apply_class_string("flex color_red  _x pc@margin_0 card");
        assert_eq!(rewritten, "color_red margin_0");
        assert_eq!(
            synth.sink().rules(),
            [
                ".color_red{color:red}",
                "@media only screen and (min-width: 1025px){.margin_0{margin:0}}",
            ]
        );
    }

    #[test]
    fn repeated_application_appends_duplicates() {
        let mut synth = RuleSynthesizer::new(MemorySheet::new());
        let first = synth.apply_class_string("color_red");
        let second = synth.apply_class_string(&first);
        assert_eq!(first, second);
        assert_eq!(synth.sink().len(), 2);
    }

    #[test]
    fn configured_prefix_matching_reaches_the_parser() {
        let config = SynxiaConfig {
            color_scheme_match: ColorSchemeMatch::Prefix,
            ..SynxiaConfig::default()
        };
        let mut synth = RuleSynthesizer::with_config(MemorySheet::new(), config);
        synth.resolve_token("x.dark.y_z");
        assert_eq!(
            synth.into_sink().rules(),
            [".x__46__dark__46__y_z{x.dark.y:z}"]
        );
    }
}
