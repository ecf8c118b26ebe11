//! Stylesheet sinks: append-only destinations for synthesized rule text.
//!
//! Rules are never removed, reordered or deduplicated. Appending the same rule twice
//! leaves two copies in the sheet.

use crate::config::SynxiaConfig;
use core::mem::take;
use dom::{DOMUpdate, KeySpace, NodeKey, NodeKeyManager};
use log::debug;

/// An append-only, ordered destination for CSS rule text.
pub trait StylesheetSink {
    /// Append one rule after every rule appended so far.
    fn append_rule(&mut self, rule: String);

    /// Drain document updates the sink needs the host to perform, oldest first.
    /// Sinks that do not live in the document have none.
    fn drain_updates(&mut self) -> Vec<DOMUpdate> {
        Vec::new()
    }
}

impl<S: StylesheetSink + ?Sized> StylesheetSink for &mut S {
    #[inline]
    fn append_rule(&mut self, rule: String) {
        (**self).append_rule(rule);
    }

    #[inline]
    fn drain_updates(&mut self) -> Vec<DOMUpdate> {
        (**self).drain_updates()
    }
}

/// An in-memory stylesheet, for headless hosts and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySheet {
    rules: Vec<String>,
}

impl MemorySheet {
    #[inline]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Rules in append order.
    #[inline]
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The whole sheet as CSS text, one rule per line.
    pub fn to_css(&self) -> String {
        self.rules.join("\n")
    }
}

impl StylesheetSink for MemorySheet {
    #[inline]
    fn append_rule(&mut self, rule: String) {
        self.rules.push(rule);
    }
}

/// Local id of the style element within the sink's key shard. Rule text nodes use
/// the ids after it.
const STYLE_ELEMENT_LOCAL_ID: u32 = 0;

/// Writes rules into a `<style>` element of the host document through `DOMUpdate`s.
///
/// The element is created under `head` the first time a rule is appended, carrying the
/// configured `id`; each rule then becomes one text node appended to it. The updates
/// are queued until the host takes them with [`StyleElementSink::take_updates`].
#[derive(Debug)]
pub struct StyleElementSink {
    head: NodeKey,
    pos: usize,
    element_id: String,
    keys: NodeKeyManager<u32>,
    style_node: Option<NodeKey>,
    rule_count: u32,
    pending: Vec<DOMUpdate>,
}

impl StyleElementSink {
    /// Create a sink that will insert its style element as child `pos` of `head`,
    /// identified by the configured `style_element_id`.
    pub fn new(key_space: &mut KeySpace, head: NodeKey, pos: usize, config: &SynxiaConfig) -> Self {
        Self {
            head,
            pos,
            element_id: config.style_element_id.clone(),
            keys: key_space.register_manager(),
            style_node: None,
            rule_count: 0,
            pending: Vec::new(),
        }
    }

    /// The style element, once the first rule has been appended.
    #[inline]
    pub const fn style_node(&self) -> Option<NodeKey> {
        self.style_node
    }

    /// Number of rules appended so far.
    #[inline]
    pub const fn rule_count(&self) -> u32 {
        self.rule_count
    }

    /// Drain the queued document updates, oldest first.
    pub fn take_updates(&mut self) -> Vec<DOMUpdate> {
        take(&mut self.pending)
    }

    fn ensure_style_node(&mut self) -> NodeKey {
        if let Some(node) = self.style_node {
            return node;
        }
        let node = self.keys.key_of(STYLE_ELEMENT_LOCAL_ID);
        debug!(
            "creating <style id={:?}> as {node:?} under {:?}",
            self.element_id, self.head
        );
        self.pending.push(DOMUpdate::InsertElement {
            parent: self.head,
            node,
            tag: "style".to_owned(),
            pos: self.pos,
        });
        self.pending.push(DOMUpdate::SetAttr {
            node,
            name: "id".to_owned(),
            value: self.element_id.clone(),
        });
        self.style_node = Some(node);
        node
    }
}

impl StylesheetSink for StyleElementSink {
    fn append_rule(&mut self, rule: String) {
        let parent = self.ensure_style_node();
        let local_id = self.rule_count.saturating_add(1);
        let node = self.keys.key_of(local_id);
        self.pending.push(DOMUpdate::InsertText {
            parent,
            node,
            text: rule,
            pos: self.rule_count as usize,
        });
        self.rule_count = local_id;
    }

    fn drain_updates(&mut self) -> Vec<DOMUpdate> {
        self.take_updates()
    }
}
