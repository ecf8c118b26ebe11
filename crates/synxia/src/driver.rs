//! Reactive driver: keeps utility class attributes compiled as the document changes.
//!
//! The host reports element creation and class attribute changes, either directly as
//! [`ClassEvent`]s or as mirrored [`DOMUpdate`]s. Every class attribute containing `_`
//! is compiled and the rewritten attribute is queued for the host to write back.

use anyhow::Result;
use core::mem::take;
use dom::{DOMSubscriber, DOMUpdate, NodeKey};
use log::debug;
use std::collections::HashMap;
use synxia_orchestrator::{MemorySheet, RuleSynthesizer, StylesheetSink, SynxiaConfig};

/// Attribute the driver reads and rewrites.
const CLASS_ATTRIBUTE: &str = "class";

/// Only class attributes containing this character are compiled.
const UTILITY_MARKER: char = '_';

/// An element the host wants (re)compiled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClassEvent {
    /// The element was just created with this class attribute.
    Added { node: NodeKey, class: String },
    /// The element's class attribute now holds this value.
    ClassChanged { node: NodeKey, class: String },
}

/// What the driver remembers about one element.
#[derive(Clone, Debug, Default)]
struct TrackedElement {
    parent: Option<NodeKey>,
    /// Last class value seen; `None` until the first class attribute arrives.
    class: Option<String>,
    /// Rewritten class queued for the host whose echo has not come back yet.
    awaiting_echo: Option<String>,
}

/// Compiles utility classes on behalf of the host document.
pub struct ClassRewriter<S: StylesheetSink> {
    synthesizer: RuleSynthesizer<S>,
    elements: HashMap<NodeKey, TrackedElement>,
    outgoing: Vec<DOMUpdate>,
}

impl Default for ClassRewriter<MemorySheet> {
    fn default() -> Self {
        Self::new(MemorySheet::new())
    }
}

impl<S: StylesheetSink> ClassRewriter<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, SynxiaConfig::default())
    }

    pub fn with_config(sink: S, config: SynxiaConfig) -> Self {
        Self {
            synthesizer: RuleSynthesizer::with_config(sink, config),
            elements: HashMap::new(),
            outgoing: Vec::new(),
        }
    }

    pub const fn sink(&self) -> &S {
        self.synthesizer.sink()
    }

    /// The class attribute last seen or written for `node`.
    pub fn class_of(&self, node: NodeKey) -> Option<&str> {
        self.elements
            .get(&node)
            .and_then(|element| element.class.as_deref())
    }

    /// Apply one event: compile the class attribute and queue the rewritten value.
    ///
    /// Returns the rewritten attribute, or `None` if the attribute has no `_` and was
    /// left alone. Attributes are compiled even when nothing in them resolves, in which
    /// case the rewritten attribute is empty.
    pub fn apply_event(&mut self, event: ClassEvent) -> Option<String> {
        let (node, class, added) = match event {
            ClassEvent::Added { node, class } => (node, class, true),
            ClassEvent::ClassChanged { node, class } => (node, class, false),
        };
        let element = self.elements.entry(node).or_default();
        if !class.contains(UTILITY_MARKER) {
            element.class = Some(class);
            return None;
        }
        let rewritten = self.synthesizer.apply_class_string(&class);
        debug!(
            "{} {node:?}: {class:?} -> {rewritten:?}",
            if added { "compiled new element" } else { "recompiled" }
        );
        if rewritten == class {
            element.awaiting_echo = None;
        } else {
            self.outgoing.push(DOMUpdate::SetAttr {
                node,
                name: CLASS_ATTRIBUTE.to_owned(),
                value: rewritten.clone(),
            });
            element.awaiting_echo = Some(rewritten.clone());
        }
        element.class = Some(rewritten.clone());
        Some(rewritten)
    }

    /// Apply the driver once to every element of an existing document, in the order
    /// given. Returns how many elements were compiled.
    pub fn sweep<I>(&mut self, elements: I) -> usize
    where
        I: IntoIterator<Item = (NodeKey, String)>,
    {
        elements
            .into_iter()
            .filter_map(|(node, class)| self.apply_event(ClassEvent::Added { node, class }))
            .count()
    }

    /// Forget `node` and every element tracked beneath it.
    fn forget_subtree(&mut self, node: NodeKey) {
        let mut removed = vec![node];
        self.elements.remove(&node);
        while let Some(current) = removed.pop() {
            let children: Vec<NodeKey> = self
                .elements
                .iter()
                .filter(|(_, element)| element.parent == Some(current))
                .map(|(key, _)| *key)
                .collect();
            for child in children {
                self.elements.remove(&child);
                removed.push(child);
            }
        }
    }

    /// Turn a mirrored class attribute write into an event, unless it is the echo of
    /// this driver's own write-back.
    fn class_event_for(&mut self, node: NodeKey, value: String) -> Option<ClassEvent> {
        let Some(element) = self.elements.get_mut(&node) else {
            return Some(ClassEvent::ClassChanged { node, class: value });
        };
        if element.awaiting_echo.as_deref() == Some(value.as_str()) {
            element.awaiting_echo = None;
            return None;
        }
        if element.class.is_none() {
            Some(ClassEvent::Added { node, class: value })
        } else {
            Some(ClassEvent::ClassChanged { node, class: value })
        }
    }
}

impl<S: StylesheetSink> DOMSubscriber for ClassRewriter<S> {
    fn apply_update(&mut self, update: DOMUpdate) -> Result<()> {
        match update {
            DOMUpdate::InsertElement { parent, node, .. } => {
                self.elements.insert(
                    node,
                    TrackedElement {
                        parent: Some(parent),
                        ..TrackedElement::default()
                    },
                );
            }
            DOMUpdate::SetAttr { node, name, value } if name.eq_ignore_ascii_case(CLASS_ATTRIBUTE) => {
                if let Some(event) = self.class_event_for(node, value) {
                    self.apply_event(event);
                }
            }
            DOMUpdate::RemoveNode { node } => self.forget_subtree(node),
            DOMUpdate::SetAttr { .. } | DOMUpdate::InsertText { .. } | DOMUpdate::EndOfDocument => {}
        }
        Ok(())
    }

    /// Stylesheet updates come first so rules exist before classes refer to them.
    fn take_outgoing(&mut self) -> Vec<DOMUpdate> {
        let mut changes = self.synthesizer.sink_mut().drain_updates();
        changes.append(&mut take(&mut self.outgoing));
        changes
    }
}
