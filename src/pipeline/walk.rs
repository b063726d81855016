//! DOM linearizer: tree → flat sequence of block-level elements.
//!
//! The walk is depth-first and post-order: a node's children are fully
//! visited, left to right, before the node itself is considered. Containers
//! that are not relevant (`div`, `span`, table remnants, …) are transparent;
//! their relevant descendants still surface. Navigation chrome (see
//! [`is_navigation`]) is the exception: the walker never descends into it.
//!
//! [`DomWalker`] is a lazy iterator over an explicit stack, so arbitrarily
//! deep markup cannot overflow the call stack. Each walker owns its visited
//! set (keyed by arena [`NodeId`]); nothing is shared between walks.

use crate::pipeline::dom::is_navigation;
use ego_tree::{NodeId, NodeRef};
use scraper::{ElementRef, Html, Node};
use std::collections::HashSet;
use tracing::{debug, trace};

/// Tags the walker yields.
pub const RELEVANT_ELEMENTS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "p", "img", "ul", "ol", "li"];

/// `src` substring of the Wikidata "edit" pencil icon.
pub const EDIT_ICON_MARKER: &str = "edit-ltr-progressive";

struct Frame<'a> {
    node: NodeRef<'a, Node>,
    next_child: Option<NodeRef<'a, Node>>,
}

impl<'a> Frame<'a> {
    fn new(node: NodeRef<'a, Node>) -> Self {
        Self {
            node,
            next_child: node.first_child(),
        }
    }
}

/// Post-order iterator over the relevant elements below a root.
///
/// Finite, and not restartable: call [`walk_dom`] again for a fresh pass.
pub struct DomWalker<'a> {
    stack: Vec<Frame<'a>>,
    emitted: HashSet<NodeId>,
    navigation_skipped: usize,
}

impl DomWalker<'_> {
    /// Navigation subtrees passed over so far.
    pub fn navigation_skipped(&self) -> usize {
        self.navigation_skipped
    }
}

/// Start a walk at `root` (usually `html.tree.root()`).
pub fn walk_dom(root: NodeRef<'_, Node>) -> DomWalker<'_> {
    let mut stack = Vec::new();
    let mut navigation_skipped = 0;
    match visit(root) {
        Visit::Enter => {
            trace!("TRAVERSE: starting at {}", describe(root));
            stack.push(Frame::new(root));
        }
        Visit::Navigation => navigation_skipped += 1,
        Visit::Skip => {}
    }
    DomWalker {
        stack,
        emitted: HashSet::new(),
        navigation_skipped,
    }
}

/// [`walk_dom`] over a whole parsed document.
pub fn walk_document(html: &Html) -> DomWalker<'_> {
    walk_dom(html.tree.root())
}

impl<'a> Iterator for DomWalker<'a> {
    type Item = ElementRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;

            if let Some(child) = frame.next_child {
                frame.next_child = child.next_sibling();
                match visit(child) {
                    Visit::Enter => {
                        trace!("TRAVERSE: entering {}", describe(child));
                        self.stack.push(Frame::new(child));
                    }
                    Visit::Navigation => self.navigation_skipped += 1,
                    Visit::Skip => {}
                }
                continue;
            }

            // All children done; consider the node itself.
            let done = self.stack.pop()?;
            let Some(el) = ElementRef::wrap(done.node) else {
                continue;
            };
            let name = el.value().name();
            if RELEVANT_ELEMENTS.contains(&name) && self.emitted.insert(done.node.id()) {
                debug!("TRAVERSE: yielding <{}>", name);
                return Some(el);
            }
            trace!("TRAVERSE: passing over <{}>", name);
        }
    }
}

enum Visit {
    Enter,
    Skip,
    Navigation,
}

/// Element and document nodes are traversed; text, comments, doctypes and
/// processing instructions are not. The edit icon and navigation subtrees
/// are dropped outright.
fn visit(node: NodeRef<'_, Node>) -> Visit {
    match node.value() {
        Node::Element(e) => {
            if e.name() == "img" && e.attr("src").unwrap_or("").contains(EDIT_ICON_MARKER) {
                debug!("TRAVERSE: skipping Wikidata edit icon");
                return Visit::Skip;
            }
            if ElementRef::wrap(node).is_some_and(is_navigation) {
                debug!("TRAVERSE: skipping navigation <{}>", e.name());
                return Visit::Navigation;
            }
            Visit::Enter
        }
        Node::Document | Node::Fragment => Visit::Enter,
        _ => Visit::Skip,
    }
}

fn describe(node: NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Element(e) => format!("<{}>", e.name()),
        Node::Document => "#document".to_string(),
        Node::Fragment => "#fragment".to_string(),
        _ => "#node".to_string(),
    }
}
