//! Read-only accessors over the parsed document tree.
//!
//! The tree is a [`scraper::Html`] arena; nodes are [`NodeRef`]s and
//! elements are [`ElementRef`]s. Two text views are used throughout the
//! pipeline and are defined once here:
//!
//! * [`stripped_text`]: every descendant text node trimmed, empty ones
//!   dropped, glued together with no separator.
//! * [`single_string`]: the text of a node that wraps exactly one string
//!   (possibly through a chain of single-child elements), `None` otherwise.
//!
//! Both take a `pruned` list of tag names whose subtrees are treated as if
//! they were not in the tree at all. That is how infobox cells ignore
//! `<style>`, `<sup>` and `<span>` without mutating the document.

use ego_tree::NodeRef;
use scraper::{ElementRef, Node};

/// Lowercase tag name of an element.
pub fn tag_name<'a>(el: ElementRef<'a>) -> &'a str {
    el.value().name()
}

/// Attribute value, or `""` when absent.
pub fn attr<'a>(el: ElementRef<'a>, name: &str) -> &'a str {
    el.value().attr(name).unwrap_or("")
}

/// Does the element carry `class` as one of its class tokens?
pub fn has_class(el: ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

/// Navigation chrome: `role="navigation"`, `.toc`, `.navigation-box`.
pub fn is_navigation(el: ElementRef<'_>) -> bool {
    attr(el, "role") == "navigation" || has_class(el, "toc") || has_class(el, "navigation-box")
}

/// Heading level for `h1`…`h6`.
pub fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn is_pruned(node: NodeRef<'_, Node>, pruned: &[&str]) -> bool {
    match node.value() {
        Node::Element(e) => pruned.contains(&e.name()),
        _ => false,
    }
}

/// Children of `node` that survive pruning, in document order.
pub fn visible_children<'a, 'p>(
    node: NodeRef<'a, Node>,
    pruned: &'p [&'p str],
) -> impl Iterator<Item = NodeRef<'a, Node>> + 'p
where
    'a: 'p,
{
    node.children().filter(move |c| !is_pruned(*c, pruned))
}

/// Descendant elements (excluding `el` itself) that survive pruning, in
/// document order. A pruned element hides its whole subtree.
pub fn visible_descendants<'a>(el: ElementRef<'a>, pruned: &[&str]) -> Vec<ElementRef<'a>> {
    let mut out = Vec::new();
    collect_descendants(*el, pruned, &mut out);
    out
}

fn collect_descendants<'a>(node: NodeRef<'a, Node>, pruned: &[&str], out: &mut Vec<ElementRef<'a>>) {
    for child in visible_children(node, pruned) {
        if let Some(el) = ElementRef::wrap(child) {
            out.push(el);
            collect_descendants(child, pruned, out);
        }
    }
}

/// First descendant element named `tag` (and carrying `class`, if given).
pub fn find_descendant<'a>(el: ElementRef<'a>, tag: &str, class: Option<&str>) -> Option<ElementRef<'a>> {
    el.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|e| tag_name(*e) == tag && class.is_none_or(|c| has_class(*e, c)))
}

/// Every descendant text node, trimmed, concatenated without separators.
pub fn stripped_text(node: NodeRef<'_, Node>, pruned: &[&str]) -> String {
    let mut out = String::new();
    push_text(node, pruned, true, &mut out);
    out
}

/// Every descendant text node verbatim, concatenated.
pub fn full_text(node: NodeRef<'_, Node>, pruned: &[&str]) -> String {
    let mut out = String::new();
    push_text(node, pruned, false, &mut out);
    out
}

fn push_text(node: NodeRef<'_, Node>, pruned: &[&str], strip: bool, out: &mut String) {
    for child in visible_children(node, pruned) {
        match child.value() {
            Node::Text(t) if strip => out.push_str(t.trim()),
            Node::Text(t) => out.push_str(t),
            Node::Element(_) => push_text(child, pruned, strip, out),
            _ => {}
        }
    }
}

/// The lone string a node wraps, if any.
///
/// A text node is its own string. An element with exactly one (unpruned)
/// child has that child's string. Everything else, including comments and
/// elements with zero or several children, has none.
pub fn single_string<'a>(node: NodeRef<'a, Node>, pruned: &[&str]) -> Option<&'a str> {
    match node.value() {
        Node::Text(t) => Some(&**t),
        Node::Element(_) => {
            let mut children = visible_children(node, pruned);
            let only = children.next()?;
            if children.next().is_some() {
                return None;
            }
            single_string(only, pruned)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(html: &'a Html, tag: &str) -> ElementRef<'a> {
        html.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|e| tag_name(*e) == tag)
            .unwrap()
    }

    #[test]
    fn stripped_text_glues_trimmed_strings() {
        let html = Html::parse_fragment("<p> Born <b> 1900 </b>\n in <i>Paris</i> </p>");
        let p = first(&html, "p");
        assert_eq!(stripped_text(*p, &[]), "Born1900inParis");
    }

    #[test]
    fn full_text_keeps_whitespace() {
        let html = Html::parse_fragment("<p>a <b>b</b> c</p>");
        assert_eq!(full_text(*first(&html, "p"), &[]), "a b c");
    }

    #[test]
    fn pruned_subtrees_are_invisible() {
        let html = Html::parse_fragment("<p>Value<sup>[1]</sup><span>hidden</span></p>");
        let p = first(&html, "p");
        assert_eq!(stripped_text(*p, &["sup", "span"]), "Value");
        assert_eq!(single_string(*p, &["sup", "span"]), Some("Value"));
        assert_eq!(single_string(*p, &[]), None);
    }

    #[test]
    fn single_string_follows_single_child_chain() {
        let html = Html::parse_fragment("<div><i><b>deep</b></i></div>");
        assert_eq!(single_string(*first(&html, "div"), &[]), Some("deep"));
    }

    #[test]
    fn single_string_none_for_empty_or_mixed() {
        let html = Html::parse_fragment("<div><p></p><span>a<b>c</b></span></div>");
        assert_eq!(single_string(*first(&html, "p"), &[]), None);
        assert_eq!(single_string(*first(&html, "span"), &[]), None);
    }

    #[test]
    fn class_and_attr_helpers() {
        let html = Html::parse_fragment(
            r#"<table><tr><td class="infobox-data wide" colspan="2">x</td></tr></table>"#,
        );
        let td = first(&html, "td");
        assert!(has_class(td, "infobox-data"));
        assert!(!has_class(td, "infobox"));
        assert_eq!(attr(td, "colspan"), "2");
        assert_eq!(attr(td, "missing"), "");
    }

    #[test]
    fn find_descendant_skips_self() {
        let html = Html::parse_fragment(r#"<div class="a"><div class="a" id="inner"></div></div>"#);
        let outer = first(&html, "div");
        let inner = find_descendant(outer, "div", Some("a")).unwrap();
        assert_eq!(attr(inner, "id"), "inner");
    }

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("p"), None);
    }
}
