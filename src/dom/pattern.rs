use crate::dom::backend::DomBackend;
use crate::error::{RankerError, Result};

/// A compound simple selector: tag, `#id`, `.class`, and `[attr]` /
/// `[attr=value]` parts, all of which must match one element.
///
/// Combinators are not supported; scoped queries already walk descendants,
/// so `".tray .card"`-style selectors are unnecessary here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    /// Required tag name, if any (matched ASCII case-insensitively)
    pub tag: Option<String>,

    /// Required id attribute value
    pub id: Option<String>,

    /// Required classes (all must be present)
    pub classes: Vec<String>,

    /// Required attributes; `None` value means presence-only
    pub attrs: Vec<(String, Option<String>)>,
}

impl Pattern {
    /// Parse a selector string into a `Pattern`.
    ///
    /// Syntax errors (empty input, empty class/id name, unterminated or
    /// empty attribute brackets, embedded whitespace, combinator
    /// characters in a name) are reported as [`RankerError::Pattern`] so
    /// cascade iteration can skip the bad entry and continue.
    pub fn parse(input: &str) -> Result<Self> {
        let src = input.trim();
        if src.is_empty() {
            return Err(RankerError::pattern(input, "empty selector"));
        }
        if src.contains(char::is_whitespace) {
            return Err(RankerError::pattern(input, "combinators are not supported"));
        }

        let mut pattern = Pattern {
            tag: None,
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
        };

        let bytes = src.as_bytes();
        let mut pos = 0;

        // Leading tag name, if the selector doesn't start with a sigil
        if !matches!(bytes[0], b'.' | b'#' | b'[') {
            let start = pos;
            while pos < bytes.len() && !matches!(bytes[pos], b'.' | b'#' | b'[') {
                pos += 1;
            }
            let tag = &src[start..pos];
            if !is_name(tag) {
                return Err(RankerError::pattern(input, "invalid character in tag name"));
            }
            pattern.tag = Some(tag.to_string());
        }

        while pos < bytes.len() {
            match bytes[pos] {
                b'.' | b'#' => {
                    let sigil = bytes[pos];
                    pos += 1;
                    let start = pos;
                    while pos < bytes.len() && !matches!(bytes[pos], b'.' | b'#' | b'[') {
                        pos += 1;
                    }
                    let name = &src[start..pos];
                    if name.is_empty() {
                        return Err(RankerError::pattern(input, "empty class or id name"));
                    }
                    if !is_name(name) {
                        return Err(RankerError::pattern(
                            input,
                            "invalid character in class or id name",
                        ));
                    }
                    if sigil == b'.' {
                        pattern.classes.push(name.to_string());
                    } else {
                        pattern.id = Some(name.to_string());
                    }
                }
                b'[' => {
                    let close = src[pos..]
                        .find(']')
                        .map(|i| pos + i)
                        .ok_or_else(|| {
                            RankerError::pattern(input, "unterminated attribute selector")
                        })?;
                    let body = &src[pos + 1..close];
                    if body.is_empty() {
                        return Err(RankerError::pattern(input, "empty attribute selector"));
                    }
                    match body.split_once('=') {
                        Some((name, value)) => {
                            if name.is_empty() {
                                return Err(RankerError::pattern(input, "empty attribute name"));
                            }
                            let value = value.trim_matches(|c| c == '"' || c == '\'');
                            pattern
                                .attrs
                                .push((name.to_string(), Some(value.to_string())));
                        }
                        None => pattern.attrs.push((body.to_string(), None)),
                    }
                    pos = close + 1;
                }
                _ => {
                    return Err(RankerError::pattern(input, "unexpected character"));
                }
            }
        }

        Ok(pattern)
    }

    /// Test whether an element satisfies every part of the pattern
    pub fn matches<B: DomBackend>(&self, dom: &B, node: B::Node) -> bool {
        if let Some(tag) = &self.tag {
            if !dom.tag(node).eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if dom.attr(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let classes = dom.classes(node);
            if !self
                .classes
                .iter()
                .all(|c| classes.iter().any(|have| have == c))
            {
                return false;
            }
        }

        for (name, expected) in &self.attrs {
            match (dom.attr(node, name), expected) {
                (Some(actual), Some(expected)) if actual == *expected => {}
                (Some(_), None) => {}
                _ => return false,
            }
        }

        true
    }
}

/// Identifier check for tag, class, and id names. Keeps combinator
/// characters like `>` and `+` from being swallowed into a name that could
/// never match anything.
fn is_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Collect every descendant of `scope` matching `pattern`, depth-first in
/// document order. The scope element itself is not included.
pub fn query<B: DomBackend>(dom: &B, scope: B::Node, pattern: &Pattern) -> Vec<B::Node> {
    let mut out = Vec::new();
    for child in dom.children(scope) {
        collect(dom, child, pattern, &mut out);
    }
    out
}

/// Like [`query`], but the scope element itself participates in matching.
pub fn query_inclusive<B: DomBackend>(dom: &B, scope: B::Node, pattern: &Pattern) -> Vec<B::Node> {
    let mut out = Vec::new();
    collect(dom, scope, pattern, &mut out);
    out
}

fn collect<B: DomBackend>(dom: &B, node: B::Node, pattern: &Pattern, out: &mut Vec<B::Node>) {
    if pattern.matches(dom, node) {
        out.push(node);
    }
    for child in dom.children(node) {
        collect(dom, child, pattern, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_parse_tag_only() {
        let p = Pattern::parse("div").unwrap();
        assert_eq!(p.tag.as_deref(), Some("div"));
        assert!(p.classes.is_empty());
        assert!(p.attrs.is_empty());
    }

    #[test]
    fn test_parse_class_chain() {
        let p = Pattern::parse(".tray-card.active").unwrap();
        assert_eq!(p.tag, None);
        assert_eq!(p.classes, vec!["tray-card", "active"]);
    }

    #[test]
    fn test_parse_compound() {
        let p = Pattern::parse("div.card[data-rating=high]#main").unwrap();
        assert_eq!(p.tag.as_deref(), Some("div"));
        assert_eq!(p.classes, vec!["card"]);
        assert_eq!(p.id.as_deref(), Some("main"));
        assert_eq!(
            p.attrs,
            vec![("data-rating".to_string(), Some("high".to_string()))]
        );
    }

    #[test]
    fn test_parse_attr_presence() {
        let p = Pattern::parse("[data-slide]").unwrap();
        assert_eq!(p.attrs, vec![("data-slide".to_string(), None)]);
    }

    #[test]
    fn test_parse_quoted_attr_value() {
        let p = Pattern::parse("[role=\"listitem\"]").unwrap();
        assert_eq!(
            p.attrs,
            vec![("role".to_string(), Some("listitem".to_string()))]
        );
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Pattern::parse("").is_err());
        assert!(Pattern::parse("   ").is_err());
        assert!(Pattern::parse(".").is_err());
        assert!(Pattern::parse("div[").is_err());
        assert!(Pattern::parse("div[]").is_err());
        assert!(Pattern::parse(".a .b").is_err());
    }

    #[test]
    fn test_parse_rejects_combinator_characters() {
        assert!(Pattern::parse("div>span").is_err());
        assert!(Pattern::parse(".a>b").is_err());
        assert!(Pattern::parse("#a+b").is_err());
        assert!(Pattern::parse("ul~li").is_err());
    }

    #[test]
    fn test_matches_and_query() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let tray = doc.append(root, "section");
        doc.set_attr(tray, "class", "tray carousel");
        let a = doc.append(tray, "div");
        doc.set_attr(a, "class", "tray-card");
        let b = doc.append(tray, "div");
        doc.set_attr(b, "class", "tray-card featured");
        let other = doc.append(tray, "span");
        doc.set_attr(other, "class", "chevron");

        let cards = query(&doc, root, &Pattern::parse(".tray-card").unwrap());
        assert_eq!(cards, vec![a, b]);

        let featured = query(&doc, root, &Pattern::parse("div.tray-card.featured").unwrap());
        assert_eq!(featured, vec![b]);

        // Scope itself is excluded from a scoped query
        let trays = query(&doc, tray, &Pattern::parse(".tray").unwrap());
        assert!(trays.is_empty());
        let trays = query_inclusive(&doc, tray, &Pattern::parse(".tray").unwrap());
        assert_eq!(trays, vec![tray]);
    }

    #[test]
    fn test_query_document_order() {
        let mut doc = Document::new("body");
        let root = doc.root();
        let outer = doc.append(root, "div");
        doc.set_attr(outer, "class", "x");
        let inner = doc.append(outer, "div");
        doc.set_attr(inner, "class", "x");
        let sibling = doc.append(root, "div");
        doc.set_attr(sibling, "class", "x");

        let hits = query(&doc, root, &Pattern::parse(".x").unwrap());
        assert_eq!(hits, vec![outer, inner, sibling]);
    }
}
