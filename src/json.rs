//! Tolerant JSON layer.
//!
//! Vehicle info files, `.pc` manifests and `.jbeam` part files are hand-authored
//! and routinely carry `//` comments, `/* */` blocks and trailing commas. This
//! module strips those before handing the text to `serde_json`, and exposes the
//! resulting [`Node`] tree through the soft-fail accessors in [`NodeExt`].
//!
//! Objects keep their key insertion order (`serde_json` is built with
//! `preserve_order`), which matters for aggregate joins and for keeping a
//! rewritten file close to the original.

use serde_json::Value;
use thiserror::Error;

/// Generic JSON tree (object/array/string/number/boolean/null).
pub type Node = Value;

/// Errors produced while parsing tolerant JSON
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Unterminated block comment starting at byte {0}")]
    UnterminatedComment(usize),

    #[error("Invalid JSON: {0}")]
    Syntax(#[from] serde_json::Error),
}

/// Parse JSON text that may contain comments and trailing commas.
///
/// A leading UTF-8 byte-order mark is ignored.
pub fn parse(text: &str) -> Result<Node, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let cleaned = strip_relaxed_syntax(text)?;
    Ok(serde_json::from_str(&cleaned)?)
}

/// Serialize a node, two-space indented when `indented` is set.
pub fn serialize(node: &Node, indented: bool) -> String {
    if indented {
        format!("{:#}", node)
    } else {
        node.to_string()
    }
}

/// Remove comments and trailing commas that sit outside string literals.
///
/// Only a comma directly followed (modulo whitespace and comments) by `}` or `]`
/// is dropped; `[,]` or `{,}` are left for the strict parser to reject.
fn strip_relaxed_syntax(text: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None;
    let mut last_significant: Option<char> = None;

    while let Some((offset, c)) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, skipped) in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            '/' if matches!(chars.peek(), Some((_, '*'))) => {
                chars.next();
                let mut closed = false;
                let mut prev = '\0';
                for (_, skipped) in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        closed = true;
                        break;
                    }
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    prev = skipped;
                }
                if !closed {
                    return Err(ParseError::UnterminatedComment(offset));
                }
                out.push(' ');
            }
            c if c.is_whitespace() => out.push(c),
            ',' => {
                let droppable = !matches!(last_significant, Some('{' | '[' | ',') | None);
                pending_comma = droppable.then_some(out.len());
                out.push(',');
                last_significant = Some(',');
            }
            '}' | ']' => {
                if let Some(index) = pending_comma.take() {
                    out.remove(index);
                }
                out.push(c);
                last_significant = Some(c);
            }
            _ => {
                if c == '"' {
                    in_string = true;
                }
                pending_comma = None;
                out.push(c);
                last_significant = Some(c);
            }
        }
    }

    Ok(out)
}

/// Soft-fail accessors over a [`Node`].
///
/// Every getter answers "present with the right type" or `None`; nothing here
/// panics or errors on shape mismatches.
pub trait NodeExt {
    fn get_key(&self, key: &str) -> Option<&Node>;

    /// Follow a chain of object keys.
    fn get_path(&self, keys: &[&str]) -> Option<&Node>;

    /// Create or overwrite `key`. Existing keys keep their position.
    /// Returns `false` when the node is not an object.
    fn set_key(&mut self, key: &str, value: Node) -> bool;

    /// Remove `key`, keeping the order of the remaining keys.
    fn remove_key(&mut self, key: &str) -> Option<Node>;

    fn try_get_string(&self, key: &str) -> Option<&str>;

    fn try_get_f64(&self, key: &str) -> Option<f64>;

    /// Integer value, with floating-point numbers truncated toward zero.
    fn try_get_i32(&self, key: &str) -> Option<i32>;

    fn try_get_bool(&self, key: &str) -> Option<bool>;
}

impl NodeExt for Node {
    fn get_key(&self, key: &str) -> Option<&Node> {
        self.as_object()?.get(key)
    }

    fn get_path(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter().try_fold(self, |node, key| node.get_key(key))
    }

    fn set_key(&mut self, key: &str, value: Node) -> bool {
        match self.as_object_mut() {
            Some(map) => {
                map.insert(key.to_string(), value);
                true
            }
            None => false,
        }
    }

    fn remove_key(&mut self, key: &str) -> Option<Node> {
        self.as_object_mut()?.shift_remove(key)
    }

    fn try_get_string(&self, key: &str) -> Option<&str> {
        self.get_key(key)?.as_str()
    }

    fn try_get_f64(&self, key: &str) -> Option<f64> {
        self.get_key(key)?.as_f64()
    }

    fn try_get_i32(&self, key: &str) -> Option<i32> {
        node_as_i32(self.get_key(key)?)
    }

    fn try_get_bool(&self, key: &str) -> Option<bool> {
        self.get_key(key)?.as_bool()
    }
}

/// Coerce a numeric node to `i32`: exact integers first, then truncated floats.
pub fn node_as_i32(node: &Node) -> Option<i32> {
    if let Some(int) = node.as_i64().and_then(|i| i32::try_from(i).ok()) {
        return Some(int);
    }
    node.as_f64().map(|f| f.trunc() as i32)
}

/// Build a number node, writing whole values without a fractional part.
pub fn number_node(value: f64) -> Node {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Node::from(value as i64)
    } else {
        serde_json::Number::from_f64(value)
            .map(Node::Number)
            .unwrap_or(Node::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_line_and_block_comments() {
        let text = r#"{
            // leading comment
            "Name": "Sedan", /* inline */ "Value": 1200
        }"#;
        let node = parse(text).unwrap();
        assert_eq!(node.try_get_string("Name"), Some("Sedan"));
        assert_eq!(node.try_get_f64("Value"), Some(1200.0));
    }

    #[test]
    fn test_parse_trailing_commas() {
        let node = parse(r#"{"a": [1, 2, 3,], "b": {"c": true,},}"#).unwrap();
        assert_eq!(node["a"], json!([1, 2, 3]));
        assert_eq!(node.get_path(&["b", "c"]), Some(&json!(true)));
    }

    #[test]
    fn test_trailing_comma_before_comment() {
        let node = parse("{\"a\": 1, // done\n}").unwrap();
        assert_eq!(node, json!({"a": 1}));
    }

    #[test]
    fn test_comment_markers_inside_strings_survive() {
        let node = parse(r#"{"url": "http://example.com/*x*/", "q": "say \"hi\", ok"}"#).unwrap();
        assert_eq!(node.try_get_string("url"), Some("http://example.com/*x*/"));
        assert_eq!(node.try_get_string("q"), Some("say \"hi\", ok"));
    }

    #[test]
    fn test_leading_comma_is_rejected() {
        assert!(parse("[,]").is_err());
        assert!(parse("{,}").is_err());
    }

    #[test]
    fn test_missing_comma_is_rejected() {
        assert!(parse(r#"{"a": 1 "b": 2}"#).is_err());
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = parse("{ /* never closed").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedComment(2)));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let node = parse("\u{feff}{\"a\": 1}").unwrap();
        assert_eq!(node.try_get_i32("a"), Some(1));
    }

    #[test]
    fn test_set_key_preserves_sibling_order() {
        let mut node = parse(r#"{"first": 1, "second": 2, "third": 3}"#).unwrap();
        assert!(node.set_key("second", json!("changed")));
        assert!(node.set_key("fourth", json!(4)));
        let keys: Vec<_> = node.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["first", "second", "third", "fourth"]);
    }

    #[test]
    fn test_remove_key_preserves_order() {
        let mut node = json!({"a": 1, "b": 2, "c": 3});
        assert_eq!(node.remove_key("a"), Some(json!(1)));
        assert_eq!(node.remove_key("missing"), None);
        let keys: Vec<_> = node.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "c"]);
    }

    #[test]
    fn test_set_key_on_non_object() {
        let mut node = json!([1, 2]);
        assert!(!node.set_key("a", json!(1)));
    }

    #[test]
    fn test_typed_accessors_soft_fail() {
        let node = json!({"s": "text", "n": 12.9, "neg": -3.7, "b": true, "big": 5_000_000_000i64});
        assert_eq!(node.try_get_string("n"), None);
        assert_eq!(node.try_get_f64("s"), None);
        assert_eq!(node.try_get_i32("n"), Some(12));
        assert_eq!(node.try_get_i32("neg"), Some(-3));
        assert_eq!(node.try_get_i32("missing"), None);
        assert_eq!(node.try_get_bool("b"), Some(true));
        assert_eq!(node.try_get_bool("s"), None);
        assert_eq!(node.try_get_i32("big"), Some(i32::MAX));
    }

    #[test]
    fn test_serialize_indented() {
        let node = json!({"a": 1});
        assert_eq!(serialize(&node, true), "{\n  \"a\": 1\n}");
        assert_eq!(serialize(&node, false), "{\"a\":1}");
    }

    #[test]
    fn test_number_node() {
        assert_eq!(number_node(5000.0), json!(5000));
        assert_eq!(number_node(12.5), json!(12.5));
    }
}
