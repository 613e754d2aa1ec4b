//! Recursive-descent parser for the serialized markup subset
//!
//! Accepts what [`crate::serializer`] produces: elements with double-quoted
//! attributes, a `class` attribute split into class names, and
//! entity-escaped text (`&amp; &lt; &gt; &quot;`). Node IDs are assigned
//! from the surface's [`IdGenerator`] as elements are built.

use crate::error::{ParseError, ParseResult};
use crate::id_generator::IdGenerator;
use crate::node::{Element, Node};

/// Parse a markup fragment into a list of sibling nodes
pub fn parse(source: &str, ids: &mut IdGenerator) -> ParseResult<Vec<Node>> {
    let mut parser = Parser {
        source,
        pos: 0,
        ids,
    };
    parser.parse_nodes(None)
}

struct Parser<'src, 'ids> {
    source: &'src str,
    pos: usize,
    ids: &'ids mut IdGenerator,
}

impl Parser<'_, '_> {
    fn parse_nodes(&mut self, closing: Option<&str>) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        loop {
            if self.at_end() {
                return match closing {
                    Some(_) => Err(ParseError::UnexpectedEof(self.pos)),
                    None => Ok(nodes),
                };
            }
            if self.eat_str("</") {
                let at = self.pos;
                let tag = self.ident()?;
                self.expect('>')?;
                return match closing {
                    Some(expected) if expected == tag => Ok(nodes),
                    Some(expected) => Err(ParseError::MismatchedClose {
                        found: tag,
                        expected: expected.to_string(),
                        at,
                    }),
                    None => Err(ParseError::UnexpectedClose { tag, at }),
                };
            }
            if self.peek() == Some('<') {
                nodes.push(Node::Element(self.parse_element()?));
            } else {
                nodes.push(Node::Text(self.parse_text()));
            }
        }
    }

    fn parse_element(&mut self) -> ParseResult<Element> {
        self.expect('<')?;
        let tag = self.ident()?;
        let mut element = Element::new(tag.clone(), self.ids.new_id());

        loop {
            self.skip_whitespace();
            if self.eat_str("/>") {
                return Ok(element);
            }
            if self.eat_str(">") {
                break;
            }
            let name = self.ident()?;
            self.expect('=')?;
            self.expect('"')?;
            let value = self.quoted_value()?;
            if name == "class" {
                element.class_names = value.split_whitespace().map(str::to_string).collect();
            } else {
                element.attributes.push((name, value));
            }
        }

        element.children = self.parse_nodes(Some(&tag))?;
        Ok(element)
    }

    /// Text run up to the next tag, with entities decoded
    fn parse_text(&mut self) -> String {
        let rest = &self.source[self.pos..];
        let end = rest.find('<').unwrap_or(rest.len());
        let raw = &rest[..end];
        self.pos += end;
        unescape(raw)
    }

    fn quoted_value(&mut self) -> ParseResult<String> {
        let start = self.pos;
        let rest = &self.source[self.pos..];
        let Some(end) = rest.find('"') else {
            return Err(ParseError::UnterminatedValue(start));
        };
        let raw = &rest[..end];
        self.pos += end + 1;
        Ok(unescape(raw))
    }

    /// Tag or attribute name: leading ASCII letter, then `[a-zA-Z0-9_.:-]`
    fn ident(&mut self) -> ParseResult<String> {
        let start = self.pos;
        match self.peek() {
            Some(ch) if ch.is_ascii_alphabetic() => {}
            Some(ch) => return Err(ParseError::UnexpectedChar { ch, at: self.pos }),
            None => return Err(ParseError::UnexpectedEof(self.pos)),
        }
        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | ':' | '-') {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn expect(&mut self, expected: char) -> ParseResult<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.pos += ch.len_utf8();
                Ok(())
            }
            Some(ch) => Err(ParseError::UnexpectedChar { ch, at: self.pos }),
            None => Err(ParseError::UnexpectedEof(self.pos)),
        }
    }

    fn eat_str(&mut self, prefix: &str) -> bool {
        if self.source[self.pos..].starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_whitespace() {
                self.pos += ch.len_utf8();
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }
}

/// Decode the serializer's entity set; a bare `&` passes through untouched
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(at) = rest.find('&') {
        out.push_str(&rest[..at]);
        rest = &rest[at..];
        let mut decoded = None;
        for (entity, ch) in [("&amp;", '&'), ("&lt;", '<'), ("&gt;", '>'), ("&quot;", '"')] {
            if let Some(tail) = rest.strip_prefix(entity) {
                decoded = Some((ch, tail));
                break;
            }
        }
        match decoded {
            Some((ch, tail)) => {
                out.push(ch);
                rest = tail;
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
