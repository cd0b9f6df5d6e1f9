//! A small CSS selector subset.
//!
//! Supported: type selectors and `*`, `#id`, `.class`, attribute selectors
//! (`[attr]`, `=`, `^=`, `$=`, `*=`, `~=`, quoted or bare values), the
//! descendant and `>` child combinators, and comma-separated lists.

use std::iter::Peekable;
use std::str::CharIndices;

use thiserror::Error;

use crate::element::{Document, NodeId};

/// Errors from [`Selector::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unterminated attribute selector starting at offset {0}")]
    UnterminatedAttribute(usize),

    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    #[error("combinator without a selector after it")]
    DanglingCombinator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals,
    Prefix,
    Suffix,
    Contains,
    Word,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatcher {
    name: String,
    op: AttrOp,
    value: String,
}

impl AttrMatcher {
    fn matches(&self, actual: Option<&str>) -> bool {
        let Some(actual) = actual else { return false };
        let value = self.value.as_str();
        match self.op {
            AttrOp::Exists => true,
            AttrOp::Equals => actual == value,
            AttrOp::Prefix => !value.is_empty() && actual.starts_with(value),
            AttrOp::Suffix => !value.is_empty() && actual.ends_with(value),
            AttrOp::Contains => !value.is_empty() && actual.contains(value),
            AttrOp::Word => actual.split_whitespace().any(|w| w == value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatcher>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        let Some(node) = doc.node(id) else { return false };
        if let Some(tag) = &self.tag {
            if tag != "*" && !node.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(want) = &self.id {
            if node.id.as_deref() != Some(want.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| node.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|a| a.matches(attr_value(node, &a.name)))
    }
}

/// `id` and `class` live outside the attribute map but are matchable as attributes.
fn attr_value<'a>(node: &'a crate::element::Node, name: &str) -> Option<&'a str> {
    match name {
        "id" => node.id.as_deref(),
        _ => node.attr(name),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.match_from(doc, self.compounds.len() - 1, id)
    }

    fn match_from(&self, doc: &Document, index: usize, id: NodeId) -> bool {
        if !self.compounds[index].matches(doc, id) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Descendant => doc
                .ancestors(id)
                .any(|a| self.match_from(doc, index - 1, a)),
            Combinator::Child => doc
                .parent(id)
                .is_some_and(|p| self.match_from(doc, index - 1, p)),
        }
    }
}

/// A parsed selector list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        Parser::new(input).parse_list()
    }

    pub fn matches(&self, doc: &Document, id: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, id))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.char_indices().peekable(),
        }
    }

    fn skip_ws(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.next_if(|(_, c)| c.is_whitespace()).is_some() {
            skipped = true;
        }
        skipped
    }

    fn parse_list(mut self) -> Result<Selector, SelectorError> {
        let mut alternatives = Vec::new();
        loop {
            self.skip_ws();
            let complex = self.parse_complex()?;
            alternatives.push(complex);
            self.skip_ws();
            match self.chars.next() {
                None => break,
                Some((_, ',')) => continue,
                Some((offset, ch)) => return Err(SelectorError::UnexpectedChar { ch, offset }),
            }
        }
        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let first = self.parse_compound()?;
        if first.is_empty() {
            return Err(match self.chars.peek() {
                Some(&(offset, ch)) if ch != ',' => SelectorError::UnexpectedChar { ch, offset },
                _ => SelectorError::Empty,
            });
        }
        let mut complex = Complex {
            compounds: vec![first],
            combinators: Vec::new(),
        };

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.chars.peek().copied() {
                None | Some((_, ',')) => break,
                Some((_, '>')) => {
                    self.chars.next();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some((offset, ch)) => return Err(SelectorError::UnexpectedChar { ch, offset }),
            };
            let next = self.parse_compound()?;
            if next.is_empty() {
                return Err(match self.chars.peek() {
                    Some(&(offset, ch)) if ch != ',' => SelectorError::UnexpectedChar { ch, offset },
                    _ => SelectorError::DanglingCombinator,
                });
            }
            complex.combinators.push(combinator);
            complex.compounds.push(next);
        }
        Ok(complex)
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        if self.chars.next_if(|(_, c)| *c == '*').is_some() {
            compound.tag = Some("*".to_string());
        } else {
            let tag = self.ident();
            if !tag.is_empty() {
                compound.tag = Some(tag.to_ascii_lowercase());
            }
        }

        loop {
            match self.chars.peek().copied() {
                Some((offset, '#')) => {
                    self.chars.next();
                    let id = self.ident();
                    if id.is_empty() {
                        return Err(self.unexpected_or(offset, '#'));
                    }
                    compound.id = Some(id);
                }
                Some((offset, '.')) => {
                    self.chars.next();
                    let class = self.ident();
                    if class.is_empty() {
                        return Err(self.unexpected_or(offset, '.'));
                    }
                    compound.classes.push(class);
                }
                Some((offset, '[')) => {
                    self.chars.next();
                    compound.attrs.push(self.attribute(offset)?);
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    fn unexpected_or(&mut self, offset: usize, ch: char) -> SelectorError {
        match self.chars.peek() {
            Some(&(offset, ch)) => SelectorError::UnexpectedChar { ch, offset },
            None => SelectorError::UnexpectedChar { ch, offset },
        }
    }

    fn attribute(&mut self, start: usize) -> Result<AttrMatcher, SelectorError> {
        self.skip_ws();
        let name = self.ident();
        if name.is_empty() {
            return Err(match self.chars.peek() {
                Some(&(offset, ch)) => SelectorError::UnexpectedChar { ch, offset },
                None => SelectorError::UnterminatedAttribute(start),
            });
        }
        self.skip_ws();

        let op = match self.chars.next() {
            Some((_, ']')) => {
                return Ok(AttrMatcher {
                    name,
                    op: AttrOp::Exists,
                    value: String::new(),
                })
            }
            Some((_, '=')) => AttrOp::Equals,
            Some((_, prefix @ ('^' | '$' | '*' | '~'))) => {
                match self.chars.next() {
                    Some((_, '=')) => {}
                    Some((offset, ch)) => return Err(SelectorError::UnexpectedChar { ch, offset }),
                    None => return Err(SelectorError::UnterminatedAttribute(start)),
                }
                match prefix {
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    '*' => AttrOp::Contains,
                    _ => AttrOp::Word,
                }
            }
            Some((offset, ch)) => return Err(SelectorError::UnexpectedChar { ch, offset }),
            None => return Err(SelectorError::UnterminatedAttribute(start)),
        };

        self.skip_ws();
        let value = match self.chars.peek().copied() {
            Some((offset, quote @ ('"' | '\''))) => {
                self.chars.next();
                let mut value = String::new();
                loop {
                    match self.chars.next() {
                        Some((_, c)) if c == quote => break,
                        Some((_, c)) => value.push(c),
                        None => return Err(SelectorError::UnterminatedString(offset)),
                    }
                }
                value
            }
            _ => self.ident(),
        };
        self.skip_ws();
        match self.chars.next() {
            Some((_, ']')) => Ok(AttrMatcher { name, op, value }),
            Some((offset, ch)) => Err(SelectorError::UnexpectedChar { ch, offset }),
            None => Err(SelectorError::UnterminatedAttribute(start)),
        }
    }

    fn ident(&mut self) -> String {
        let mut out = String::new();
        while let Some((_, c)) = self
            .chars
            .next_if(|(_, c)| c.is_alphanumeric() || *c == '-' || *c == '_')
        {
            out.push(c);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_operators() {
        let sel = Selector::parse(r##"a[href^="#"]"##).unwrap();
        let attr = &sel.alternatives[0].compounds[0].attrs[0];
        assert_eq!(attr.op, AttrOp::Prefix);
        assert_eq!(attr.value, "#");
    }

    #[test]
    fn trailing_combinator_is_rejected() {
        assert_eq!(Selector::parse("ul >"), Err(SelectorError::DanglingCombinator));
    }
}
