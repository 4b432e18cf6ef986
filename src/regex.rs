//! Regular expression search directly over suffix-array ranges.
//!
//! A pattern compiles to a small AST (literal / concat / union / star /
//! char-class / dot). Matching walks the AST right to left, extending
//! [`SuccinctFile::continue_bwd_search`] ranges the same way a literal
//! backward search does -- a regex match is just many literal backward
//! searches explored together, one per alternative/repetition-count.
//!
//! `*`/`+`/`?` use greedy, non-overlapping semantics: among candidate
//! matches starting at the same text offset, the longest wins; among
//! matches at different offsets, scanning left to right skips any
//! candidate that starts inside an already-reported match (the same
//! policy as `Regex::find_iter` in the `regex` crate).

use crate::error::{RegexParseError, Result};
use crate::succinct_file::{SaRange, SuccinctFile};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Atom {
    Literal(u8),
    Dot,
    Class { ranges: Vec<(u8, u8)>, negate: bool },
}

impl Atom {
    fn matches(&self, alphabet_byte: u8) -> bool {
        match self {
            Atom::Literal(b) => *b == alphabet_byte,
            Atom::Dot => true,
            Atom::Class { ranges, negate } => {
                let hit = ranges.iter().any(|&(lo, hi)| lo <= alphabet_byte && alphabet_byte <= hi);
                hit != *negate
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Atom(Atom),
    Concat(Vec<Node>),
    Union(Vec<Node>),
    Star(Box<Node>),
}

/// A compiled regular expression, ready to search against a [`SuccinctFile`].
#[derive(Debug, Clone)]
pub struct Regex {
    root: Node,
}

/// A single non-overlapping match: `text[start..start + len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub len: usize,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self> {
        let root = Parser::new(pattern).parse_alternation()?;
        Ok(Self { root })
    }

    /// All non-overlapping, leftmost-greedy matches in `index`'s text.
    pub fn find_all(&self, index: &SuccinctFile) -> Vec<Match> {
        let full = index.bwd_search(&[]);
        let candidates = eval(index, &self.root, &[(full, 0)]);

        let mut by_start: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
        for (range, len) in candidates {
            for start in range_starts(index, range, len) {
                let entry = by_start.entry(start).or_insert(0);
                if len > *entry {
                    *entry = len;
                }
            }
        }

        let mut matches: Vec<Match> = by_start
            .into_iter()
            .map(|(start, len)| Match { start, len })
            .collect();
        matches.sort_by_key(|m| m.start);

        let mut result = Vec::new();
        let mut next_allowed = 0usize;
        for m in matches {
            if m.start >= next_allowed {
                next_allowed = m.start + m.len.max(1);
                result.push(m);
            }
        }
        result
    }
}

fn range_starts(index: &SuccinctFile, range: SaRange, _len: usize) -> Vec<usize> {
    // Backward search never changes what a row "means": SA[i] is the start
    // offset of the occurrence from the very first (rightmost) character
    // matched, through every further character prepended to its left.
    range.map(|i| index.lookup_sa(i)).collect()
}

/// Extends every `(range, matched_len)` pair in `input` leftward by `node`.
fn eval(index: &SuccinctFile, node: &Node, input: &[(SaRange, usize)]) -> Vec<(SaRange, usize)> {
    match node {
        Node::Atom(atom) => {
            let mut out = Vec::new();
            for (range, len) in input {
                for &byte in index.alphabet() {
                    if !atom.matches(byte) {
                        continue;
                    }
                    let next = index.continue_bwd_search(range.clone(), byte);
                    if next.start < next.end {
                        out.push((next, len + 1));
                    }
                }
            }
            out
        }
        Node::Concat(parts) => {
            let mut cur: Vec<(SaRange, usize)> = input.to_vec();
            for part in parts.iter().rev() {
                cur = eval(index, part, &cur);
            }
            cur
        }
        Node::Union(alts) => alts.iter().flat_map(|alt| eval(index, alt, input)).collect(),
        Node::Star(inner) => {
            // repetition count 0 always survives unchanged. Each further
            // repetition must consume at least one byte somewhere in the
            // text, so the number of rounds is bounded by its length --
            // guards against a zero-width `inner` (e.g. `(a?)*`) looping.
            let mut out = input.to_vec();
            let mut frontier = input.to_vec();
            for _ in 0..=index.len() {
                let next = eval(index, inner, &frontier);
                if next.is_empty() {
                    break;
                }
                out.extend(next.iter().cloned());
                frontier = next;
            }
            out
        }
    }
}

/// Recursive-descent parser producing a [`Node`] tree.
struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            bytes: pattern.as_bytes(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> RegexParseError {
        RegexParseError {
            position: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn parse_alternation(&mut self) -> Result<Node> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some(b'|') {
            self.bump();
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.pop().unwrap()
        } else {
            Node::Union(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Node> {
        let mut parts = Vec::new();
        while let Some(b) = self.peek() {
            if b == b'|' || b == b')' {
                break;
            }
            parts.push(self.parse_repeat()?);
        }
        Ok(match parts.len() {
            0 => Node::Concat(Vec::new()),
            1 => parts.pop().unwrap(),
            _ => Node::Concat(parts),
        })
    }

    fn parse_repeat(&mut self) -> Result<Node> {
        let atom = self.parse_atom()?;
        match self.peek() {
            Some(b'*') => {
                self.bump();
                Ok(Node::Star(Box::new(atom)))
            }
            Some(b'+') => {
                self.bump();
                Ok(Node::Concat(vec![atom.clone(), Node::Star(Box::new(atom))]))
            }
            Some(b'?') => {
                self.bump();
                Ok(Node::Union(vec![atom, Node::Concat(Vec::new())]))
            }
            _ => Ok(atom),
        }
    }

    fn parse_atom(&mut self) -> Result<Node> {
        match self.bump() {
            Some(b'(') => {
                let inner = self.parse_alternation()?;
                match self.bump() {
                    Some(b')') => Ok(inner),
                    _ => Err(self.error("unterminated group").into()),
                }
            }
            Some(b'.') => Ok(Node::Atom(Atom::Dot)),
            Some(b'[') => self.parse_class(),
            Some(b'\\') => match self.bump() {
                Some(c) => Ok(Node::Atom(Atom::Literal(c))),
                None => Err(self.error("dangling escape").into()),
            },
            Some(b) => Ok(Node::Atom(Atom::Literal(b))),
            None => Err(self.error("expected an atom").into()),
        }
    }

    fn parse_class(&mut self) -> Result<Node> {
        let negate = if self.peek() == Some(b'^') {
            self.bump();
            true
        } else {
            false
        };

        let mut ranges = Vec::new();
        let mut saw_any = false;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated character class").into()),
                Some(b']') if saw_any => {
                    self.bump();
                    break;
                }
                _ => {
                    let lo = self.class_char()?;
                    saw_any = true;
                    if self.peek() == Some(b'-') && self.bytes.get(self.pos + 1) != Some(&b']') {
                        self.bump();
                        let hi = self.class_char()?;
                        ranges.push((lo, hi));
                    } else {
                        ranges.push((lo, lo));
                    }
                }
            }
        }

        Ok(Node::Atom(Atom::Class { ranges, negate }))
    }

    fn class_char(&mut self) -> Result<u8> {
        match self.bump() {
            Some(b'\\') => self.bump().ok_or_else(|| self.error("dangling escape").into()),
            Some(b) => Ok(b),
            None => Err(self.error("expected a character class member").into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, text: &[u8]) -> Vec<(usize, usize)> {
        let index = SuccinctFile::build_with_rate(text, 4).unwrap();
        let regex = Regex::new(pattern).unwrap();
        regex
            .find_all(&index)
            .into_iter()
            .map(|m| (m.start, m.len))
            .collect()
    }

    #[test]
    fn banana_an_plus() {
        assert_eq!(matches("an+", b"banana"), vec![(1, 2), (3, 2)]);
    }

    #[test]
    fn literal_match() {
        assert_eq!(matches("issi", b"mississippi"), vec![(1, 4), (4, 4)]);
    }

    #[test]
    fn single_atom_pattern_does_not_drop_matches() {
        // the whole-range identity used to start at 0..n instead of
        // 0..total_rows(), which silently dropped whichever occurrence
        // landed in the excluded row.
        assert_eq!(
            matches("i", b"mississippi"),
            vec![(1, 1), (4, 1), (7, 1), (10, 1)]
        );
    }

    #[test]
    fn dot_matches_any_byte() {
        assert_eq!(matches("a.a", b"banana"), vec![(1, 3), (3, 3)]);
    }

    #[test]
    fn char_class_and_negation() {
        // runs of [ab]: "ba" at 0, lone "a" at 3 and 5 (the 'n's break the run)
        assert_eq!(matches("[ab]+", b"banana"), vec![(0, 2), (3, 1), (5, 1)]);
        assert_eq!(matches("[^n]+", b"banana"), vec![(0, 2), (3, 1), (5, 1)]);
    }

    #[test]
    fn alternation() {
        assert_eq!(matches("issi|ippi", b"mississippi"), vec![(1, 4), (4, 4), (7, 4)]);
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(matches("xyz", b"mississippi").is_empty());
    }

    #[test]
    fn invalid_pattern_errors() {
        assert!(Regex::new("(abc").is_err());
        assert!(Regex::new("[abc").is_err());
    }
}
