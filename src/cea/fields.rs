//! Labelled-number scanning for CEA case blocks.
//!
//! A [`Pattern`] is a literal label (optionally split into pieces separated
//! by whitespace or by arbitrary text on the same line) followed by one or
//! more numbers. Matching is tolerant: the first occurrence of the label
//! whose tail and numbers all line up wins, later occurrences are tried if
//! an earlier one does not.

/// Separator between two pieces of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    /// Zero or more whitespace characters.
    Any,
    /// At least one whitespace character.
    Some,
    /// Any run of characters that does not cross a newline (shortest first).
    Line,
}

/// Character class of a numeric token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Num {
    /// Digits and decimal points.
    Unsigned,
    /// Digits, decimal points and minus signs.
    Signed,
}

impl Num {
    fn accepts(self, c: char) -> bool {
        match self {
            Num::Unsigned => c.is_ascii_digit() || c == '.',
            Num::Signed => c.is_ascii_digit() || c == '.' || c == '-',
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Pattern {
    pub head: &'static str,
    pub tail: &'static [(Gap, &'static str)],
    pub values: &'static [(Gap, Num)],
    pub ignore_case: bool,
}

impl Pattern {
    /// Values of the first complete match in `text`, or `None`.
    pub fn find(&self, text: &str) -> Option<Vec<f64>> {
        (0..text.len())
            .filter(|&i| self.literal_at(text, i, self.head))
            .find_map(|start| self.match_tail(text, start + self.head.len(), 0))
    }

    /// First value of the first complete match.
    pub fn find_one(&self, text: &str) -> Option<f64> {
        self.find(text).and_then(|v| v.first().copied())
    }

    /// First two values of the first complete match.
    pub fn find_pair(&self, text: &str) -> Option<(f64, f64)> {
        match self.find(text)?.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    fn literal_at(&self, text: &str, pos: usize, lit: &str) -> bool {
        match text.as_bytes().get(pos..pos + lit.len()) {
            Some(bytes) if self.ignore_case => bytes.eq_ignore_ascii_case(lit.as_bytes()),
            Some(bytes) => bytes == lit.as_bytes(),
            None => false,
        }
    }

    fn match_tail(&self, text: &str, pos: usize, piece: usize) -> Option<Vec<f64>> {
        let Some(&(gap, lit)) = self.tail.get(piece) else {
            return self.match_values(text, pos);
        };
        match gap {
            Gap::Any | Gap::Some => {
                let p = skip_whitespace(text, pos);
                if gap == Gap::Some && p == pos {
                    return None;
                }
                if self.literal_at(text, p, lit) {
                    self.match_tail(text, p + lit.len(), piece + 1)
                } else {
                    None
                }
            }
            Gap::Line => {
                let line_end = text[pos..].find('\n').map_or(text.len(), |n| pos + n);
                (pos..line_end)
                    .filter(|&i| i + lit.len() <= line_end && self.literal_at(text, i, lit))
                    .find_map(|i| self.match_tail(text, i + lit.len(), piece + 1))
            }
        }
    }

    fn match_values(&self, text: &str, mut pos: usize) -> Option<Vec<f64>> {
        let mut out = Vec::with_capacity(self.values.len());
        for &(gap, num) in self.values {
            let p = match gap {
                Gap::Any | Gap::Some => skip_whitespace(text, pos),
                Gap::Line => pos,
            };
            if gap == Gap::Some && p == pos {
                return None;
            }
            let len: usize = text[p..]
                .chars()
                .take_while(|&c| num.accepts(c))
                .map(char::len_utf8)
                .sum();
            if len == 0 {
                return None;
            }
            out.push(text[p..p + len].parse::<f64>().ok()?);
            pos = p + len;
        }
        Some(out)
    }
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map_or(text.len(), |(i, _)| pos + i)
}
