//! Literal-list cell format
//!
//! Each partition cell of the intermediate CSV holds the events of one
//! measure written as a list literal of `[pitch-or-pitch-list, duration]`
//! pairs:
//!
//! ```text
//! [['C4', 1.0], ('P', 0.5), (['C3', 'G3'], 2.0)]
//! ```
//!
//! Notes render as lists, rests and chords as tuples. The parser accepts
//! either bracket kind anywhere, single or double quoted strings, and
//! `Fraction(n, d)` durations.

use crate::extract::{Event, REST_MARKER};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

pub type LiteralResult<T> = std::result::Result<T, LiteralError>;

/// Render the events of one measure as a list literal
pub fn render_events(events: &[Event]) -> String {
    let items: Vec<String> = events.iter().map(render_event).collect();
    format!("[{}]", items.join(", "))
}

/// Render a single event
pub fn render_event(event: &Event) -> String {
    match event {
        Event::Note { pitch, duration } => format!("[{}, {}]", quote(pitch), render_number(*duration)),
        Event::Rest { duration } => format!("({}, {})", quote(REST_MARKER), render_number(*duration)),
        Event::Chord { pitches, duration } => {
            let pitches: Vec<String> = pitches.iter().map(|p| quote(p)).collect();
            format!("([{}], {})", pitches.join(", "), render_number(*duration))
        }
    }
}

/// Literal of the placeholder event standing in for an absent measure
pub const PLACEHOLDER_LITERAL: &str = "[None, None]";

/// Parse a cell back into events
///
/// An empty cell (or `nan`) is an absent measure and yields no events.
pub fn parse_events(cell: &str) -> LiteralResult<Vec<Event>> {
    let cell = cell.trim();
    if cell.is_empty() || cell == "nan" {
        return Ok(Vec::new());
    }

    let mut parser = Parser::new(cell);
    let value = parser.parse_value()?;
    parser.expect_end()?;

    match value {
        Literal::List(items) => items.into_iter().map(literal_to_event).collect(),
        other => Err(LiteralError::MalformedEvent(format!("expected a list of events, got {:?}", other))),
    }
}

fn literal_to_event(item: Literal) -> LiteralResult<Event> {
    let mut pair = match item {
        Literal::List(pair) => pair,
        other => return Err(LiteralError::MalformedEvent(format!("expected a pair, got {:?}", other))),
    };
    if pair.len() != 2 {
        return Err(LiteralError::MalformedEvent(format!("expected 2 elements, got {}", pair.len())));
    }
    let duration = match pair.pop() {
        Some(Literal::Num(d)) => d,
        other => return Err(LiteralError::MalformedEvent(format!("expected a duration, got {:?}", other))),
    };

    match pair.pop() {
        Some(Literal::Str(pitch)) if pitch == REST_MARKER => Ok(Event::Rest { duration }),
        Some(Literal::Str(pitch)) => Ok(Event::Note { pitch, duration }),
        Some(Literal::List(members)) => {
            let pitches = members
                .into_iter()
                .map(|m| match m {
                    Literal::Str(p) => Ok(p),
                    other => Err(LiteralError::MalformedEvent(format!("expected a chord pitch, got {:?}", other))),
                })
                .collect::<LiteralResult<Vec<_>>>()?;
            Ok(Event::Chord { pitches, duration })
        }
        other => Err(LiteralError::MalformedEvent(format!("expected a pitch, got {:?}", other))),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}

/// Shortest round-tripping form, always with a decimal point (`1.0`, `0.375`)
fn render_number(n: f64) -> String {
    format!("{:?}", n)
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Str(String),
    Num(f64),
    None,
    List(Vec<Literal>),
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::UnexpectedChar { found, offset: self.pos },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn expect(&mut self, expected: char) -> LiteralResult<()> {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    fn expect_end(&mut self) -> LiteralResult<()> {
        self.skip_ws();
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected()),
        }
    }

    fn parse_value(&mut self) -> LiteralResult<Literal> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.parse_sequence('[', ']'),
            Some('(') => self.parse_sequence('(', ')'),
            Some(q @ ('\'' | '"')) => self.parse_string(q),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_word(),
            _ => Err(self.unexpected()),
        }
    }

    fn parse_sequence(&mut self, open: char, close: char) -> LiteralResult<Literal> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(Literal::List(items));
            }
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => return Err(self.unexpected()),
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> LiteralResult<Literal> {
        self.expect(quote)?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => out.push(self.bump().ok_or(LiteralError::UnexpectedEnd)?),
                Some(c) if c == quote => return Ok(Literal::Str(out)),
                Some(c) => out.push(c),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }
    }

    fn parse_number(&mut self) -> LiteralResult<Literal> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '+'))
        {
            self.pos += 1;
        }
        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Literal::Num)
            .map_err(|_| LiteralError::InvalidNumber(text.to_string()))
    }

    /// `None` or `Fraction(n, d)`
    fn parse_word(&mut self) -> LiteralResult<Literal> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        match &self.input[start..self.pos] {
            "None" => Ok(Literal::None),
            "Fraction" => {
                let Literal::List(args) = self.parse_sequence('(', ')')? else {
                    return Err(LiteralError::MalformedEvent("Fraction".to_string()));
                };
                match args.as_slice() {
                    [Literal::Num(n), Literal::Num(d)] if *d != 0.0 => Ok(Literal::Num(n / d)),
                    _ => Err(LiteralError::MalformedEvent(format!("Fraction{:?}", args))),
                }
            }
            word => Err(LiteralError::MalformedEvent(format!("unknown name '{}'", word))),
        }
    }
}
