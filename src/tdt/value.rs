//! Value tree for .tdt save files
//!
//! [`Document::parse`] matches brackets over the token stream and builds a
//! tree of objects, arrays, constructor records and scalars. The reader is
//! lenient: stray tokens are skipped, a mismatched closer ends the innermost
//! open group, and a truncated file keeps whatever was read up to the cut.

use super::lexer::{Delim, Lexer, Token};
use std::borrow::Cow;
use std::iter::Peekable;

/// Groups nested deeper than this are skipped instead of recursed into
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// `{ Key: value, ... }`
    Object(Vec<Field<'a>>),
    /// `[ value, ... ]` or a parenthesized group
    Array(Vec<Value<'a>>),
    /// `new Kind(args)` or `Kind(args)`
    Record { kind: &'a str, args: Vec<Value<'a>> },
    Str(Cow<'a, str>),
    Number(&'a str),
    Ident(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field<'a> {
    pub key: Cow<'a, str>,
    pub value: Value<'a>,
}

impl<'a> Value<'a> {
    /// Fields of an object, or of the object literal a record is constructed from
    pub fn fields(&self) -> &[Field<'a>] {
        match self {
            Value::Object(fields) => fields.as_slice(),
            Value::Record { args, .. } => args
                .iter()
                .find_map(|arg| match arg {
                    Value::Object(fields) => Some(fields.as_slice()),
                    _ => None,
                })
                .unwrap_or_default(),
            _ => &[],
        }
    }

    /// First field named `key`
    pub fn get(&self, key: &str) -> Option<&Value<'a>> {
        self.fields()
            .iter()
            .find(|field| field.key == key)
            .map(|field| &field.value)
    }

    pub fn record_kind(&self) -> Option<&'a str> {
        match self {
            Value::Record { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text.as_ref()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Ident("true") => Some(true),
            Value::Ident("false") => Some(false),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value<'a>]> {
        match self {
            Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Non-negative whole amount. Fractional amounts keep their integer part,
    /// exponents are applied first (`1e3` is 1000, `2.5e1` is 25); negative
    /// numbers, non-numbers and values past `u64::MAX` are not amounts.
    pub fn as_amount(&self) -> Option<u64> {
        match self {
            Value::Number(raw) if !raw.starts_with('-') => {
                if raw.contains(['e', 'E']) {
                    let value: f64 = raw.parse().ok()?;
                    (value.is_finite() && value < u64::MAX as f64).then(|| value.trunc() as u64)
                } else {
                    raw.split('.').next().and_then(|whole| whole.parse().ok())
                }
            }
            _ => None,
        }
    }

    /// Pre-order traversal of this value and everything nested in it
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk {
            stack: vec![Node {
                key: None,
                value: self,
            }],
        }
    }
}

/// A value visited by [`Walk`], with the key it was stored under if any
#[derive(Debug, Clone, Copy)]
pub struct Node<'v, 'a> {
    pub key: Option<&'v str>,
    pub value: &'v Value<'a>,
}

/// Pre-order, document-order iterator over a value tree
#[derive(Debug, Clone)]
pub struct Walk<'v, 'a> {
    stack: Vec<Node<'v, 'a>>,
}

impl<'v, 'a> Iterator for Walk<'v, 'a> {
    type Item = Node<'v, 'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        match node.value {
            Value::Object(fields) => self.stack.extend(fields.iter().rev().map(|field| Node {
                key: Some(field.key.as_ref()),
                value: &field.value,
            })),
            Value::Array(items) | Value::Record { args: items, .. } => self
                .stack
                .extend(items.iter().rev().map(|value| Node { key: None, value })),
            _ => {}
        }
        Some(node)
    }
}

/// Every top-level value of a save file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document<'a> {
    pub values: Vec<Value<'a>>,
}

impl<'a> Document<'a> {
    pub fn parse(data: &'a str) -> Self {
        Reader::new(data).read_document()
    }

    /// Pre-order traversal of the whole document in source order
    pub fn walk(&self) -> Walk<'_, 'a> {
        Walk {
            stack: self
                .values
                .iter()
                .rev()
                .map(|value| Node { key: None, value })
                .collect(),
        }
    }
}

struct Reader<'a> {
    tokens: Peekable<Lexer<'a>>,
}

impl<'a> Reader<'a> {
    fn new(data: &'a str) -> Self {
        Reader {
            tokens: Lexer::new(data).peekable(),
        }
    }

    fn read_document(mut self) -> Document<'a> {
        let mut values = Vec::new();
        loop {
            match self.tokens.peek() {
                None => break,
                // Stray closer with nothing open
                Some(Token::Close(_)) => {
                    self.tokens.next();
                }
                Some(_) => {
                    if let Some(value) = self.read_value(0) {
                        values.push(value);
                    }
                }
            }
        }
        Document { values }
    }

    /// Reads one value. Closers are left for the enclosing group; any other
    /// token that cannot start a value is consumed and yields `None`.
    fn read_value(&mut self, depth: usize) -> Option<Value<'a>> {
        if let Some(Token::Close(_)) = self.tokens.peek() {
            return None;
        }

        match self.tokens.next()? {
            Token::Open(delim) => Some(self.read_group(delim, depth + 1)),
            Token::Str(text) => Some(Value::Str(text)),
            Token::Number(raw) => Some(Value::Number(raw)),
            Token::Ident("new") => match self.tokens.peek() {
                Some(Token::Ident(_)) => match self.tokens.next() {
                    Some(Token::Ident(kind)) => Some(self.read_record(kind, depth)),
                    _ => None,
                },
                _ => Some(Value::Ident("new")),
            },
            Token::Ident(name) => {
                if let Some(Token::Open(Delim::Paren)) = self.tokens.peek() {
                    Some(self.read_record(name, depth))
                } else {
                    Some(Value::Ident(name))
                }
            }
            Token::Close(_) | Token::Colon | Token::Comma | Token::Other(_) => None,
        }
    }

    /// `Kind` has been consumed; reads the optional argument list
    fn read_record(&mut self, kind: &'a str, depth: usize) -> Value<'a> {
        let args = match self.tokens.peek() {
            Some(Token::Open(Delim::Paren)) => {
                self.tokens.next();
                if depth + 1 > MAX_DEPTH {
                    self.skip_group();
                    Vec::new()
                } else {
                    self.read_items(Delim::Paren, depth + 1)
                }
            }
            _ => Vec::new(),
        };
        Value::Record { kind, args }
    }

    /// The opening token has been consumed
    fn read_group(&mut self, delim: Delim, depth: usize) -> Value<'a> {
        if depth > MAX_DEPTH {
            self.skip_group();
            return match delim {
                Delim::Brace => Value::Object(Vec::new()),
                Delim::Bracket | Delim::Paren => Value::Array(Vec::new()),
            };
        }

        match delim {
            Delim::Brace => Value::Object(self.read_fields(depth)),
            Delim::Bracket | Delim::Paren => Value::Array(self.read_items(delim, depth)),
        }
    }

    fn read_items(&mut self, close: Delim, depth: usize) -> Vec<Value<'a>> {
        let mut items = Vec::new();
        loop {
            match self.tokens.peek() {
                None => break,
                Some(Token::Close(delim)) => {
                    if *delim == close {
                        self.tokens.next();
                    }
                    break;
                }
                Some(Token::Comma) => {
                    self.tokens.next();
                }
                Some(_) => {
                    if let Some(value) = self.read_value(depth) {
                        items.push(value);
                    }
                }
            }
        }
        items
    }

    fn read_fields(&mut self, depth: usize) -> Vec<Field<'a>> {
        let mut fields = Vec::new();
        loop {
            match self.tokens.peek() {
                None => break,
                Some(Token::Close(delim)) => {
                    if *delim == Delim::Brace {
                        self.tokens.next();
                    }
                    break;
                }
                // A group where a key belongs; read it so its brackets stay balanced
                Some(Token::Open(_)) => {
                    self.read_value(depth);
                    continue;
                }
                _ => {}
            }

            let key = match self.tokens.next() {
                Some(Token::Str(key)) => key,
                Some(Token::Ident(key)) | Some(Token::Number(key)) => Cow::Borrowed(key),
                _ => continue,
            };

            if !matches!(self.tokens.peek(), Some(Token::Colon)) {
                continue;
            }
            self.tokens.next();

            if let Some(value) = self.read_value(depth) {
                fields.push(Field { key, value });
            }
        }
        fields
    }

    /// Discards tokens up to the closer matching an already consumed opener
    fn skip_group(&mut self) {
        let mut open = 1usize;
        while let Some(token) = self.tokens.next() {
            match token {
                Token::Open(_) => open += 1,
                Token::Close(_) => {
                    open -= 1;
                    if open == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
}
