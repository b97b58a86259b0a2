//! Tokenizer for the .tdt save dialect
//!
//! Tournament Director saves are JavaScript object literals built from
//! `new GameXxx({ Key: value, ... })` constructor calls. The lexer never
//! fails: anything it does not recognize comes out as [`Token::Other`] so the
//! reader can skip it and keep going.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_until, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace1, one_of},
    combinator::{map, opt, recognize, rest, value},
    sequence::{pair, tuple},
    IResult,
};
use std::borrow::Cow;

/// Bracket flavor of an opening or closing token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delim {
    /// `{ }`
    Brace,
    /// `[ ]`
    Bracket,
    /// `( )`
    Paren,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Open(Delim),
    Close(Delim),
    Colon,
    Comma,
    /// Quoted string with escapes already resolved
    Str(Cow<'a, str>),
    /// Raw numeric literal, sign and fraction included
    Number(&'a str),
    /// Bareword: `new`, `true`, `null`, record kinds, keys
    Ident(&'a str),
    Other(char),
}

/// Iterator over the tokens of a save file
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    rest: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(data: &'a str) -> Self {
        Lexer { rest: data }
    }

    fn skip_trivia(&mut self) {
        while let Ok((rest, _)) = trivia(self.rest) {
            self.rest = rest;
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        self.skip_trivia();

        let mut chars = self.rest.chars();
        let first = chars.next()?;
        match token(self.rest) {
            Ok((rest, token)) => {
                self.rest = rest;
                Some(token)
            }
            Err(_) => {
                self.rest = chars.as_str();
                Some(Token::Other(first))
            }
        }
    }
}

fn trivia(input: &str) -> IResult<&str, &str> {
    alt((multispace1, line_comment, block_comment))(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize(pair(tag("//"), take_while(|c: char| c != '\n')))(input)
}

/// An unterminated block comment swallows the rest of the input
fn block_comment(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        tag("/*"),
        alt((take_until("*/"), rest)),
        opt(tag("*/")),
    )))(input)
}

fn token(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        punctuation,
        map(quoted, Token::Str),
        map(number, Token::Number),
        map(identifier, Token::Ident),
    ))(input)
}

fn punctuation(input: &str) -> IResult<&str, Token<'_>> {
    alt((
        value(Token::Open(Delim::Brace), char('{')),
        value(Token::Close(Delim::Brace), char('}')),
        value(Token::Open(Delim::Bracket), char('[')),
        value(Token::Close(Delim::Bracket), char(']')),
        value(Token::Open(Delim::Paren), char('(')),
        value(Token::Close(Delim::Paren), char(')')),
        value(Token::Colon, char(':')),
        value(Token::Comma, char(',')),
    ))(input)
}

fn number(input: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit0)),
        opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
    )))(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '$'),
    ))(input)
}

/// Single or double quoted string. Borrows from the input unless an escape
/// sequence forces a copy. A string missing its closing quote runs to the end
/// of the input.
fn quoted(input: &str) -> IResult<&str, Cow<'_, str>> {
    let (body, quote) = one_of::<_, _, nom::error::Error<&str>>("\"'")(input)?;

    let mut owned: Option<String> = None;
    let mut chars = body.char_indices();
    while let Some((idx, c)) = chars.next() {
        if c == quote {
            let text = owned.map_or(Cow::Borrowed(&body[..idx]), Cow::Owned);
            return Ok((&body[idx + c.len_utf8()..], text));
        }

        if c != '\\' {
            if let Some(buf) = owned.as_mut() {
                buf.push(c);
            }
            continue;
        }

        let buf = owned.get_or_insert_with(|| body[..idx].to_string());
        match chars.next() {
            Some((_, 'n')) => buf.push('\n'),
            Some((_, 't')) => buf.push('\t'),
            Some((_, 'r')) => buf.push('\r'),
            Some((_, 'b')) => buf.push('\u{8}'),
            Some((_, 'f')) => buf.push('\u{c}'),
            Some((_, '0')) => buf.push('\0'),
            Some((_, 'u')) => {
                let hex: String = chars.clone().take(4).map(|(_, c)| c).collect();
                let decoded = Some(&hex)
                    .filter(|h| h.len() == 4 && h.chars().all(|c| c.is_ascii_hexdigit()))
                    .and_then(|h| u32::from_str_radix(h, 16).ok())
                    .and_then(char::from_u32);
                match decoded {
                    Some(decoded) => {
                        buf.push(decoded);
                        chars.nth(3);
                    }
                    None => buf.push('u'),
                }
            }
            Some((_, escaped)) => buf.push(escaped),
            None => break,
        }
    }

    Ok(("", owned.map_or(Cow::Borrowed(body), Cow::Owned)))
}
