//! Tournament Director save file support
//!
//! This module reads .tdt files, the JavaScript object literals Tournament
//! Director writes, and extracts the tournament metadata, prize tiers and
//! participating players from them. Reading is lenient end to end: bytes that
//! are not valid UTF-8 are dropped, and malformed or truncated content yields
//! whatever records could be recovered.

pub mod extract;
pub mod lexer;
pub mod value;

pub use extract::extract;
pub use value::{Document, Value};

use crate::model::{Player, Prize, TournamentInfo};
use crate::{Result, TdtError};
use std::io::ErrorKind;
use std::path::Path;

/// Records extracted from one save file, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TdtFile {
    pub tournament: TournamentInfo,
    pub prizes: Vec<Prize>,
    pub players: Vec<Player>,
    /// Player records skipped for lacking an identifier, a name or participation
    pub dropped_players: usize,
}

impl TdtFile {
    /// Load a save file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_lossy(path)?;
        Ok(Self::parse(&contents))
    }

    /// Parse a save file from a string
    pub fn parse(contents: &str) -> Self {
        extract(&Document::parse(contents))
    }
}

/// Read a file as text, dropping any bytes that are not valid UTF-8
pub fn read_lossy(path: &Path) -> Result<String> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(decode_lossy(&bytes)),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(TdtError::NotFound(path.to_path_buf())),
        Err(err) => Err(err.into()),
    }
}

pub fn decode_lossy(mut bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                text.push_str(valid);
                return text;
            }
            Err(err) => {
                let (valid, after) = bytes.split_at(err.valid_up_to());
                // Checked by from_utf8 above
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                match err.error_len() {
                    Some(len) => bytes = &after[len..],
                    // Incomplete sequence at the end of the input
                    None => return text,
                }
            }
        }
    }
}
