//! Segmented Profile Tokenizer
//!
//! An `.obl` file holds one layer record per line. Lines are kept apart by an
//! explicit [`Token::LineBreak`] instead of a magic number, so a genuine `-1.0`
//! reading can never be mistaken for a separator. The flat sentinel form is
//! still available through [`ProfileTokens::to_flat`].

use crate::error::ProfileError;
use std::path::Path;
use tracing::{debug, warn};

/// Value written between lines in the flat array representation
pub const SENTINEL: f32 = -1.0;

/// One parsed element of a profile file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Numeric field
    Number(f32),
    /// Boundary between two input lines
    LineBreak,
}

/// Tokenized profile file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileTokens {
    tokens: Vec<Token>,
}

impl ProfileTokens {
    /// Read and tokenize a profile file
    pub fn from_path(path: &Path) -> Result<Self, ProfileError> {
        let text = std::fs::read_to_string(path).map_err(|e| ProfileError::io(path, e))?;
        Self::parse(&text, path)
    }

    /// Tokenize profile text. `origin` is only used in error messages.
    pub fn parse(text: &str, origin: &Path) -> Result<Self, ProfileError> {
        let mut tokens = Vec::new();
        let mut lines = 0usize;
        let mut sentinel_like = 0usize;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if lines > 0 {
                tokens.push(Token::LineBreak);
            }
            lines += 1;

            for raw in line.split_whitespace() {
                let value: f32 = raw.parse().map_err(|_| ProfileError::Parse {
                    path: origin.to_path_buf(),
                    line: line_no + 1,
                    token: raw.to_string(),
                })?;
                if value == SENTINEL {
                    sentinel_like += 1;
                }
                tokens.push(Token::Number(value));
            }
        }

        if sentinel_like > 0 {
            warn!(
                "{}: {} value(s) equal to {} would collide with the flat-array separator",
                origin.display(),
                sentinel_like,
                SENTINEL
            );
        }

        debug!("Parsed {}: {} lines, {} tokens", origin.display(), lines, tokens.len());
        Ok(Self { tokens })
    }

    /// Parsed tokens in file order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of non-blank input lines
    pub fn line_count(&self) -> usize {
        if self.tokens.is_empty() {
            return 0;
        }
        self.tokens.iter().filter(|t| **t == Token::LineBreak).count() + 1
    }

    /// Flat array with [`SENTINEL`] between lines (none after the last)
    pub fn to_flat(&self) -> Vec<f32> {
        self.tokens
            .iter()
            .map(|t| match t {
                Token::Number(v) => *v,
                Token::LineBreak => SENTINEL,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
