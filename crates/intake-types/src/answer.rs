//! Answer addressing.
//!
//! An [`AnswerKey`] is the positional address `(step, question)` of one answer
//! slot, serialized as the token `"{step}-{question}"`. [`Answers`] is the
//! full answer mapping of a session, keyed by that token on the wire.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AnswerKeyError;

/// Zero-based `(step, question)` address of an answer slot.
///
/// Ordered by step, then question, which is also catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerKey {
    pub step: usize,
    pub question: usize,
}

impl AnswerKey {
    pub const fn new(step: usize, question: usize) -> Self {
        Self { step, question }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.step, self.question)
    }
}

impl FromStr for AnswerKey {
    type Err = AnswerKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (step, question) = s
            .split_once('-')
            .ok_or_else(|| AnswerKeyError::Malformed(s.to_string()))?;

        Ok(Self {
            step: parse_index(s, step)?,
            question: parse_index(s, question)?,
        })
    }
}

/// Parse one side of the token. Only ASCII digits are allowed, which also
/// rejects a second dash and any sign.
fn parse_index(token: &str, part: &str) -> Result<usize, AnswerKeyError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AnswerKeyError::Malformed(token.to_string()));
    }
    part.parse()
        .map_err(|_| AnswerKeyError::Overflow(token.to_string()))
}

impl Serialize for AnswerKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AnswerKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

/// Full answer mapping of one session.
///
/// Values are free text; empty and whitespace-only strings are stored as given
/// and only count as answered once they contain a non-whitespace character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers(BTreeMap<AnswerKey, String>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored text for `key`, or `""` when the slot was never written.
    pub fn get(&self, key: &AnswerKey) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Replace the text of exactly one slot.
    pub fn set(&mut self, key: AnswerKey, text: impl Into<String>) {
        self.0.insert(key, text.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AnswerKey, &String)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(AnswerKey, String)> for Answers {
    fn from_iter<I: IntoIterator<Item = (AnswerKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Whether an answer text counts toward progress.
pub fn is_answered(text: &str) -> bool {
    !text.trim().is_empty()
}
