//! Closed token vocabularies
//!
//! Two independent vocabularies map pitch strings and duration strings to
//! dense integer ids. The first ids are reserved:
//!
//! | id | meaning |
//! |----|---------|
//! | 0  | mask, no token |
//! | 1  | out of vocabulary (`[UNK]`) |
//! | 2.. | vocabulary tokens in enumeration order |
//!
//! Build the vocabularies once and pass them by reference to whatever
//! encodes or decodes.

use crate::extract::{format_duration, REST_MARKER};
use serde::Serialize;
use std::collections::HashMap;

pub const MASK_ID: u32 = 0;
pub const OOV_ID: u32 = 1;
pub const OOV_TOKEN: &str = "[UNK]";
/// Id of the first real token
pub const FIRST_TOKEN_ID: u32 = 2;

const PITCH_LETTERS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];
const PITCH_ACCIDENTALS: [&str; 5] = ["", "#", "##", "-", "--"];
const PITCH_OCTAVES: std::ops::RangeInclusive<u8> = 1..=6;

const DURATION_STEP: f64 = 0.125;
const DURATION_STEPS: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    tokens: Vec<String>,
    ids: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build a vocabulary from tokens in id order; repeated tokens keep their first id
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        let mut vocab = Self { tokens: Vec::new(), ids: HashMap::new() };
        for token in tokens {
            if vocab.ids.contains_key(&token) {
                log::warn!("Ignoring repeated vocabulary token {}", token);
                continue;
            }
            let id = FIRST_TOKEN_ID + vocab.tokens.len() as u32;
            vocab.ids.insert(token.clone(), id);
            vocab.tokens.push(token);
        }
        vocab
    }

    /// `<letter><accidental><octave>` for A-G × {"", #, ##, -, --} × 1-6, then `P`
    pub fn pitches() -> Self {
        let mut tokens = Vec::with_capacity(PITCH_LETTERS.len() * PITCH_ACCIDENTALS.len() * 6 + 1);
        for letter in PITCH_LETTERS {
            for accidental in PITCH_ACCIDENTALS {
                for octave in PITCH_OCTAVES {
                    tokens.push(format!("{}{}{}", letter, accidental, octave));
                }
            }
        }
        tokens.push(REST_MARKER.to_string());
        Self::new(tokens)
    }

    /// `0.0000` to `8.0000` in steps of `0.1250`
    pub fn durations() -> Self {
        Self::new((0..=DURATION_STEPS).map(|i| format_duration(i as f64 * DURATION_STEP)))
    }

    /// Id of `token`, or `OOV_ID` when it is not in the vocabulary
    pub fn id_of(&self, token: &str) -> u32 {
        self.ids.get(token).copied().unwrap_or(OOV_ID)
    }

    /// Token for `id`; `[UNK]` for `OOV_ID`, `None` for the mask and unknown ids
    pub fn token_of(&self, id: u32) -> Option<&str> {
        match id {
            MASK_ID => None,
            OOV_ID => Some(OOV_TOKEN),
            _ => self.tokens.get((id - FIRST_TOKEN_ID) as usize).map(String::as_str),
        }
    }

    pub fn encode<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<u32> {
        tokens.iter().map(|t| self.id_of(t.as_ref())).collect()
    }

    /// Decode ids; anything without a token comes back as `[UNK]`
    pub fn decode(&self, ids: &[u32]) -> Vec<&str> {
        ids.iter().map(|&id| self.token_of(id).unwrap_or(OOV_TOKEN)).collect()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.ids.contains_key(token)
    }

    /// Number of real tokens
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Size of the id space including the reserved ids
    pub fn id_space(&self) -> usize {
        self.tokens.len() + FIRST_TOKEN_ID as usize
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&VocabularyFile {
            mask_id: MASK_ID,
            oov_id: OOV_ID,
            oov_token: OOV_TOKEN,
            first_token_id: FIRST_TOKEN_ID,
            tokens: &self.tokens,
        })
    }
}

#[derive(Serialize)]
struct VocabularyFile<'a> {
    mask_id: u32,
    oov_id: u32,
    oov_token: &'a str,
    first_token_id: u32,
    tokens: &'a [String],
}

/// The pitch and duration vocabularies used together for one training run
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabularies {
    pub pitch: Vocabulary,
    pub duration: Vocabulary,
}

impl Default for Vocabularies {
    fn default() -> Self {
        Self { pitch: Vocabulary::pitches(), duration: Vocabulary::durations() }
    }
}
