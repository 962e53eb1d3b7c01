/*!
 * Flashcard review queue.
 *
 * A review walks a shuffled queue of cards. A card graded `Hard` is appended
 * to the end of the queue so it comes back once more; the review finishes
 * when the index runs past the end of the queue.
 */

use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;
use std::fmt;
use std::str::FromStr;

use crate::errors::ReviewError;
use crate::vocabulary::VocabularyItem;

/// How well the learner knew a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Hard,
    Good,
    Easy,
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1" | "hard" => Ok(Self::Hard),
            "2" | "good" => Ok(Self::Good),
            "3" | "easy" => Ok(Self::Easy),
            other => Err(format!("Invalid grade: {}", other)),
        }
    }
}

/// Counters of a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewStats {
    /// Cards graded, requeued repetitions included
    pub reviewed: usize,
    /// Cards graded `Hard`
    pub hard: usize,
}

impl fmt::Display for ReviewStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} reviewed, {} hard", self.reviewed, self.hard)
    }
}

/// Transient state of the card on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardFace {
    pub flipped: bool,
    pub hint_visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    NotStarted,
    InProgress { index: usize, queue: Vec<VocabularyItem> },
    Finished,
}

/// A single review session over a word list
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewSession {
    phase: Phase,
    stats: ReviewStats,
    face: CardFace,
}

impl Default for ReviewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewSession {
    pub fn new() -> Self {
        Self {
            phase: Phase::NotStarted,
            stats: ReviewStats::default(),
            face: CardFace::default(),
        }
    }

    /// Start reviewing `words` in a random order drawn from `rng`
    pub fn start_with_rng<R: Rng + ?Sized>(
        &mut self,
        mut words: Vec<VocabularyItem>,
        rng: &mut R,
    ) -> Result<(), ReviewError> {
        if words.is_empty() {
            return Err(ReviewError::EmptyDeck);
        }

        words.shuffle(rng);
        debug!("Starting review of {} cards", words.len());

        self.phase = Phase::InProgress { index: 0, queue: words };
        self.stats = ReviewStats::default();
        self.reset_face();
        Ok(())
    }

    /// Start reviewing `words` in a random order
    pub fn start(&mut self, words: Vec<VocabularyItem>) -> Result<(), ReviewError> {
        self.start_with_rng(words, &mut rand::rng())
    }

    /// Grade the current card and advance
    pub fn grade(&mut self, grade: Grade) -> Result<(), ReviewError> {
        let Phase::InProgress { index, queue } = &mut self.phase else {
            return Err(ReviewError::NotInProgress);
        };

        if grade == Grade::Hard {
            let card = queue[*index].clone();
            queue.push(card);
            self.stats.hard += 1;
        }
        self.stats.reviewed += 1;
        *index += 1;

        if *index >= queue.len() {
            debug!("Review finished: {}", self.stats);
            self.phase = Phase::Finished;
        }
        self.reset_face();
        Ok(())
    }

    /// Turn the current card over
    pub fn flip(&mut self) -> Result<bool, ReviewError> {
        self.require_in_progress()?;
        self.face.flipped = !self.face.flipped;
        Ok(self.face.flipped)
    }

    /// Reveal the hint of the current card
    pub fn show_hint(&mut self) -> Result<(), ReviewError> {
        self.require_in_progress()?;
        self.face.hint_visible = true;
        Ok(())
    }

    /// The card being reviewed, if any
    pub fn current(&self) -> Option<&VocabularyItem> {
        match &self.phase {
            Phase::InProgress { index, queue } => queue.get(*index),
            _ => None,
        }
    }

    /// One-based position and current queue length
    pub fn position(&self) -> Option<(usize, usize)> {
        match &self.phase {
            Phase::InProgress { index, queue } => Some((index + 1, queue.len())),
            _ => None,
        }
    }

    pub fn face(&self) -> CardFace {
        self.face
    }

    pub fn stats(&self) -> ReviewStats {
        self.stats
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.phase, Phase::NotStarted)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished)
    }

    fn require_in_progress(&self) -> Result<(), ReviewError> {
        match self.phase {
            Phase::InProgress { .. } => Ok(()),
            _ => Err(ReviewError::NotInProgress),
        }
    }

    fn reset_face(&mut self) {
        self.face = CardFace::default();
    }
}

/// Hint for a card: its context sentence with the word blanked out, or its
/// part of speech and level when there is no context
pub fn hint(item: &VocabularyItem) -> String {
    if let Some(context) = item.context.as_deref().filter(|c| !c.trim().is_empty()) {
        let lower = context.to_lowercase();
        let word = item.word.to_lowercase();
        // Byte offsets are only reused when lowercasing kept the length
        if !word.is_empty() && lower.len() == context.len() {
            if let Some(start) = lower.find(&word) {
                let end = start + word.len();
                return format!("{}____{}", &context[..start], &context[end..]);
            }
        }
        return context.to_string();
    }

    let mut parts = Vec::new();
    if let Some(pos) = &item.part_of_speech {
        parts.push(pos.clone());
    }
    if let Some(cefr) = item.cefr {
        parts.push(cefr.to_string());
    }
    if parts.is_empty() {
        let first: String = item.translation.chars().take(1).collect();
        format!("{}...", first)
    } else {
        parts.join(", ")
    }
}
