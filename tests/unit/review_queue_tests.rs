/*!
 * Tests for the flashcard review queue
 */

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::HashSet;

use lingotutor::errors::ReviewError;
use lingotutor::review::{Grade, ReviewSession, WordFilter};
use lingotutor::vocabulary::{CefrLevel, VocabularyItem};

use crate::common::sample_deck;

fn started(size: usize, seed: u64) -> ReviewSession {
    let mut review = ReviewSession::new();
    review
        .start_with_rng(sample_deck(size), &mut StdRng::seed_from_u64(seed))
        .unwrap();
    review
}

fn order(review: &mut ReviewSession) -> Vec<String> {
    let mut seen = Vec::new();
    while let Some(card) = review.current() {
        seen.push(card.word.clone());
        review.grade(Grade::Good).unwrap();
    }
    seen
}

#[test]
fn test_start_shouldServeAPermutationOfTheDeck() {
    let mut review = started(12, 7);
    let seen = order(&mut review);

    let mut sorted = seen.clone();
    sorted.sort();
    let mut expected: Vec<String> = sample_deck(12).into_iter().map(|w| w.word).collect();
    expected.sort();
    assert_eq!(sorted, expected);
}

#[test]
fn test_start_repeatedly_shouldNotAlwaysProduceTheSameOrder() {
    let orders: HashSet<Vec<String>> = (0..20)
        .map(|_| {
            let mut review = ReviewSession::new();
            review.start(sample_deck(10)).unwrap();
            order(&mut review)
        })
        .collect();
    assert!(orders.len() > 1, "20 shuffles of 10 cards all came out identical");
}

#[test]
fn test_start_overManyShuffles_shouldPlaceEveryCardEverywhereEvenly() {
    const CARDS: usize = 4;
    const RUNS: usize = 8000;
    let words: Vec<String> = sample_deck(CARDS).into_iter().map(|w| w.word).collect();
    let mut rng = StdRng::seed_from_u64(42);

    // counts[card][position]
    let mut counts = [[0usize; CARDS]; CARDS];
    for _ in 0..RUNS {
        let mut review = ReviewSession::new();
        review.start_with_rng(sample_deck(CARDS), &mut rng).unwrap();
        for (position, word) in order(&mut review).iter().enumerate() {
            let card = words.iter().position(|w| w == word).unwrap();
            counts[card][position] += 1;
        }
    }

    // Expected 2000 per cell, standard deviation about 39
    let expected = RUNS / CARDS;
    let tolerance = expected / 10;
    for (card, positions) in counts.iter().enumerate() {
        for (position, &count) in positions.iter().enumerate() {
            assert!(
                count.abs_diff(expected) <= tolerance,
                "card {} landed at position {} {} times, expected {} +/- {}",
                words[card],
                position,
                count,
                expected,
                tolerance
            );
        }
    }
}

#[test]
fn test_grade_allGoodOrEasy_shouldFinishAfterExactlyNSteps() {
    let mut review = started(6, 1);
    for step in 0..6 {
        assert!(!review.is_finished(), "finished early at step {}", step);
        let grade = if step % 2 == 0 { Grade::Good } else { Grade::Easy };
        review.grade(grade).unwrap();
    }
    assert!(review.is_finished());
    assert_eq!(review.stats().reviewed, 6);
    assert_eq!(review.stats().hard, 0);
}

#[test]
fn test_grade_firstHardRestGood_shouldShowFirstCardTwice() {
    let mut review = started(5, 3);
    let first = review.current().unwrap().word.clone();

    let mut seen = vec![first.clone()];
    review.grade(Grade::Hard).unwrap();
    while let Some(card) = review.current() {
        seen.push(card.word.clone());
        review.grade(Grade::Good).unwrap();
    }

    assert_eq!(review.stats().reviewed, 6);
    assert_eq!(review.stats().hard, 1);
    assert_eq!(seen.iter().filter(|w| **w == first).count(), 2);
    assert_eq!(seen.last(), Some(&first));
}

#[test]
fn test_grade_shouldResetFlipAndHint() {
    let mut review = started(3, 9);
    review.flip().unwrap();
    review.show_hint().unwrap();
    assert!(review.face().flipped && review.face().hint_visible);

    review.grade(Grade::Hard).unwrap();
    assert!(!review.face().flipped);
    assert!(!review.face().hint_visible);
}

#[test]
fn test_review_afterFinish_shouldRejectActions() {
    let mut review = started(1, 0);
    review.grade(Grade::Easy).unwrap();
    assert_eq!(review.grade(Grade::Good), Err(ReviewError::NotInProgress));
    assert_eq!(review.flip(), Err(ReviewError::NotInProgress));
    assert!(review.current().is_none());
}

#[test]
fn test_filteredDeck_withNoMatches_shouldRefuseToStart() {
    let deck = vec![VocabularyItem::new("mat", "d", "t").with_cefr(CefrLevel::A1)];
    let filtered = WordFilter::new().with_cefr(CefrLevel::C2).apply(&deck);

    let mut review = ReviewSession::new();
    assert_eq!(review.start(filtered), Err(ReviewError::EmptyDeck));
    assert!(!review.is_started());
}
