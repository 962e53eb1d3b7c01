/*!
 * Integration tests for a full practice round through the controller
 */

use anyhow::Result;
use std::sync::Arc;

use lingotutor::app_config::Config;
use lingotutor::app_controller::Controller;
use lingotutor::lookup::LookupSource;
use lingotutor::review::{Grade, ReviewSession, WordFilter};
use lingotutor::storage::{DatabaseConnection, KvRepository};
use lingotutor::tutor::{Difficulty, Evaluation, GenerateRequest, LengthClass};
use lingotutor::vocabulary::VocabularyItem;

use crate::common::{SAMPLE_TEXT, ScriptedTutor, create_temp_dir, init_test_logging, memory_blobs, sample_study};

fn evaluation() -> Evaluation {
    Evaluation {
        score: 74,
        feedback: "Casi".to_string(),
        corrected_translation: "El gato se sentó en la alfombrilla. Estaba feliz.".to_string(),
        key_improvements: vec!["mat = alfombrilla".to_string()],
        difficult_words: vec!["mat".to_string()],
    }
}

fn tutor() -> ScriptedTutor {
    ScriptedTutor::new()
        .with_study(sample_study())
        .with_definition(VocabularyItem::new("happy", "feeling pleasure", "feliz").with_part_of_speech("adjective"))
        .with_evaluation(evaluation())
}

fn controller_at(path: &std::path::Path, tutor: &ScriptedTutor) -> Controller {
    let repo = KvRepository::new(DatabaseConnection::open(path).unwrap());
    Controller::with_parts(Config::default(), Arc::new(repo), Some(Arc::new(tutor.clone())))
}

#[tokio::test]
async fn test_practiceRound_analyzeLookupSaveTranslate_shouldPersistEverything() -> Result<()> {
    init_test_logging();
    let dir = create_temp_dir()?;
    let db_path = dir.path().join("lingotutor.db");
    let tutor = tutor();

    let session_id = {
        let mut controller = controller_at(&db_path, &tutor);

        let session = controller.analyze(SAMPLE_TEXT).await?;
        assert_eq!(session.text, SAMPLE_TEXT);

        let phrase = controller.lookup(&session.id, "sat on").await?;
        assert_eq!(phrase.source, LookupSource::Index);

        let happy = controller.lookup(&session.id[..8], "happy").await?;
        assert_eq!(happy.source, LookupSource::Remote);
        assert_eq!(happy.item.context.as_deref(), Some("It was happy."));

        controller.save_word(&session.id, "happy").await?;
        controller.save_word(&session.id, "sat on").await?;
        assert_eq!(tutor.lookup_count(), 1);

        let scored = controller.translate(&session.id, "El gato se sentó en la alfombra. Estaba feliz.").await?;
        assert_eq!(scored.score, 74);
        session.id
    };

    let reopened = controller_at(&db_path, &tutor);
    let session = reopened.session(&session_id)?;
    assert!(session.is_finished());
    // analyze + one remote lookup + evaluation, 30 tokens each
    assert_eq!(session.usage.total_tokens, 90);

    let words: Vec<&str> = reopened.saved_words().iter().map(|w| w.word.as_str()).collect();
    assert_eq!(words, vec!["happy", "sat on"]);
    Ok(())
}

#[tokio::test]
async fn test_lookup_failedNetwork_shouldFallBackAndRefuseToSave() -> Result<()> {
    let tutor = ScriptedTutor::new().with_study(sample_study()).failing_lookups();
    let mut controller = Controller::with_parts(Config::default(), memory_blobs(), Some(Arc::new(tutor)));
    let session = controller.analyze(SAMPLE_TEXT).await?;

    let result = controller.lookup(&session.id, "cat").await?;
    assert_eq!(result.source, LookupSource::Fallback);
    assert_eq!(result.item.word, "cat");
    assert!(!result.item.definition.is_empty());

    assert!(controller.save_word(&session.id, "cat").await.is_err());
    assert!(controller.saved_words().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_review_overSessionVocabulary_shouldRequeueHardCards() -> Result<()> {
    let tutor = tutor();
    let mut controller = Controller::with_parts(Config::default(), memory_blobs(), Some(Arc::new(tutor)));
    let session = controller
        .generate(GenerateRequest::new("cats", Difficulty::Beginner, LengthClass::Short))
        .await?;

    let deck = controller.review_deck(Some(&session.id), &WordFilter::new().with_part_of_speech("Phrasal Verb"))?;
    assert_eq!(deck.len(), 1);

    let mut review = ReviewSession::new();
    review.start(deck)?;
    review.grade(Grade::Hard)?;
    assert_eq!(review.current().map(|c| c.word.as_str()), Some("sat on"));
    review.grade(Grade::Easy)?;
    assert!(review.is_finished());
    assert_eq!(review.stats().reviewed, 2);
    Ok(())
}

#[tokio::test]
async fn test_history_deleteByPrefix_shouldRemoveSession() -> Result<()> {
    let mut controller = Controller::with_parts(Config::default(), memory_blobs(), Some(Arc::new(tutor())));
    let first = controller.analyze(SAMPLE_TEXT).await?;
    let second = controller.analyze("Another text entirely.").await?;

    assert_eq!(controller.history()[0].id, second.id);
    let deleted = controller.delete_session(&first.id[..10])?;
    assert_eq!(deleted.id, first.id);
    assert_eq!(controller.history().len(), 1);
    assert!(controller.session(&first.id).is_err());
    Ok(())
}

#[tokio::test]
async fn test_selectionLookup_shouldDefineMultiWordSpan() -> Result<()> {
    let tutor = tutor();
    let mut controller = Controller::with_parts(Config::default(), memory_blobs(), Some(Arc::new(tutor.clone())));
    let session = controller.analyze(SAMPLE_TEXT).await?;

    let result = controller.lookup(&session.id, "the mat").await?;
    assert_eq!(result.source, LookupSource::Remote);
    assert_eq!(result.item.word, "the mat");
    assert_eq!(result.item.context.as_deref(), Some("The cat sat on the mat."));

    assert!(controller.lookup(&session.id, "a dog").await.is_err());
    assert_eq!(tutor.lookup_count(), 1);
    Ok(())
}
