/*!
 * Tests for the persisted application state
 */

use std::sync::{Arc, Mutex};

use lingotutor::errors::AppError;
use lingotutor::session::{Action, HISTORY_KEY, PracticeSession, SAVED_WORDS_KEY, SessionOrigin, TutorStore};
use lingotutor::storage::{BlobStore, DatabaseConnection, KvRepository};
use lingotutor::tutor::{Evaluation, TokenUsage};
use lingotutor::vocabulary::VocabularyItem;

use crate::common::{create_temp_dir, init_test_logging, memory_blobs, sample_study};

fn open_at(path: &std::path::Path) -> TutorStore {
    let repo = KvRepository::new(DatabaseConnection::open(path).unwrap());
    TutorStore::open(Arc::new(repo))
}

fn new_session() -> PracticeSession {
    PracticeSession::new(sample_study(), TokenUsage::new(100, 50), SessionOrigin::Analyzed)
}

#[test]
fn test_dispatch_shouldSurviveReopeningTheDatabase() {
    init_test_logging();
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("state").join("lingotutor.db");

    let session = new_session();
    {
        let mut store = open_at(&path);
        store.dispatch(Action::StartSession(session.clone())).unwrap();
        store
            .dispatch(Action::FinishSession {
                id: session.id.clone(),
                translation: "El gato se sentó en la alfombra.".to_string(),
                evaluation: Evaluation {
                    score: 92,
                    feedback: "Muy bien".to_string(),
                    corrected_translation: "El gato se sentó en la alfombrilla.".to_string(),
                    key_improvements: vec!["alfombrilla".to_string()],
                    difficult_words: vec!["mat".to_string()],
                },
                usage: TokenUsage::new(10, 10),
            })
            .unwrap();
        store.dispatch(Action::SaveWord(session.vocabulary[0].clone())).unwrap();
    }

    let reopened = open_at(&path);
    assert_eq!(reopened.history().len(), 1);
    let restored = &reopened.history()[0];
    assert_eq!(restored.id, session.id);
    assert_eq!(restored.evaluation.as_ref().map(|e| e.score), Some(92));
    assert_eq!(restored.usage.total_tokens, 170);
    assert_eq!(reopened.saved_words(), &session.vocabulary[..]);
}

#[test]
fn test_subscribers_shouldObserveEveryDispatchedAction() {
    let mut store = TutorStore::open(memory_blobs());
    let observed: Arc<Mutex<Vec<Action>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = observed.clone();
    store.subscribe(Box::new(move |action, _state| sink.lock().unwrap().push(action.clone())));

    let session = new_session();
    let actions = vec![
        Action::StartSession(session.clone()),
        Action::RecordUsage { id: session.id.clone(), usage: TokenUsage::new(1, 1) },
        Action::SaveWord(VocabularyItem::new("mat", "d", "t")),
        Action::UnsaveWord("MAT".to_string()),
        Action::DeleteSession(session.id.clone()),
    ];
    for action in actions.clone() {
        store.dispatch(action).unwrap();
    }

    assert_eq!(*observed.lock().unwrap(), actions);
}

#[test]
fn test_dispatch_rejectedAction_shouldNotNotify() {
    let mut store = TutorStore::open(memory_blobs());
    let count = Arc::new(Mutex::new(0));
    let sink = count.clone();
    store.subscribe(Box::new(move |_, _| *sink.lock().unwrap() += 1));

    let result = store.dispatch(Action::DeleteSession("nope".to_string()));
    assert!(matches!(result, Err(AppError::SessionNotFound(_))));
    assert_eq!(*count.lock().unwrap(), 0);
}

#[test]
fn test_open_withUnreadableBlobs_shouldStartEmpty() {
    let blobs = memory_blobs();
    blobs.write(HISTORY_KEY, "[{\"id\": 3}]").unwrap();
    blobs.write(SAVED_WORDS_KEY, "null").unwrap();

    let mut store = TutorStore::open(blobs.clone());
    assert!(store.history().is_empty());
    assert!(store.saved_words().is_empty());

    store.dispatch(Action::StartSession(new_session())).unwrap();
    let raw = blobs.read(HISTORY_KEY).unwrap().unwrap();
    assert!(raw.starts_with('['));
}
