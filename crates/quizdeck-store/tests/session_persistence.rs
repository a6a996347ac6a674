//! Sessions backed by real stores, across restarts.

use std::sync::Arc;

use quizdeck_core::model::{QuizMode, Settings, Verdict};
use quizdeck_core::response::Response;
use quizdeck_core::session::QuizSession;
use quizdeck_core::traits::Store;
use quizdeck_store::{FallbackStore, LocalStore, MemoryStore, RemoteStore};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const QUESTIONS: &str = "\
QuestionNumber,QuestionText,OptionA,OptionB,OptionC,Answer 1,Answer 2,LeftItems,RightItems,CorrectMatches
1,Which are noble gases?,Helium,Oxygen,Neon,A,C,,,
2,Water boils at 100C at sea level,True,False,,True,,,,
3,Chemical symbol for gold?,,,,Au,,,,
4,Match the elements,,,,,,\"H, O\",\"Hydrogen, Oxygen\",\"H-Hydrogen, O-Oxygen\"
";

fn index_of(session: &QuizSession, text: &str) -> usize {
    session
        .questions()
        .position(|q| q.text == text)
        .expect("question is displayed")
}

async fn answer_two(session: &mut QuizSession) {
    let gold = index_of(session, "Chemical symbol for gold?");
    session.respond(gold, Response::Text("au".into())).unwrap();
    assert_eq!(session.validate(gold).unwrap(), Verdict::Correct);

    let gases = index_of(session, "Which are noble gases?");
    session.respond(gases, Response::choices(["A"])).unwrap();
    assert_eq!(session.validate(gases).unwrap(), Verdict::Partial);

    session.flush().await;
}

#[tokio::test]
async fn local_progress_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(LocalStore::new(dir.path()));

    let mut first = QuizSession::new(Arc::clone(&store), "local").with_seed(3);
    first.restore().await;
    assert_eq!(first.load(QUESTIONS).unwrap(), 4);
    answer_two(&mut first).await;
    first.update_settings(Settings {
        quiz_title: "Chemistry".into(),
        ..Settings::default()
    });
    first.flush().await;
    drop(first);

    let mut second = QuizSession::new(store, "local").with_seed(3);
    second.restore().await;
    assert_eq!(second.settings().quiz_title, "Chemistry");
    assert_eq!(second.load(QUESTIONS).unwrap(), 3);
    assert!(second
        .questions()
        .all(|q| q.text != "Chemical symbol for gold?"));

    let stats = second.stats();
    assert_eq!((stats.correct, stats.wrong, stats.unanswered), (1, 1, 2));

    second.set_mode(QuizMode::All);
    assert_eq!(second.len(), 4);
}

#[tokio::test]
async fn reset_clears_local_files() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn Store> = Arc::new(LocalStore::new(dir.path()));

    let mut session = QuizSession::new(Arc::clone(&store), "local").with_seed(5);
    session.load(QUESTIONS).unwrap();
    answer_two(&mut session).await;
    assert!(dir.path().join("quiz_session_answers.json").exists());

    session.reset();
    session.flush().await;
    assert!(!dir.path().join("quiz_session_answers.json").exists());
    assert!(!dir.path().join("quiz_wrong_answers.json").exists());

    let mut fresh = QuizSession::new(store, "local");
    fresh.restore().await;
    fresh.load(QUESTIONS).unwrap();
    assert_eq!(fresh.stats().unanswered, 4);
}

#[tokio::test]
async fn unreachable_remote_falls_back_to_local() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let remote = RemoteStore::new(&server.uri(), "key", "quizdeck").unwrap();
    let store: Arc<dyn Store> = Arc::new(FallbackStore::new(
        Arc::new(remote),
        Arc::new(LocalStore::new(dir.path())),
    ));

    let mut session = QuizSession::new(Arc::clone(&store), "student-1").with_seed(9);
    session.restore().await;
    session.load(QUESTIONS).unwrap();
    answer_two(&mut session).await;

    assert!(dir.path().join("quiz_session_answers.json").exists());

    let mut again = QuizSession::new(store, "student-1");
    again.restore().await;
    again.load(QUESTIONS).unwrap();
    assert_eq!(again.stats().correct, 1);
}

#[tokio::test]
async fn writes_reach_store_in_order() {
    let store = Arc::new(MemoryStore::new());
    let mut session = QuizSession::new(store.clone(), "u").with_seed(1);
    session.load(QUESTIONS).unwrap();

    let gold = index_of(&session, "Chemical symbol for gold?");
    session.respond(gold, Response::Text("Ag".into())).unwrap();
    session.validate(gold).unwrap();
    session.respond(gold, Response::Text("Au".into())).unwrap();
    session.validate(gold).unwrap();
    session.flush().await;

    let state = store.state("u").unwrap();
    assert_eq!(
        state.session_answers.unwrap()["Chemical symbol for gold?"],
        Verdict::Correct
    );
    assert_eq!(state.wrongly_answered, Some(vec![]));
    assert_eq!(store.save_count(), 2);
}
