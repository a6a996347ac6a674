//! End-to-end quiz runs through the binary with scripted stdin.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CAPITALS: &str = "\
QuestionNumber,QuestionText,Answer 1,Explanation
1,Capital of France?,Paris,Paris has been the capital since 987.
2,City of lights?,Paris,
";

fn quizdeck(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("quizdeck").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env_remove("QUIZDECK_USER_ID")
        .env_remove("QUIZDECK_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn workspace(questions: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("questions.csv"), questions).unwrap();
    dir
}

#[test]
fn answering_everything_masters_the_set() {
    let dir = workspace(CAPITALS);

    quizdeck(dir.path())
        .args(["take", "--seed", "7"])
        .write_stdin("paris\n PARIS \n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 question(s) in retake mode"))
        .stdout(predicate::str::contains("Question 1/2 (Text Input)"))
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("\nExplanation: Paris has been the capital since 987.\n"))
        .stdout(predicate::str::contains("Explanation: Explanation:").not())
        .stdout(predicate::str::contains("Your Score: 2/2 (100%)"))
        .stdout(predicate::str::contains("Congratulations! You've mastered all questions!"));

    // Retake mode has nothing left to ask.
    quizdeck(dir.path())
        .arg("take")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("mastered all questions"))
        .stdout(predicate::str::contains("--mode all"));

    quizdeck(dir.path())
        .args(["take", "--mode", "all"])
        .write_stdin(":submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 question(s) in all mode"));
}

#[test]
fn sequence_without_explanation_shows_correct_order() {
    let dir = workspace(
        "QuestionNumber,QuestionText,QuestionType,OptionA,OptionB,Answer 1,Answer 2\n\
         1,Make tea,sequence,Boil water,Steep,1,2\n",
    );

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("1 2\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Perfect! Correct sequence!"))
        .stdout(predicate::str::contains("\nCorrect order: 1. Boil water → 2. Steep\n"))
        .stdout(predicate::str::contains("Explanation:").not());
}

#[test]
fn wrong_answers_come_back_in_retake_mode() {
    let dir = workspace(CAPITALS);

    quizdeck(dir.path())
        .args(["take", "--seed", "1"])
        .write_stdin("paris\nlondon\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrong! Possible answers: Paris"))
        .stdout(predicate::str::contains("Your Score: 1/2 (50%)"))
        .stdout(predicate::str::contains("1 question(s) left to retake."));

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("paris\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 question(s) in retake mode"))
        .stdout(predicate::str::contains("Your Score: 1/1 (100%)"));
}

#[test]
fn early_submit_leaves_questions_unanswered() {
    let dir = workspace(CAPITALS);

    quizdeck(dir.path())
        .arg("take")
        .write_stdin(":submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your Score: 0/2 (0%)"))
        .stdout(predicate::str::contains("Unanswered: 2"));
}

#[test]
fn skipped_question_counts_as_unanswered() {
    let dir = workspace(CAPITALS);

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("\nparis\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped."))
        .stdout(predicate::str::contains("Your Score: 1/2 (50%)"));
}

#[test]
fn unreadable_answer_asks_again() {
    let dir = workspace(
        "QuestionNumber,QuestionText,OptionA,OptionB,Answer 1\n\
         1,The sky is blue.,True,False,True\n",
    );

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("maybe\nyes\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Could not read that answer. Enter true or false"))
        .stdout(predicate::str::contains("Your Score: 1/1 (100%)"));
}

#[test]
fn partial_credit_is_half_a_point() {
    let dir = workspace(
        "QuestionNumber,QuestionText,BlankAnswers\n\
         1,The capital of France is ___ and of Italy is ___.,\"Paris, Rome\"\n",
    );

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("paris | milan\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Partial Credit! 1/2 correct."))
        .stdout(predicate::str::contains("Your Score: 0.5/1 (50%)"));
}

#[test]
fn question_cap_limits_the_quiz() {
    let dir = workspace(CAPITALS);

    quizdeck(dir.path())
        .args(["take", "--num", "1"])
        .write_stdin("paris\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 question(s) in retake mode"))
        .stdout(predicate::str::contains("Your Score: 1/1 (100%)"));
}

#[test]
fn reset_brings_everything_back() {
    let dir = workspace(CAPITALS);

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("paris\nparis\n")
        .assert()
        .success();

    quizdeck(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("mastered all questions"));

    quizdeck(dir.path())
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared recorded answers."))
        .stdout(predicate::str::contains("Cleared wrongly-answered list."));

    quizdeck(dir.path())
        .arg("take")
        .write_stdin(":submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 question(s) in retake mode"));
}

#[test]
fn report_is_written_as_json() {
    let dir = workspace(CAPITALS);
    let report_path = dir.path().join("reports").join("latest.json");

    quizdeck(dir.path())
        .args(["take", "--report"])
        .arg(&report_path)
        .write_stdin("paris\n:submit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Report saved to"));

    let content = std::fs::read_to_string(&report_path).unwrap();
    let report: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(report["result"]["total"], 2);
    assert_eq!(report["result"]["correct"], 1);
    assert_eq!(report["outcomes"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_question_file_fails() {
    let dir = TempDir::new().unwrap();

    quizdeck(dir.path())
        .arg("take")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load questions"));
}
