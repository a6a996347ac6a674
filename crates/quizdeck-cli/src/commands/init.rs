//! The `quizdeck init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing("quizdeck.toml", SAMPLE_CONFIG)?;
    write_if_missing("questions.csv", SAMPLE_QUESTIONS)?;

    println!("\nNext steps:");
    println!("  1. Edit questions.csv with your own questions");
    println!("  2. Run: quizdeck validate --questions questions.csv");
    println!("  3. Run: quizdeck take --mode all");

    Ok(())
}

fn write_if_missing(path: &str, content: &str) -> Result<()> {
    if Path::new(path).exists() {
        println!("{path} already exists, skipping.");
    } else {
        std::fs::write(path, content)?;
        println!("Created {path}");
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizdeck configuration

questions = "questions.csv"
local_dir = ".quizdeck"

# Keep progress in a remote document store instead of only on this machine.
# user_id = "${QUIZDECK_USER_ID}"
#
# [remote]
# base_url = "https://store.example.com/v1"
# api_key = "${QUIZDECK_API_KEY}"
# app_id = "quizdeck"
# timeout_secs = 10

[defaults]
# num_questions = 20
enable_timer = false
time_limit_minutes = 10
quiz_title = "Enhanced Exam Preparation Quiz"
"#;

const SAMPLE_QUESTIONS: &str = "\
QuestionNumber,QuestionText,QuestionType,OptionA,OptionB,OptionC,OptionD,Answer 1,Answer 2,Answer 3,Answer 4,BlankAnswers,LeftItems,RightItems,CorrectMatches,Explanation
1,Which planet is known as the Red Planet?,,Venus,Mars,Jupiter,Saturn,B,,,,,,,,Iron oxide gives Mars its colour.
2,Which of these are prime numbers?,,2,4,5,9,A,C,,,,,,,
3,Water boils at 100 degrees Celsius at sea level.,,True,False,,,True,,,,,,,,
4,Who wrote Hamlet?,,,,,,Shakespeare,William Shakespeare,,,,,,,
5,The capital of France is ___ and the capital of Italy is ___.,,,,,,,,,,\"Paris, Rome\",,,,
6,Match each animal to its sound.,,,,,,,,,,,\"cat, dog, cow\",\"moo, meow, woof\",\"cat-meow, dog-woof, cow-moo\",
7,Put the steps of making tea in order.,sequence,Boil water,Add tea leaves,Steep,Pour into cup,1,2,3,4,,,,,
";
