//! The `quizapp init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizapp.toml").exists() {
        println!("quizapp.toml already exists, skipping.");
    } else {
        std::fs::write("quizapp.toml", SAMPLE_CONFIG)?;
        println!("Created quizapp.toml");
    }

    println!("\nNext steps:");
    println!("  1. Adjust quizapp.toml if you want a different category or difficulty");
    println!("  2. Run: quizapp preview");
    println!("  3. Run: quizapp play");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizapp configuration

[source]
base_url = "https://opentdb.com"
amount = 10
category = 18
difficulty = "medium"
type = "multiple"
timeout_secs = 15

[quiz]
question_time_secs = 30
points_per_correct = 10
urgent_threshold_secs = 5
"#;
