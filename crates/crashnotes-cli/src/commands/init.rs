//! The `crashnotes init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("crashnotes.toml").exists() {
        println!("crashnotes.toml already exists, skipping.");
    } else {
        std::fs::write("crashnotes.toml", SAMPLE_CONFIG)?;
        println!("Created crashnotes.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set GEMINI_API_KEY (or edit api_key in crashnotes.toml)");
    println!("  2. Run: crashnotes learn \"Quantum Physics\"");
    println!("  3. Run: crashnotes quiz \"Quantum Physics\"");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# crashnotes configuration

api_key = "${GEMINI_API_KEY}"
base_url = "https://generativelanguage.googleapis.com"

# Tried in order until one answers.
course_models = ["gemini-2.5-flash", "gemini-2.0-flash", "gemini-2.5-pro"]
quiz_models = ["gemini-1.5-flash", "gemini-1.5-flash-8b", "gemini-1.0-pro"]

# Ask for a structured course (title, overview, sections, resources).
structured_course = true
timeout_secs = 120
"#;
