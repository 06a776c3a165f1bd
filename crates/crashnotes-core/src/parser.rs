//! Tolerant parsing of generated text.
//!
//! Two independent modes:
//! - course mode never fails; text that does not decode into a
//!   [`CourseContent`] comes back verbatim as a narrative.
//! - quiz mode finds the first top-level JSON array that decodes into
//!   scorable questions, and reports a [`ParseError`] otherwise.

use crate::error::ParseError;
use crate::model::{Content, CourseContent, QuizQuestion};

/// Parse a course generation result.
pub fn parse_course(raw: &str) -> Content {
    let fenced = extract_json_block(raw);
    let attempts = [fenced.as_deref(), Some(raw.trim())];

    for candidate in attempts.into_iter().flatten() {
        match serde_json::from_str::<CourseContent>(candidate) {
            Ok(course) => return Content::Course(course),
            Err(e) => tracing::debug!("course decode failed: {e}"),
        }
    }

    Content::Narrative(raw.to_string())
}

/// Parse a quiz generation result.
///
/// Arrays nested inside other JSON values are skipped over as part of their
/// parent, so `[1,2,3]`-style decoys and option lists never shadow the
/// question array.
pub fn parse_quiz(raw: &str) -> Result<Vec<QuizQuestion>, ParseError> {
    let mut first_error: Option<ParseError> = None;

    for slice in top_level_arrays(raw) {
        let value: serde_json::Value = match serde_json::from_str(slice) {
            Ok(v) => v,
            // Bracket-balanced prose such as "[citation needed]".
            Err(_) => continue,
        };

        match decode_questions(value) {
            Ok(questions) => return Ok(questions),
            Err(e) => {
                tracing::debug!("skipping array candidate: {e}");
                first_error.get_or_insert(e);
            }
        }
    }

    Err(first_error.unwrap_or(ParseError::NoJsonArray))
}

fn decode_questions(value: serde_json::Value) -> Result<Vec<QuizQuestion>, ParseError> {
    let questions: Vec<QuizQuestion> =
        serde_json::from_value(value).map_err(|e| ParseError::InvalidShape(e.to_string()))?;

    if questions.is_empty() {
        return Err(ParseError::EmptyArray);
    }

    // One bad question rejects the batch; a partial quiz cannot be scored.
    if let Some((index, question)) = questions
        .iter()
        .enumerate()
        .find(|(_, q)| !q.is_well_formed())
    {
        return Err(ParseError::InvalidShape(format!(
            "question {} has {} options and correctAnswer {}",
            index + 1,
            question.options.len(),
            question.correct_answer
        )));
    }

    Ok(questions)
}

/// Pull the body of a fenced block out of `response`.
///
/// Prefers a block labelled `json`, falls back to an unlabelled block, and
/// returns `None` when neither exists. An unclosed trailing block still
/// counts.
pub fn extract_json_block(response: &str) -> Option<String> {
    let mut json_blocks = Vec::new();
    let mut generic_blocks = Vec::new();
    let mut in_block = false;
    let mut is_json_block = false;
    let mut is_generic_block = false;
    let mut current_block = String::new();

    for line in response.lines() {
        let trimmed = line.trim();

        if !in_block && trimmed.starts_with("```") {
            in_block = true;
            let lang = trimmed.trim_start_matches('`').trim().to_lowercase();
            is_json_block = lang == "json";
            is_generic_block = lang.is_empty();
            current_block.clear();
            continue;
        }

        if in_block && trimmed == "```" {
            in_block = false;
            if is_json_block {
                json_blocks.push(std::mem::take(&mut current_block));
            } else if is_generic_block {
                generic_blocks.push(std::mem::take(&mut current_block));
            }
            current_block.clear();
            continue;
        }

        if in_block {
            if !current_block.is_empty() {
                current_block.push('\n');
            }
            current_block.push_str(line);
        }
    }

    if in_block && !current_block.is_empty() {
        if is_json_block {
            json_blocks.push(current_block);
        } else if is_generic_block {
            generic_blocks.push(current_block);
        }
    }

    json_blocks
        .into_iter()
        .next()
        .or_else(|| generic_blocks.into_iter().next())
}

/// Every bracket-balanced `[...]` slice of `text` that is not nested inside
/// another balanced `[...]` or `{...}`, in order of appearance.
fn top_level_arrays(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            open @ (b'[' | b'{') => match balanced_end(bytes, i) {
                Some(end) => {
                    if open == b'[' {
                        found.push(&text[i..=end]);
                    }
                    i = end + 1;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }

    found
}

/// Index of the bracket closing the one at `start`, honouring JSON string
/// literals and escapes. `None` when brackets are mismatched or unclosed.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'[' => stack.push(b']'),
            b'{' => stack.push(b'}'),
            b']' | b'}' => {
                if stack.pop() != Some(b) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CourseSection, Resource};

    const COURSE_JSON: &str = r#"{
  "title": "Rust in a Hurry",
  "overview": "Memory safety without a garbage collector.",
  "sections": [
    {"heading": "Ownership", "content": "Every value has a single owner."},
    {"heading": "Borrowing", "content": "References must not outlive data."}
  ],
  "resources": [
    {"name": "The Rust Book", "url": "https://doc.rust-lang.org/book/"}
  ]
}"#;

    fn question(text: &str, correct: usize) -> serde_json::Value {
        serde_json::json!({
            "question": text,
            "options": ["a", "b", "c", "d"],
            "correctAnswer": correct
        })
    }

    fn five_questions() -> String {
        let qs: Vec<_> = (0..5).map(|i| question(&format!("Q{i}?"), i % 4)).collect();
        serde_json::to_string(&qs).unwrap()
    }

    #[test]
    fn fenced_json_course_decodes() {
        let raw = format!("```json\n{COURSE_JSON}\n```");
        let Content::Course(course) = parse_course(&raw) else {
            panic!("expected structured course");
        };
        assert_eq!(course.title, "Rust in a Hurry");
        assert_eq!(
            course.sections,
            vec![
                CourseSection {
                    heading: "Ownership".into(),
                    content: "Every value has a single owner.".into()
                },
                CourseSection {
                    heading: "Borrowing".into(),
                    content: "References must not outlive data.".into()
                },
            ]
        );
        assert_eq!(
            course.resources,
            vec![Resource {
                name: "The Rust Book".into(),
                url: "https://doc.rust-lang.org/book/".into()
            }]
        );
    }

    #[test]
    fn bare_json_course_decodes() {
        assert!(parse_course(COURSE_JSON).is_structured());
    }

    #[test]
    fn course_behind_preamble_decodes() {
        let raw = format!("Here is your course:\n\n```\n{COURSE_JSON}\n```\nEnjoy!");
        assert!(parse_course(&raw).is_structured());
    }

    #[test]
    fn prose_comes_back_verbatim() {
        let raw = "## Concept 1\n\nPlants turn light into sugar.\n\n### Recommended Resources\n- A book";
        assert_eq!(parse_course(raw), Content::Narrative(raw.to_string()));
    }

    #[test]
    fn course_missing_field_degrades_to_narrative() {
        let raw = r#"{"title": "T", "overview": "O", "sections": []}"#;
        assert_eq!(parse_course(raw), Content::Narrative(raw.to_string()));
    }

    #[test]
    fn course_with_wrong_section_shape_degrades() {
        let raw = r#"{"title": "T", "overview": "O", "sections": ["one"], "resources": []}"#;
        assert!(!parse_course(raw).is_structured());
    }

    #[test]
    fn quiz_bare_array() {
        let questions = parse_quiz(&five_questions()).unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[2].correct_answer, 2);
    }

    #[test]
    fn quiz_in_fence_with_prose() {
        let raw = format!("Sure! Here is your quiz:\n```json\n{}\n```\nGood luck.", five_questions());
        assert_eq!(parse_quiz(&raw).unwrap().len(), 5);
    }

    #[test]
    fn quiz_skips_decoy_array() {
        let raw = format!("Counting: [1,2,3]. Now the quiz:\n{}", five_questions());
        let questions = parse_quiz(&raw).unwrap();
        assert_eq!(questions.len(), 5);
        assert_eq!(questions[0].question, "Q0?");
    }

    #[test]
    fn quiz_ignores_brackets_inside_strings() {
        let raw = serde_json::to_string(&vec![serde_json::json!({
            "question": "What does `v[0]` return for ] and [?",
            "options": ["[", "]", "\"[]\"", "none"],
            "correctAnswer": 3
        })])
        .unwrap();
        let questions = parse_quiz(&raw).unwrap();
        assert_eq!(questions[0].options[2], "\"[]\"");
    }

    #[test]
    fn quiz_without_array_fails() {
        assert_eq!(
            parse_quiz("I cannot make a quiz about that."),
            Err(ParseError::NoJsonArray)
        );
    }

    #[test]
    fn quiz_bracketed_prose_is_not_an_array() {
        assert_eq!(
            parse_quiz("Einstein [citation needed] was a physicist."),
            Err(ParseError::NoJsonArray)
        );
    }

    #[test]
    fn quiz_empty_array_fails() {
        assert_eq!(parse_quiz("[]"), Err(ParseError::EmptyArray));
    }

    #[test]
    fn quiz_single_bad_question_fails_batch() {
        let mut qs: Vec<_> = (0..4).map(|i| question(&format!("Q{i}"), 0)).collect();
        qs.push(serde_json::json!({
            "question": "three options",
            "options": ["a", "b", "c"],
            "correctAnswer": 0
        }));
        let err = parse_quiz(&serde_json::to_string(&qs).unwrap()).unwrap_err();
        assert_eq!(err.reason(), "invalid-shape");
    }

    #[test]
    fn quiz_answer_out_of_range_fails() {
        let raw = serde_json::to_string(&vec![question("Q", 4)]).unwrap();
        assert_eq!(parse_quiz(&raw).unwrap_err().reason(), "invalid-shape");

        let negative = r#"[{"question": "Q", "options": ["a","b","c","d"], "correctAnswer": -1}]"#;
        assert_eq!(parse_quiz(negative).unwrap_err().reason(), "invalid-shape");
    }

    #[test]
    fn quiz_only_decoy_reports_invalid_shape() {
        assert_eq!(parse_quiz("[1, 2, 3]").unwrap_err().reason(), "invalid-shape");
    }

    #[test]
    fn quiz_array_inside_object_is_not_top_level() {
        let raw = format!("{{\"quiz\": {}}}", five_questions());
        assert_eq!(parse_quiz(&raw), Err(ParseError::NoJsonArray));
    }

    #[test]
    fn extract_prefers_json_block() {
        let raw = "```\nplain\n```\n\n```json\n{\"a\": 1}\n```";
        assert_eq!(extract_json_block(raw).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn extract_unclosed_block() {
        let raw = "```json\n{\"a\": 1}";
        assert_eq!(extract_json_block(raw).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn extract_ignores_other_languages() {
        assert_eq!(extract_json_block("```python\nprint(1)\n```"), None);
    }
}
