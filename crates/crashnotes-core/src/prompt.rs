//! Prompt builders and default model candidates.

use crate::model::{candidates, ModelCandidate, Topic};

/// Models tried, in order, for course generation.
pub const DEFAULT_COURSE_MODELS: [&str; 3] =
    ["gemini-2.5-flash", "gemini-2.0-flash", "gemini-2.5-pro"];

/// Models tried, in order, for quiz generation.
pub const DEFAULT_QUIZ_MODELS: [&str; 3] =
    ["gemini-1.5-flash", "gemini-1.5-flash-8b", "gemini-1.0-pro"];

/// Number of questions requested per quiz.
pub const QUIZ_QUESTION_COUNT: usize = 5;

pub fn default_course_candidates() -> Vec<ModelCandidate> {
    candidates(DEFAULT_COURSE_MODELS)
}

pub fn default_quiz_candidates() -> Vec<ModelCandidate> {
    candidates(DEFAULT_QUIZ_MODELS)
}

/// Build the crash-course prompt.
///
/// With `structured` set the model is asked for the strict course JSON shape;
/// the parser still accepts a plain narrative if it ignores the instruction.
pub fn course_prompt(topic: &Topic, structured: bool) -> String {
    let mut prompt = format!(
        "Create a comprehensive \"Crash Course\" on \"{topic}\". Break it down into 3-5 key \
         concepts using clear, engaging language suitable for a beginner. \n\n\
         Crucially, end with a specific section titled \"Recommended Resources\" containing 3 \
         unique, high-quality resources (books, videos, or websites) to learn more about {topic}."
    );
    if structured {
        prompt.push_str(
            "\n\nRespond ONLY with a JSON object of this exact shape, with no other text:\n\
             {\"title\": string, \"overview\": string, \
             \"sections\": [{\"heading\": string, \"content\": string}], \
             \"resources\": [{\"name\": string, \"url\": string}]}\n\
             Each section is one key concept; \"resources\" holds the recommended resources.",
        );
    }
    prompt
}

/// Build the quiz prompt.
pub fn quiz_prompt(topic: &Topic) -> String {
    format!(
        "Generate a {QUIZ_QUESTION_COUNT}-question multiple choice quiz about \"{topic}\". \n\
         Return ONLY a JSON array of objects. Each object must have:\n\
         \"question\": string,\n\
         \"options\": array of 4 strings,\n\
         \"correctAnswer\": integer (0-3, index of the correct option).\n\
         Do not include any other text or markdown formatting outside the JSON array."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_prompt_mentions_topic_and_resources() {
        let topic = Topic::new("Black Holes").unwrap();
        let prompt = course_prompt(&topic, false);
        assert!(prompt.contains("\"Black Holes\""));
        assert!(prompt.contains("Recommended Resources"));
        assert!(!prompt.contains("JSON"));
    }

    #[test]
    fn structured_course_prompt_requests_json_shape() {
        let topic = Topic::new("Black Holes").unwrap();
        let prompt = course_prompt(&topic, true);
        assert!(prompt.contains("\"sections\""));
        assert!(prompt.contains("\"resources\""));
    }

    #[test]
    fn quiz_prompt_requests_array() {
        let topic = Topic::new("Photosynthesis").unwrap();
        let prompt = quiz_prompt(&topic);
        assert!(prompt.contains("5-question"));
        assert!(prompt.contains("correctAnswer"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn default_candidate_order_is_fixed() {
        let ids: Vec<String> = default_course_candidates()
            .iter()
            .map(|c| c.id().to_string())
            .collect();
        assert_eq!(ids, DEFAULT_COURSE_MODELS);
    }
}
