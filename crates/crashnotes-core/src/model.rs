//! Core data model types for crashnotes.
//!
//! Topics, model candidates, generated course content, cached notes and quiz
//! questions. Everything here is plain data; behaviour lives in the modules
//! that consume it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TopicError;

/// A user-supplied subject to learn about.
///
/// Always trimmed and never empty. Two topics are the same subject when
/// their [`Topic::normalized`] keys match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TopicError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded comparison key.
    pub fn normalized(&self) -> String {
        self.0.to_lowercase()
    }

    /// Whether `other` names the same subject, ignoring case.
    pub fn same_subject(&self, other: &Topic) -> bool {
        self.normalized() == other.normalized()
    }
}

impl TryFrom<String> for Topic {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Topic::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One backend model identifier, tried in a fixed fallback order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCandidate(String);

impl ModelCandidate {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelCandidate {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Build an ordered candidate list from plain identifiers.
pub fn candidates<I, S>(ids: I) -> Vec<ModelCandidate>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ids.into_iter().map(ModelCandidate::new).collect()
}

/// A structured crash course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseContent {
    pub title: String,
    pub overview: String,
    pub sections: Vec<CourseSection>,
    pub resources: Vec<Resource>,
}

/// One key concept of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSection {
    pub heading: String,
    pub content: String,
}

/// A recommended book, video or website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub url: String,
}

/// The result of a course generation.
///
/// Exactly one representation is active: the typed course when the model
/// answered with the expected JSON shape, otherwise the raw narrative text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Course(CourseContent),
    Narrative(String),
}

impl Content {
    pub fn is_structured(&self) -> bool {
        matches!(self, Content::Course(_))
    }

    /// Render as plain markdown-ish text for consumers that only take a string
    /// (clipboard, speech synthesis, export).
    pub fn to_plain_text(&self) -> String {
        match self {
            Content::Narrative(text) => text.clone(),
            Content::Course(course) => {
                let mut out = format!("# {}\n\n{}\n", course.title, course.overview);
                for section in &course.sections {
                    out.push_str(&format!("\n## {}\n\n{}\n", section.heading, section.content));
                }
                if !course.resources.is_empty() {
                    out.push_str("\n## Recommended Resources\n\n");
                    for resource in &course.resources {
                        out.push_str(&format!("- {} <{}>\n", resource.name, resource.url));
                    }
                }
                out
            }
        }
    }
}

/// A cached (topic, content) pair in the recency list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentNote {
    pub topic: Topic,
    pub content: Content,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl RecentNote {
    pub fn new(topic: Topic, content: Content) -> Self {
        Self {
            topic,
            content,
            recorded_at: Utc::now(),
        }
    }
}

/// A multiple-choice question with exactly four options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(rename = "correctAnswer")]
    pub correct_answer: usize,
}

/// Number of options every quiz question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

impl QuizQuestion {
    /// Whether the question can be scored: four options and an answer index
    /// that points at one of them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == OPTIONS_PER_QUESTION && self.correct_answer < OPTIONS_PER_QUESTION
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer
    }
}

/// Identifies one generation request so that late results can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct GenerationToken(u64);

impl GenerationToken {
    pub fn value(self) -> u64 {
        self.0
    }

    /// The token following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for GenerationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
