//! Course page state machine.
//!
//! Same shape as the quiz session: events in, effects out, stale generation
//! results dropped by token.

use crate::error::GenerationError;
use crate::model::{Content, GenerationToken, RecentNote, Topic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoursePhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
pub enum CourseEvent {
    Submit(Topic),
    Generated {
        token: GenerationToken,
        result: Result<Content, GenerationError>,
    },
    /// Show a cached note. Never touches the network.
    Recall(RecentNote),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseEffect {
    Generate { token: GenerationToken, topic: Topic },
    /// Store a fresh result in the recent-topics cache.
    Record { topic: Topic, content: Content },
}

/// What the course page shows.
#[derive(Debug, Clone)]
pub struct CourseView {
    phase: CoursePhase,
    token: GenerationToken,
    topic: Option<Topic>,
    content: Option<Content>,
    error: Option<String>,
}

impl Default for CourseView {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseView {
    pub fn new() -> Self {
        Self {
            phase: CoursePhase::Idle,
            token: GenerationToken::default(),
            topic: None,
            content: None,
            error: None,
        }
    }

    pub fn handle(&mut self, event: CourseEvent) -> Option<CourseEffect> {
        match event {
            CourseEvent::Submit(topic) => {
                if !self.can_submit(&topic) {
                    tracing::debug!("generation for {topic} already in flight");
                    return None;
                }
                self.token = self.token.next();
                self.phase = CoursePhase::Loading;
                self.topic = Some(topic.clone());
                self.content = None;
                self.error = None;
                Some(CourseEffect::Generate {
                    token: self.token,
                    topic,
                })
            }
            CourseEvent::Generated { token, result } => {
                if token != self.token || self.phase != CoursePhase::Loading {
                    tracing::debug!("discarding stale course result {token}");
                    return None;
                }
                let topic = self.topic.clone()?;
                match result {
                    Ok(content) => {
                        self.phase = CoursePhase::Ready;
                        self.content = Some(content.clone());
                        Some(CourseEffect::Record { topic, content })
                    }
                    Err(e) => {
                        self.phase = CoursePhase::Failed;
                        self.content = None;
                        self.error = Some(format!(
                            "Failed to generate crash course. Error: {}",
                            e.detail()
                        ));
                        None
                    }
                }
            }
            CourseEvent::Recall(note) => {
                // Supersede anything in flight.
                self.token = self.token.next();
                self.phase = CoursePhase::Ready;
                self.topic = Some(note.topic);
                self.content = Some(note.content);
                self.error = None;
                None
            }
        }
    }

    /// A submit is accepted unless the same topic is already loading.
    pub fn can_submit(&self, topic: &Topic) -> bool {
        !(self.phase == CoursePhase::Loading
            && self.topic.as_ref().is_some_and(|t| t.same_subject(topic)))
    }

    pub fn phase(&self) -> CoursePhase {
        self.phase
    }

    pub fn token(&self) -> GenerationToken {
        self.token
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
