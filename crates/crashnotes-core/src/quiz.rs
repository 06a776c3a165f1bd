//! Quiz session state machine.
//!
//! The session never performs I/O. Feeding it a [`QuizEvent`] updates its
//! state and may return a [`QuizEffect`] for the caller to execute; the
//! outcome of that effect comes back as [`QuizEvent::Generated`] tagged with
//! the token it was issued under. Results carrying any other token are
//! dropped, which is how a quiz for an abandoned topic is kept from
//! overwriting the current one.
//!
//! ```text
//! Idle --start--> Loading --ok--> InProgress(0) --select--> AnswerRevealed(0)
//!                    |                ^                          |
//!                    |                +----------next------------+
//!                  fail                                          | next (last)
//!                    v                                           v
//!                  Error --retry/restart--> Loading          Completed <--back-- Reviewing
//!                                                                | review --------^
//!                                                                +--restart--> Loading
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{ParseError, QuizError};
use crate::model::{GenerationToken, QuizQuestion, Topic};

/// Message shown when a quiz cannot be produced.
pub const QUIZ_UNAVAILABLE_MESSAGE: &str =
    "Unable to generate quiz at the moment. Please try again later or try a different topic.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuizPhase {
    /// No quiz requested yet.
    Idle,
    Loading,
    Error,
    InProgress,
    AnswerRevealed,
    Completed,
    Reviewing,
}

/// Inputs to the session.
#[derive(Debug, Clone)]
pub enum QuizEvent {
    /// Request a quiz for a topic. Replaces whatever the session held.
    Start(Topic),
    /// Outcome of a [`QuizEffect::RequestQuiz`].
    Generated {
        token: GenerationToken,
        result: Result<Vec<QuizQuestion>, QuizError>,
    },
    Retry,
    Restart,
    SelectOption(usize),
    Next,
    Review,
    Back,
}

/// Work the caller must perform on the session's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEffect {
    RequestQuiz { token: GenerationToken, topic: Topic },
}

/// Result bucket shown after the last question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Perfect,
    Solid,
    KeepStudying,
}

impl Verdict {
    pub fn message(self) -> &'static str {
        match self {
            Verdict::Perfect => "Perfect Score! You're a master!",
            Verdict::Solid => "Great job! You've got the basics down.",
            Verdict::KeepStudying => "Keep studying! You'll get it next time.",
        }
    }
}

/// Read-only view of one answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewItem<'a> {
    pub number: usize,
    pub question: &'a str,
    pub options: &'a [String],
    pub selected: Option<usize>,
    pub correct: usize,
    pub is_correct: bool,
}

/// A scored walk through one generated quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    topic: Option<Topic>,
    token: GenerationToken,
    phase: QuizPhase,
    questions: Vec<QuizQuestion>,
    current_index: usize,
    score: usize,
    answers: BTreeMap<usize, usize>,
    selected: Option<usize>,
    error: Option<QuizError>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            topic: None,
            token: GenerationToken::default(),
            phase: QuizPhase::Idle,
            questions: Vec::new(),
            current_index: 0,
            score: 0,
            answers: BTreeMap::new(),
            selected: None,
            error: None,
        }
    }

    /// Functional form of [`QuizSession::handle`].
    pub fn apply(mut self, event: QuizEvent) -> (Self, Option<QuizEffect>) {
        let effect = self.handle(event);
        (self, effect)
    }

    /// Apply one event. Events that make no sense in the current phase are
    /// ignored.
    pub fn handle(&mut self, event: QuizEvent) -> Option<QuizEffect> {
        match event {
            QuizEvent::Start(topic) => self.start(topic),
            QuizEvent::Generated { token, result } => {
                self.on_generated(token, result);
                None
            }
            QuizEvent::Retry => match self.phase {
                QuizPhase::Error => self.begin_loading(),
                _ => self.ignore("retry"),
            },
            QuizEvent::Restart => match self.phase {
                QuizPhase::Completed | QuizPhase::Error => self.begin_loading(),
                _ => self.ignore("restart"),
            },
            QuizEvent::SelectOption(option) => {
                self.select(option);
                None
            }
            QuizEvent::Next => {
                self.next();
                None
            }
            QuizEvent::Review => {
                if self.phase == QuizPhase::Completed {
                    self.phase = QuizPhase::Reviewing;
                    None
                } else {
                    self.ignore("review")
                }
            }
            QuizEvent::Back => {
                if self.phase == QuizPhase::Reviewing {
                    self.phase = QuizPhase::Completed;
                    None
                } else {
                    self.ignore("back")
                }
            }
        }
    }

    fn start(&mut self, topic: Topic) -> Option<QuizEffect> {
        let duplicate = self.phase == QuizPhase::Loading
            && self.topic.as_ref().is_some_and(|t| t.same_subject(&topic));
        if duplicate {
            tracing::debug!("quiz for {topic} already loading, ignoring duplicate start");
            return None;
        }
        self.topic = Some(topic);
        self.begin_loading()
    }

    /// Full reset under a fresh token.
    fn begin_loading(&mut self) -> Option<QuizEffect> {
        let topic = self.topic.clone()?;
        self.token = self.token.next();
        self.phase = QuizPhase::Loading;
        self.questions.clear();
        self.current_index = 0;
        self.score = 0;
        self.answers.clear();
        self.selected = None;
        self.error = None;
        Some(QuizEffect::RequestQuiz {
            token: self.token,
            topic,
        })
    }

    fn on_generated(&mut self, token: GenerationToken, result: Result<Vec<QuizQuestion>, QuizError>) {
        if token != self.token || self.phase != QuizPhase::Loading {
            tracing::debug!("discarding stale quiz result {token} (current {})", self.token);
            return;
        }

        match result {
            Ok(questions) if !questions.is_empty() => {
                self.questions = questions;
                self.current_index = 0;
                self.score = 0;
                self.answers.clear();
                self.selected = None;
                self.phase = QuizPhase::InProgress;
            }
            Ok(_) => self.fail(ParseError::EmptyArray.into()),
            Err(e) => self.fail(e),
        }
    }

    fn fail(&mut self, error: QuizError) {
        tracing::warn!("quiz generation failed: {error}");
        self.error = Some(error);
        self.phase = QuizPhase::Error;
    }

    fn select(&mut self, option: usize) {
        if self.phase != QuizPhase::InProgress {
            tracing::debug!("ignoring selection in phase {:?}", self.phase);
            return;
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return;
        };
        if option >= question.options.len() {
            tracing::debug!("ignoring out-of-range option {option}");
            return;
        }

        if question.is_correct(option) {
            self.score += 1;
        }
        self.answers.insert(self.current_index, option);
        self.selected = Some(option);
        self.phase = QuizPhase::AnswerRevealed;
    }

    fn next(&mut self) {
        if self.phase != QuizPhase::AnswerRevealed {
            tracing::debug!("ignoring next in phase {:?}", self.phase);
            return;
        }
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            self.selected = None;
            self.phase = QuizPhase::InProgress;
        } else {
            self.phase = QuizPhase::Completed;
        }
    }

    fn ignore(&self, what: &str) -> Option<QuizEffect> {
        tracing::debug!("ignoring {what} in phase {:?}", self.phase);
        None
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn topic(&self) -> Option<&Topic> {
        self.topic.as_ref()
    }

    /// Token of the most recent request.
    pub fn token(&self) -> GenerationToken {
        self.token
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match self.phase {
            QuizPhase::InProgress | QuizPhase::AnswerRevealed => {
                self.questions.get(self.current_index)
            }
            _ => None,
        }
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Selected option per question index.
    pub fn answers(&self) -> &BTreeMap<usize, usize> {
        &self.answers
    }

    /// Option picked for the current question, if revealed.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn error(&self) -> Option<&QuizError> {
        self.error.as_ref()
    }

    /// Whether a request is outstanding; the start control is disabled then.
    pub fn is_loading(&self) -> bool {
        self.phase == QuizPhase::Loading
    }

    pub fn verdict(&self) -> Option<Verdict> {
        if !matches!(self.phase, QuizPhase::Completed | QuizPhase::Reviewing) {
            return None;
        }
        let total = self.total();
        Some(if self.score == total {
            Verdict::Perfect
        } else if self.score * 2 >= total {
            Verdict::Solid
        } else {
            Verdict::KeepStudying
        })
    }

    /// Every question with the user's answer, for the review screen.
    pub fn review(&self) -> Vec<ReviewItem<'_>> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let selected = self.answers.get(&index).copied();
                ReviewItem {
                    number: index + 1,
                    question: &q.question,
                    options: &q.options,
                    selected,
                    correct: q.correct_answer,
                    is_correct: selected.is_some_and(|s| q.is_correct(s)),
                }
            })
            .collect()
    }
}
