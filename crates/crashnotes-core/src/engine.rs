//! Generation orchestrator.
//!
//! Runs the effects emitted by [`CourseView`] and [`QuizSession`] against the
//! fallback client, the parser and the recent-topics cache, and feeds the
//! outcomes back in. The state machines stay free of I/O; this is the only
//! place where their effects meet the network and the store.

use crate::course::{CourseEffect, CourseEvent, CourseView};
use crate::error::{GenerationError, QuizError};
use crate::fallback::FallbackClient;
use crate::model::{Content, ModelCandidate, QuizQuestion, RecentNote, Topic};
use crate::parser;
use crate::prompt::{self, default_course_candidates, default_quiz_candidates};
use crate::quiz::{QuizEffect, QuizEvent, QuizSession};
use crate::recent::RecentTopicsCache;

/// Which models to try and how to ask them.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Candidates for course generation, in priority order.
    pub course_candidates: Vec<ModelCandidate>,
    /// Candidates for quiz generation, in priority order.
    pub quiz_candidates: Vec<ModelCandidate>,
    /// Ask for the structured course JSON shape instead of free prose.
    pub structured_course: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            course_candidates: default_course_candidates(),
            quiz_candidates: default_quiz_candidates(),
            structured_course: true,
        }
    }
}

/// Ties the fallback client, parser and cache together.
pub struct Orchestrator {
    client: FallbackClient,
    cache: RecentTopicsCache,
    settings: GenerationSettings,
}

impl Orchestrator {
    pub fn new(
        client: FallbackClient,
        cache: RecentTopicsCache,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            client,
            cache,
            settings,
        }
    }

    pub fn cache(&self) -> &RecentTopicsCache {
        &self.cache
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    /// Generate a course. Parse failures degrade to a narrative.
    pub async fn generate_course(&self, topic: &Topic) -> Result<Content, GenerationError> {
        let structured = self.settings.structured_course;
        let response = self
            .client
            .generate(
                topic,
                |t| prompt::course_prompt(t, structured),
                &self.settings.course_candidates,
            )
            .await?;
        let content = parser::parse_course(&response.text);
        if !content.is_structured() && structured {
            tracing::info!("{} answered with prose, keeping it as narrative", response.model);
        }
        Ok(content)
    }

    /// Generate a quiz. Parse failures are errors.
    pub async fn generate_quiz(&self, topic: &Topic) -> Result<Vec<QuizQuestion>, QuizError> {
        let response = self
            .client
            .generate(topic, prompt::quiz_prompt, &self.settings.quiz_candidates)
            .await?;
        Ok(parser::parse_quiz(&response.text)?)
    }

    /// Submit a topic on the course page and run it to completion.
    ///
    /// The topic becomes the last used topic as soon as it is submitted; a
    /// successful result is recorded in the recent-topics cache.
    pub async fn submit_course(&self, view: &mut CourseView, topic: Topic) {
        let mut effect = view.handle(CourseEvent::Submit(topic));

        while let Some(next) = effect.take() {
            effect = match next {
                CourseEffect::Generate { token, topic } => {
                    self.cache.remember_topic(&topic);
                    let result = self.generate_course(&topic).await;
                    view.handle(CourseEvent::Generated { token, result })
                }
                CourseEffect::Record { topic, content } => {
                    self.cache.record(&topic, &content);
                    None
                }
            };
        }
    }

    /// Show a cached note on the course page.
    pub fn recall(&self, view: &mut CourseView, note: RecentNote) {
        let content = self.cache.recall(&note);
        view.handle(CourseEvent::Recall(RecentNote { content, ..note }));
    }

    /// Re-open the last used topic from the cache, if it is still cached.
    pub fn resume(&self, view: &mut CourseView) -> Option<Topic> {
        let topic = self.cache.last_topic()?;
        let note = self.cache.find(&topic)?;
        self.recall(view, note);
        Some(topic)
    }

    /// Feed one event to a quiz session and run any resulting request.
    pub async fn dispatch_quiz(&self, session: &mut QuizSession, event: QuizEvent) {
        let mut effect = session.handle(event);

        while let Some(QuizEffect::RequestQuiz { token, topic }) = effect.take() {
            let result = self.generate_quiz(&topic).await;
            effect = session.handle(QuizEvent::Generated { token, result });
        }
    }
}
