//! The `crashnotes quiz` command.
//!
//! An interactive loop over stdin. Each input line becomes one quiz event.

use std::io::BufRead;

use anyhow::Result;

use crashnotes_core::engine::Orchestrator;
use crashnotes_core::model::Topic;
use crashnotes_core::quiz::{QuizEvent, QuizPhase, QuizSession, QUIZ_UNAVAILABLE_MESSAGE};

use super::ContextArgs;
use crate::render::{print_options, print_review};

pub async fn execute(ctx: &ContextArgs, topic: String) -> Result<()> {
    let topic = Topic::new(topic)?;
    let config = ctx.load_config()?;
    let engine = ctx.orchestrator(&config)?;

    let stdin = std::io::stdin();
    run(&engine, topic, stdin.lock()).await
}

async fn run(engine: &Orchestrator, topic: Topic, input: impl BufRead) -> Result<()> {
    let mut session = QuizSession::new();
    eprintln!("Generating quiz for {topic}...");
    engine
        .dispatch_quiz(&mut session, QuizEvent::Start(topic))
        .await;

    let mut lines = input.lines();
    loop {
        show(&session);
        if matches!(session.phase(), QuizPhase::Idle | QuizPhase::Loading) {
            break;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let answer = line.trim();
        if answer.eq_ignore_ascii_case("q") {
            break;
        }

        let Some(event) = to_event(session.phase(), answer) else {
            println!("Didn't catch that.");
            continue;
        };
        if matches!(event, QuizEvent::Retry | QuizEvent::Restart) {
            eprintln!("Generating quiz...");
        }
        engine.dispatch_quiz(&mut session, event).await;
    }

    Ok(())
}

/// Map one line of input to an event for the current phase.
fn to_event(phase: QuizPhase, answer: &str) -> Option<QuizEvent> {
    match phase {
        QuizPhase::InProgress => answer
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=4).contains(n))
            .map(|n| QuizEvent::SelectOption(n - 1)),
        QuizPhase::AnswerRevealed => Some(QuizEvent::Next),
        QuizPhase::Error if answer.eq_ignore_ascii_case("n") => Some(QuizEvent::Retry),
        QuizPhase::Completed if answer.eq_ignore_ascii_case("n") => Some(QuizEvent::Restart),
        QuizPhase::Completed if answer.eq_ignore_ascii_case("r") => Some(QuizEvent::Review),
        QuizPhase::Reviewing if answer.eq_ignore_ascii_case("b") => Some(QuizEvent::Back),
        _ => None,
    }
}

fn show(session: &QuizSession) {
    match session.phase() {
        QuizPhase::Idle | QuizPhase::Loading => {}
        QuizPhase::Error => {
            println!("{QUIZ_UNAVAILABLE_MESSAGE}");
            if let Some(e) = session.error() {
                tracing::warn!("quiz error: {e}");
            }
            println!("[n] try again  [q] quit");
        }
        QuizPhase::InProgress => {
            if let Some(question) = session.current_question() {
                println!(
                    "\nQuestion {} of {}: {}",
                    session.current_index() + 1,
                    session.total(),
                    question.question
                );
                print_options(&question.options);
                println!("Your answer (1-4, q to quit):");
            }
        }
        QuizPhase::AnswerRevealed => {
            if let (Some(question), Some(selected)) =
                (session.current_question(), session.selected())
            {
                if question.is_correct(selected) {
                    println!("Correct!");
                } else {
                    println!(
                        "Incorrect. The answer was {}) {}",
                        question.correct_answer + 1,
                        question.options[question.correct_answer]
                    );
                }
                println!("Press enter to continue.");
            }
        }
        QuizPhase::Completed => {
            println!("\nQuiz Completed! {} / {}", session.score(), session.total());
            if let Some(verdict) = session.verdict() {
                println!("{}", verdict.message());
            }
            println!("[r] review answers  [n] restart quiz  [q] quit");
        }
        QuizPhase::Reviewing => {
            print_review(&session.review());
            println!("[b] back to result  [q] quit");
        }
    }
}
