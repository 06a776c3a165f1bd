//! The `crashnotes learn` command.

use anyhow::Result;

use crashnotes_core::course::{CoursePhase, CourseView};
use crashnotes_core::model::Topic;

use super::ContextArgs;
use crate::render::print_course;

pub async fn execute(ctx: &ContextArgs, topic: String, narrative: bool) -> Result<()> {
    let topic = Topic::new(topic)?;
    let mut config = ctx.load_config()?;
    if narrative {
        config.structured_course = false;
    }
    let engine = ctx.orchestrator(&config)?;

    eprintln!("Hey! I am working on it...");
    let mut view = CourseView::new();
    engine.submit_course(&mut view, topic.clone()).await;

    match (view.phase(), view.content()) {
        (CoursePhase::Ready, Some(content)) => {
            print_course(&topic, content);
            Ok(())
        }
        _ => anyhow::bail!(
            "{}",
            view.error().unwrap_or("Failed to generate crash course.")
        ),
    }
}
