//! The `crashnotes recent`, `recall` and `resume` commands.

use anyhow::Result;

use crashnotes_core::course::CourseView;
use crashnotes_core::model::{RecentNote, Topic};

use super::ContextArgs;
use crate::render::{print_course, print_recent};

pub fn list(ctx: &ContextArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let notes = ctx.cache(&config).load();

    if notes.is_empty() {
        println!("No recent topics yet. Run `crashnotes learn <topic>` to start.");
        return Ok(());
    }

    print_recent(&notes);
    Ok(())
}

pub fn recall(ctx: &ContextArgs, selector: String) -> Result<()> {
    let config = ctx.load_config()?;
    let engine = ctx.orchestrator(&config)?;
    let notes = engine.cache().load();

    let note = select(&notes, &selector)?
        .ok_or_else(|| anyhow::anyhow!("no cached course for '{}'", selector.trim()))?;

    let mut view = CourseView::new();
    engine.recall(&mut view, note.clone());
    if let (Some(topic), Some(content)) = (view.topic(), view.content()) {
        print_course(topic, content);
    }
    Ok(())
}

pub fn resume(ctx: &ContextArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let engine = ctx.orchestrator(&config)?;

    let mut view = CourseView::new();
    match engine.resume(&mut view) {
        Some(topic) => {
            if let Some(content) = view.content() {
                print_course(&topic, content);
            }
        }
        None => println!("Nothing to resume. Run `crashnotes learn <topic>` to start."),
    }
    Ok(())
}

/// A 1-based position from `crashnotes recent`, or a topic name.
fn select<'a>(notes: &'a [RecentNote], selector: &str) -> Result<Option<&'a RecentNote>> {
    if let Ok(position) = selector.trim().parse::<usize>() {
        if (1..=notes.len()).contains(&position) {
            return Ok(notes.get(position - 1));
        }
    }
    let topic = Topic::new(selector)?;
    Ok(notes.iter().find(|note| note.topic.same_subject(&topic)))
}
