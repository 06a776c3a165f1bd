//! Terminal output for generated content.

use comfy_table::{Cell, Table};

use crashnotes_core::model::{Content, RecentNote, Topic};
use crashnotes_core::quiz::ReviewItem;

pub fn print_course(topic: &Topic, content: &Content) {
    match content {
        Content::Narrative(text) => {
            println!("Crash course on {topic}\n");
            println!("{}", text.trim_end());
        }
        Content::Course(course) => {
            println!("{}\n", course.title);
            println!("{}", course.overview);
            for (i, section) in course.sections.iter().enumerate() {
                println!("\n{}. {}\n", i + 1, section.heading);
                println!("{}", section.content);
            }
            if !course.resources.is_empty() {
                println!("\nRecommended Resources\n");
                for resource in &course.resources {
                    println!("  - {} <{}>", resource.name, resource.url);
                }
            }
        }
    }
}

pub fn print_recent(notes: &[RecentNote]) {
    let mut table = Table::new();
    table.set_header(vec!["#", "Topic", "Format", "Saved"]);

    for (i, note) in notes.iter().enumerate() {
        let format = if note.content.is_structured() {
            "course"
        } else {
            "narrative"
        };
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(note.topic.as_str()),
            Cell::new(format),
            Cell::new(note.recorded_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
}

pub fn print_options(options: &[String]) {
    for (i, option) in options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }
}

pub fn print_review(items: &[ReviewItem<'_>]) {
    println!("Quiz Review\n");
    for item in items {
        println!("{}. {}", item.number, item.question);
        for (i, option) in item.options.iter().enumerate() {
            let marker = match (i == item.correct, Some(i) == item.selected) {
                (true, _) => "[correct]",
                (false, true) => "[your answer]",
                (false, false) => "",
            };
            println!("  {}) {} {}", i + 1, option, marker);
        }
        println!();
    }
}
