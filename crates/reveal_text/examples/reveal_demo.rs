//! Text Reveal Demo
//!
//! Three reveals sharing one scheduler, toggled in and out:
//! - Explicit lines, each split into characters
//! - A single bare string
//! - Lines of word fragments, one unit per word
//!
//! Frames are printed to the terminal. Units still below the clip show as
//! blanks, units on their way up as `_`.
//!
//! Run with: cargo run -p reveal_text --example reveal_demo [config.toml]

use anyhow::Result;
use reveal_animation::AnimationScheduler;
use reveal_text::prelude::*;
use reveal_text::{RevealConfig, RevealView, Unit};

const FRAME: f32 = 1.0 / 60.0;
const FRAMES_PER_PRINT: usize = 6;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RevealConfig::load(path)?,
        None => RevealConfig::default(),
    };

    let scheduler = AnimationScheduler::new();

    let mut reveals = vec![
        text_reveal()
            .config(&config)
            .child(line("Hello World"))
            .child(line("Salt Pepper"))
            .child(line("Water Sugar"))
            .mount(scheduler.handle())?,
        text_reveal()
            .config(&config)
            .child("Hello World")
            .mount(scheduler.handle())?,
        text_reveal()
            .config(&config)
            .child(line(word_pair("Hello", "World")))
            .child(line(word_pair("Salt", "Pepper")))
            .child(line(word_pair("Water", "Sugar")))
            .mount(scheduler.handle())?,
    ];

    for active in [true, false] {
        tracing::info!("revealing: {}", active);
        for reveal in &mut reveals {
            reveal.set_active(active);
        }

        let mut frame = 0;
        loop {
            let moving = scheduler.advance(FRAME);
            if frame % FRAMES_PER_PRINT == 0 || !moving {
                print_frame(frame, &reveals);
            }
            if !moving {
                break;
            }
            frame += 1;
        }
    }

    Ok(())
}

fn word_pair(first: &str, second: &str) -> Vec<Fragment> {
    vec![
        node("span", [first]).into(),
        Fragment::from(" "),
        node("span", [second]).into(),
    ]
}

fn print_frame(frame: usize, reveals: &[TextReveal]) {
    println!("-- {:>4}ms --", (frame as f32 * FRAME * 1000.0).round());
    for reveal in reveals {
        print_view(&reveal.view());
        println!();
    }
}

fn print_view(view: &RevealView) {
    for line in &view.lines {
        let row: String = line
            .units
            .iter()
            .map(|unit| {
                let text = match &unit.unit {
                    Unit::Char(ch) => ch.to_string(),
                    Unit::Fragment(fragment) => fragment.plain_text(),
                };
                if unit.offset < 1.0 {
                    text
                } else if unit.offset < 99.0 {
                    "_".repeat(text.chars().count())
                } else {
                    " ".repeat(text.chars().count())
                }
            })
            .collect();
        println!("| {row}");
    }
}
