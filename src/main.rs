//! Viral Breakout entry point
//!
//! Loads levels and themes, prompts for a theme, then exercises the
//! simulation. Window, input and rendering integration live outside the
//! core; startup load failures exit non-zero with a clear message.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, bail};

use viral_breakout::theme::{Theme, load_themes};
use viral_breakout::{GameState, TickInput, levels, tick};

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Viral Breakout starting...");

    let levels = levels::read_levels(Path::new("levels")).context("failed to load levels")?;
    if levels.is_empty() {
        bail!("no levels found in the 'levels' directory");
    }

    let themes = load_themes(Path::new("themes")).context("failed to discover themes")?;
    if themes.is_empty() {
        bail!("no theme found");
    }

    let stdin = std::io::stdin();
    let theme = select_theme(&themes, &mut stdin.lock())?;
    log::info!("theme '{}' selected", theme.name);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut state = GameState::new(seed, levels);

    log::info!("windowed frontend is an external integration - running smoke simulation");
    smoke_run(&mut state);
    Ok(())
}

/// Numbered theme prompt; invalid input reprompts rather than exiting
fn select_theme<'a>(themes: &'a [Theme], input: &mut impl BufRead) -> Result<&'a Theme> {
    let mut stdout = std::io::stdout();
    loop {
        println!("THEME SELECTOR");
        for (i, theme) in themes.iter().enumerate() {
            println!("{i}: {}", theme.name);
        }
        print!("Select theme: ");
        stdout.flush().context("failed to flush stdout")?;

        let mut line = String::new();
        if input.read_line(&mut line).context("failed to read stdin")? == 0 {
            bail!("stdin closed before a theme was selected");
        }

        match line.trim().parse::<usize>() {
            Ok(i) if i < themes.len() => return Ok(&themes[i]),
            _ => println!("Invalid selection."),
        }
    }
}

/// Drive a few seconds of simulated play and log the outcome
fn smoke_run(state: &mut GameState) {
    let inputs = [
        TickInput {
            right: true,
            ..Default::default()
        },
        TickInput {
            down: true,
            ..Default::default()
        },
        TickInput {
            right: true,
            down: true,
            ..Default::default()
        },
    ];

    for (i, input) in inputs.iter().cycle().take(300).enumerate() {
        tick(state, input);
        if i % 60 == 0 {
            let hud = state.hud();
            log::debug!(
                "tick {}: level {} viruses {} antibac {}",
                state.time_ticks,
                state.level_number,
                state.viruses.len(),
                hud.antibac_count
            );
        }
    }

    let hud = state.hud();
    println!(
        "smoke run: {} ticks, level {}, {} viruses, game_over={} finished={}",
        state.time_ticks,
        state.level_number,
        state.viruses.len(),
        hud.game_over,
        hud.finished
    );
}
