#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
//! ** Vorath **
//! Turn-based text adventure

use vorath_engine::config::CONFIG_FILE;
use vorath_engine::data_paths::data_path;
use vorath_engine::spinners::FlavorText;
use vorath_engine::{ConsoleInput, Dice, TurnContext, View, load_runtime_config, run_game};

use anyhow::{Context, Result};
use log::info;

use std::io::Write;

fn main() -> Result<()> {
    env_logger::init();
    info!("Start: loading configuration...");
    let config = load_runtime_config(&data_path(CONFIG_FILE));
    info!("configuration: {config:?}");

    let mut dice = match config.seed {
        Some(seed) => Dice::seeded(seed),
        None => Dice::new(),
    };
    let mut prompt = ConsoleInput::new();
    let mut view = View::new();
    let flavor = FlavorText::new();

    // clear the screen
    print!("\x1B[2J\x1B[H");
    std::io::stdout().flush().context("while clearing the screen")?;
    info!("Starting the game!");

    let mut ctx = TurnContext {
        dice: &mut dice,
        prompt: &mut prompt,
        view: &mut view,
        flavor: &flavor,
    };
    let end = run_game(&config, &mut ctx).context("while running the game")?;
    view.flush();
    info!("Finished: {end:?}");
    Ok(())
}
