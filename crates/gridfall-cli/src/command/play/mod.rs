use std::{path::PathBuf, time::Duration};

use gridfall_engine::BagSeed;

use crate::{
    command::play::app::{PlayApp, PlayConfig},
    score::ScoreStore,
    tui::Tui,
};

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Board width in cells
    #[clap(long, default_value_t = 10)]
    width: i32,
    /// Board height in cells
    #[clap(long, default_value_t = 20)]
    height: i32,
    /// Gravity interval in milliseconds
    #[clap(long, default_value_t = 350)]
    gravity_ms: u64,
    /// File the highest score is persisted to
    #[clap(long, default_value = "./data/highest-score")]
    score_file: PathBuf,
    /// Piece sequence seed as 32 hex characters (random when omitted)
    #[clap(long)]
    seed: Option<BagSeed>,
}

impl Default for PlayArg {
    // Mirrors the clap default values, for when no subcommand is given.
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            gravity_ms: 350,
            score_file: PathBuf::from("./data/highest-score"),
            seed: None,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        width,
        height,
        gravity_ms,
        score_file,
        seed,
    } = arg;
    anyhow::ensure!(*width >= 4, "board width must be at least 4");
    anyhow::ensure!(*height >= 4, "board height must be at least 4");

    let store = ScoreStore::new(score_file.clone());
    let highest = store.load()?;

    let config = PlayConfig {
        width: *width,
        height: *height,
        gravity: Duration::from_millis(*gravity_ms),
        seed: *seed,
    };
    let mut play_app = PlayApp::new(config, store, highest);

    Tui::new().run(&mut play_app)?;

    // Save failures inside the event loop are deferred so the terminal is
    // restored before they surface.
    play_app.finish()
}
