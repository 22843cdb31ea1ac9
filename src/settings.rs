//! Match configuration from a TOML file and command-line overrides.

use clap::Args;
use std::path::{Path, PathBuf};
use strictly_shutbox::{
    ConfigError, DiceRule, Difficulty, MatchConfig, Seat, SingleDieTrigger, StartOrder, TileRange,
};
use tracing::{debug, info, instrument};

/// Match options shared by `play` and `simulate`.
///
/// Every option overrides the same field of the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct MatchArgs {
    /// Path to a TOML match config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of computer players
    #[arg(short, long)]
    pub players: Option<usize>,

    /// Computer difficulty; a comma list is assigned to seats in turn
    #[arg(short, long, value_delimiter = ',')]
    pub difficulty: Vec<Difficulty>,

    /// Rounds to play
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Board size: 9 or 12
    #[arg(long)]
    pub tiles: Option<TileRange>,

    /// Dice rule: two, one or choice
    #[arg(long)]
    pub dice: Option<DiceRule>,

    /// When a single die is allowed: always or high_tiles_shut
    #[arg(long)]
    pub single_die: Option<SingleDieTrigger>,

    /// Faces per die
    #[arg(long)]
    pub faces: Option<u8>,

    /// First player each round: seated or high_roll
    #[arg(long)]
    pub start_order: Option<StartOrder>,

    /// Seed for reproducible matches
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Loads a match config from a TOML file.
///
/// # Errors
///
/// [`ConfigError`] when the file cannot be read or parsed.
#[instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_config(path: impl AsRef<Path>) -> Result<MatchConfig, ConfigError> {
    debug!("Loading config from file");
    let content = std::fs::read_to_string(path.as_ref())
        .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

    let config: MatchConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

    info!(seats = config.seats().len(), "Config loaded successfully");
    Ok(config)
}

/// Writes a match config as TOML.
///
/// # Errors
///
/// [`ConfigError`] when the config cannot be serialized or written.
#[instrument(skip(config, path), fields(path = %path.as_ref().display()))]
pub fn save_config(config: &MatchConfig, path: impl AsRef<Path>) -> Result<(), ConfigError> {
    let text = toml::to_string_pretty(config)
        .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path.as_ref(), text)
        .map_err(|e| ConfigError::new(format!("Failed to write config file: {}", e)))
}

impl MatchArgs {
    /// Builds the final config: file first, then flags, then validation.
    ///
    /// With `human` set the match gets one human seat first. Seats from the
    /// file are kept unless `--players` or `--difficulty` is given; when
    /// they hold no human seat, `human` is seated ahead of them.
    /// `default_ai` is the number of computer seats when neither the file
    /// nor the flags say.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] for an unreadable file or an invalid result.
    #[instrument(skip(self))]
    pub fn resolve(&self, human: Option<&str>, default_ai: usize) -> Result<MatchConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MatchConfig::default(),
        };

        let seats_from_flags = self.players.is_some() || !self.difficulty.is_empty();
        if seats_from_flags || config.seats().is_empty() {
            let count = self
                .players
                .unwrap_or_else(|| self.difficulty.len().max(default_ai));
            config = config.with_seats(build_seats(human, count, &self.difficulty));
        } else if let Some(name) = human
            && !config.seats().iter().any(Seat::is_human)
        {
            // the person at the keyboard always gets a seat
            let mut seats = vec![Seat::human(name)];
            seats.extend(config.seats().iter().cloned());
            config = config.with_seats(seats);
        }

        if let Some(rounds) = self.rounds {
            config = config.with_rounds(rounds);
        }
        if let Some(tiles) = self.tiles {
            config = config.with_tiles(tiles);
        }
        if let Some(rule) = self.dice {
            config = config.with_dice_rule(rule);
        }
        if let Some(trigger) = self.single_die {
            config = config.with_single_die(trigger);
        }
        if let Some(faces) = self.faces {
            config = config.with_faces(faces);
        }
        if let Some(order) = self.start_order {
            config = config.with_start_order(order);
        }
        if self.seed.is_some() {
            config = config.with_seed(self.seed);
        }

        config.validate()?;
        debug!(?config, "Config resolved");
        Ok(config)
    }
}

/// One optional human seat followed by `ai` computer seats.
fn build_seats(human: Option<&str>, ai: usize, difficulties: &[Difficulty]) -> Vec<Seat> {
    let mut seats: Vec<Seat> = human.map(Seat::human).into_iter().collect();
    for index in 0..ai {
        let difficulty = if difficulties.is_empty() {
            Difficulty::default()
        } else {
            difficulties[index % difficulties.len()]
        };
        seats.push(Seat::ai(format!("AI {} ({})", index + 1, difficulty), difficulty));
    }
    seats
}
