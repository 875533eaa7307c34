use clap::Parser;

use crate::error::FelliError;
use crate::player::DEFAULT_NAMES;

const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=15;

/// Felli, a two-player game of leaps on a cross-shaped board.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "felli", version)]
pub struct Options {
    /// The name of player 1. Must have length between 2 and 15. Default = <color>s Player.
    #[arg(long = "p1", value_name = "NAME", default_value = DEFAULT_NAMES[0])]
    pub player_a: String,

    /// The name of player 2. Must have length between 2 and 15. Default = <color>s Player.
    #[arg(long = "p2", value_name = "NAME", default_value = DEFAULT_NAMES[1])]
    pub player_b: String,
}

impl Options {
    /// Parses and validates player names from `args` (program name first).
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let options = Self::try_parse_from(args)?;
        options.validate().map_err(|err| {
            clap::Error::raw(clap::error::ErrorKind::ValueValidation, format!("{err}\n"))
        })?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), FelliError> {
        for (flag, name) in [("--p1", &self.player_a), ("--p2", &self.player_b)] {
            let len = name.chars().count();
            if !NAME_LEN.contains(&len) {
                return Err(FelliError::InvalidName { flag, len });
            }
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            player_a: DEFAULT_NAMES[0].to_string(),
            player_b: DEFAULT_NAMES[1].to_string(),
        }
    }
}
