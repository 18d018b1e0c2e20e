use crate::core::car::SpeedPars;
use crate::core::curves::CurvePars;
use crate::core::incident::TumblePars;
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// * `distance_km` - Race distance in kilometers
/// * `protection_distance` - (m) Collision protection granted at the start
/// * `rng_seed` - Optional seed for reproducible obstacle rolls
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct RacePars {
    #[serde(default = "default_distance_km")]
    pub distance_km: f64,
    #[serde(default = "default_protection_distance")]
    pub protection_distance: f64,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_distance_km() -> f64 {
    1.0
}

fn default_protection_distance() -> f64 {
    50.0
}

impl Default for RacePars {
    fn default() -> Self {
        RacePars {
            distance_km: default_distance_km(),
            protection_distance: default_protection_distance(),
            rng_seed: None,
        }
    }
}

/// GamePars is used to store all other parameter structs. Every field
/// falls back to a documented default, so a partial or missing file
/// degrades gracefully instead of failing.
#[derive(Debug, Deserialize, Clone)]
pub struct GamePars {
    #[serde(default)]
    pub race_pars: RacePars,
    #[serde(default)]
    pub speed_pars: SpeedPars,
    #[serde(default)]
    pub tumble_pars: TumblePars,
    #[serde(default = "default_curves")]
    pub curves: Vec<CurvePars>,
}

/// The stock track layout: two gentle S-bends early, two wider ones
/// further out.
fn default_curves() -> Vec<CurvePars> {
    vec![
        CurvePars {
            start: 200.0,
            end: 700.0,
            intensity: 0.01,
        },
        CurvePars {
            start: 600.0,
            end: 900.0,
            intensity: -0.01,
        },
        CurvePars {
            start: 1200.0,
            end: 2000.0,
            intensity: 0.02,
        },
        CurvePars {
            start: 1800.0,
            end: 3000.0,
            intensity: -0.02,
        },
    ]
}

impl Default for GamePars {
    fn default() -> Self {
        GamePars {
            race_pars: RacePars::default(),
            speed_pars: SpeedPars::default(),
            tumble_pars: TumblePars::default(),
            curves: default_curves(),
        }
    }
}

/// read_game_pars reads the JSON file and decodes the JSON string into
/// the game parameter struct.
pub fn read_game_pars(filepath: &Path) -> anyhow::Result<GamePars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}
