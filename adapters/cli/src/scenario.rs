use std::{fs, path::Path};

use anyhow::{Context, Result};
use neon_path_core::{CellCoord, GameConfig, TowerKind, UpgradePath};
use neon_path_simulation::Simulation;
use serde::Deserialize;

const BUILTIN_SCENARIO: &str = include_str!("../scenarios/default.toml");

/// Starting conditions and defence layout for a headless run.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Scenario {
    /// Number of waves to play, unless overridden on the command line.
    pub(crate) waves: Option<u32>,
    /// Economy, grid and path settings.
    pub(crate) game: GameConfig,
    /// Towers built before the first wave, in order.
    pub(crate) towers: Vec<TowerOrder>,
}

/// A tower to build together with the upgrades to buy for it.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub(crate) struct TowerOrder {
    pub(crate) kind: TowerKind,
    pub(crate) column: u32,
    pub(crate) row: u32,
    #[serde(default)]
    pub(crate) upgrades: Vec<UpgradePath>,
}

impl Scenario {
    /// Scenario bundled with the binary.
    pub(crate) fn builtin() -> Result<Self> {
        Self::parse(BUILTIN_SCENARIO).context("failed to parse the bundled scenario")
    }

    /// Reads and parses the scenario stored at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse scenario toml contents")
    }

    /// Creates a simulation and builds every ordered tower into it.
    pub(crate) fn build(&self) -> Result<Simulation> {
        let mut simulation =
            Simulation::new(self.game.clone()).context("scenario path cannot be built")?;

        for order in &self.towers {
            let cell = CellCoord::new(order.column, order.row);
            let tower = simulation.place_tower(order.kind, cell).with_context(|| {
                format!(
                    "failed to place {} at ({}, {})",
                    order.kind.name(),
                    order.column,
                    order.row
                )
            })?;
            for path in &order.upgrades {
                simulation.upgrade_tower(tower, *path).with_context(|| {
                    format!(
                        "failed to upgrade {} at ({}, {}) along path {path:?}",
                        order.kind.name(),
                        order.column,
                        order.row
                    )
                })?;
            }
        }

        Ok(simulation)
    }
}
