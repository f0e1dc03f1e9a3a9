//! Tunable parameters of a single play-through.

use serde::{Deserialize, Serialize};

use crate::path::{PathError, PathModel};
use crate::CellCoord;

/// Parameters that shape a play-through: economy, map and randomness.
///
/// Every field falls back to the stock game when omitted from a
/// deserialized document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Money available before the first wave.
    pub starting_money: u32,
    /// Lives available before the first wave.
    pub starting_lives: u32,
    /// Number of waves that must be cleared to win.
    pub max_waves: u32,
    /// Side length of a grid cell in world units.
    pub tile_size: f32,
    /// Number of grid columns available for building.
    pub grid_columns: u32,
    /// Number of grid rows available for building.
    pub grid_rows: u32,
    /// Cells the enemy path passes through, in travel order.
    pub waypoints: Vec<CellCoord>,
    /// Seed for crit rolls.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: 300,
            starting_lives: 20,
            max_waves: 20,
            tile_size: 40.0,
            grid_columns: 16,
            grid_rows: 12,
            waypoints: [
                (0, 5),
                (3, 5),
                (3, 3),
                (7, 3),
                (7, 8),
                (12, 8),
                (12, 4),
                (15, 4),
            ]
            .into_iter()
            .map(|(column, row)| CellCoord::new(column, row))
            .collect(),
            rng_seed: 0x6e65_6f6e_7061_7468,
        }
    }
}

impl GameConfig {
    /// Builds the enemy path described by the configuration.
    pub fn build_path(&self) -> Result<PathModel, PathError> {
        PathModel::from_waypoints(&self.waypoints, self.tile_size)
    }

    /// Reports whether the cell lies on the buildable grid.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.grid_columns && cell.row() < self.grid_rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_spans_the_stock_map() {
        let config = GameConfig::default();
        let path = config.build_path().expect("stock path is valid");
        assert!((path.total_length() - 1040.0).abs() < 1e-3);
        for waypoint in config.waypoints.iter().copied() {
            assert!(config.in_bounds(waypoint));
        }
    }

    #[test]
    fn partial_documents_fall_back_to_defaults() {
        let config: GameConfig = toml::from_str(
            r#"
            starting_money = 1000
            waypoints = [{ column = 0, row = 0 }, { column = 4, row = 0 }]
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.starting_money, 1000);
        assert_eq!(config.starting_lives, 20);
        assert_eq!(config.waypoints.len(), 2);
    }
}
