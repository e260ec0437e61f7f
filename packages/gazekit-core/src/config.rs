use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Focus-mode dwell timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DwellConfig {
    pub threshold_ms: u64,
}

impl DwellConfig {
    pub const DEFAULT_THRESHOLD_MS: u64 = 1500;

    pub fn threshold(&self) -> Duration {
        Duration::from_millis(self.threshold_ms)
    }
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            threshold_ms: Self::DEFAULT_THRESHOLD_MS,
        }
    }
}

/// Layout of a vertical list view. Sizes are in local units before the
/// view's own scale is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub item_width: f32,
    pub item_height: f32,
    pub max_items_shown: usize,
    pub show_up: bool,
    pub show_down: bool,
    /// Scroll distance per frame per unit of gaze depth into an affordance.
    pub scroll_rate: f32,
    pub up_label: String,
    pub down_label: String,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            item_width: 2.0,
            item_height: 1.0,
            max_items_shown: 3,
            show_up: true,
            show_down: true,
            scroll_rate: 0.1,
            up_label: "▲".to_string(),
            down_label: "▼".to_string(),
        }
    }
}

/// How a grid item is fitted into its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitStrategy {
    /// Uniform scale to the tile width, then down to the tile height if still too tall.
    #[default]
    Scale,
    /// Force the item to the tile size.
    Stretch,
}

/// Layout of a horizontal grid view. Tile sizes are world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub item_width: f32,
    pub item_height: f32,
    pub horizontal_tiles: usize,
    pub vertical_tiles: usize,
    pub fit: FitStrategy,
    /// Horizontal scroll per frame while an affordance is hovered.
    pub slide_step: f32,
    pub left_label: String,
    pub right_label: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            item_width: 1.0,
            item_height: 1.0,
            horizontal_tiles: 4,
            vertical_tiles: 3,
            fit: FitStrategy::Scale,
            slide_step: 0.03,
            left_label: "<".to_string(),
            right_label: ">".to_string(),
        }
    }
}
