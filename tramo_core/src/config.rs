//! # Calculation Configuration
//!
//! [`CalculationConfig`] is a flat bag of optional tuning parameters. Fields
//! are scoped to one family by convention only: a roof calculation simply
//! ignores `bar_spacing_m`. Unset fields fall back to family defaults when
//! the engine resolves the bag into one of the per-family settings structs.
//!
//! Numeric overrides that are zero, negative or not finite are treated as
//! unset, so a half-typed form value can never produce a division by zero.
//!
//! ## JSON Example
//!
//! ```json
//! { "step_rise_m": 0.17, "step_run_m": 0.30 }
//! ```

use serde::{Deserialize, Serialize};

use crate::work_types::{ClosureKind, JobShape, LinearKind, RoofKind, WorkType};

pub const DEFAULT_BAR_SPACING_M: f64 = 0.12;
pub const WINDOW_GUARD_BAR_SPACING_M: f64 = 0.10;
/// 1 1/2" square tube
pub const DEFAULT_FRAME_THICKNESS_M: f64 = 0.038;
/// 1/2" solid square bar
pub const DEFAULT_BAR_THICKNESS_M: f64 = 0.012;

pub const DEFAULT_POST_SPACING_M: f64 = 1.5;
pub const CHAIN_LINK_POST_SPACING_M: f64 = 3.0;
pub const DEFAULT_HORIZONTAL_LINES: u32 = 3;

pub const DEFAULT_BEAM_SPACING_M: f64 = 3.0;
pub const DEFAULT_PURLIN_SPACING_M: f64 = 1.0;
pub const DEFAULT_OVERHANG_M: f64 = 0.30;
pub const DEFAULT_PANEL_WIDTH_M: f64 = 1.0;
pub const DOME_PANEL_WIDTH_M: f64 = 1.22;
/// Standard corrugated sheet length
pub const DEFAULT_PANEL_LENGTH_M: f64 = 3.66;

pub const DEFAULT_STEP_RISE_M: f64 = 0.18;
pub const DEFAULT_STEP_RUN_M: f64 = 0.28;

/// Interior fill of a framed opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillType {
    /// Vertical solid bars
    #[default]
    #[serde(rename = "barrotes")]
    Bars,
    /// A single steel sheet
    #[serde(rename = "lamina")]
    Sheet,
}

/// Optional per-calculation tuning parameters. All lengths in meters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculationConfig {
    // Closures
    pub bar_spacing_m: Option<f64>,
    pub frame_thickness_m: Option<f64>,
    pub bar_thickness_m: Option<f64>,
    pub fill_type: Option<FillType>,
    pub internal_reinforcements: Option<u32>,

    // Linear runs (bar spacing/thickness are shared with closures)
    pub post_spacing_m: Option<f64>,
    pub horizontal_lines: Option<u32>,

    // Roof structures
    pub beam_spacing_m: Option<f64>,
    pub purlin_spacing_m: Option<f64>,
    /// Eave overhang added on every side
    pub overhang_m: Option<f64>,
    pub panel_width_m: Option<f64>,
    pub panel_length_m: Option<f64>,

    // Stairs
    pub step_rise_m: Option<f64>,
    pub step_run_m: Option<f64>,
}

/// Return the override when it is a usable positive length, else the default.
fn positive_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => default,
    }
}

/// Overhang may legitimately be zero.
fn non_negative_or(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => default,
    }
}

/// Fully-populated default configuration for a work type.
///
/// UIs use this to seed editable form state before the user overrides
/// individual fields.
pub fn default_config(work_type: WorkType) -> CalculationConfig {
    match work_type.shape() {
        JobShape::Closure(kind) => CalculationConfig {
            bar_spacing_m: Some(match kind {
                ClosureKind::WindowGuard => WINDOW_GUARD_BAR_SPACING_M,
                _ => DEFAULT_BAR_SPACING_M,
            }),
            frame_thickness_m: Some(DEFAULT_FRAME_THICKNESS_M),
            bar_thickness_m: Some(DEFAULT_BAR_THICKNESS_M),
            fill_type: Some(match kind {
                ClosureKind::RollingShutter => FillType::Sheet,
                _ => FillType::Bars,
            }),
            internal_reinforcements: Some(match kind {
                ClosureKind::Gate => 2,
                ClosureKind::Door | ClosureKind::Partition => 1,
                _ => 0,
            }),
            ..Default::default()
        },
        JobShape::Linear(kind) => CalculationConfig {
            post_spacing_m: Some(match kind {
                LinearKind::ChainLink => CHAIN_LINK_POST_SPACING_M,
                _ => DEFAULT_POST_SPACING_M,
            }),
            horizontal_lines: Some(match kind {
                LinearKind::Handrail | LinearKind::ChainLink => 0,
                _ => DEFAULT_HORIZONTAL_LINES,
            }),
            bar_spacing_m: Some(DEFAULT_BAR_SPACING_M),
            bar_thickness_m: Some(DEFAULT_BAR_THICKNESS_M),
            ..Default::default()
        },
        JobShape::Roof(kind) => CalculationConfig {
            beam_spacing_m: Some(DEFAULT_BEAM_SPACING_M),
            purlin_spacing_m: Some(DEFAULT_PURLIN_SPACING_M),
            overhang_m: Some(DEFAULT_OVERHANG_M),
            panel_width_m: Some(match kind {
                RoofKind::Dome => DOME_PANEL_WIDTH_M,
                _ => DEFAULT_PANEL_WIDTH_M,
            }),
            panel_length_m: Some(DEFAULT_PANEL_LENGTH_M),
            ..Default::default()
        },
        JobShape::Stair(_) => CalculationConfig {
            step_rise_m: Some(DEFAULT_STEP_RISE_M),
            step_run_m: Some(DEFAULT_STEP_RUN_M),
            ..Default::default()
        },
    }
}

/// Resolved closure parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosureSettings {
    pub bar_spacing_m: f64,
    pub frame_thickness_m: f64,
    pub bar_thickness_m: f64,
    pub fill_type: FillType,
    pub internal_reinforcements: u32,
}

impl ClosureSettings {
    pub fn resolve(config: &CalculationConfig) -> Self {
        ClosureSettings {
            bar_spacing_m: positive_or(config.bar_spacing_m, DEFAULT_BAR_SPACING_M),
            frame_thickness_m: positive_or(config.frame_thickness_m, DEFAULT_FRAME_THICKNESS_M),
            bar_thickness_m: positive_or(config.bar_thickness_m, DEFAULT_BAR_THICKNESS_M),
            fill_type: config.fill_type.unwrap_or_default(),
            internal_reinforcements: config.internal_reinforcements.unwrap_or(0),
        }
    }
}

/// Resolved linear-run parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearSettings {
    pub post_spacing_m: f64,
    pub horizontal_lines: u32,
    pub bar_spacing_m: f64,
    pub bar_thickness_m: f64,
}

impl LinearSettings {
    pub fn resolve(config: &CalculationConfig) -> Self {
        LinearSettings {
            post_spacing_m: positive_or(config.post_spacing_m, DEFAULT_POST_SPACING_M),
            horizontal_lines: config.horizontal_lines.unwrap_or(DEFAULT_HORIZONTAL_LINES),
            bar_spacing_m: positive_or(config.bar_spacing_m, DEFAULT_BAR_SPACING_M),
            bar_thickness_m: positive_or(config.bar_thickness_m, DEFAULT_BAR_THICKNESS_M),
        }
    }
}

/// Resolved roof-structure parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofSettings {
    pub beam_spacing_m: f64,
    pub purlin_spacing_m: f64,
    pub overhang_m: f64,
    pub panel_width_m: f64,
    pub panel_length_m: f64,
}

impl RoofSettings {
    pub fn resolve(config: &CalculationConfig) -> Self {
        RoofSettings {
            beam_spacing_m: positive_or(config.beam_spacing_m, DEFAULT_BEAM_SPACING_M),
            purlin_spacing_m: positive_or(config.purlin_spacing_m, DEFAULT_PURLIN_SPACING_M),
            overhang_m: non_negative_or(config.overhang_m, DEFAULT_OVERHANG_M),
            panel_width_m: positive_or(config.panel_width_m, DEFAULT_PANEL_WIDTH_M),
            panel_length_m: positive_or(config.panel_length_m, DEFAULT_PANEL_LENGTH_M),
        }
    }

    /// Covering area of a single panel (m²)
    pub fn panel_area_m2(&self) -> f64 {
        self.panel_width_m * self.panel_length_m
    }
}

/// Resolved stair parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairSettings {
    pub step_rise_m: f64,
    pub step_run_m: f64,
}

impl StairSettings {
    pub fn resolve(config: &CalculationConfig) -> Self {
        StairSettings {
            step_rise_m: positive_or(config.step_rise_m, DEFAULT_STEP_RISE_M),
            step_run_m: positive_or(config.step_run_m, DEFAULT_STEP_RUN_M),
        }
    }
}
