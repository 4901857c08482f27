//! # Closures
//!
//! Rectangular openings with a perimeter frame: doors, windows, gates,
//! window guards, partitions and rolling shutters.
//!
//! ## Formulas
//!
//! - Frame: perimeter `2 × (w + h)`, plus `n` horizontal reinforcements of `w`
//! - Bar infill: `floor((w − 2t) / (spacing + bar))` bars of `h − 2t`
//! - Sheet infill: one sheet of `(w − 2t) × (h − 2t)` m²
//! - Rolling shutter: guides `2h`, roller shaft `w + 0.2`, `ceil(h / 0.076)` slats
//!
//! where `t` is the frame thickness.

use crate::config::{CalculationConfig, ClosureSettings, FillType};
use crate::work_types::{ClosureKind, WorkType};

use super::{ceil_count, floor_count, BomBuilder, CutProfile, LineRole};

/// Height covered by one shutter slat (~3")
pub const SLAT_HEIGHT_M: f64 = 0.076;
/// Roller shaft extends past the opening on both sides
pub const ROLLER_SHAFT_EXTRA_M: f64 = 0.2;

const FRAME_TUBE: &str = "PTR 1 1/2\" Cal 14";

/// Clear span inside the frame, never negative.
fn interior(dimension_m: f64, settings: &ClosureSettings) -> f64 {
    (dimension_m - 2.0 * settings.frame_thickness_m).max(0.0)
}

/// Number of vertical bars that fit inside the frame.
pub fn bar_count(width_m: f64, settings: &ClosureSettings) -> u32 {
    floor_count(interior(width_m, settings) / (settings.bar_spacing_m + settings.bar_thickness_m))
}

pub(crate) fn build(
    bom: &mut BomBuilder,
    work_type: WorkType,
    kind: ClosureKind,
    width_m: f64,
    height_m: f64,
    config: &CalculationConfig,
) -> (String, CutProfile) {
    let description = format!("{} de {}m × {}m", work_type.label(), width_m, height_m);
    let settings = ClosureSettings::resolve(config);

    let cuts = match kind {
        ClosureKind::RollingShutter => rolling_shutter(bom, width_m, height_m, &settings),
        _ => framed_opening(bom, kind, width_m, height_m, &settings),
    };

    (description, cuts)
}

fn rolling_shutter(
    bom: &mut BomBuilder,
    width_m: f64,
    height_m: f64,
    settings: &ClosureSettings,
) -> CutProfile {
    bom.stock("side_guides", "Guías Laterales (2)", height_m * 2.0, "Ángulo 2\" Cal 14", LineRole::Frame);
    bom.stock(
        "roller_shaft",
        "Eje Superior (Tambor)",
        width_m + ROLLER_SHAFT_EXTRA_M,
        "Tubo Redondo 3\" Sch40",
        LineRole::Structure,
    );

    let slats = ceil_count(height_m / SLAT_HEIGHT_M);
    bom.piece("slats", format!("{} Duelas de Cortina", slats), slats, "Duela p/Cortina 3\"", LineRole::Fill);
    bom.piece("springs", "Resortes/Mecanismo", 2, "Resorte p/Cortina", LineRole::Hardware);
    bom.piece("shutter_lock", "Chapa Cortina", 1, "Chapa Cortina", LineRole::Hardware);

    CutProfile {
        internal_reinforcements: settings.internal_reinforcements,
        extra_cuts: 0,
        bar_infill: false,
    }
}

fn framed_opening(
    bom: &mut BomBuilder,
    kind: ClosureKind,
    width_m: f64,
    height_m: f64,
    settings: &ClosureSettings,
) -> CutProfile {
    let perimeter_m = 2.0 * (width_m + height_m);
    bom.stock("perimeter_frame", "Marco Perimetral", perimeter_m, FRAME_TUBE, LineRole::Frame);

    let reinforcements = settings.internal_reinforcements;
    if reinforcements > 0 {
        bom.stock(
            "internal_reinforcements",
            format!("{} Refuerzo(s) Interno(s)", reinforcements),
            width_m * reinforcements as f64,
            FRAME_TUBE,
            LineRole::Frame,
        );
    }

    let mut extra_cuts = 0;
    let bar_infill = settings.fill_type == FillType::Bars;
    match settings.fill_type {
        FillType::Bars => {
            let bars = bar_count(width_m, settings);
            let bar_length_m = interior(height_m, settings);
            bom.stock(
                "vertical_bars",
                format!("{} Barrotes Verticales @{:.0}cm", bars, settings.bar_spacing_m * 100.0),
                bars as f64 * bar_length_m,
                "Cuadrado 1/2\"",
                LineRole::Fill,
            );
            extra_cuts = bars.saturating_mul(2);
        }
        FillType::Sheet => {
            let area_m2 = interior(width_m, settings) * interior(height_m, settings);
            bom.stock(
                "infill_sheet",
                format!("Lámina Interior ({:.2}m²)", area_m2),
                area_m2,
                "Lámina Cal 24",
                LineRole::Fill,
            );
        }
    }

    match kind {
        ClosureKind::Door | ClosureKind::Gate => {
            let hinges = if kind == ClosureKind::Gate { 6 } else { 3 };
            bom.piece("hinges", "Bisagras Industriales", hinges, "Bisagra 4\"", LineRole::Hardware);
            bom.piece("lock", "Chapa / Cerradura", 1, "Chapa Residencial", LineRole::Hardware);
        }
        ClosureKind::Partition => {
            bom.piece("track", "Riel Superior/Inferior", 2, "Riel p/Cancel", LineRole::Hardware);
            bom.piece("rollers", "Rodamientos", 4, "Rodamiento p/Cancel", LineRole::Hardware);
        }
        _ => {}
    }

    CutProfile {
        internal_reinforcements: reinforcements,
        extra_cuts,
        bar_infill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{calculate, CalculationResult};
    use crate::config::default_config;

    fn run(work_type: WorkType, width_m: f64, height_m: f64, config: CalculationConfig) -> CalculationResult {
        calculate(work_type, width_m, height_m, &config)
    }

    #[test]
    fn test_simple_window() {
        let result = run(WorkType::Window, 1.2, 1.0, CalculationConfig::default());
        assert_eq!(result.description, "Ventana de 1.2m × 1m");

        let frame = result.line("perimeter_frame").unwrap();
        assert!((frame.raw_length_m - 4.4).abs() < 1e-9);
        assert_eq!(frame.length_m, 4.84);
        assert_eq!(frame.stock_lengths, 1);
        assert_eq!(frame.leftover_m, 1.16);

        // floor((1.2 - 0.076) / 0.132) = 8 bars of 0.924 m
        let bars = result.line("vertical_bars").unwrap();
        assert_eq!(bars.concept, "8 Barrotes Verticales @12cm");
        assert!((bars.raw_length_m - 7.392).abs() < 1e-9);
        assert_eq!(bars.role, LineRole::Fill);

        assert!(result.line("internal_reinforcements").is_none());
        assert!(result.line("hinges").is_none());
    }

    #[test]
    fn test_bar_count_formula() {
        let settings = ClosureSettings::resolve(&CalculationConfig::default());
        assert_eq!(bar_count(1.2, &settings), 8);
        assert_eq!(bar_count(0.05, &settings), 0);
    }

    #[test]
    fn test_door_hardware_and_reinforcement() {
        let result = run(WorkType::Door, 0.9, 2.1, default_config(WorkType::Door));
        let reinforcement = result.line("internal_reinforcements").unwrap();
        assert_eq!(reinforcement.concept, "1 Refuerzo(s) Interno(s)");
        assert!((reinforcement.raw_length_m - 0.9).abs() < 1e-9);
        assert_eq!(result.line("hinges").unwrap().pieces, 3);
        assert_eq!(result.line("lock").unwrap().pieces, 1);
    }

    #[test]
    fn test_gate_uses_six_hinges() {
        let result = run(WorkType::Gate, 3.0, 2.0, default_config(WorkType::Gate));
        assert_eq!(result.line("hinges").unwrap().pieces, 6);
        let reinforcement = result.line("internal_reinforcements").unwrap();
        assert!((reinforcement.raw_length_m - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_partition_track_and_rollers() {
        let result = run(WorkType::Partition, 1.5, 2.0, CalculationConfig::default());
        assert_eq!(result.line("track").unwrap().pieces, 2);
        assert_eq!(result.line("rollers").unwrap().pieces, 4);
        assert!(result.line("lock").is_none());
    }

    #[test]
    fn test_sheet_infill() {
        let config = CalculationConfig {
            fill_type: Some(FillType::Sheet),
            ..Default::default()
        };
        let result = run(WorkType::Door, 1.0, 2.0, config);
        assert!(result.line("vertical_bars").is_none());
        let sheet = result.line("infill_sheet").unwrap();
        let expected = (1.0 - 0.076) * (2.0 - 0.076);
        assert!((sheet.raw_length_m - expected).abs() < 1e-9);
        assert_eq!(sheet.concept, "Lámina Interior (1.78m²)");
    }

    #[test]
    fn test_rolling_shutter() {
        let result = run(WorkType::RollingShutter, 3.0, 2.5, default_config(WorkType::RollingShutter));
        let guides = result.line("side_guides").unwrap();
        assert!((guides.raw_length_m - 5.0).abs() < 1e-9);
        let shaft = result.line("roller_shaft").unwrap();
        assert!((shaft.raw_length_m - 3.2).abs() < 1e-9);
        // ceil(2.5 / 0.076) = 33
        assert_eq!(result.line("slats").unwrap().pieces, 33);
        assert_eq!(result.line("springs").unwrap().pieces, 2);
        assert_eq!(result.line("shutter_lock").unwrap().pieces, 1);
        assert!(result.line("perimeter_frame").is_none());
    }

    #[test]
    fn test_opening_smaller_than_frame() {
        let result = run(WorkType::WindowGuard, 0.05, 0.05, CalculationConfig::default());
        let bars = result.line("vertical_bars").unwrap();
        assert_eq!(bars.length_m, 0.0);
        assert_eq!(bars.stock_lengths, 0);
    }
}
