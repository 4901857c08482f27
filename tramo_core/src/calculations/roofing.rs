//! # Roof Structures
//!
//! Flat roofs, pergolas, domes, gable roofs and arched roofs over a
//! `width × height` plan.
//!
//! The overhang extends the plan on every side. Arches and gables replace
//! the effective span with the length actually covered:
//!
//! - Arch: semicircle over the width, `π × w / 2`
//! - Gable: slope from ridge to eave, `sqrt((w/2)² + h²) + overhang`

use std::f64::consts::PI;

use crate::config::{CalculationConfig, RoofSettings};
use crate::work_types::{RoofKind, WorkType};

use super::{ceil_count, BomBuilder, CutProfile, LineRole};

pub const SUPPORT_COLUMNS: u32 = 4;
pub const SUPPORT_COLUMN_HEIGHT_M: f64 = 2.5;

/// Plan dimensions the structure actually covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofGeometry {
    /// Width including overhang on both sides (m)
    pub effective_width_m: f64,
    /// Span covered by each beam (m)
    pub effective_span_m: f64,
}

impl RoofGeometry {
    pub fn new(kind: RoofKind, width_m: f64, height_m: f64, settings: &RoofSettings) -> Self {
        let overhang = settings.overhang_m;
        let effective_width_m = width_m + 2.0 * overhang;
        let effective_span_m = match kind {
            RoofKind::Arch => PI * (width_m / 2.0),
            RoofKind::Gable => ((width_m / 2.0).powi(2) + height_m.powi(2)).sqrt() + overhang,
            _ => height_m + 2.0 * overhang,
        };
        RoofGeometry {
            effective_width_m,
            effective_span_m,
        }
    }

    /// Area to be covered (m²)
    pub fn area_m2(&self) -> f64 {
        self.effective_width_m * self.effective_span_m
    }
}

pub(crate) fn build(
    bom: &mut BomBuilder,
    work_type: WorkType,
    kind: RoofKind,
    width_m: f64,
    height_m: f64,
    config: &CalculationConfig,
) -> (String, CutProfile) {
    let description = format!("{} de {}m × {}m", work_type.label(), width_m, height_m);
    let settings = RoofSettings::resolve(config);
    let geometry = RoofGeometry::new(kind, width_m, height_m, &settings);

    let beams = ceil_count(geometry.effective_width_m / settings.beam_spacing_m).saturating_add(1);
    bom.stock(
        "main_beams",
        format!("{} Vigas Maestras @{}m", beams, settings.beam_spacing_m),
        beams as f64 * geometry.effective_span_m,
        "PTR 4×2\" Cal 14",
        LineRole::Structure,
    );

    let purlins = ceil_count(geometry.effective_span_m / settings.purlin_spacing_m).saturating_add(1);
    bom.stock(
        "purlins",
        format!("{} Montenes @{}m", purlins, settings.purlin_spacing_m),
        purlins as f64 * geometry.effective_width_m,
        "Monten C 4\"",
        LineRole::Structure,
    );

    let panels = ceil_count(geometry.area_m2() / settings.panel_area_m2());
    let panel_material = match kind {
        RoofKind::Dome => format!("Policarbonato {}m", settings.panel_length_m),
        _ => format!("Lámina Galv. {}m", settings.panel_length_m),
    };
    bom.piece(
        "covering_panels",
        format!("{} Paneles Cubierta", panels),
        panels,
        panel_material,
        LineRole::Fill,
    );

    match kind {
        RoofKind::Pergola | RoofKind::Dome => {
            bom.stock(
                "support_columns",
                format!("{} Columnas de Soporte", SUPPORT_COLUMNS),
                SUPPORT_COLUMNS as f64 * SUPPORT_COLUMN_HEIGHT_M,
                "PTR 3×3\" Cal 14",
                LineRole::Structure,
            );
        }
        RoofKind::Gable => {
            bom.stock("ridge_cap", "Cumbrera (Remate Superior)", width_m, "Lámina Cumbrera", LineRole::Fill);
        }
        RoofKind::Flat | RoofKind::Arch => {}
    }

    (description, CutProfile::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::calculate;
    use crate::config::default_config;

    #[test]
    fn test_flat_roof() {
        let result = calculate(WorkType::Roof, 6.0, 4.0, &CalculationConfig::default());
        assert_eq!(result.description, "Techumbre de 6m × 4m");

        // Effective plan 6.6 × 4.6
        let beams = result.line("main_beams").unwrap();
        assert_eq!(beams.concept, "4 Vigas Maestras @3m");
        assert!((beams.raw_length_m - 4.0 * 4.6).abs() < 1e-9);

        let purlins = result.line("purlins").unwrap();
        assert_eq!(purlins.concept, "6 Montenes @1m");
        assert!((purlins.raw_length_m - 6.0 * 6.6).abs() < 1e-9);

        // ceil(30.36 / 3.66) = 9
        let panels = result.line("covering_panels").unwrap();
        assert!(panels.is_piece);
        assert_eq!(panels.pieces, 9);
        assert_eq!(panels.suggested_material, "Lámina Galv. 3.66m");

        assert!(result.line("support_columns").is_none());
        assert!(result.line("ridge_cap").is_none());
    }

    #[test]
    fn test_arch_span_is_semicircle() {
        let settings = RoofSettings::resolve(&CalculationConfig::default());
        let geometry = RoofGeometry::new(RoofKind::Arch, 4.0, 10.0, &settings);
        assert!((geometry.effective_span_m - 2.0 * PI).abs() < 1e-9);
        assert!((geometry.effective_width_m - 4.6).abs() < 1e-9);
    }

    #[test]
    fn test_gable_span_is_slope() {
        let settings = RoofSettings::resolve(&CalculationConfig::default());
        let geometry = RoofGeometry::new(RoofKind::Gable, 6.0, 4.0, &settings);
        // sqrt(3² + 4²) + 0.3
        assert!((geometry.effective_span_m - 5.3).abs() < 1e-9);
    }

    #[test]
    fn test_gable_adds_ridge_cap() {
        let result = calculate(WorkType::Gable, 6.0, 1.5, &CalculationConfig::default());
        let ridge = result.line("ridge_cap").unwrap();
        assert!((ridge.raw_length_m - 6.0).abs() < 1e-9);
        assert_eq!(ridge.role, LineRole::Fill);
    }

    #[test]
    fn test_pergola_and_dome_columns() {
        for work_type in [WorkType::Pergola, WorkType::Dome] {
            let result = calculate(work_type, 3.0, 3.0, &default_config(work_type));
            let columns = result.line("support_columns").unwrap();
            assert!((columns.raw_length_m - 10.0).abs() < 1e-9);
            assert_eq!(columns.length_m, 11.0);
            assert_eq!(columns.stock_lengths, 2);
        }
    }

    #[test]
    fn test_dome_uses_polycarbonate() {
        let result = calculate(WorkType::Dome, 3.0, 3.0, &default_config(WorkType::Dome));
        let panels = result.line("covering_panels").unwrap();
        assert_eq!(panels.suggested_material, "Policarbonato 3.66m");
        // 3.6 × 3.6 / (1.22 × 3.66) = 2.9 -> 3
        assert_eq!(panels.pieces, 3);
    }
}
