//! # Consumables
//!
//! Post-pass that estimates welding rod, abrasive discs and drill bits from
//! what a family branch emitted. The ratios are shop calibration values, not
//! physical constants.

use crate::work_types::StructuralFamily;

use super::{ceil_count, round_mm, BomBuilder, CutProfile, LineRole};

/// Welding rod per welded meter (kg/m)
pub const ROD_KG_PER_METER: f64 = 0.04;
/// Cuts one 4.5" cutting disc lasts
pub const CUTS_PER_DISC: f64 = 15.0;
/// Cutting discs per grinding disc
pub const CUTTING_PER_GRINDING_DISC: f64 = 3.0;
/// Cuts every job needs for its outer members
pub const BASE_CUTS: u32 = 4;

/// Welded meters of the lines emitted so far: `(structural, fill)`.
///
/// Structural counts frame and structure lines; fill counts linear fill
/// lines only (piece-counted fill such as roof panels is not welded).
pub fn welded_meters(lines: &[super::MaterialLine]) -> (f64, f64) {
    let structural = lines
        .iter()
        .filter(|l| l.role.is_structural())
        .map(|l| l.length_m)
        .sum();
    let fill = lines
        .iter()
        .filter(|l| l.role == LineRole::Fill && !l.is_piece)
        .map(|l| l.length_m)
        .sum();
    (structural, fill)
}

/// Total cuts estimated for a job. Saturates at `u32::MAX`.
pub fn total_cuts(family: StructuralFamily, cuts: &CutProfile) -> u32 {
    let reinforcement_cuts = match family {
        StructuralFamily::Closures => cuts.internal_reinforcements.saturating_mul(2),
        _ => 0,
    };
    BASE_CUTS
        .saturating_add(reinforcement_cuts)
        .saturating_add(cuts.extra_cuts)
}

pub(crate) fn append(bom: &mut BomBuilder, family: StructuralFamily, cuts: CutProfile) {
    let (structural_m, fill_m) = welded_meters(bom.lines());

    let rod_kg = round_mm((structural_m + fill_m) * ROD_KG_PER_METER);
    if rod_kg > 0.0 {
        bom.piece(
            "welding_rod",
            "Electrodos 6013 1/8\" (Estimado)",
            ceil_count(rod_kg),
            "Electrodos 6013 1/8\" (kg)",
            LineRole::Consumable,
        );
    }

    let cutting_discs = ceil_count(total_cuts(family, &cuts) as f64 / CUTS_PER_DISC);
    if cutting_discs > 0 {
        bom.piece(
            "cutting_discs",
            "Discos de Corte 4.5\" (Estimado)",
            cutting_discs,
            "Disco de Corte 4.5\"",
            LineRole::Consumable,
        );
    }

    let grinding_discs = ceil_count(cutting_discs as f64 / CUTTING_PER_GRINDING_DISC);
    if grinding_discs > 0 {
        bom.piece(
            "grinding_discs",
            "Disco de Desbaste (Pulido)",
            grinding_discs,
            "Disco de Desbaste 4.5\"",
            LineRole::Consumable,
        );
    }

    match family {
        StructuralFamily::Closures | StructuralFamily::Linear => {
            bom.piece("drill_bit_quarter", "Mecha 1/4\" (Instalación)", 1, "Mecha p/Metal 1/4\"", LineRole::Consumable);
            if cuts.bar_infill {
                bom.piece("drill_bit_eighth", "Mecha 1/8\" (Puntos)", 1, "Mecha p/Metal 1/8\"", LineRole::Consumable);
            }
        }
        StructuralFamily::Roofing | StructuralFamily::Stairs => {
            bom.piece("chop_saw_disc", "Disco Tronzadora 14\"", 1, "Disco Tronzadora 14\"", LineRole::Consumable);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::calculate;
    use crate::config::{CalculationConfig, FillType};
    use crate::work_types::WorkType;

    #[test]
    fn test_window_consumables() {
        let result = calculate(WorkType::Window, 1.2, 1.0, &CalculationConfig::default());
        // frame 4.84 + bars 8.131 = 12.971 m -> 0.519 kg -> 1 kg
        let rod = result.line("welding_rod").unwrap();
        assert_eq!(rod.pieces, 1);
        // 4 + 16 cuts -> 2 cutting discs -> 1 grinding disc
        assert_eq!(result.line("cutting_discs").unwrap().pieces, 2);
        assert_eq!(result.line("grinding_discs").unwrap().pieces, 1);
        assert!(result.line("drill_bit_quarter").is_some());
        assert!(result.line("drill_bit_eighth").is_some());
        assert!(result.line("chop_saw_disc").is_none());
    }

    #[test]
    fn test_sheet_infill_skips_small_bit() {
        let config = CalculationConfig {
            fill_type: Some(FillType::Sheet),
            ..Default::default()
        };
        let result = calculate(WorkType::Door, 1.0, 2.0, &config);
        assert!(result.line("drill_bit_quarter").is_some());
        assert!(result.line("drill_bit_eighth").is_none());
        // Only the 4 base cuts
        assert_eq!(result.line("cutting_discs").unwrap().pieces, 1);
    }

    #[test]
    fn test_reinforcements_add_cuts() {
        let profile = CutProfile {
            internal_reinforcements: 2,
            extra_cuts: 10,
            bar_infill: true,
        };
        assert_eq!(total_cuts(StructuralFamily::Closures, &profile), 18);
        assert_eq!(total_cuts(StructuralFamily::Linear, &profile), 14);
    }

    #[test]
    fn test_total_cuts_saturates() {
        let profile = CutProfile {
            internal_reinforcements: u32::MAX,
            extra_cuts: u32::MAX,
            bar_infill: false,
        };
        assert_eq!(total_cuts(StructuralFamily::Closures, &profile), u32::MAX);
        assert_eq!(total_cuts(StructuralFamily::Linear, &profile), u32::MAX);
    }

    #[test]
    fn test_linear_cuts_follow_posts() {
        let result = calculate(WorkType::Fence, 30.0, 1.8, &CalculationConfig::default());
        // 21 posts -> 4 + 42 = 46 cuts -> 4 discs
        assert_eq!(result.line("cutting_discs").unwrap().pieces, 4);
        assert_eq!(result.line("grinding_discs").unwrap().pieces, 2);
        assert!(result.line("drill_bit_eighth").is_none());
    }

    #[test]
    fn test_roofing_and_stairs_get_chop_saw_disc() {
        for work_type in [WorkType::Pergola, WorkType::StraightStair] {
            let result = calculate(work_type, 3.0, 2.5, &CalculationConfig::default());
            assert_eq!(result.line("chop_saw_disc").unwrap().pieces, 1);
            assert_eq!(result.line("cutting_discs").unwrap().pieces, 1);
            assert!(result.line("drill_bit_quarter").is_none());
        }
    }

    #[test]
    fn test_panels_do_not_count_as_welded() {
        let result = calculate(WorkType::Roof, 6.0, 4.0, &CalculationConfig::default());
        let (structural, fill) = welded_meters(&result.lines);
        assert_eq!(fill, 0.0);
        let beams = result.line("main_beams").unwrap().length_m;
        let purlins = result.line("purlins").unwrap().length_m;
        assert!((structural - beams - purlins).abs() < 1e-9);
    }

    #[test]
    fn test_consumables_come_last() {
        let result = calculate(WorkType::Gate, 3.0, 2.0, &CalculationConfig::default());
        let first_consumable = result
            .lines
            .iter()
            .position(|l| l.role == LineRole::Consumable)
            .unwrap();
        assert!(result.lines[first_consumable..]
            .iter()
            .all(|l| l.role == LineRole::Consumable));
    }
}
