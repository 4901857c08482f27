//! # Linear Runs
//!
//! Railings, fences, handrails, grilles, chain-link and ornamental tube
//! fences. `width` is the run length, `height` the fence height.

use crate::config::{CalculationConfig, LinearSettings, CHAIN_LINK_POST_SPACING_M};
use crate::work_types::{LinearKind, WorkType};

use super::{ceil_count, floor_count, BomBuilder, CutProfile, LineRole};

/// Chain-link posts are buried this much below grade
pub const CHAIN_LINK_POST_EMBED_M: f64 = 0.4;
/// Length of one chain-link mesh roll
pub const CHAIN_LINK_ROLL_M: f64 = 20.0;
/// Strands of tension wire along the run
pub const TENSION_WIRE_STRANDS: f64 = 3.0;
/// Railing infill bars stop short of the top rail
pub const RAILING_BAR_HEIGHT_RATIO: f64 = 0.7;

/// Posts for a run: one per spacing interval plus the closing post.
pub fn post_count(run_m: f64, spacing_m: f64) -> u32 {
    ceil_count(run_m / spacing_m).saturating_add(1)
}

pub(crate) fn build(
    bom: &mut BomBuilder,
    work_type: WorkType,
    kind: LinearKind,
    width_m: f64,
    height_m: f64,
    config: &CalculationConfig,
) -> (String, CutProfile) {
    let description = format!("{} de {}m × {}m alto", work_type.label(), width_m, height_m);
    let settings = LinearSettings::resolve(config);

    let cuts = match kind {
        LinearKind::ChainLink => chain_link(bom, width_m, height_m),
        _ => tubular_run(bom, kind, width_m, height_m, &settings),
    };

    (description, cuts)
}

fn chain_link(bom: &mut BomBuilder, width_m: f64, height_m: f64) -> CutProfile {
    let posts = post_count(width_m, CHAIN_LINK_POST_SPACING_M);
    bom.stock(
        "posts",
        format!("{} Postes @3m", posts),
        posts as f64 * (height_m + CHAIN_LINK_POST_EMBED_M),
        "Poste Galvanizado 2 3/8\"",
        LineRole::Structure,
    );

    let rolls = ceil_count(width_m / CHAIN_LINK_ROLL_M);
    bom.piece(
        "mesh_rolls",
        format!("{} Rollo(s) Malla Ciclónica", rolls),
        rolls,
        "Malla Ciclónica Cal 12.5",
        LineRole::Fill,
    );
    bom.stock(
        "tension_wire",
        "Alambre de Tensión",
        width_m * TENSION_WIRE_STRANDS,
        "Alambre Galv. Cal 12",
        LineRole::Fill,
    );
    bom.piece("tensioners", "Tensor/Tirfor p/Malla", posts, "Tensor p/Malla", LineRole::Hardware);

    CutProfile {
        internal_reinforcements: 0,
        extra_cuts: posts.saturating_mul(2),
        bar_infill: false,
    }
}

fn tubular_run(
    bom: &mut BomBuilder,
    kind: LinearKind,
    width_m: f64,
    height_m: f64,
    settings: &LinearSettings,
) -> CutProfile {
    bom.stock("top_rail", "Pasamanos Superior", width_m, "PTR 1 1/2\" Cal 14", LineRole::Structure);

    let posts = post_count(width_m, settings.post_spacing_m);
    let post_material = match kind {
        LinearKind::Grille => "PTR 2×2\" Cal 14",
        _ => "PTR 1 1/2\" Cal 14",
    };
    bom.stock(
        "posts",
        format!("{} Postes @{}m", posts, settings.post_spacing_m),
        posts as f64 * height_m,
        post_material,
        LineRole::Structure,
    );

    let lines = settings.horizontal_lines;
    if lines > 0 && kind != LinearKind::Handrail {
        bom.stock(
            "horizontal_lines",
            format!("{} Líneas Horizontales", lines),
            width_m * lines as f64,
            "PTR 1\" Cal 14",
            LineRole::Fill,
        );
    }

    let bar_infill = matches!(
        kind,
        LinearKind::Railing | LinearKind::Grille | LinearKind::OrnamentalTube
    );
    if bar_infill {
        let bars = floor_count(width_m / (settings.bar_spacing_m + settings.bar_thickness_m));
        let bar_height_m = match kind {
            LinearKind::Railing => height_m * RAILING_BAR_HEIGHT_RATIO,
            _ => height_m,
        };
        let bar_material = match kind {
            LinearKind::OrnamentalTube => "Tubo Redondo 3/4\"",
            _ => "Cuadrado 1/2\"",
        };
        bom.stock(
            "infill_bars",
            format!("{} Barrotines", bars),
            bars as f64 * bar_height_m,
            bar_material,
            LineRole::Fill,
        );
    }

    CutProfile {
        internal_reinforcements: 0,
        extra_cuts: posts.saturating_mul(2),
        bar_infill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::calculate;
    use crate::config::default_config;

    #[test]
    fn test_post_count() {
        assert_eq!(post_count(10.0, 1.5), 8);
        assert_eq!(post_count(3.0, 1.5), 3);
        assert_eq!(post_count(10.0, 3.0), 5);
        assert_eq!(post_count(1e12, 1.5), u32::MAX);
    }

    #[test]
    fn test_fence_run() {
        let result = calculate(WorkType::Fence, 10.0, 1.8, &CalculationConfig::default());
        assert_eq!(result.description, "Cerca de 10m × 1.8m alto");

        let rail = result.line("top_rail").unwrap();
        assert!((rail.raw_length_m - 10.0).abs() < 1e-9);
        assert_eq!(rail.stock_lengths, 2);

        let posts = result.line("posts").unwrap();
        assert_eq!(posts.concept, "8 Postes @1.5m");
        assert!((posts.raw_length_m - 8.0 * 1.8).abs() < 1e-9);
        assert_eq!(posts.suggested_material, "PTR 1 1/2\" Cal 14");

        let horizontals = result.line("horizontal_lines").unwrap();
        assert!((horizontals.raw_length_m - 30.0).abs() < 1e-9);

        // Plain fences have no vertical infill
        assert!(result.line("infill_bars").is_none());
    }

    #[test]
    fn test_railing_bars_are_shorter() {
        let result = calculate(WorkType::Railing, 2.7, 1.0, &CalculationConfig::default());
        // floor(2.7 / 0.132) = 20 bars at 0.7 m
        let bars = result.line("infill_bars").unwrap();
        assert_eq!(bars.concept, "20 Barrotines");
        assert!((bars.raw_length_m - 14.0).abs() < 1e-9);
        assert_eq!(bars.suggested_material, "Cuadrado 1/2\"");
    }

    #[test]
    fn test_grille_uses_heavier_posts() {
        let result = calculate(WorkType::Grille, 4.0, 2.0, &CalculationConfig::default());
        assert_eq!(result.line("posts").unwrap().suggested_material, "PTR 2×2\" Cal 14");
        let bars = result.line("infill_bars").unwrap();
        assert!((bars.raw_length_m - 30.0 * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_ornamental_tube_infill_material() {
        let result = calculate(WorkType::OrnamentalTube, 3.0, 1.5, &CalculationConfig::default());
        assert_eq!(result.line("infill_bars").unwrap().suggested_material, "Tubo Redondo 3/4\"");
    }

    #[test]
    fn test_handrail_skips_horizontals() {
        let config = CalculationConfig {
            horizontal_lines: Some(3),
            ..Default::default()
        };
        let result = calculate(WorkType::Handrail, 5.0, 0.9, &config);
        assert!(result.line("horizontal_lines").is_none());
        assert!(result.line("infill_bars").is_none());
    }

    #[test]
    fn test_zero_horizontal_lines() {
        let result = calculate(WorkType::Fence, 5.0, 1.5, &default_config(WorkType::ChainLink));
        assert!(result.line("horizontal_lines").is_none());
    }

    #[test]
    fn test_chain_link() {
        let result = calculate(WorkType::ChainLink, 25.0, 2.0, &default_config(WorkType::ChainLink));
        // ceil(25 / 3) + 1 = 10 posts of 2.4 m
        let posts = result.line("posts").unwrap();
        assert_eq!(posts.concept, "10 Postes @3m");
        assert!((posts.raw_length_m - 24.0).abs() < 1e-9);
        assert_eq!(result.line("mesh_rolls").unwrap().pieces, 2);
        let wire = result.line("tension_wire").unwrap();
        assert!((wire.raw_length_m - 75.0).abs() < 1e-9);
        assert_eq!(result.line("tensioners").unwrap().pieces, 10);
        assert!(result.line("top_rail").is_none());
    }
}
