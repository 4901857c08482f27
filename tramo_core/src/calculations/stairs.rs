//! # Stairs
//!
//! Straight, spiral, U-shaped and landing stairs. `height` is the total rise
//! and `width` the tread width (spiral: the stair diameter).
//!
//! Step count is always `ceil(rise / step_rise)`, so the real step rise is
//! never above the configured one.

use std::f64::consts::PI;

use crate::config::{CalculationConfig, StairSettings};
use crate::work_types::{StairKind, WorkType};

use super::{ceil_count, BomBuilder, CutProfile, LineRole};

/// Handrail post height
pub const HANDRAIL_POST_HEIGHT_M: f64 = 0.9;
/// Handrail posts are placed every meter along the slope
pub const HANDRAIL_POST_SPACING_M: f64 = 1.0;
/// Spiral center pole extends past the top floor
pub const SPIRAL_POLE_EXTRA_M: f64 = 1.0;
/// Treads per full turn of a spiral stair
pub const SPIRAL_STEPS_PER_TURN: f64 = 12.0;

const STRINGER_TUBE: &str = "PTR 4×2\" Cal 14";
const TREAD_PLATE: &str = "Placa Antiderrapante 3/16\"";
const RIB_ANGLE: &str = "Ángulo 1 1/4\"";
const HANDRAIL_TUBE: &str = "PTR 1 1/2\" Cal 14";
const POST_TUBE: &str = "PTR 1\" Cal 14";

/// Number of steps needed to climb `rise_m`.
pub fn step_count(rise_m: f64, settings: &StairSettings) -> u32 {
    ceil_count(rise_m / settings.step_rise_m)
}

/// Sloped length of one flight (stringer length).
pub fn flight_hypotenuse(rise_m: f64, steps: u32, settings: &StairSettings) -> f64 {
    let run_m = steps as f64 * settings.step_run_m;
    (rise_m.powi(2) + run_m.powi(2)).sqrt()
}

pub(crate) fn build(
    bom: &mut BomBuilder,
    work_type: WorkType,
    kind: StairKind,
    width_m: f64,
    height_m: f64,
    config: &CalculationConfig,
) -> (String, CutProfile) {
    let description = format!(
        "Escalera {} — {}m altura × {}m ancho",
        work_type.label(),
        height_m,
        width_m
    );
    let settings = StairSettings::resolve(config);

    match kind {
        StairKind::Spiral => spiral(bom, width_m, height_m, &settings),
        StairKind::UShaped | StairKind::Landing => two_flights(bom, width_m, height_m, &settings),
        StairKind::Straight => straight(bom, width_m, height_m, &settings),
    }

    (description, CutProfile::default())
}

fn spiral(bom: &mut BomBuilder, width_m: f64, height_m: f64, settings: &StairSettings) {
    let steps = step_count(height_m, settings);
    let radius_m = width_m / 2.0;

    bom.stock(
        "center_pole",
        "Poste Central",
        height_m + SPIRAL_POLE_EXTRA_M,
        "Tubo Redondo 4\" Sch40",
        LineRole::Structure,
    );
    bom.stock(
        "radial_treads",
        format!("{} Peldaños Radiales", steps),
        steps as f64 * radius_m,
        TREAD_PLATE,
        LineRole::Fill,
    );

    let turns = steps as f64 / SPIRAL_STEPS_PER_TURN;
    bom.stock(
        "helical_handrail",
        "Barandal Helicoidal",
        2.0 * PI * radius_m * turns,
        "Tubo Redondo 1 1/2\"",
        LineRole::Structure,
    );
    bom.stock(
        "handrail_posts",
        format!("{} Postes Barandal", steps),
        steps as f64 * HANDRAIL_POST_HEIGHT_M,
        "Cuadrado 1/2\"",
        LineRole::Structure,
    );
}

fn two_flights(bom: &mut BomBuilder, width_m: f64, height_m: f64, settings: &StairSettings) {
    let flight_rise_m = height_m / 2.0;
    let steps_per_flight = step_count(flight_rise_m, settings);
    let steps = steps_per_flight.saturating_mul(2);
    let hypotenuse_m = flight_hypotenuse(flight_rise_m, steps_per_flight, settings);

    bom.stock("stringers", "4 Limones (2 tramos)", hypotenuse_m * 4.0, STRINGER_TUBE, LineRole::Structure);
    bom.stock(
        "treads",
        format!("{} Peldaños", steps),
        steps as f64 * width_m,
        TREAD_PLATE,
        LineRole::Fill,
    );
    bom.stock(
        "landing_platform",
        "Plataforma de Descanso",
        width_m * width_m,
        TREAD_PLATE,
        LineRole::Structure,
    );
    bom.stock(
        "ribs",
        format!("{} Costillas", steps),
        steps as f64 * settings.step_rise_m * 2.0,
        RIB_ANGLE,
        LineRole::Structure,
    );
    bom.stock("handrail", "Barandal (2 tramos)", hypotenuse_m * 2.0, HANDRAIL_TUBE, LineRole::Structure);

    let posts = ceil_count(hypotenuse_m * 2.0 / HANDRAIL_POST_SPACING_M).saturating_add(2);
    bom.stock(
        "handrail_posts",
        format!("{} Postes Barandal", posts),
        posts as f64 * HANDRAIL_POST_HEIGHT_M,
        POST_TUBE,
        LineRole::Structure,
    );
}

fn straight(bom: &mut BomBuilder, width_m: f64, height_m: f64, settings: &StairSettings) {
    let steps = step_count(height_m, settings);
    let hypotenuse_m = flight_hypotenuse(height_m, steps, settings);

    bom.stock(
        "stringers",
        format!("2 Limones ({:.2}m c/u)", hypotenuse_m),
        hypotenuse_m * 2.0,
        STRINGER_TUBE,
        LineRole::Structure,
    );
    bom.stock(
        "treads",
        format!("{} Peldaños @{}m", steps, width_m),
        steps as f64 * width_m,
        TREAD_PLATE,
        LineRole::Fill,
    );
    bom.stock(
        "ribs",
        format!("{} Costillas", steps),
        steps as f64 * settings.step_rise_m * 2.0,
        RIB_ANGLE,
        LineRole::Structure,
    );
    bom.stock("handrail", "Barandal de Seguridad", hypotenuse_m, HANDRAIL_TUBE, LineRole::Structure);

    let posts = ceil_count(hypotenuse_m / HANDRAIL_POST_SPACING_M).saturating_add(1);
    bom.stock(
        "handrail_posts",
        format!("{} Postes Barandal", posts),
        posts as f64 * HANDRAIL_POST_HEIGHT_M,
        POST_TUBE,
        LineRole::Structure,
    );
}
