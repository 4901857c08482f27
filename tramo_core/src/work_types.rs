//! # Work-Type Catalog
//!
//! Every job the shop quotes is one of a closed set of work types. Each work
//! type belongs to exactly one structural family, and the family decides which
//! geometric formulas the engine applies.
//!
//! Work types and families serialize with the shop's historical ids
//! (`"ventana"`, `"escalera_recta"`, `"cerramientos"`, ...), which is what
//! stored quotes contain.
//!
//! ## Example
//!
//! ```rust
//! use tramo_core::work_types::{classify, StructuralFamily, WorkType};
//!
//! let wt = WorkType::from_id("dos_aguas").unwrap();
//! assert_eq!(wt, WorkType::Gable);
//! assert_eq!(classify(wt), StructuralFamily::Roofing);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

use self::StructuralFamily::{Closures, Linear, Roofing, Stairs};

/// Structural family: the four geometric job categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralFamily {
    /// Framed openings: doors, windows, gates...
    #[serde(rename = "cerramientos")]
    Closures,
    /// Horizontal runs: railings, fences...
    #[serde(rename = "lineales")]
    Linear,
    /// Covered areas: roofs, pergolas, domes...
    #[serde(rename = "techumbres")]
    Roofing,
    /// Stairs of every layout
    #[serde(rename = "escaleras")]
    Stairs,
}

impl StructuralFamily {
    /// All families in menu order
    pub const ALL: [StructuralFamily; 4] = [
        StructuralFamily::Closures,
        StructuralFamily::Linear,
        StructuralFamily::Roofing,
        StructuralFamily::Stairs,
    ];

    /// Wire id (e.g., "cerramientos")
    pub fn id(&self) -> &'static str {
        match self {
            StructuralFamily::Closures => "cerramientos",
            StructuralFamily::Linear => "lineales",
            StructuralFamily::Roofing => "techumbres",
            StructuralFamily::Stairs => "escaleras",
        }
    }

    /// Display label for menus
    pub fn label(&self) -> &'static str {
        match self {
            StructuralFamily::Closures => "Cerramientos",
            StructuralFamily::Linear => "Lineales",
            StructuralFamily::Roofing => "Techumbres",
            StructuralFamily::Stairs => "Escaleras",
        }
    }

    /// Work types belonging to this family, in catalog order
    pub fn work_types(&self) -> Vec<WorkType> {
        WorkType::ALL
            .iter()
            .copied()
            .filter(|wt| wt.family() == *self)
            .collect()
    }
}

impl std::fmt::Display for StructuralFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Supported job types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    #[serde(rename = "ventana")]
    Window,
    #[serde(rename = "puerta")]
    Door,
    #[serde(rename = "porton")]
    Gate,
    #[serde(rename = "proteccion_ventana")]
    WindowGuard,
    #[serde(rename = "cancel")]
    Partition,
    #[serde(rename = "cortina_metalica")]
    RollingShutter,
    #[serde(rename = "barandal")]
    Railing,
    #[serde(rename = "cerca")]
    Fence,
    #[serde(rename = "pasamanos")]
    Handrail,
    #[serde(rename = "reja")]
    Grille,
    #[serde(rename = "malla_ciclonica")]
    ChainLink,
    #[serde(rename = "tubular_ornamental")]
    OrnamentalTube,
    #[serde(rename = "techumbre")]
    Roof,
    #[serde(rename = "pergola")]
    Pergola,
    #[serde(rename = "domo")]
    Dome,
    #[serde(rename = "dos_aguas")]
    Gable,
    #[serde(rename = "arco")]
    Arch,
    #[serde(rename = "escalera_recta")]
    StraightStair,
    #[serde(rename = "escalera_caracol")]
    SpiralStair,
    #[serde(rename = "escalera_tipo_u")]
    UShapedStair,
    #[serde(rename = "escalera_con_descanso")]
    LandingStair,
}

/// Closure layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureKind {
    Window,
    Door,
    Gate,
    WindowGuard,
    Partition,
    RollingShutter,
}

/// Linear-run layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinearKind {
    Railing,
    Fence,
    Handrail,
    Grille,
    ChainLink,
    OrnamentalTube,
}

/// Roof-structure layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofKind {
    Flat,
    Pergola,
    Dome,
    Gable,
    Arch,
}

/// Stair layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StairKind {
    Straight,
    Spiral,
    UShaped,
    Landing,
}

/// A work type viewed as its family plus the layout inside that family.
///
/// The engine matches on this instead of on raw work types so that each
/// family branch only has to handle its own layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobShape {
    Closure(ClosureKind),
    Linear(LinearKind),
    Roof(RoofKind),
    Stair(StairKind),
}

impl JobShape {
    /// Family of this shape
    pub fn family(&self) -> StructuralFamily {
        match self {
            JobShape::Closure(_) => StructuralFamily::Closures,
            JobShape::Linear(_) => StructuralFamily::Linear,
            JobShape::Roof(_) => StructuralFamily::Roofing,
            JobShape::Stair(_) => StructuralFamily::Stairs,
        }
    }
}

impl WorkType {
    /// All work types in catalog order
    pub const ALL: [WorkType; 21] = [
        WorkType::Window,
        WorkType::Door,
        WorkType::Gate,
        WorkType::WindowGuard,
        WorkType::Partition,
        WorkType::RollingShutter,
        WorkType::Railing,
        WorkType::Fence,
        WorkType::Handrail,
        WorkType::Grille,
        WorkType::ChainLink,
        WorkType::OrnamentalTube,
        WorkType::Roof,
        WorkType::Pergola,
        WorkType::Dome,
        WorkType::Gable,
        WorkType::Arch,
        WorkType::StraightStair,
        WorkType::SpiralStair,
        WorkType::UShapedStair,
        WorkType::LandingStair,
    ];

    /// Family plus in-family layout
    pub fn shape(&self) -> JobShape {
        match self {
            WorkType::Window => JobShape::Closure(ClosureKind::Window),
            WorkType::Door => JobShape::Closure(ClosureKind::Door),
            WorkType::Gate => JobShape::Closure(ClosureKind::Gate),
            WorkType::WindowGuard => JobShape::Closure(ClosureKind::WindowGuard),
            WorkType::Partition => JobShape::Closure(ClosureKind::Partition),
            WorkType::RollingShutter => JobShape::Closure(ClosureKind::RollingShutter),
            WorkType::Railing => JobShape::Linear(LinearKind::Railing),
            WorkType::Fence => JobShape::Linear(LinearKind::Fence),
            WorkType::Handrail => JobShape::Linear(LinearKind::Handrail),
            WorkType::Grille => JobShape::Linear(LinearKind::Grille),
            WorkType::ChainLink => JobShape::Linear(LinearKind::ChainLink),
            WorkType::OrnamentalTube => JobShape::Linear(LinearKind::OrnamentalTube),
            WorkType::Roof => JobShape::Roof(RoofKind::Flat),
            WorkType::Pergola => JobShape::Roof(RoofKind::Pergola),
            WorkType::Dome => JobShape::Roof(RoofKind::Dome),
            WorkType::Gable => JobShape::Roof(RoofKind::Gable),
            WorkType::Arch => JobShape::Roof(RoofKind::Arch),
            WorkType::StraightStair => JobShape::Stair(StairKind::Straight),
            WorkType::SpiralStair => JobShape::Stair(StairKind::Spiral),
            WorkType::UShapedStair => JobShape::Stair(StairKind::UShaped),
            WorkType::LandingStair => JobShape::Stair(StairKind::Landing),
        }
    }

    /// Structural family of this work type
    pub fn family(&self) -> StructuralFamily {
        self.shape().family()
    }

    /// Catalog descriptor
    pub fn meta(&self) -> &'static WorkTypeMeta {
        // CATALOG is laid out in the same order as ALL
        let index = WorkType::ALL
            .iter()
            .position(|wt| wt == self)
            .unwrap_or_default();
        &CATALOG[index]
    }

    /// Display label (e.g., "Ventana")
    pub fn label(&self) -> &'static str {
        self.meta().label
    }

    /// Wire id (e.g., "ventana")
    pub fn id(&self) -> &'static str {
        match self {
            WorkType::Window => "ventana",
            WorkType::Door => "puerta",
            WorkType::Gate => "porton",
            WorkType::WindowGuard => "proteccion_ventana",
            WorkType::Partition => "cancel",
            WorkType::RollingShutter => "cortina_metalica",
            WorkType::Railing => "barandal",
            WorkType::Fence => "cerca",
            WorkType::Handrail => "pasamanos",
            WorkType::Grille => "reja",
            WorkType::ChainLink => "malla_ciclonica",
            WorkType::OrnamentalTube => "tubular_ornamental",
            WorkType::Roof => "techumbre",
            WorkType::Pergola => "pergola",
            WorkType::Dome => "domo",
            WorkType::Gable => "dos_aguas",
            WorkType::Arch => "arco",
            WorkType::StraightStair => "escalera_recta",
            WorkType::SpiralStair => "escalera_caracol",
            WorkType::UShapedStair => "escalera_tipo_u",
            WorkType::LandingStair => "escalera_con_descanso",
        }
    }

    /// Parse a wire id. Accepts dashes or spaces in place of underscores.
    pub fn from_id(id: &str) -> CalcResult<Self> {
        let normalized = id.trim().to_lowercase().replace(['-', ' '], "_");
        WorkType::ALL
            .iter()
            .copied()
            .find(|wt| wt.id() == normalized)
            .ok_or_else(|| CalcError::unknown_work_type(id))
    }
}

impl std::fmt::Display for WorkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for WorkType {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkType::from_id(s)
    }
}

/// Classify a work type into its structural family.
pub fn classify(work_type: WorkType) -> StructuralFamily {
    work_type.family()
}

/// Static descriptor for one work type, used to build selection menus.
#[derive(Debug, Clone, Serialize)]
pub struct WorkTypeMeta {
    pub id: WorkType,
    pub label: &'static str,
    pub family: StructuralFamily,
    pub family_label: &'static str,
    /// Material Symbols icon token
    pub icon: &'static str,
    /// Accent color (hex)
    pub color: &'static str,
    pub description: &'static str,
}

const CLOSURES_COLOR: &str = "#4682b4";
const LINEAR_COLOR: &str = "#ff6700";
const ROOFING_COLOR: &str = "#22c55e";
const STAIRS_COLOR: &str = "#a855f7";

const fn meta(
    id: WorkType,
    label: &'static str,
    family: StructuralFamily,
    family_label: &'static str,
    icon: &'static str,
    color: &'static str,
    description: &'static str,
) -> WorkTypeMeta {
    WorkTypeMeta {
        id,
        label,
        family,
        family_label,
        icon,
        color,
        description,
    }
}

/// Full catalog, grouped by family, in the same order as [`WorkType::ALL`].
pub static CATALOG: [WorkTypeMeta; 21] = [
    meta(WorkType::Window, "Ventana", Closures, "Cerramientos", "window", CLOSURES_COLOR, "Marco + barrotes/lámina"),
    meta(WorkType::Door, "Puerta", Closures, "Cerramientos", "door_front", CLOSURES_COLOR, "Marco perimetral + relleno"),
    meta(WorkType::Gate, "Portón", Closures, "Cerramientos", "garage", CLOSURES_COLOR, "Portón corredizo/abatible"),
    meta(WorkType::WindowGuard, "Protección", Closures, "Cerramientos", "grid_on", CLOSURES_COLOR, "Reja p/ventana con marco"),
    meta(WorkType::Partition, "Cancel", Closures, "Cerramientos", "door_sliding", CLOSURES_COLOR, "Divisor de vidrio/aluminio"),
    meta(WorkType::RollingShutter, "Cortina Metálica", Closures, "Cerramientos", "blinds", CLOSURES_COLOR, "Cortina enrollable p/local"),
    meta(WorkType::Railing, "Barandal", Linear, "Lineales", "fence", LINEAR_COLOR, "Pasamanos + postes + relleno"),
    meta(WorkType::Fence, "Cerca", Linear, "Lineales", "security", LINEAR_COLOR, "Cerca perimetral con postes"),
    meta(WorkType::Handrail, "Pasamanos", Linear, "Lineales", "stacked_bar_chart", LINEAR_COLOR, "Tubo superior lineal"),
    meta(WorkType::Grille, "Reja", Linear, "Lineales", "deployed_code", LINEAR_COLOR, "Reja perimetral sólida"),
    meta(WorkType::ChainLink, "Malla Ciclónica", Linear, "Lineales", "grid_4x4", LINEAR_COLOR, "Postes + malla + alambre"),
    meta(WorkType::OrnamentalTube, "Tubular Ornamental", Linear, "Lineales", "auto_awesome", LINEAR_COLOR, "Cerca decorativa tubular"),
    meta(WorkType::Roof, "Techumbre", Roofing, "Techumbres", "roofing", ROOFING_COLOR, "Estructura + láminas"),
    meta(WorkType::Pergola, "Pérgola", Roofing, "Techumbres", "deck", ROOFING_COLOR, "Pérgola con vigas expuestas"),
    meta(WorkType::Dome, "Domo", Roofing, "Techumbres", "wb_twilight", ROOFING_COLOR, "Domo policarbonato/acrílico"),
    meta(WorkType::Gable, "Dos Aguas", Roofing, "Techumbres", "cottage", ROOFING_COLOR, "Techo a 2 pendientes"),
    meta(WorkType::Arch, "Arco Techo", Roofing, "Techumbres", "filter_drama", ROOFING_COLOR, "Estructura curva/arco"),
    meta(WorkType::StraightStair, "Recta", Stairs, "Escaleras", "stairs", STAIRS_COLOR, "Escalones + limones laterales"),
    meta(WorkType::SpiralStair, "Caracol", Stairs, "Escaleras", "assist_walker", STAIRS_COLOR, "Espiral c/poste central"),
    meta(WorkType::UShapedStair, "Tipo U", Stairs, "Escaleras", "u_turn_right", STAIRS_COLOR, "2 tramos + descanso 180°"),
    meta(WorkType::LandingStair, "Con Descanso", Stairs, "Escaleras", "view_cozy", STAIRS_COLOR, "2 tramos + plataforma"),
];

/// The whole catalog in menu order.
pub fn catalog() -> &'static [WorkTypeMeta] {
    &CATALOG
}

/// Catalog grouped by family, for menu presentation.
pub fn catalog_by_family() -> Vec<(StructuralFamily, Vec<&'static WorkTypeMeta>)> {
    StructuralFamily::ALL
        .iter()
        .map(|family| {
            let entries = CATALOG.iter().filter(|m| m.family == *family).collect();
            (*family, entries)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_classification_is_a_partition() {
        let mut seen = HashSet::new();
        for family in StructuralFamily::ALL {
            for wt in family.work_types() {
                assert_eq!(classify(wt), family);
                assert!(seen.insert(wt), "{wt:?} appears in two families");
            }
        }
        assert_eq!(seen.len(), WorkType::ALL.len());
    }

    #[test]
    fn test_family_sizes() {
        assert_eq!(StructuralFamily::Closures.work_types().len(), 6);
        assert_eq!(StructuralFamily::Linear.work_types().len(), 6);
        assert_eq!(StructuralFamily::Roofing.work_types().len(), 5);
        assert_eq!(StructuralFamily::Stairs.work_types().len(), 4);
    }

    #[test]
    fn test_catalog_matches_work_types() {
        for (wt, entry) in WorkType::ALL.iter().zip(CATALOG.iter()) {
            assert_eq!(*wt, entry.id);
            assert_eq!(wt.family(), entry.family);
            assert_eq!(entry.family_label, entry.family.label());
            assert!(std::ptr::eq(wt.meta(), entry));
        }
    }

    #[test]
    fn test_id_roundtrip() {
        for wt in WorkType::ALL {
            assert_eq!(WorkType::from_id(wt.id()).unwrap(), wt);
            let json = serde_json::to_string(&wt).unwrap();
            assert_eq!(json, format!("\"{}\"", wt.id()));
        }
    }

    #[test]
    fn test_from_id_is_lenient_about_separators() {
        assert_eq!(WorkType::from_id("Escalera-Recta").unwrap(), WorkType::StraightStair);
        assert_eq!("malla ciclonica".parse::<WorkType>().unwrap(), WorkType::ChainLink);
    }

    #[test]
    fn test_unknown_id() {
        let err = WorkType::from_id("iglu").unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_WORK_TYPE");
    }

    #[test]
    fn test_family_serialization() {
        let json = serde_json::to_string(&StructuralFamily::Roofing).unwrap();
        assert_eq!(json, "\"techumbres\"");
        assert_eq!(StructuralFamily::Roofing.id(), "techumbres");
    }

    #[test]
    fn test_catalog_by_family_groups() {
        let groups = catalog_by_family();
        assert_eq!(groups.len(), 4);
        assert_eq!(groups[0].0, StructuralFamily::Closures);
        assert_eq!(groups[0].1[0].label, "Ventana");
        let total: usize = groups.iter().map(|(_, entries)| entries.len()).sum();
        assert_eq!(total, catalog().len());
    }
}
