//! # Material Catalog
//!
//! Static price list that BOM lines are joined against when a quote is
//! priced. The engine itself never reads it: lines only carry a generic
//! `suggested_material` text, and callers either pick a catalog id by hand or
//! let [`auto_match`] guess one.
//!
//! ## Categories
//!
//! - **Perfil**: square structural tubing (PTR), sold per 6 m length
//! - **Tubo**: round pipe, sold per 6 m length
//! - **Lámina**: sheet, plate and roofing panels
//! - **Herraje**: locks, hinges, rollers
//! - **Consumible**: abrasive discs, drill bits, paint, welding rod
//!
//! ## Example
//!
//! ```rust
//! use tramo_core::materials::{auto_match, find_material};
//!
//! let rod = auto_match("Electrodos 6013 1/8\" (kg)").unwrap();
//! assert_eq!(rod.id, "weld-6013-1/8");
//! assert_eq!(find_material(&rod.id).unwrap().price_base, 125.0);
//! ```

mod database;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

pub use database::all_materials;

/// Number of leading characters of a suggestion used by [`auto_match`]
pub const AUTO_MATCH_PREFIX_CHARS: usize = 8;

/// Catalog grouping shown as tabs in the price list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    #[serde(rename = "perfil")]
    Profile,
    #[serde(rename = "tubo")]
    Tube,
    #[serde(rename = "lamina")]
    Sheet,
    #[serde(rename = "herraje")]
    Hardware,
    #[serde(rename = "consumible")]
    Consumable,
}

impl MaterialCategory {
    pub const ALL: [MaterialCategory; 5] = [
        MaterialCategory::Profile,
        MaterialCategory::Tube,
        MaterialCategory::Sheet,
        MaterialCategory::Hardware,
        MaterialCategory::Consumable,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MaterialCategory::Profile => "Perfiles PTR/Macizos",
            MaterialCategory::Tube => "Tubería Redonda",
            MaterialCategory::Sheet => "Láminas, Placas y Techos",
            MaterialCategory::Hardware => "Herrajes y Accesorios",
            MaterialCategory::Consumable => "Consumibles, Pintura y Mechas",
        }
    }
}

impl std::fmt::Display for MaterialCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Unit a catalog price refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialUnit {
    /// One 6 m stock length
    #[serde(rename = "tramo_6m")]
    StockLength,
    #[serde(rename = "pza")]
    Piece,
    #[serde(rename = "m2")]
    SquareMeter,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "lt")]
    Liter,
    #[serde(rename = "paquete")]
    Package,
}

impl MaterialUnit {
    /// Short label used in printed quotes
    pub fn abbreviation(&self) -> &'static str {
        match self {
            MaterialUnit::StockLength => "tramo",
            MaterialUnit::Piece => "pza",
            MaterialUnit::SquareMeter => "m²",
            MaterialUnit::Kilogram => "kg",
            MaterialUnit::Liter => "lt",
            MaterialUnit::Package => "paq",
        }
    }
}

/// One priced catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMaterial {
    pub id: String,
    pub name: String,
    pub category: MaterialCategory,
    pub sub_category: String,
    pub unit: MaterialUnit,
    /// List price per unit (MXN)
    pub price_base: f64,
    pub description: String,
    /// Wall gauge or pipe schedule, when the material has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gauge: Option<String>,
}

/// Look up a catalog material by id.
pub fn find_material(id: &str) -> CalcResult<&'static CatalogMaterial> {
    all_materials()
        .iter()
        .find(|m| m.id == id)
        .ok_or_else(|| CalcError::material_not_found(id))
}

/// Catalog materials in one category, in catalog order.
pub fn materials_in(category: MaterialCategory) -> impl Iterator<Item = &'static CatalogMaterial> {
    all_materials().iter().filter(move |m| m.category == category)
}

/// Guess a catalog material for an engine suggestion.
///
/// Returns the first material whose lowercase name contains the first
/// [`AUTO_MATCH_PREFIX_CHARS`] characters of the lowercase suggestion. Blank
/// suggestions never match.
pub fn auto_match(suggested: &str) -> Option<&'static CatalogMaterial> {
    let needle: String = suggested
        .trim()
        .to_lowercase()
        .chars()
        .take(AUTO_MATCH_PREFIX_CHARS)
        .collect();
    if needle.is_empty() {
        return None;
    }
    all_materials()
        .iter()
        .find(|m| m.name.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_material() {
        let lock = find_material("lock-res").unwrap();
        assert_eq!(lock.name, "Chapa Residencial");
        assert_eq!(lock.unit, MaterialUnit::Piece);
        assert_eq!(lock.price_base, 450.0);
    }

    #[test]
    fn test_find_missing_material() {
        let err = find_material("unobtainium").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_auto_match_uses_prefix() {
        let rod = auto_match("Electrodos 6013 1/8\" (kg)").unwrap();
        assert_eq!(rod.id, "weld-6013-1/8");

        let chop = auto_match("Disco Tronzadora 14\"").unwrap();
        assert_eq!(chop.id, "disc-cut-14");

        // "ptr 1 1/" first hits the 1 1/4" size
        let ptr = auto_match("PTR 1 1/2\" Cal 14").unwrap();
        assert_eq!(ptr.category, MaterialCategory::Profile);
        assert!(ptr.name.to_lowercase().starts_with("ptr 1 1/"));
    }

    #[test]
    fn test_auto_match_misses() {
        assert!(auto_match("Cuadrado 1/2\"").is_none());
        assert!(auto_match("").is_none());
        assert!(auto_match("   ").is_none());
    }

    #[test]
    fn test_materials_in_category() {
        let profiles: Vec<_> = materials_in(MaterialCategory::Profile).collect();
        assert_eq!(profiles.len(), 35);
        assert!(profiles.iter().all(|m| m.unit == MaterialUnit::StockLength));

        let hardware: Vec<_> = materials_in(MaterialCategory::Hardware).collect();
        assert_eq!(hardware.len(), 5);
    }

    #[test]
    fn test_category_serialization() {
        let json = serde_json::to_string(&MaterialCategory::Consumable).unwrap();
        assert_eq!(json, "\"consumible\"");
        let unit: MaterialUnit = serde_json::from_str("\"tramo_6m\"").unwrap();
        assert_eq!(unit, MaterialUnit::StockLength);
    }
}
