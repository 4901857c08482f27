//! # BOM Calculation Engine
//!
//! Turns a work type, two dimensions and a [`CalculationConfig`] into an
//! itemized bill of materials:
//!
//! 1. The work type's [`JobShape`] selects a family branch
//!    ([`closures`], [`linear`], [`roofing`], [`stairs`]).
//! 2. The branch emits material lines in display order.
//! 3. [`consumables`] appends welding rod, discs and drill bits derived from
//!    the branch output.
//! 4. Grand totals are summed over every line.
//!
//! The engine is a pure function. Non-positive dimensions do not fail; they
//! produce an empty result whose description flags the problem, so reactive
//! forms can recalculate on every keystroke.
//!
//! ## Example
//!
//! ```rust
//! use tramo_core::calculations::calculate;
//! use tramo_core::config::CalculationConfig;
//! use tramo_core::work_types::WorkType;
//!
//! let result = calculate(WorkType::Window, 1.2, 1.0, &CalculationConfig::default());
//! let frame = &result.lines[0];
//! assert_eq!(frame.length_m, 4.84);
//! assert_eq!(frame.stock_lengths, 1);
//! ```

pub mod closures;
pub mod consumables;
pub mod linear;
pub mod roofing;
pub mod stairs;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CalculationConfig;
use crate::work_types::{classify, JobShape, StructuralFamily, WorkType};

/// Length of one purchasable bar or tube (m)
pub const STOCK_LENGTH_M: f64 = 6.0;

/// Cutting-loss allowance applied to every linear line.
///
/// A single engine-wide constant; per-material waste is not modelled.
pub const WASTE_FACTOR: f64 = 0.10;

/// Description used for the degenerate result
pub const INVALID_DIMENSIONS: &str = "Dimensiones inválidas (≤ 0)";

/// Round to millimetres (3 decimals).
pub fn round_mm(meters: f64) -> f64 {
    (meters * 1000.0).round() / 1000.0
}

/// Number of stock lengths that cover a waste-inclusive length.
pub fn stock_lengths_for(length_with_waste_m: f64) -> u32 {
    (length_with_waste_m / STOCK_LENGTH_M).ceil() as u32
}

/// `ceil` for counts; negative inputs clamp to zero.
pub(crate) fn ceil_count(value: f64) -> u32 {
    value.ceil().max(0.0) as u32
}

/// `floor` for counts; negative inputs clamp to zero.
pub(crate) fn floor_count(value: f64) -> u32 {
    value.floor().max(0.0) as u32
}

/// Structural purpose of a BOM line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    #[serde(rename = "marco")]
    Frame,
    #[serde(rename = "relleno")]
    Fill,
    #[serde(rename = "estructura")]
    Structure,
    #[serde(rename = "herraje")]
    Hardware,
    #[serde(rename = "consumible")]
    Consumable,
}

impl LineRole {
    /// Frame and structure lines are welded members
    pub fn is_structural(&self) -> bool {
        matches!(self, LineRole::Frame | LineRole::Structure)
    }
}

/// Stable identifier of a line inside one result.
///
/// Built from a fixed slug naming the line's purpose, with `#n` appended for
/// the n-th repeat of the same slug. Unlike the concept text, keys do not
/// change when dimensions change, so material assignments keyed by them
/// survive a recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(pub String);

impl LineKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for LineKey {
    fn from(s: &str) -> Self {
        LineKey(s.to_string())
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the bill of materials.
///
/// Either a piece line (`is_piece`, quantity in `pieces`, linear fields zero)
/// or a linear line (`length_m`, `stock_lengths`, `leftover_m` meaningful,
/// `pieces` zero).
///
/// ## JSON Example
///
/// ```json
/// {
///   "key": "perimeter_frame",
///   "concept": "Marco Perimetral",
///   "suggested_material": "PTR 1 1/2\" Cal 14",
///   "role": "marco",
///   "is_piece": false,
///   "pieces": 0,
///   "raw_length_m": 4.4,
///   "length_m": 4.84,
///   "stock_lengths": 1,
///   "leftover_m": 1.16
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLine {
    pub key: LineKey,
    /// Human-readable concept (e.g., "8 Barrotes Verticales @12cm")
    pub concept: String,
    /// Generic material description, matched against the catalog by callers
    pub suggested_material: String,
    pub role: LineRole,
    pub is_piece: bool,
    pub pieces: u32,
    /// Required length before waste (m)
    pub raw_length_m: f64,
    /// Required length including waste, rounded to mm (m)
    pub length_m: f64,
    /// 6 m stock lengths needed to cover `length_m`
    pub stock_lengths: u32,
    /// Offcut left after cutting `length_m` from the stock (m)
    pub leftover_m: f64,
}

impl MaterialLine {
    /// Purchase quantity: pieces for piece lines, stock lengths otherwise
    pub fn purchase_quantity(&self) -> u32 {
        if self.is_piece {
            self.pieces
        } else {
            self.stock_lengths
        }
    }
}

/// Complete engine output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub family: StructuralFamily,
    pub work_type: WorkType,
    pub description: String,
    /// Lines in family-branch emission order, consumables last
    pub lines: Vec<MaterialLine>,
    /// Sum of `length_m` over all lines (piece lines contribute 0)
    pub total_length_m: f64,
    /// Sum of `stock_lengths` over all lines
    pub total_stock_lengths: u32,
    /// Waste applied, in percent (0 for the invalid-dimension result)
    pub waste_pct: f64,
}

impl CalculationResult {
    /// Degenerate result returned for non-positive dimensions
    fn invalid(work_type: WorkType) -> Self {
        CalculationResult {
            family: classify(work_type),
            work_type,
            description: INVALID_DIMENSIONS.to_string(),
            lines: Vec::new(),
            total_length_m: 0.0,
            total_stock_lengths: 0,
            waste_pct: 0.0,
        }
    }

    /// A result is usable only when it has at least one line
    pub fn is_usable(&self) -> bool {
        !self.lines.is_empty()
    }

    /// Look up a line by key
    pub fn line(&self, key: &str) -> Option<&MaterialLine> {
        self.lines.iter().find(|l| l.key.as_str() == key)
    }

    /// Lines with the given role, in order
    pub fn lines_with_role(&self, role: LineRole) -> impl Iterator<Item = &MaterialLine> {
        self.lines.iter().filter(move |l| l.role == role)
    }
}

/// Accumulates lines for one calculation.
///
/// Provides the two shared line constructors (stock-length line and piece
/// line) and assigns each line its [`LineKey`].
pub(crate) struct BomBuilder {
    waste: f64,
    lines: Vec<MaterialLine>,
    occurrences: HashMap<&'static str, u32>,
}

impl BomBuilder {
    pub(crate) fn new(waste: f64) -> Self {
        BomBuilder {
            waste,
            lines: Vec::new(),
            occurrences: HashMap::new(),
        }
    }

    fn next_key(&mut self, slug: &'static str) -> LineKey {
        let count = self.occurrences.entry(slug).or_insert(0);
        *count += 1;
        if *count == 1 {
            LineKey(slug.to_string())
        } else {
            LineKey(format!("{}#{}", slug, count))
        }
    }

    /// Add a linear line, converting the raw length to stock lengths.
    pub(crate) fn stock(
        &mut self,
        slug: &'static str,
        concept: impl Into<String>,
        raw_length_m: f64,
        suggested_material: impl Into<String>,
        role: LineRole,
    ) {
        let raw_length_m = raw_length_m.max(0.0);
        let length_m = round_mm(raw_length_m * (1.0 + self.waste));
        let stock_lengths = stock_lengths_for(length_m);
        let leftover_m = round_mm(stock_lengths as f64 * STOCK_LENGTH_M - length_m).max(0.0);
        let key = self.next_key(slug);
        self.lines.push(MaterialLine {
            key,
            concept: concept.into(),
            suggested_material: suggested_material.into(),
            role,
            is_piece: false,
            pieces: 0,
            raw_length_m,
            length_m,
            stock_lengths,
            leftover_m,
        });
    }

    /// Add a piece-counted line.
    pub(crate) fn piece(
        &mut self,
        slug: &'static str,
        concept: impl Into<String>,
        quantity: u32,
        suggested_material: impl Into<String>,
        role: LineRole,
    ) {
        let key = self.next_key(slug);
        self.lines.push(MaterialLine {
            key,
            concept: concept.into(),
            suggested_material: suggested_material.into(),
            role,
            is_piece: true,
            pieces: quantity,
            raw_length_m: 0.0,
            length_m: 0.0,
            stock_lengths: 0,
            leftover_m: 0.0,
        });
    }

    pub(crate) fn lines(&self) -> &[MaterialLine] {
        &self.lines
    }

    pub(crate) fn into_lines(self) -> Vec<MaterialLine> {
        self.lines
    }
}

/// What a family branch reports to the consumable pass besides its lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct CutProfile {
    /// Internal reinforcement bars (closures only)
    pub internal_reinforcements: u32,
    /// Cuts for infill bars or posts
    pub extra_cuts: u32,
    /// Whether the branch emitted bar infill.
    ///
    /// Set from what was built, not from `fill_type` alone: a closure with
    /// no `fill_type` override still gets bars (the default fill) and counts
    /// here, and railings, grilles and ornamental tube always do. Bar cuts
    /// and the 1/8" drill bit follow this flag.
    pub bar_infill: bool,
}

fn dims_valid(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Calculate the bill of materials for one job.
///
/// # Arguments
///
/// * `work_type` - Job type
/// * `width_m` - Width, or run length for linear jobs (m)
/// * `height_m` - Height, or total rise for stairs (m)
/// * `config` - Optional overrides; unset fields use family defaults
///
/// # Returns
///
/// Always a [`CalculationResult`]. When either dimension is not a positive
/// number the result has no lines, zero totals and the
/// [`INVALID_DIMENSIONS`] description.
pub fn calculate(
    work_type: WorkType,
    width_m: f64,
    height_m: f64,
    config: &CalculationConfig,
) -> CalculationResult {
    if !dims_valid(width_m) || !dims_valid(height_m) {
        debug!(work_type = work_type.id(), width_m, height_m, "invalid dimensions, returning empty BOM");
        return CalculationResult::invalid(work_type);
    }

    let mut bom = BomBuilder::new(WASTE_FACTOR);
    let (description, cuts) = match work_type.shape() {
        JobShape::Closure(kind) => closures::build(&mut bom, work_type, kind, width_m, height_m, config),
        JobShape::Linear(kind) => linear::build(&mut bom, work_type, kind, width_m, height_m, config),
        JobShape::Roof(kind) => roofing::build(&mut bom, work_type, kind, width_m, height_m, config),
        JobShape::Stair(kind) => stairs::build(&mut bom, work_type, kind, width_m, height_m, config),
    };

    let family = classify(work_type);
    consumables::append(&mut bom, family, cuts);

    let lines = bom.into_lines();
    let total_length_m = lines.iter().map(|l| l.length_m).sum();
    let total_stock_lengths = lines
        .iter()
        .fold(0u32, |total, l| total.saturating_add(l.stock_lengths));

    debug!(work_type = work_type.id(), width_m, height_m, lines = lines.len(), "calculated BOM");

    CalculationResult {
        family,
        work_type,
        description,
        lines,
        total_length_m,
        total_stock_lengths,
        waste_pct: WASTE_FACTOR * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stock_line_rounding() {
        let mut bom = BomBuilder::new(WASTE_FACTOR);
        bom.stock("frame", "Marco", 4.4, "PTR", LineRole::Frame);
        let line = &bom.lines()[0];
        assert_eq!(line.length_m, 4.84);
        assert_eq!(line.stock_lengths, 1);
        assert_eq!(line.leftover_m, 1.16);
        assert!(!line.is_piece);
        assert_eq!(line.pieces, 0);
    }

    #[test]
    fn test_stock_line_exact_multiple() {
        let mut bom = BomBuilder::new(0.0);
        bom.stock("frame", "Marco", 12.0, "PTR", LineRole::Frame);
        let line = &bom.lines()[0];
        assert_eq!(line.stock_lengths, 2);
        assert_eq!(line.leftover_m, 0.0);
    }

    #[test]
    fn test_negative_raw_length_clamps() {
        let mut bom = BomBuilder::new(WASTE_FACTOR);
        bom.stock("bars", "Barrotes", -0.5, "Cuadrado", LineRole::Fill);
        let line = &bom.lines()[0];
        assert_eq!(line.length_m, 0.0);
        assert_eq!(line.stock_lengths, 0);
        assert_eq!(line.leftover_m, 0.0);
    }

    #[test]
    fn test_piece_line_has_no_linear_fields() {
        let mut bom = BomBuilder::new(WASTE_FACTOR);
        bom.piece("lock", "Chapa", 1, "Chapa Residencial", LineRole::Hardware);
        let line = &bom.lines()[0];
        assert!(line.is_piece);
        assert_eq!(line.pieces, 1);
        assert_eq!(line.length_m, 0.0);
        assert_eq!(line.stock_lengths, 0);
        assert_eq!(line.purchase_quantity(), 1);
    }

    #[test]
    fn test_repeated_slugs_get_suffixes() {
        let mut bom = BomBuilder::new(WASTE_FACTOR);
        bom.piece("disc", "A", 1, "x", LineRole::Consumable);
        bom.piece("disc", "B", 1, "x", LineRole::Consumable);
        bom.piece("other", "C", 1, "x", LineRole::Consumable);
        let keys: Vec<_> = bom.lines().iter().map(|l| l.key.as_str().to_string()).collect();
        assert_eq!(keys, vec!["disc", "disc#2", "other"]);
    }

    #[test]
    fn test_count_helpers_clamp() {
        assert_eq!(floor_count(-0.3), 0);
        assert_eq!(ceil_count(-2.0), 0);
        assert_eq!(floor_count(8.9), 8);
        assert_eq!(ceil_count(8.1), 9);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&LineRole::Structure).unwrap(), "\"estructura\"");
        assert!(LineRole::Frame.is_structural());
        assert!(!LineRole::Fill.is_structural());
    }

    #[test]
    fn test_nan_dimension_is_invalid() {
        let result = calculate(WorkType::Door, f64::NAN, 2.0, &CalculationConfig::default());
        assert!(!result.is_usable());
        assert_eq!(result.description, INVALID_DIMENSIONS);
    }

    #[test]
    fn test_totals_sum_lines() {
        let result = calculate(WorkType::Fence, 10.0, 1.8, &CalculationConfig::default());
        let length: f64 = result.lines.iter().map(|l| l.length_m).sum();
        let stock: u32 = result.lines.iter().map(|l| l.stock_lengths).sum();
        assert_eq!(result.total_length_m, length);
        assert_eq!(result.total_stock_lengths, stock);
        assert_eq!(result.waste_pct, 10.0);
    }

    #[test]
    fn test_result_serialization_roundtrip() {
        let result = calculate(WorkType::Gate, 3.0, 2.2, &CalculationConfig::default());
        let json = serde_json::to_string_pretty(&result).unwrap();
        assert!(json.contains("\"porton\""));
        let roundtrip: CalculationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.work_type, result.work_type);
        assert_eq!(roundtrip.family, StructuralFamily::Closures);
        assert_eq!(roundtrip.lines.len(), result.lines.len());
        assert_eq!(roundtrip.total_stock_lengths, result.total_stock_lengths);
        assert!((roundtrip.total_length_m - result.total_length_m).abs() < 1e-9);
    }
}
