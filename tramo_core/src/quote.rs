//! # Quotes
//!
//! The `Quote` struct is the root container for one priced job. Quotes
//! serialize to `.tmq` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Quote
//! ├── id: Uuid
//! ├── meta: QuoteMetadata (version, folio, project, client, timestamps)
//! ├── settings: QuoteSettings (labor factor, currency)
//! ├── request: CalculationRequest (work type, dimensions, config)
//! ├── assignments: BTreeMap<LineKey, MaterialAssignment>
//! └── extras: HashMap<Uuid, ExtraItem>
//! ```
//!
//! The BOM itself is never stored: it is recalculated from `request`, and
//! material assignments are joined to it by [`LineKey`]. Because keys do not
//! depend on the dimensions, editing the request keeps every assignment whose
//! line still exists.
//!
//! ## Example
//!
//! ```rust
//! use tramo_core::config::default_config;
//! use tramo_core::quote::{CalculationRequest, Quote};
//! use tramo_core::work_types::WorkType;
//!
//! let request = CalculationRequest::new(WorkType::Door, 0.9, 2.1, default_config(WorkType::Door));
//! let mut quote = Quote::new("Casa Norte", "Ana López", request);
//!
//! let result = quote.calculate();
//! quote.auto_assign(&result);
//!
//! let priced = quote.price();
//! assert!(priced.grand_total > priced.materials_subtotal);
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::calculations::{calculate, CalculationResult, LineKey, MaterialLine};
use crate::config::CalculationConfig;
use crate::errors::{CalcError, CalcResult};
use crate::materials::{auto_match, find_material};
use crate::work_types::WorkType;

/// Current schema version for .tmq files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Default labor charge as a fraction of materials
pub const DEFAULT_LABOR_FACTOR: f64 = 0.45;

/// Generate a folio of the form `COT-<year>-<nnnn>`.
pub fn new_folio(now: DateTime<Utc>) -> String {
    let serial = 1000 + (Uuid::new_v4().as_u128() % 9000) as u32;
    format!("COT-{}-{}", now.year(), serial)
}

/// Inputs of one engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationRequest {
    pub work_type: WorkType,
    /// Width or run length (m)
    pub width_m: f64,
    /// Height or total rise (m)
    pub height_m: f64,
    #[serde(default)]
    pub config: CalculationConfig,
}

impl CalculationRequest {
    pub fn new(work_type: WorkType, width_m: f64, height_m: f64, config: CalculationConfig) -> Self {
        CalculationRequest {
            work_type,
            width_m,
            height_m,
            config,
        }
    }
}

/// Catalog material chosen for one BOM line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialAssignment {
    pub material_id: String,
    /// Overrides the catalog price when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_price: Option<f64>,
}

/// Catalog item added by hand, outside the calculated BOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraItem {
    pub material_id: String,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_price: Option<f64>,
    pub added: DateTime<Utc>,
}

/// Root quote container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,

    /// Quote metadata (version, folio, client info)
    pub meta: QuoteMetadata,

    /// Pricing settings
    pub settings: QuoteSettings,

    /// What to calculate
    pub request: CalculationRequest,

    /// Material per BOM line, keyed by line key
    #[serde(default)]
    pub assignments: BTreeMap<LineKey, MaterialAssignment>,

    /// Hand-added catalog items
    #[serde(default)]
    pub extras: HashMap<Uuid, ExtraItem>,
}

impl Quote {
    /// Create a new quote with no material assignments.
    ///
    /// # Arguments
    ///
    /// * `project_name` - Name shown on the quote
    /// * `client` - Client name
    /// * `request` - Work type, dimensions and configuration
    pub fn new(project_name: impl Into<String>, client: impl Into<String>, request: CalculationRequest) -> Self {
        let now = Utc::now();
        Quote {
            id: Uuid::new_v4(),
            meta: QuoteMetadata {
                version: SCHEMA_VERSION.to_string(),
                folio: new_folio(now),
                project_name: project_name.into(),
                client: client.into(),
                company: String::new(),
                location: String::new(),
                created: now,
                modified: now,
            },
            settings: QuoteSettings::default(),
            request,
            assignments: BTreeMap::new(),
            extras: HashMap::new(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Run the engine on the stored request.
    pub fn calculate(&self) -> CalculationResult {
        calculate(
            self.request.work_type,
            self.request.width_m,
            self.request.height_m,
            &self.request.config,
        )
    }

    /// Change the dimensions. Assignments are kept; call
    /// [`auto_assign`](Self::auto_assign) with the new result to fill gaps
    /// and drop keys that no longer exist.
    pub fn set_dimensions(&mut self, width_m: f64, height_m: f64) {
        self.request.width_m = width_m;
        self.request.height_m = height_m;
        self.touch();
    }

    /// Sync assignments with a fresh result.
    ///
    /// Drops assignments whose key is not in `result`, then assigns
    /// [`auto_match`] guesses to lines that have none. Existing assignments
    /// (and their manual prices) are left alone.
    ///
    /// Returns the number of newly assigned lines.
    pub fn auto_assign(&mut self, result: &CalculationResult) -> usize {
        let before = self.assignments.len();
        self.assignments
            .retain(|key, _| result.lines.iter().any(|line| &line.key == key));
        let dropped = before - self.assignments.len();

        let mut added = 0;
        for line in &result.lines {
            if self.assignments.contains_key(&line.key) {
                continue;
            }
            if let Some(material) = auto_match(&line.suggested_material) {
                self.assignments.insert(
                    line.key.clone(),
                    MaterialAssignment {
                        material_id: material.id.clone(),
                        manual_price: None,
                    },
                );
                added += 1;
            }
        }

        if added > 0 || dropped > 0 {
            self.touch();
        }
        debug!(folio = %self.meta.folio, added, dropped, "auto-assigned materials");
        added
    }

    fn ensure_line(&self, key: &str) -> CalcResult<LineKey> {
        let result = self.calculate();
        result
            .line(key)
            .map(|line| line.key.clone())
            .ok_or_else(|| CalcError::line_not_found(key))
    }

    /// Assign a catalog material to a line, clearing any manual price.
    pub fn assign(&mut self, key: &str, material_id: &str) -> CalcResult<()> {
        find_material(material_id)?;
        let key = self.ensure_line(key)?;
        self.assignments.insert(
            key,
            MaterialAssignment {
                material_id: material_id.to_string(),
                manual_price: None,
            },
        );
        self.touch();
        Ok(())
    }

    /// Override the catalog price of an assigned line.
    pub fn set_manual_price(&mut self, key: &str, price: f64) -> CalcResult<()> {
        validate_price(price)?;
        let assignment = self
            .assignments
            .get_mut(&LineKey::from(key))
            .ok_or_else(|| CalcError::line_not_found(key))?;
        assignment.manual_price = Some(price);
        self.touch();
        Ok(())
    }

    /// Go back to the catalog price for a line.
    pub fn clear_manual_price(&mut self, key: &str) -> CalcResult<()> {
        let assignment = self
            .assignments
            .get_mut(&LineKey::from(key))
            .ok_or_else(|| CalcError::line_not_found(key))?;
        assignment.manual_price = None;
        self.touch();
        Ok(())
    }

    /// Add a catalog item outside the BOM. Returns its id.
    pub fn add_extra(&mut self, material_id: &str, quantity: f64) -> CalcResult<Uuid> {
        find_material(material_id)?;
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CalcError::invalid_input(
                "quantity",
                quantity.to_string(),
                "Quantity must be a positive number",
            ));
        }
        let id = Uuid::new_v4();
        self.extras.insert(
            id,
            ExtraItem {
                material_id: material_id.to_string(),
                quantity,
                manual_price: None,
                added: Utc::now(),
            },
        );
        self.touch();
        Ok(id)
    }

    /// Remove a hand-added item.
    pub fn remove_extra(&mut self, id: &Uuid) -> CalcResult<ExtraItem> {
        let item = self
            .extras
            .remove(id)
            .ok_or_else(|| CalcError::ExtraItemNotFound { id: id.to_string() })?;
        self.touch();
        Ok(item)
    }

    /// Price the quote against the material catalog.
    ///
    /// Lines without an assignment price at zero. An assignment or extra whose
    /// material id is no longer in the catalog is logged and priced as if it
    /// were unassigned, so one stale id never hides the rest of the quote.
    /// Extras are listed in the order they were added.
    pub fn price(&self) -> PricedQuote {
        let result = self.calculate();

        let lines: Vec<PricedLine> = result.lines.iter().map(|line| self.price_line(line)).collect();

        let mut ordered: Vec<_> = self.extras.iter().collect();
        ordered.sort_by(|(a_id, a), (b_id, b)| a.added.cmp(&b.added).then(a_id.cmp(b_id)));
        let extras: Vec<PricedExtra> = ordered
            .into_iter()
            .filter_map(|(id, item)| {
                let Ok(material) = find_material(&item.material_id) else {
                    warn!(folio = %self.meta.folio, material = %item.material_id, "extra item has unknown material, skipping");
                    return None;
                };
                let unit_price = item.manual_price.unwrap_or(material.price_base);
                Some(PricedExtra {
                    id: *id,
                    material_id: material.id.clone(),
                    material_name: material.name.clone(),
                    quantity: item.quantity,
                    unit_price,
                    total: item.quantity * unit_price,
                })
            })
            .collect();

        let lines_total: f64 = lines.iter().map(|l| l.total).sum();
        let extras_total: f64 = extras.iter().map(|e| e.total).sum();
        let totals = Totals::from_materials(lines_total + extras_total, &self.settings);

        PricedQuote {
            folio: self.meta.folio.clone(),
            currency: self.settings.currency.clone(),
            result,
            lines,
            extras,
            materials_subtotal: totals.materials_subtotal,
            labor: totals.labor,
            grand_total: totals.grand_total,
        }
    }

    fn price_line(&self, line: &MaterialLine) -> PricedLine {
        let quantity = line.purchase_quantity() as f64;
        let assigned = self.assignments.get(&line.key).and_then(|assignment| {
            match find_material(&assignment.material_id) {
                Ok(material) => Some((assignment, material)),
                Err(_) => {
                    warn!(
                        folio = %self.meta.folio,
                        line = %line.key,
                        material = %assignment.material_id,
                        "assigned material not in catalog, pricing line at zero"
                    );
                    None
                }
            }
        });

        match assigned {
            Some((assignment, material)) => {
                let unit_price = assignment.manual_price.unwrap_or(material.price_base);
                PricedLine {
                    key: line.key.clone(),
                    concept: line.concept.clone(),
                    material_id: Some(material.id.clone()),
                    material_name: Some(material.name.clone()),
                    quantity,
                    unit_price,
                    manual_price: assignment.manual_price.is_some(),
                    total: quantity * unit_price,
                }
            }
            None => PricedLine {
                key: line.key.clone(),
                concept: line.concept.clone(),
                material_id: None,
                material_name: None,
                quantity,
                unit_price: 0.0,
                manual_price: false,
                total: 0.0,
            },
        }
    }

    /// Short listing entry for history views.
    pub fn summary(&self) -> QuoteSummary {
        QuoteSummary {
            id: self.id,
            folio: self.meta.folio.clone(),
            project_name: self.meta.project_name.clone(),
            work_type: self.request.work_type,
            grand_total: self.price().grand_total,
            modified: self.meta.modified,
        }
    }
}

fn validate_price(price: f64) -> CalcResult<()> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(CalcError::invalid_input(
            "manual_price",
            price.to_string(),
            "Price must be zero or positive",
        ))
    }
}

/// Quote totals: labor is a fraction of materials, and the grand total is
/// materials plus labor. Prices are quoted before tax.
struct Totals {
    materials_subtotal: f64,
    labor: f64,
    grand_total: f64,
}

impl Totals {
    fn from_materials(materials_subtotal: f64, settings: &QuoteSettings) -> Self {
        let labor = materials_subtotal * settings.labor_factor;
        Totals {
            materials_subtotal,
            labor,
            grand_total: materials_subtotal + labor,
        }
    }
}

/// Quote metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Human-facing quote number (e.g., "COT-2026-4821")
    pub folio: String,

    pub project_name: String,

    /// Client name
    pub client: String,

    /// Client company
    #[serde(default)]
    pub company: String,

    /// Job site
    #[serde(default)]
    pub location: String,

    /// When the quote was created
    pub created: DateTime<Utc>,

    /// When the quote was last modified
    pub modified: DateTime<Utc>,
}

/// Pricing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSettings {
    /// Labor charged as a fraction of the materials subtotal
    pub labor_factor: f64,

    /// ISO currency code used for display
    pub currency: String,
}

impl Default for QuoteSettings {
    fn default() -> Self {
        QuoteSettings {
            labor_factor: DEFAULT_LABOR_FACTOR,
            currency: "MXN".to_string(),
        }
    }
}

/// One BOM line with its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedLine {
    pub key: LineKey,
    pub concept: String,
    /// `None` when no material is assigned
    pub material_id: Option<String>,
    pub material_name: Option<String>,
    /// Pieces or stock lengths
    pub quantity: f64,
    pub unit_price: f64,
    /// Whether `unit_price` is a manual override
    pub manual_price: bool,
    pub total: f64,
}

/// One hand-added item with its price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedExtra {
    pub id: Uuid,
    pub material_id: String,
    pub material_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total: f64,
}

/// Fully priced quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedQuote {
    pub folio: String,
    pub currency: String,
    pub result: CalculationResult,
    pub lines: Vec<PricedLine>,
    pub extras: Vec<PricedExtra>,
    /// BOM lines plus extras
    pub materials_subtotal: f64,
    pub labor: f64,
    /// Materials plus labor, before tax
    pub grand_total: f64,
}

/// Listing entry for saved quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub id: Uuid,
    pub folio: String,
    pub project_name: String,
    pub work_type: WorkType,
    pub grand_total: f64,
    pub modified: DateTime<Utc>,
}
