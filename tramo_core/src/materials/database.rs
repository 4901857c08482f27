//! Catalog contents.
//!
//! Tubing entries are generated from size and gauge tables; everything else
//! is a fixed list. The full catalog is built once on first access.

use once_cell::sync::Lazy;

use super::{CatalogMaterial, MaterialCategory, MaterialUnit};

const PTR_SIZES: [&str; 7] = ["1\"", "1 1/4\"", "1 1/2\"", "2\"", "2 1/2\"", "3\"", "4\""];
const PTR_GAUGES: [(&str, f64); 5] = [
    ("Cal 14", 1.0),
    ("Cal 13", 1.15),
    ("Cal 12", 1.35),
    ("Cal 11", 1.6),
    ("Cal 10 (Industrial)", 2.1),
];
const PTR_BASE_PRICE: f64 = 400.0;
const PTR_PRICE_STEP: f64 = 150.0;

const TUBE_SIZES: [&str; 8] = ["1/2\"", "3/4\"", "1\"", "1 1/4\"", "1 1/2\"", "2\"", "3\"", "4\""];
const TUBE_SCHEDULES: [(&str, f64); 2] = [("Céd 30", 1.0), ("Céd 40 (Industrial)", 1.4)];
const TUBE_BASE_PRICE: f64 = 250.0;
const TUBE_PRICE_STEP: f64 = 120.0;

type Row = (&'static str, &'static str, &'static str, MaterialUnit, f64, &'static str);

static ROOFING: [Row; 7] = [
    ("roof-r101-galv", "Lámina R-101 Galv. 3.66m", "Techo", MaterialUnit::Piece, 520.0, "Lámina acanalada estándar"),
    ("roof-r101-pintro", "Lámina R-101 Pintro 3.66m", "Techo", MaterialUnit::Piece, 740.0, "Lámina prepintada blanca"),
    ("roof-losacero-15", "Lámina Losacero 15 3.66m", "Techo", MaterialUnit::Piece, 1250.0, "Lámina para entrepiso"),
    ("roof-poly-transp", "Poliacetato Transparente (m2)", "Techo", MaterialUnit::SquareMeter, 380.0, "Techo traslúcido económico"),
    ("roof-poly-celular", "Policarbonato Celular 6mm (m2)", "Techo", MaterialUnit::SquareMeter, 520.0, "Policarbonato de alta resistencia"),
    ("roof-machimbrado", "Machimbrado de Madera (m2)", "Techo", MaterialUnit::SquareMeter, 890.0, "Acabado cálido en techos"),
    ("roof-termico", "Panel Térmico / Multypanel (m2)", "Techo", MaterialUnit::SquareMeter, 1450.0, "Aislamiento térmico y acústico"),
];

static CONSUMABLES: [Row; 18] = [
    ("disc-cut-4.5", "Disco de Corte 4.5\" Acero", "Abrasivos", MaterialUnit::Piece, 28.0, "Corte fino de perfiles"),
    ("disc-cut-7", "Disco de Corte 7\" Acero", "Abrasivos", MaterialUnit::Piece, 65.0, "Corte de placa pesada"),
    ("disc-cut-14", "Disco Tronzadora 14\"", "Abrasivos", MaterialUnit::Piece, 145.0, "Para sierra de mesa"),
    ("disc-grind-4.5", "Disco de Desbaste 4.5\"", "Abrasivos", MaterialUnit::Piece, 42.0, "Pulido de soldadura"),
    ("disc-flap-4.5", "Disco Flap Grano 60", "Abrasivos", MaterialUnit::Piece, 58.0, "Acabado espejo/fino"),
    ("bit-metal-1/8", "Mecha p/Metal 1/8\"", "Taladrado", MaterialUnit::Piece, 35.0, "Alta velocidad"),
    ("bit-metal-1/4", "Mecha p/Metal 1/4\"", "Taladrado", MaterialUnit::Piece, 65.0, "Para tornillería"),
    ("bit-metal-3/8", "Mecha p/Metal 3/8\"", "Taladrado", MaterialUnit::Piece, 120.0, "Alta velocidad"),
    ("bit-metal-1/2", "Mecha p/Metal 1/2\"", "Taladrado", MaterialUnit::Piece, 185.0, "Estructural"),
    ("bit-conc-1/4", "Broca p/Concreto 1/4\"", "Instalación", MaterialUnit::Piece, 45.0, "Para taquetes"),
    ("bit-conc-3/8", "Broca p/Concreto 3/8\"", "Instalación", MaterialUnit::Piece, 85.0, "Instalación pesada"),
    ("paint-prim-gray", "Fondo Anticorrosivo Gris (lt)", "Pintura", MaterialUnit::Liter, 195.0, "Base para metal"),
    ("paint-prim-red", "Fondo Anticorrosivo Rojo (lt)", "Pintura", MaterialUnit::Liter, 185.0, "Base para metal"),
    ("paint-esm-black", "Esmalte Negro Satinado (lt)", "Pintura", MaterialUnit::Liter, 240.0, "Acabado final"),
    ("paint-esm-white", "Esmalte Blanco Brillante (lt)", "Pintura", MaterialUnit::Liter, 240.0, "Acabado final"),
    ("paint-thinner", "Thinner Estándar (lt)", "Pintura", MaterialUnit::Liter, 65.0, "Diluyente"),
    ("weld-6013-1/8", "Electrodos 6013 1/8\" (kg)", "Soldadura", MaterialUnit::Kilogram, 125.0, "Soldadura manual"),
    ("silicone-clear", "Silicona Transparente Tubo", "Selladores", MaterialUnit::Piece, 95.0, "Sellado de techos"),
];

static SHEETS_AND_PLATES: [Row; 5] = [
    ("lam-lisa-26", "Lámina Lisa Cal 26", "Lisa", MaterialUnit::Piece, 720.0, "Lámina 4x8 económica"),
    ("lam-lisa-24", "Lámina Lisa Cal 24", "Lisa", MaterialUnit::Piece, 840.0, "Lámina 4x8 estándar"),
    ("lam-lisa-18", "Lámina Lisa Cal 18", "Lisa", MaterialUnit::Piece, 1890.0, "Lámina gruesa industrial"),
    ("placa-1/8", "Placa de Acero 1/8\"", "Placa", MaterialUnit::Piece, 2100.0, "Placa 4x10 industrial"),
    ("placa-1/4", "Placa de Acero 1/4\"", "Placa", MaterialUnit::Piece, 4200.0, "Placa pesada industrial"),
];

static HARDWARE: [Row; 5] = [
    ("lock-res", "Chapa Residencial", "Cerraduras", MaterialUnit::Piece, 450.0, "Garantía residencial"),
    ("lock-hd", "Chapa de Alta Seguridad", "Cerraduras", MaterialUnit::Piece, 1150.0, "Uso comercial"),
    ("hinge-4", "Bisagra de Libro 4\"", "Bisagras", MaterialUnit::Piece, 45.0, "Bisagra estándar"),
    ("hinge-tub-1", "Bisagra Tubular 1\"", "Bisagras", MaterialUnit::Piece, 35.0, "Para herrería"),
    ("roller-100", "Carretilla/Rodaja 4\"", "Portones", MaterialUnit::Piece, 280.0, "Para portón corredizo"),
];

static DATABASE: Lazy<Vec<CatalogMaterial>> = Lazy::new(build);

/// Every catalog material: PTR, round tube, roofing, consumables, sheet and
/// plate, hardware.
pub fn all_materials() -> &'static [CatalogMaterial] {
    &DATABASE
}

fn build() -> Vec<CatalogMaterial> {
    let mut materials = Vec::new();

    for (index, size) in PTR_SIZES.iter().enumerate() {
        let base = PTR_BASE_PRICE + index as f64 * PTR_PRICE_STEP;
        for (gauge, modifier) in PTR_GAUGES {
            materials.push(CatalogMaterial {
                id: format!("ptr-{}-{}", size.replace(' ', "-"), gauge.replace(' ', "-")),
                name: format!("PTR {} {}", size, gauge),
                category: MaterialCategory::Profile,
                sub_category: "PTR".to_string(),
                unit: MaterialUnit::StockLength,
                price_base: (base * modifier).round(),
                description: format!("Perfil tubular cuadrado {} {}", size, gauge),
                gauge: Some(gauge.to_string()),
            });
        }
    }

    for (index, size) in TUBE_SIZES.iter().enumerate() {
        let base = TUBE_BASE_PRICE + index as f64 * TUBE_PRICE_STEP;
        for (schedule, modifier) in TUBE_SCHEDULES {
            materials.push(CatalogMaterial {
                id: format!("tubo-{}-{}", size.replace('/', "-"), schedule.replace(' ', "-")),
                name: format!("Tubo {} {}", size, schedule),
                category: MaterialCategory::Tube,
                sub_category: "Tubería".to_string(),
                unit: MaterialUnit::StockLength,
                price_base: (base * modifier).round(),
                description: format!("Tubo redondo {} {}", size, schedule),
                gauge: Some(schedule.to_string()),
            });
        }
    }

    let fixed = [
        (MaterialCategory::Sheet, &ROOFING[..]),
        (MaterialCategory::Consumable, &CONSUMABLES[..]),
        (MaterialCategory::Sheet, &SHEETS_AND_PLATES[..]),
        (MaterialCategory::Hardware, &HARDWARE[..]),
    ];
    for (category, rows) in fixed {
        materials.extend(rows.iter().map(|&(id, name, sub_category, unit, price_base, description)| {
            CatalogMaterial {
                id: id.to_string(),
                name: name.to_string(),
                category,
                sub_category: sub_category.to_string(),
                unit,
                price_base,
                description: description.to_string(),
                gauge: None,
            }
        }));
    }

    materials
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size() {
        // 35 PTR + 16 tube + 7 + 18 + 5 + 5
        assert_eq!(all_materials().len(), 86);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = all_materials().iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids.len(), all_materials().len());
    }

    #[test]
    fn test_generated_ptr_prices() {
        let first = &all_materials()[0];
        assert_eq!(first.id, "ptr-1\"-Cal-14");
        assert_eq!(first.price_base, 400.0);

        let heavy = all_materials()
            .iter()
            .find(|m| m.name == "PTR 4\" Cal 10 (Industrial)")
            .unwrap();
        // (400 + 6 × 150) × 2.1
        assert_eq!(heavy.price_base, 2730.0);
        assert_eq!(heavy.gauge.as_deref(), Some("Cal 10 (Industrial)"));
    }

    #[test]
    fn test_generated_tube_prices() {
        let tube = all_materials()
            .iter()
            .find(|m| m.name == "Tubo 1 1/2\" Céd 40 (Industrial)")
            .unwrap();
        // (250 + 4 × 120) × 1.4
        assert_eq!(tube.price_base, 1022.0);
        assert_eq!(tube.id, "tubo-1 1-2\"-Céd-40-(Industrial)");
        assert_eq!(tube.category, MaterialCategory::Tube);
    }
}
