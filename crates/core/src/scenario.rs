//! Static scenario and location tables.
//!
//! A scenario is a named clinical presentation with one plausible value range per measurement
//! kind. Locations are Goiânia neighbourhoods, carried verbatim (accents included) into the
//! generated documents.
//!
//! Both tables are immutable and non-empty.

use fhir::MeasurementKind;
use rand::Rng;

/// Inclusive range a scenario draws one measurement from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub low: f64,
    pub high: f64,
}

impl ValueRange {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }

    /// Draws a value uniformly from the range and rounds it to the precision of `kind`.
    ///
    /// The bounds carry no more decimals than `kind` keeps, so the rounded value stays inside
    /// the range; the final clamp only absorbs floating-point noise.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, kind: MeasurementKind) -> f64 {
        let raw = rng.gen_range(self.low..=self.high);
        kind.round(raw).clamp(self.low, self.high)
    }
}

/// A named profile of plausible hemogram values.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioProfile {
    pub name: &'static str,
    pub leukocytes: ValueRange,
    pub platelets: ValueRange,
    pub hemoglobin: ValueRange,
    pub hematocrit: ValueRange,
}

impl ScenarioProfile {
    pub fn range_for(&self, kind: MeasurementKind) -> ValueRange {
        match kind {
            MeasurementKind::Leukocytes => self.leukocytes,
            MeasurementKind::Platelets => self.platelets,
            MeasurementKind::Hemoglobin => self.hemoglobin,
            MeasurementKind::Hematocrit => self.hematocrit,
        }
    }

    /// Looks a scenario up by name.
    pub fn find(name: &str) -> Option<&'static ScenarioProfile> {
        SCENARIOS.iter().find(|s| s.name == name)
    }

    /// Names of every known scenario, in table order.
    pub fn names() -> Vec<&'static str> {
        SCENARIOS.iter().map(|s| s.name).collect()
    }
}

pub static SCENARIOS: [ScenarioProfile; 5] = [
    ScenarioProfile {
        name: "normal",
        leukocytes: ValueRange::new(5000.0, 9000.0),
        platelets: ValueRange::new(200000.0, 350000.0),
        hemoglobin: ValueRange::new(13.0, 16.0),
        hematocrit: ValueRange::new(38.0, 48.0),
    },
    ScenarioProfile {
        name: "dengue",
        leukocytes: ValueRange::new(2000.0, 4000.0),
        platelets: ValueRange::new(30000.0, 140000.0),
        hemoglobin: ValueRange::new(12.0, 15.0),
        hematocrit: ValueRange::new(36.0, 45.0),
    },
    ScenarioProfile {
        name: "infeccao",
        leukocytes: ValueRange::new(12000.0, 20000.0),
        platelets: ValueRange::new(150000.0, 300000.0),
        hemoglobin: ValueRange::new(12.5, 16.5),
        hematocrit: ValueRange::new(37.0, 49.0),
    },
    ScenarioProfile {
        name: "anemia",
        leukocytes: ValueRange::new(4000.0, 8000.0),
        platelets: ValueRange::new(180000.0, 300000.0),
        hemoglobin: ValueRange::new(8.0, 11.5),
        hematocrit: ValueRange::new(28.0, 35.0),
    },
    ScenarioProfile {
        name: "leucopenia",
        leukocytes: ValueRange::new(1500.0, 3500.0),
        platelets: ValueRange::new(160000.0, 280000.0),
        hemoglobin: ValueRange::new(13.0, 16.0),
        hematocrit: ValueRange::new(38.0, 48.0),
    },
];

pub static LOCATIONS: [&str; 20] = [
    "Setor Bueno",
    "Setor Oeste",
    "Setor Sul",
    "Setor Marista",
    "Jardim Goiás",
    "Centro",
    "Setor Aeroporto",
    "Vila Nova",
    "Jardim América",
    "Parque Amazônia",
    "Setor Campinas",
    "Setor Leste Vila Nova",
    "Jardim Novo Mundo",
    "Setor Coimbra",
    "Parque Industrial",
    "Setor Universitário",
    "Jardim Bela Vista",
    "Setor Pedro Ludovico",
    "Setor Criméia",
    "Setor Faiçalville",
];

/// Uniformly picks one entry of `table`.
///
/// # Panics
///
/// Panics if `table` is empty. The static tables never are.
pub fn pick_random<'a, T, R: Rng + ?Sized>(table: &'a [T], rng: &mut R) -> &'a T {
    &table[rng.gen_range(0..table.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn scenario_names_are_unique() {
        let names: HashSet<_> = SCENARIOS.iter().map(|s| s.name).collect();
        assert_eq!(names.len(), SCENARIOS.len());
    }

    #[test]
    fn ranges_are_ordered() {
        for scenario in &SCENARIOS {
            for kind in MeasurementKind::ALL {
                let range = scenario.range_for(kind);
                assert!(range.low <= range.high, "{} {:?}", scenario.name, kind);
            }
        }
    }

    #[test]
    fn find_returns_known_scenarios_only() {
        assert_eq!(ScenarioProfile::find("dengue").unwrap().name, "dengue");
        assert!(ScenarioProfile::find("Dengue").is_none());
        assert!(ScenarioProfile::find("covid").is_none());
    }

    #[test]
    fn range_for_maps_each_kind() {
        let anemia = ScenarioProfile::find("anemia").unwrap();
        assert_eq!(
            anemia.range_for(MeasurementKind::Hemoglobin),
            ValueRange::new(8.0, 11.5)
        );
        assert_eq!(
            anemia.range_for(MeasurementKind::Platelets),
            ValueRange::new(180000.0, 300000.0)
        );
    }

    #[test]
    fn samples_stay_in_range_with_kind_precision() {
        let mut rng = StdRng::seed_from_u64(2024);

        for scenario in &SCENARIOS {
            for kind in MeasurementKind::ALL {
                let range = scenario.range_for(kind);
                for _ in 0..200 {
                    let value = range.sample(&mut rng, kind);
                    assert!(range.contains(value), "{value} outside {range:?}");
                    assert_eq!(kind.round(value), value);
                }
            }
        }
    }

    #[test]
    fn pick_random_covers_the_table() {
        let mut rng = StdRng::seed_from_u64(9);
        let picked: HashSet<_> = (0..500).map(|_| *pick_random(&LOCATIONS, &mut rng)).collect();

        assert_eq!(picked.len(), LOCATIONS.len());
    }

    #[test]
    fn locations_keep_accents() {
        assert!(LOCATIONS.contains(&"Jardim Goiás"));
        assert!(LOCATIONS.contains(&"Setor Faiçalville"));
    }
}
