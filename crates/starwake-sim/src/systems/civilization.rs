//! Civilization growth and merging.
//!
//! Each step, established civilizations of the same species on a planet
//! merge into the earliest one, then every civilization grows by its annual
//! rate over the step's ship time. Civilizations founded less than a year ago
//! are still settling and cannot grow.

use std::collections::BTreeMap;

use starwake_core::constants::{MINUTES_PER_YEAR, SETTLING_PERIOD_MINUTES};
use starwake_core::enums::Technology;
use starwake_core::state::{Civilization, StarSystem};
use starwake_core::types::StepDelta;

/// Merge and grow the civilizations of every planet in every system.
pub fn run(systems: &mut BTreeMap<String, StarSystem>, earth_time: f64, delta: &StepDelta) {
    for system in systems.values_mut() {
        for planet in system.planets_mut() {
            if planet.civilizations.is_empty() {
                continue;
            }
            merge_pass(&mut planet.civilizations, earth_time);
            grow(&mut planet.civilizations, earth_time, delta.relative_minutes);
        }
    }
}

fn is_established(civ: &Civilization, earth_time: f64) -> bool {
    civ.established <= earth_time
}

/// One merge pass, walking from the newest entry back. An established entry
/// folds into the first earlier established entry of the same species.
/// Each index is considered once. Returns the number of merges.
pub fn merge_pass(civs: &mut Vec<Civilization>, earth_time: f64) -> usize {
    let mut merges = 0;
    let mut index = civs.len();
    while index > 1 {
        index -= 1;
        if !is_established(&civs[index], earth_time) {
            continue;
        }
        let target = {
            let species = &civs[index].species;
            civs[..index]
                .iter()
                .position(|c| is_established(c, earth_time) && &c.species == species)
        };
        if let Some(target) = target {
            let absorbed = civs.remove(index);
            absorb(&mut civs[target], absorbed);
            merges += 1;
        }
    }
    merges
}

fn absorb(into: &mut Civilization, other: Civilization) {
    into.population += other.population;
    into.growth_rate = (into.growth_rate + other.growth_rate) / 2.0;
    into.technology = into.technology.dominant(other.technology);
}

/// Population multiplier for `relative_minutes` of ship time.
pub fn growth_factor(civ: &Civilization, earth_time: f64, relative_minutes: f64) -> f64 {
    if !(civ.growth_rate > 0.0) || !(relative_minutes > 0.0) {
        return 1.0;
    }
    let factor = civ.growth_rate.powf(relative_minutes / MINUTES_PER_YEAR);
    if earth_time - civ.established < SETTLING_PERIOD_MINUTES {
        factor.min(1.0)
    } else {
        factor
    }
}

pub fn grow(civs: &mut [Civilization], earth_time: f64, relative_minutes: f64) {
    for civ in civs {
        civ.population = (civ.population * growth_factor(civ, earth_time, relative_minutes)).max(0.0);
    }
}

/// Highest technology among civilizations established by `earth_time`.
pub fn dominant_technology(civs: &[Civilization], earth_time: f64) -> Option<Technology> {
    civs.iter()
        .filter(|c| is_established(c, earth_time))
        .map(|c| c.technology)
        .max()
}

/// The established civilization with the highest technology; the most
/// populous wins ties.
pub fn dominant_civilization(civs: &[Civilization], earth_time: f64) -> Option<&Civilization> {
    civs.iter()
        .filter(|c| is_established(c, earth_time))
        .max_by(|a, b| {
            a.technology
                .cmp(&b.technology)
                .then(a.population.total_cmp(&b.population))
        })
}

pub fn total_population(civs: &[Civilization]) -> f64 {
    civs.iter().map(|c| c.population).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn civ(species: &str, population: f64, rate: f64, tech: Technology, established: f64) -> Civilization {
        Civilization {
            species: species.into(),
            population,
            growth_rate: rate,
            technology: tech,
            established,
        }
    }

    const LONG_AGO: f64 = -100.0 * MINUTES_PER_YEAR;

    #[test]
    fn one_year_of_growth_is_exact() {
        let mut civs = vec![civ("Verdani", 1_000_000.0, 1.02, Technology::Industrial, LONG_AGO)];
        grow(&mut civs, 0.0, MINUTES_PER_YEAR);
        assert_eq!(civs[0].population, 1_020_000.0);
    }

    #[test]
    fn settling_civilizations_do_not_grow() {
        let founded = -MINUTES_PER_YEAR / 2.0;
        let mut civs = vec![civ("Verdani", 500.0, 1.5, Technology::Neolithic, founded)];
        grow(&mut civs, 0.0, MINUTES_PER_YEAR);
        assert_eq!(civs[0].population, 500.0);
        // Once settled, growth resumes.
        grow(&mut civs, MINUTES_PER_YEAR, MINUTES_PER_YEAR);
        assert_eq!(civs[0].population, 750.0);
    }

    #[test]
    fn zero_time_leaves_population_unchanged() {
        let mut civs = vec![civ("Verdani", 123.0, 1.1, Technology::Neolithic, LONG_AGO)];
        grow(&mut civs, 0.0, 0.0);
        assert_eq!(civs[0].population, 123.0);
    }

    #[test]
    fn same_species_merge_into_earliest() {
        let mut civs = vec![
            civ("Verdani", 1_000.0, 1.02, Technology::PreIndustrial, LONG_AGO),
            civ("Oruun", 50.0, 1.01, Technology::Neolithic, LONG_AGO),
            civ("Verdani", 3_000.0, 1.04, Technology::Industrial, LONG_AGO),
        ];
        let before = total_population(&civs);
        assert_eq!(merge_pass(&mut civs, 0.0), 1);
        assert_eq!(civs.len(), 2);
        assert_eq!(total_population(&civs), before);

        let verdani = &civs[0];
        assert_eq!(verdani.species, "Verdani");
        assert_eq!(verdani.population, 4_000.0);
        assert!((verdani.growth_rate - 1.03).abs() < 1e-12);
        assert_eq!(verdani.technology, Technology::Industrial);
    }

    #[test]
    fn merge_conserves_population_across_many_entries() {
        let mut civs: Vec<Civilization> = (0..12)
            .map(|i| {
                let species = if i % 3 == 0 { "A" } else if i % 3 == 1 { "B" } else { "C" };
                civ(species, (i * 100 + 7) as f64, 1.01, Technology::Neolithic, LONG_AGO)
            })
            .collect();
        let before = total_population(&civs);
        merge_pass(&mut civs, 0.0);
        assert_eq!(total_population(&civs), before);
        assert_eq!(civs.len(), 3);
        assert_eq!(merge_pass(&mut civs, 0.0), 0);
    }

    #[test]
    fn unestablished_civilizations_do_not_merge() {
        let mut civs = vec![
            civ("Verdani", 1.0, 1.02, Technology::Neolithic, LONG_AGO),
            civ("Verdani", 2.0, 1.02, Technology::Neolithic, MINUTES_PER_YEAR),
        ];
        assert_eq!(merge_pass(&mut civs, 0.0), 0);
        assert_eq!(merge_pass(&mut civs, 2.0 * MINUTES_PER_YEAR), 1);
        assert_eq!(civs[0].population, 3.0);
    }

    #[test]
    fn dominant_technology_ignores_future_civilizations() {
        let civs = vec![
            civ("A", 1.0, 1.01, Technology::Industrial, LONG_AGO),
            civ("B", 1.0, 1.01, Technology::Interstellar, MINUTES_PER_YEAR),
        ];
        assert_eq!(dominant_technology(&civs, 0.0), Some(Technology::Industrial));
        assert_eq!(
            dominant_technology(&civs, MINUTES_PER_YEAR),
            Some(Technology::Interstellar)
        );
        assert_eq!(dominant_technology(&[], 0.0), None);
    }
}
