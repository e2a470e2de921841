//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Technology level of a civilization. Ordering is dominance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Technology {
    Neolithic,
    PreIndustrial,
    Industrial,
    Intrastellar,
    Interstellar,
}

impl Technology {
    pub const ALL: [Technology; 5] = [
        Technology::Neolithic,
        Technology::PreIndustrial,
        Technology::Industrial,
        Technology::Intrastellar,
        Technology::Interstellar,
    ];

    /// The more advanced of two technology levels.
    pub fn dominant(self, other: Technology) -> Technology {
        self.max(other)
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technology::Neolithic => "Neolithic",
            Technology::PreIndustrial => "Pre-industrial",
            Technology::Industrial => "Industrial",
            Technology::Intrastellar => "Intrastellar",
            Technology::Interstellar => "Interstellar",
        };
        f.write_str(name)
    }
}

/// Bulk composition of a planet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Composition {
    #[default]
    Rocky,
    Oceanic,
    Metallic,
    IceGiant,
    GasGiant,
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Composition::Rocky => "Rocky",
            Composition::Oceanic => "Oceanic",
            Composition::Metallic => "Metallic",
            Composition::IceGiant => "Ice giant",
            Composition::GasGiant => "Gas giant",
        };
        f.write_str(name)
    }
}

/// Atmosphere of a planet. A planet without an atmosphere has none of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Atmosphere {
    Dense,
    Toxic,
    Breathable,
    /// Hardest to characterize from orbit.
    Thin,
}

impl fmt::Display for Atmosphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Atmosphere::Dense => "Dense",
            Atmosphere::Toxic => "Toxic",
            Atmosphere::Breathable => "Breathable",
            Atmosphere::Thin => "Thin",
        };
        f.write_str(name)
    }
}

/// Life on a planet. A sterile planet has none of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Biosphere {
    Microbial,
    Flora,
    Fauna,
}

impl fmt::Display for Biosphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Biosphere::Microbial => "Microbial",
            Biosphere::Flora => "Flora",
            Biosphere::Fauna => "Fauna",
        };
        f.write_str(name)
    }
}

/// Vessels the workshop can fabricate and the ship can launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VesselKind {
    /// Remote sensor package; speeds up scanning of the target.
    Probe,
    /// Surface package; fully characterizes the planet being orbited.
    Lander,
}

impl fmt::Display for VesselKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VesselKind::Probe => f.write_str("probe"),
            VesselKind::Lander => f.write_str("lander"),
        }
    }
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunEndReason {
    Fuel,
    Integrity,
}

impl fmt::Display for RunEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEndReason::Fuel => f.write_str("fuel exhausted"),
            RunEndReason::Integrity => f.write_str("hull integrity lost"),
        }
    }
}

/// Planet attributes disclosed progressively by scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScanAttribute {
    Atmosphere,
    Temperature,
    Biosphere,
    Civilization,
}

impl ScanAttribute {
    pub const ALL: [ScanAttribute; 4] = [
        ScanAttribute::Atmosphere,
        ScanAttribute::Temperature,
        ScanAttribute::Biosphere,
        ScanAttribute::Civilization,
    ];
}
