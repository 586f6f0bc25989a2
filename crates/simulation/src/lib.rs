//! # SIMLAB Reaction Simulation
//!
//! A didactic model of how hot a mixture gets while a reaction runs. It is UI
//! flavour, not chemistry: reactivity grows with the atomic numbers and the
//! hazard categories of both elements, and the temperature follows a simple
//! heat-in / Newtonian-cooling recurrence sampled once per second.
//!
//! Pure logic; it knows nothing about the database or HTTP.

use configuration::SimulationSettings;
use serde::Serialize;

pub mod error;

pub use error::SimulationError;

/// Atomic number assumed for an element whose record lacks one.
pub const FALLBACK_ATOMIC_NUMBER: i32 = 10;

/// Multiplier applied when the pairing is a reaction a teacher has defined.
pub const KNOWN_REACTION_BONUS: f64 = 1.1;

/// What the model needs to know about one reactant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reactant {
    pub atomic_number: Option<i32>,
    pub hazard_type: Option<String>,
}

/// A complete simulation request.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    pub first: Reactant,
    pub second: Reactant,
    pub reaction_known: bool,
    pub amount: f64,
}

/// Temperature samples, one per second, as parallel series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureCurve {
    pub time: Vec<u32>,
    pub temperature: Vec<f64>,
}

impl TemperatureCurve {
    pub fn peak(&self) -> Option<f64> {
        self.temperature.iter().copied().reduce(f64::max)
    }
}

/// Scales reactivity by how dangerous an element's hazard category sounds.
///
/// Matching is a case-insensitive substring test so free-text categories such
/// as "Highly flammable gas" still count.
pub fn hazard_factor(hazard_type: Option<&str>) -> f64 {
    let Some(hazard) = hazard_type else {
        return 1.0;
    };
    let hazard = hazard.to_lowercase();
    let mentions = |stems: &[&str]| stems.iter().any(|stem| hazard.contains(stem));

    if mentions(&["flamm", "оган"]) {
        1.4
    } else if mentions(&["corros", "кисел", "короз"]) {
        1.25
    } else if mentions(&["toxic", "токс"]) {
        1.2
    } else {
        1.0
    }
}

/// Runs the temperature model with parameters taken from configuration.
#[derive(Debug, Clone)]
pub struct ReactionSimulator {
    settings: SimulationSettings,
}

impl ReactionSimulator {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    /// Combined reactivity of the two reactants for the given amount.
    pub fn reactivity(&self, input: &SimulationInput) -> Result<f64, SimulationError> {
        if !input.amount.is_finite() || input.amount <= 0.0 {
            return Err(SimulationError::InvalidAmount(input.amount));
        }
        let an1 = input.first.atomic_number.unwrap_or(FALLBACK_ATOMIC_NUMBER);
        let an2 = input.second.atomic_number.unwrap_or(FALLBACK_ATOMIC_NUMBER);
        let mut hazard = hazard_factor(input.first.hazard_type.as_deref())
            * hazard_factor(input.second.hazard_type.as_deref());
        if input.reaction_known {
            hazard *= KNOWN_REACTION_BONUS;
        }
        Ok(f64::from(an1 + an2) / 5.0 * hazard * input.amount)
    }

    /// Computes the full curve for an input.
    pub fn simulate(&self, input: &SimulationInput) -> Result<TemperatureCurve, SimulationError> {
        let reactivity = self.reactivity(input)?;
        Ok(self.curve(reactivity))
    }

    /// Samples `T(t)` for `t = 0..=duration`, starting at ambient and applying
    /// `T += gain * reactivity - cooling * (T - ambient)` each second.
    pub fn curve(&self, reactivity: f64) -> TemperatureCurve {
        let SimulationSettings {
            ambient_temperature,
            heating_gain,
            cooling_rate,
            duration_secs,
        } = self.settings;

        let samples = duration_secs as usize + 1;
        let mut time = Vec::with_capacity(samples);
        let mut temperature = Vec::with_capacity(samples);

        let mut current = ambient_temperature;
        for t in 0..=duration_secs {
            time.push(t);
            temperature.push(current);
            current += heating_gain * reactivity - cooling_rate * (current - ambient_temperature);
        }

        TemperatureCurve { time, temperature }
    }
}
