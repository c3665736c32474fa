use std::cmp::Ordering;

use serde::Serialize;

use crate::{Catalog, Track, TrackId};

/// Stored energy value that means "not provided".
///
/// A real measurement of exactly `0.5` is indistinguishable from a missing
/// one and is treated as missing.
pub const ENERGY_SENTINEL: f64 = 0.5;
pub const HIGH_ENERGY_THRESHOLD: f64 = 0.7;
pub const MID_ENERGY_THRESHOLD: f64 = 0.4;
/// Fewer high-energy tracks than this and the energy values are considered
/// undifferentiated.
const MIN_HIGH_TIER: usize = 2;

/// Returns the stored energy, or a tempo-derived estimate when the stored
/// value is the sentinel.
pub fn estimate_energy(track: &Track) -> f64 {
    if track.energy != ENERGY_SENTINEL {
        return track.energy;
    }
    ((track.bpm - 60.0) / 120.0).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    High,
    Mid,
    Low,
}

impl Tier {
    fn from_energy(energy: f64) -> Self {
        if energy >= HIGH_ENERGY_THRESHOLD {
            Tier::High
        } else if energy >= MID_ENERGY_THRESHOLD {
            Tier::Mid
        } else {
            Tier::Low
        }
    }
}

/// How the catalog was split into tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierPolicy {
    /// Fixed 0.7 / 0.4 thresholds on stored energy.
    EnergyThresholds,
    /// Catalog sorted by descending tempo and cut into thirds.
    TempoRank,
}

/// Catalog partitioned into high, mid and low energy tiers.
///
/// Under [`TierPolicy::EnergyThresholds`] each tier keeps catalog order;
/// under [`TierPolicy::TempoRank`] tiers are in descending tempo order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyTiers {
    pub policy: TierPolicy,
    pub high: Vec<TrackId>,
    pub mid: Vec<TrackId>,
    pub low: Vec<TrackId>,
}

impl EnergyTiers {
    /// Partitions the whole catalog. The tempo fallback is a single
    /// catalog-wide decision.
    pub fn classify(catalog: &Catalog) -> Self {
        let by_energy = Self::by_energy(catalog);
        if by_energy.high.len() >= MIN_HIGH_TIER {
            return by_energy;
        }

        tracing::debug!(
            high = by_energy.high.len(),
            "energy values undifferentiated, ranking by tempo"
        );
        Self::by_tempo(catalog)
    }

    fn by_energy(catalog: &Catalog) -> Self {
        let mut tiers = Self {
            policy: TierPolicy::EnergyThresholds,
            high: Vec::new(),
            mid: Vec::new(),
            low: Vec::new(),
        };
        for (id, track) in catalog.iter() {
            match Tier::from_energy(track.energy) {
                Tier::High => tiers.high.push(id),
                Tier::Mid => tiers.mid.push(id),
                Tier::Low => tiers.low.push(id),
            }
        }
        tiers
    }

    fn by_tempo(catalog: &Catalog) -> Self {
        let mut ranked: Vec<TrackId> = catalog.ids().collect();
        // Stable, so equal tempos keep catalog order.
        ranked.sort_by(|a, b| {
            catalog[*b]
                .bpm
                .partial_cmp(&catalog[*a].bpm)
                .unwrap_or(Ordering::Equal)
        });

        let third = ranked.len() / 3;
        let low = ranked.split_off(2 * third);
        let mid = ranked.split_off(third);
        Self {
            policy: TierPolicy::TempoRank,
            high: ranked,
            mid,
            low,
        }
    }

    pub fn tier_of(&self, id: TrackId) -> Option<Tier> {
        if self.high.contains(&id) {
            Some(Tier::High)
        } else if self.mid.contains(&id) {
            Some(Tier::Mid)
        } else if self.low.contains(&id) {
            Some(Tier::Low)
        } else {
            None
        }
    }

    pub fn tier(&self, tier: Tier) -> &[TrackId] {
        match tier {
            Tier::High => &self.high,
            Tier::Mid => &self.mid,
            Tier::Low => &self.low,
        }
    }
}
