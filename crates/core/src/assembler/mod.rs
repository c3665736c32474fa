use std::{cmp::Ordering, collections::HashSet};

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::{transition, Catalog, EnergyTiers, Section, SectionPlan, Setlist, TrackId};

/// Candidate pools for one section.
#[derive(Debug)]
struct Phase {
    section: Section,
    primary: Vec<TrackId>,
    /// Consulted only once `primary` has no unused tracks left.
    fallback: Option<Vec<TrackId>>,
}

impl Phase {
    fn for_tiers(tiers: &EnergyTiers, catalog: &Catalog) -> [Phase; 5] {
        let high = &tiers.high;
        let mid = &tiers.mid;

        let mut rising: Vec<TrackId> = mid.iter().chain(high).copied().collect();
        rising.sort_by(|a, b| {
            catalog[*a]
                .energy
                .partial_cmp(&catalog[*b].energy)
                .unwrap_or(Ordering::Equal)
        });

        [
            Phase {
                section: Section::Opener,
                primary: high.clone(),
                fallback: Some(mid.clone()),
            },
            Phase {
                section: Section::EarlySet,
                primary: high.iter().chain(mid).copied().collect(),
                fallback: None,
            },
            Phase {
                section: Section::MidSetDip,
                primary: tiers.low.clone(),
                fallback: Some(mid.clone()),
            },
            Phase {
                section: Section::Build,
                primary: rising,
                fallback: None,
            },
            Phase {
                section: Section::Closer,
                primary: high.clone(),
                fallback: Some(mid.clone()),
            },
        ]
    }
}

/// Greedy single-pass setlist builder.
///
/// Each slot takes the unused candidate with the best transition score from
/// the previous pick (ties go to the earlier candidate). The very first pick
/// has nothing to score against and is drawn uniformly from the owned random
/// source, which makes runs reproducible under a fixed seed. Filled slots are
/// never revisited.
#[derive(Debug)]
pub struct SetlistAssembler<R = StdRng> {
    rng: R,
}

impl SetlistAssembler<StdRng> {
    /// Assembler whose random picks are fully determined by `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SetlistAssembler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Arranges up to `requested` tracks (0 = the whole catalog) into a
    /// setlist. The result may be shorter than requested when a section and
    /// its fallback have nothing left to offer.
    pub fn assemble(&mut self, catalog: &Catalog, requested: usize) -> Setlist {
        let plan = SectionPlan::for_catalog(requested, catalog.len());
        let mut setlist = Setlist::new(plan);
        if catalog.is_empty() {
            return setlist;
        }

        let tiers = EnergyTiers::classify(catalog);
        let mut used: HashSet<TrackId> = HashSet::with_capacity(plan.total());

        for phase in Phase::for_tiers(&tiers, catalog) {
            for _ in 0..plan.size(phase.section) {
                let previous = setlist.last();
                let choice = self
                    .pick(catalog, &phase.primary, &used, previous)
                    .or_else(|| {
                        phase
                            .fallback
                            .as_deref()
                            .and_then(|pool| self.pick(catalog, pool, &used, previous))
                    });

                match choice {
                    Some(id) => {
                        used.insert(id);
                        setlist.push(phase.section, id);
                    }
                    None => tracing::debug!(
                        section = %phase.section,
                        "no candidates left, slot skipped"
                    ),
                }
            }

            tracing::debug!(
                section = %phase.section,
                planned = plan.size(phase.section),
                placed = setlist.placed(phase.section),
                "section filled"
            );
        }

        setlist
    }

    fn pick(
        &mut self,
        catalog: &Catalog,
        pool: &[TrackId],
        used: &HashSet<TrackId>,
        previous: Option<TrackId>,
    ) -> Option<TrackId> {
        let available: Vec<TrackId> = pool
            .iter()
            .copied()
            .filter(|id| !used.contains(id))
            .collect();

        let Some(previous) = previous else {
            return available.choose(&mut self.rng).copied();
        };

        let from = &catalog[previous];
        let mut best: Option<(TrackId, f64)> = None;
        for id in available {
            let score = transition::score(from, &catalog[id]);
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((id, score));
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mode, Track};

    fn track(name: &str, bpm: f64, energy: f64) -> Track {
        Track::new(name, "band").with_bpm(bpm).with_energy(energy)
    }

    #[test]
    fn empty_catalog_gives_empty_setlist() {
        let setlist = SetlistAssembler::with_seed(1).assemble(&Catalog::new(), 10);
        assert!(setlist.is_empty());
        assert_eq!(setlist.plan().total(), 0);
    }

    #[test]
    fn picks_smoothest_transition_from_previous() {
        let catalog = Catalog::from_tracks([
            track("anchor", 150.0, 0.9),
            track("far", 80.0, 0.8),
            track("near", 148.0, 0.75),
            track("mid", 120.0, 0.6),
        ]);
        let pool: Vec<_> = catalog.ids().collect();
        let used = HashSet::from([pool[0]]);

        let choice = SetlistAssembler::with_seed(3).pick(&catalog, &pool, &used, Some(pool[0]));
        assert_eq!(choice, Some(pool[2]));
    }

    #[test]
    fn ties_go_to_first_candidate() {
        let catalog = Catalog::from_tracks([
            track("a", 120.0, 0.9),
            track("b", 120.0, 0.9),
            track("c", 120.0, 0.9),
        ]);
        let mut assembler = SetlistAssembler::with_seed(9);
        let pool: Vec<_> = catalog.ids().collect();
        let used = HashSet::from([pool[0]]);

        let choice = assembler.pick(&catalog, &pool, &used, Some(pool[0]));
        assert_eq!(choice, Some(pool[1]));
    }

    #[test]
    fn first_pick_uses_injected_rng() {
        let catalog = Catalog::demo();
        let first = |seed| {
            SetlistAssembler::with_seed(seed)
                .assemble(&catalog, 0)
                .track_ids()[0]
        };
        assert_eq!(first(42), first(42));
    }

    #[test]
    fn first_pick_spreads_over_the_opener_pool() {
        let catalog = Catalog::demo();
        let tiers = EnergyTiers::classify(&catalog);

        let openers: HashSet<TrackId> = (0..200)
            .map(|seed| {
                SetlistAssembler::with_seed(seed)
                    .assemble(&catalog, 0)
                    .track_ids()[0]
            })
            .collect();

        assert!(openers.iter().all(|id| tiers.high.contains(id)));
        assert_eq!(openers.len(), tiers.high.len());
    }

    #[test]
    fn opener_falls_back_to_mid_tier() {
        // Twenty slots plan a three-track opener, but only two tracks are high.
        let mut tracks = vec![track("h1", 150.0, 0.9), track("h2", 145.0, 0.8)];
        tracks.extend((0..18).map(|i| track(&format!("m{i}"), 90.0 + i as f64, 0.6)));
        let catalog = Catalog::from_tracks(tracks);
        let tiers = EnergyTiers::classify(&catalog);

        let setlist = SetlistAssembler::with_seed(11).assemble(&catalog, 0);
        let (section, opener) = setlist.sections().next().unwrap();

        assert_eq!(section, Section::Opener);
        assert_eq!(setlist.plan().size(Section::Opener), 3);
        assert_eq!(opener.len(), 3);
        assert!(opener[..2].iter().all(|id| tiers.high.contains(id)));
        assert!(tiers.mid.contains(&opener[2]));
    }

    #[test]
    fn build_pool_rises_in_energy_and_breaks_ties_low_first() {
        let catalog = Catalog::from_tracks([
            track("h1", 120.0, 0.9),
            track("h2", 120.0, 0.8),
            track("loud", 120.0, 0.65),
            track("soft", 120.0, 0.45),
        ]);
        let ids: Vec<_> = catalog.ids().collect();
        let tiers = EnergyTiers::classify(&catalog);
        let [_, _, _, build, _] = Phase::for_tiers(&tiers, &catalog);

        assert_eq!(build.section, Section::Build);
        assert_eq!(build.primary, vec![ids[3], ids[2], ids[1], ids[0]]);

        // Identical tempo, key and mode: every candidate scores the same.
        let used = HashSet::from([ids[0]]);
        let choice =
            SetlistAssembler::with_seed(1).pick(&catalog, &build.primary, &used, Some(ids[0]));
        assert_eq!(choice, Some(ids[3]));
    }

    #[test]
    fn dip_falls_back_to_mid_tier() {
        let catalog = Catalog::from_tracks([
            track("h1", 150.0, 0.9),
            track("h2", 140.0, 0.8),
            track("m1", 110.0, 0.6),
            track("m2", 100.0, 0.5).with_mode(Mode::Minor),
            track("m3", 105.0, 0.45),
        ]);
        let setlist = SetlistAssembler::with_seed(5).assemble(&catalog, 0);

        assert_eq!(setlist.len(), 5);
        assert_eq!(setlist.placed(Section::MidSetDip), 1);
    }

    #[test]
    fn tempo_thirds_fill_a_three_track_set() {
        let catalog = Catalog::from_tracks([
            track("slow", 80.0, 0.5),
            track("fast", 160.0, 0.5),
            track("medium", 120.0, 0.5),
        ]);
        let setlist = SetlistAssembler::with_seed(2).assemble(&catalog, 0);
        let names: Vec<_> = setlist.tracks(&catalog).map(|t| t.name.as_str()).collect();

        assert_eq!(names, ["fast", "medium", "slow"]);
    }

    #[test]
    fn exhausted_pools_shorten_the_set() {
        // Two tracks under the tempo fallback both land in the low tier, and
        // a two-slot plan has no dip slot to place them in.
        let catalog = Catalog::from_tracks([track("a", 100.0, 0.5), track("b", 110.0, 0.5)]);
        let setlist = SetlistAssembler::with_seed(2).assemble(&catalog, 0);

        assert!(setlist.is_empty());
        assert_eq!(setlist.plan().total(), 2);
    }
}
