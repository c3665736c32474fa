use serde::Serialize;

use crate::{Catalog, Section, SectionPlan, Track, TrackId};

/// Ordered, repeat-free selection of catalog tracks.
///
/// Sections are contiguous runs of the sequence. `placed` records how many
/// tracks each section actually received, which can be fewer than planned
/// when a section's candidate pools ran dry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Setlist {
    track_ids: Vec<TrackId>,
    plan: SectionPlan,
    placed: [usize; 5],
}

impl Setlist {
    pub(crate) fn new(plan: SectionPlan) -> Self {
        Self {
            track_ids: Vec::with_capacity(plan.total()),
            plan,
            placed: [0; 5],
        }
    }

    pub(crate) fn push(&mut self, section: Section, id: TrackId) {
        self.track_ids.push(id);
        self.placed[section as usize] += 1;
    }

    pub fn last(&self) -> Option<TrackId> {
        self.track_ids.last().copied()
    }

    pub fn track_ids(&self) -> &[TrackId] {
        &self.track_ids
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    /// The plan the setlist was assembled against.
    pub fn plan(&self) -> &SectionPlan {
        &self.plan
    }

    /// Number of tracks placed in `section`.
    pub fn placed(&self, section: Section) -> usize {
        self.placed[section as usize]
    }

    /// Yields every section in show order with its slice of the sequence.
    /// Sections that received no tracks yield an empty slice.
    pub fn sections(&self) -> impl Iterator<Item = (Section, &[TrackId])> + '_ {
        let mut start = 0;
        Section::ALL.into_iter().map(move |section| {
            let end = start + self.placed[section as usize];
            let slice = &self.track_ids[start..end];
            start = end;
            (section, slice)
        })
    }

    pub fn tracks<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Track> + 'a {
        self.track_ids.iter().map(move |id| &catalog[*id])
    }

    pub fn total_duration_ms(&self, catalog: &Catalog) -> u64 {
        self.tracks(catalog).map(|track| track.duration_ms).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_follow_placed_counts() {
        let catalog = Catalog::demo();
        let ids: Vec<_> = catalog.ids().collect();
        let mut setlist = Setlist::new(SectionPlan::for_length(5));

        setlist.push(Section::Opener, ids[0]);
        setlist.push(Section::EarlySet, ids[1]);
        setlist.push(Section::Build, ids[2]);
        setlist.push(Section::Build, ids[3]);

        let sections: Vec<_> = setlist.sections().collect();
        assert_eq!(sections[0], (Section::Opener, &ids[0..1]));
        assert_eq!(sections[1], (Section::EarlySet, &ids[1..2]));
        assert_eq!(sections[2], (Section::MidSetDip, &ids[2..2]));
        assert_eq!(sections[3], (Section::Build, &ids[2..4]));
        assert_eq!(sections[4].1.len(), 0);
        assert_eq!(setlist.last(), Some(ids[3]));
    }

    #[test]
    fn sums_durations() {
        let catalog = Catalog::demo();
        let ids: Vec<_> = catalog.ids().collect();
        let mut setlist = Setlist::new(SectionPlan::for_length(2));
        setlist.push(Section::Opener, ids[0]);
        setlist.push(Section::EarlySet, ids[1]);

        assert_eq!(setlist.total_duration_ms(&catalog), 250_000 + 270_000);
    }
}
