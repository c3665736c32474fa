use std::fmt;

use serde::Serialize;

/// The five narrative phases of a show, in performance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Opener,
    EarlySet,
    MidSetDip,
    Build,
    Closer,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Opener,
        Section::EarlySet,
        Section::MidSetDip,
        Section::Build,
        Section::Closer,
    ];

    /// Share of the set, in percent. The closer has none; it takes whatever
    /// the other four leave over.
    fn percent(self) -> Option<usize> {
        match self {
            Section::Opener => Some(15),
            Section::EarlySet => Some(25),
            Section::MidSetDip => Some(20),
            Section::Build => Some(25),
            Section::Closer => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Section::Opener => "Opener",
            Section::EarlySet => "Early Set",
            Section::MidSetDip => "Mid-Set Dip",
            Section::Build => "Build",
            Section::Closer => "Closer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolves the requested length against the catalog size. Zero, or anything
/// beyond the catalog, means the whole catalog.
pub fn target_length(requested: usize, catalog_len: usize) -> usize {
    if requested == 0 || requested > catalog_len {
        catalog_len
    } else {
        requested
    }
}

/// Slot counts per section. The sizes always sum to [`SectionPlan::total`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionPlan {
    sizes: [usize; 5],
}

impl SectionPlan {
    /// Plans a set of exactly `n` slots.
    ///
    /// The first four sections get `max(1, floor(n * pct))` slots and the
    /// closer absorbs the remainder. When `n` is too small for one slot per
    /// section the earlier sections are served first and the later ones
    /// come out empty.
    pub fn for_length(n: usize) -> Self {
        let mut sizes = [0; 5];
        let mut remaining = n;
        for (slot, section) in sizes.iter_mut().zip(Section::ALL) {
            let wanted = match section.percent() {
                Some(percent) => (n * percent / 100).max(1),
                None => remaining,
            };
            *slot = wanted.min(remaining);
            remaining -= *slot;
        }
        Self { sizes }
    }

    /// Plans against a catalog, applying [`target_length`] first.
    pub fn for_catalog(requested: usize, catalog_len: usize) -> Self {
        Self::for_length(target_length(requested, catalog_len))
    }

    pub fn size(&self, section: Section) -> usize {
        self.sizes[section as usize]
    }

    pub fn sizes(&self) -> [usize; 5] {
        self.sizes
    }

    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, usize)> + '_ {
        Section::ALL.into_iter().zip(self.sizes)
    }
}
