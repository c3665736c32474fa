use std::{fs, path::Path};

use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{Result, SetlistError};

pub const DEFAULT_BPM: f64 = 120.0;
pub const DEFAULT_ENERGY: f64 = 0.5;
pub const DEFAULT_DURATION_MS: u64 = 200_000;
pub const DEFAULT_KEY: u8 = 0;
const UNKNOWN: &str = "Unknown";

/// Tonal quality of a track. Serialised as `1` (major) / `0` (minor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "u8")]
pub enum Mode {
    #[default]
    Major,
    Minor,
}

impl From<Mode> for u8 {
    fn from(value: Mode) -> Self {
        match value {
            Mode::Major => 1,
            Mode::Minor => 0,
        }
    }
}

/// Immutable track record with the musical attributes used for sequencing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub name: String,
    pub artist: String,
    /// Tempo in beats per minute, always positive.
    pub bpm: f64,
    /// Heuristic intensity in [0, 1]. `0.5` doubles as the "unset" marker.
    pub energy: f64,
    pub duration_ms: u64,
    /// Pitch class 0-11 (C through B).
    pub key: u8,
    pub mode: Mode,
}

impl Track {
    /// Creates a track with the loader defaults for every musical attribute.
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
            bpm: DEFAULT_BPM,
            energy: DEFAULT_ENERGY,
            duration_ms: DEFAULT_DURATION_MS,
            key: DEFAULT_KEY,
            mode: Mode::Major,
        }
    }

    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn with_energy(mut self, energy: f64) -> Self {
        self.energy = energy;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_key(mut self, key: u8) -> Self {
        self.key = key;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Pulls every attribute back inside its valid range. Out-of-range input
    /// is repaired rather than rejected.
    fn normalized(mut self) -> Self {
        if !self.bpm.is_finite() || self.bpm <= 0.0 {
            self.bpm = DEFAULT_BPM;
        }
        self.energy = if self.energy.is_finite() {
            self.energy.clamp(0.0, 1.0)
        } else {
            DEFAULT_ENERGY
        };
        self.key %= 12;
        self
    }
}

/// Stable identity of a catalog entry, assigned at load time.
///
/// Two entries with identical attributes still get distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TrackId(usize);

/// Finite, ordered collection of tracks. Ids follow catalog order; the
/// assembler breaks score ties by the first candidate in each phase's pool
/// order, which only matches catalog order within an energy-threshold tier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, assigning ids in iteration order.
    pub fn from_tracks(tracks: impl IntoIterator<Item = Track>) -> Self {
        Self {
            tracks: tracks.into_iter().map(Track::normalized).collect(),
        }
    }

    /// Loads a catalog from a JSON file. See [`Catalog::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Parses a JSON array of track objects.
    ///
    /// Missing or wrongly-typed fields fall back to the defaults
    /// (`bpm=120, energy=0.5, duration_ms=200000, key=0, mode=1`); entries
    /// that are not objects are skipped.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(json)?;
        let entries = document.as_array().ok_or(SetlistError::InvalidCatalog(
            "expected a JSON array of track objects",
        ))?;

        let tracks: Vec<Track> = entries
            .iter()
            .filter_map(Value::as_object)
            .map(track_from_fields)
            .collect();

        if tracks.len() < entries.len() {
            tracing::warn!(
                skipped = entries.len() - tracks.len(),
                "ignored catalog entries that are not objects"
            );
        }

        Ok(Self::from_tracks(tracks))
    }

    /// Built-in sample catalog of fifteen 90s rock tracks.
    pub fn demo() -> Self {
        let sample = |name: &str, artist: &str, bpm: f64, energy: f64, duration_ms: u64| {
            Track::new(name, artist)
                .with_bpm(bpm)
                .with_energy(energy)
                .with_duration_ms(duration_ms)
        };

        Self::from_tracks([
            sample("Everlong", "Foo Fighters", 158.0, 0.85, 250_000),
            sample("Yellow", "Coldplay", 88.0, 0.45, 270_000),
            sample("Mr. Brightside", "The Killers", 148.0, 0.92, 222_000),
            sample("Losing My Religion", "R.E.M.", 126.0, 0.55, 270_000),
            sample("Creep", "Radiohead", 92.0, 0.35, 237_000),
            sample("Wonderwall", "Oasis", 87.0, 0.60, 258_000),
            sample("Under the Bridge", "Red Hot Chili Peppers", 84.0, 0.40, 263_000),
            sample("Smells Like Teen Spirit", "Nirvana", 117.0, 0.95, 278_000),
            sample("Zombie", "The Cranberries", 82.0, 0.70, 305_000),
            sample("Black Hole Sun", "Soundgarden", 100.0, 0.50, 318_000),
            sample("Semi-Charmed Life", "Third Eye Blind", 104.0, 0.88, 269_000),
            sample("Closing Time", "Semisonic", 102.0, 0.75, 276_000),
            sample("Basket Case", "Green Day", 170.0, 0.90, 181_000),
            sample("Interstate Love Song", "Stone Temple Pilots", 86.0, 0.65, 193_000),
            sample("1979", "The Smashing Pumpkins", 126.0, 0.78, 265_000),
        ])
    }

    /// Returns the same records in random order with freshly assigned ids.
    pub fn shuffled<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        let mut tracks = self.tracks;
        tracks.shuffle(rng);
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Every id in catalog order.
    pub fn ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        (0..self.tracks.len()).map(TrackId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrackId, &Track)> + '_ {
        self.tracks
            .iter()
            .enumerate()
            .map(|(index, track)| (TrackId(index), track))
    }
}

impl std::ops::Index<TrackId> for Catalog {
    type Output = Track;

    fn index(&self, id: TrackId) -> &Self::Output {
        &self.tracks[id.0]
    }
}

fn track_from_fields(fields: &Map<String, Value>) -> Track {
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN)
            .to_string()
    };
    let number = |key: &str| fields.get(key).and_then(Value::as_f64);

    let bpm = number("bpm").or_else(|| number("tempo")).unwrap_or(DEFAULT_BPM);
    let duration_ms = match number("duration_ms") {
        Some(ms) if ms.is_finite() && ms >= 0.0 => ms.round() as u64,
        _ => DEFAULT_DURATION_MS,
    };
    let key = number("key")
        .filter(|key| key.is_finite())
        .map(|key| (key.round() as i64).rem_euclid(12) as u8)
        .unwrap_or(DEFAULT_KEY);
    let mode = number("mode")
        .map(|mode| if mode == 0.0 { Mode::Minor } else { Mode::Major })
        .unwrap_or_default();

    Track::new(text("name"), text("artist"))
        .with_bpm(bpm)
        .with_energy(number("energy").unwrap_or(DEFAULT_ENERGY))
        .with_duration_ms(duration_ms)
        .with_key(key)
        .with_mode(mode)
}
