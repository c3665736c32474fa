use serde::Serialize;

use crate::{Mode, Track};

const BASE_SCORE: f64 = 100.0;
const PITCH_CLASSES: u8 = 12;

/// Shortest distance between two pitch classes on the 12-step circle.
pub fn pitch_class_distance(a: u8, b: u8) -> u8 {
    let diff = (a % PITCH_CLASSES).abs_diff(b % PITCH_CLASSES);
    diff.min(PITCH_CLASSES - diff)
}

/// Individual adjustments that make up a transition score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionScore {
    pub tempo: f64,
    pub key: f64,
    pub mode: f64,
}

impl TransitionScore {
    /// Every term depends only on an absolute or modular distance, so the
    /// result is symmetric in its arguments.
    pub fn between(from: &Track, to: &Track) -> Self {
        Self {
            tempo: tempo_adjustment((from.bpm - to.bpm).abs()),
            key: key_adjustment(pitch_class_distance(from.key, to.key)),
            mode: mode_adjustment(from.mode, to.mode),
        }
    }

    pub fn total(&self) -> f64 {
        BASE_SCORE + self.tempo + self.key + self.mode
    }
}

/// Smoothness of moving from `from` into `to`. Higher is better; only useful
/// for ranking candidates against each other.
pub fn score(from: &Track, to: &Track) -> f64 {
    TransitionScore::between(from, to).total()
}

fn tempo_adjustment(bpm_distance: f64) -> f64 {
    if bpm_distance > 40.0 {
        -30.0
    } else if bpm_distance > 20.0 {
        -15.0
    } else if bpm_distance > 10.0 {
        -5.0
    } else {
        0.0
    }
}

fn key_adjustment(distance: u8) -> f64 {
    match distance {
        0 | 1 | 5 | 7 => 10.0,
        d if d >= 4 => -10.0,
        _ => 0.0,
    }
}

fn mode_adjustment(from: Mode, to: Mode) -> f64 {
    if from == to {
        0.0
    } else {
        -5.0
    }
}
