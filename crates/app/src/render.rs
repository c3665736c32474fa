use std::fmt::Write;

use setlist_builder_core::{
    estimate_energy, Catalog, EnergyTiers, Section, Setlist, Tier, TierPolicy, TransitionScore,
};

const RULE_WIDTH: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text { details: bool },
    Markdown,
    Json,
}

pub fn render(
    setlist: &Setlist,
    catalog: &Catalog,
    format: OutputFormat,
) -> setlist_builder_core::Result<String> {
    match format {
        OutputFormat::Text { details } => Ok(text(setlist, catalog, details)),
        OutputFormat::Markdown => Ok(markdown(setlist, catalog)),
        OutputFormat::Json => {
            let tracks: Vec<_> = setlist.tracks(catalog).collect();
            Ok(serde_json::to_string_pretty(&tracks)?)
        }
    }
}

fn total_minutes(setlist: &Setlist, catalog: &Catalog) -> f64 {
    setlist.total_duration_ms(catalog) as f64 / 60_000.0
}

fn text(setlist: &Setlist, catalog: &Catalog, details: bool) -> String {
    if setlist.is_empty() {
        return "No tracks in setlist.".to_string();
    }

    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}\n🎸 SETLIST\n{rule}");

    let mut position = 0;
    let mut previous = None;
    for (section, ids) in setlist.sections().filter(|(_, ids)| !ids.is_empty()) {
        let _ = writeln!(out, "\n--- {} ---", section.label().to_uppercase());
        for id in ids {
            position += 1;
            let track = &catalog[*id];
            if !details {
                let _ = writeln!(out, "{position:2}. {} - {}", track.name, track.artist);
                previous = Some(track);
                continue;
            }

            let _ = writeln!(out, "{position:2}. {}", track.name);
            let _ = write!(
                out,
                "    {} | {:.0} BPM | Energy: {:.1}",
                track.artist,
                track.bpm,
                estimate_energy(track)
            );
            if let Some(from) = previous {
                let _ = write!(
                    out,
                    " | Transition: {:.0}",
                    TransitionScore::between(from, track).total()
                );
            }
            out.push('\n');
            previous = Some(track);
        }
    }

    let _ = write!(
        out,
        "\n{rule}\nTotal: {} songs | ~{:.0} minutes\n{rule}",
        setlist.len(),
        total_minutes(setlist, catalog)
    );
    out
}

fn section_emoji(section: Section) -> &'static str {
    match section {
        Section::Opener => "🔥",
        Section::EarlySet => "⚡",
        Section::MidSetDip => "💫",
        Section::Build => "📈",
        Section::Closer => "🎆",
    }
}

fn markdown(setlist: &Setlist, catalog: &Catalog) -> String {
    if setlist.is_empty() {
        return "No tracks in setlist.".to_string();
    }

    let mut out = String::from("# 🎸 Concert Setlist\n\n");
    let mut position = 0;
    for (section, ids) in setlist.sections().filter(|(_, ids)| !ids.is_empty()) {
        let _ = writeln!(out, "## {} {}\n", section_emoji(section), section);
        for id in ids {
            position += 1;
            let track = &catalog[*id];
            let _ = writeln!(out, "{position}. **{}** - {}", track.name, track.artist);
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "---\n*{} songs | ~{:.0} minutes*",
        setlist.len(),
        total_minutes(setlist, catalog)
    );
    out
}

pub fn tiers(tiers: &EnergyTiers, catalog: &Catalog) -> String {
    let policy = match tiers.policy {
        TierPolicy::EnergyThresholds => "energy thresholds (>= 0.7 high, >= 0.4 mid)",
        TierPolicy::TempoRank => "tempo rank (energy values undifferentiated)",
    };

    let mut out = format!("Tiering by {policy}\n");
    for (tier, label) in [(Tier::High, "HIGH"), (Tier::Mid, "MID"), (Tier::Low, "LOW")] {
        let ids = tiers.tier(tier);
        let _ = writeln!(out, "\n--- {label} ({}) ---", ids.len());
        for id in ids {
            let track = &catalog[*id];
            let _ = writeln!(
                out,
                "{} - {} | {:.0} BPM | Energy: {:.2}",
                track.name, track.artist, track.bpm, track.energy
            );
        }
    }
    out
}
