//! How much to trust a parse.
//!
//! The score starts at 50. It rises when both sides are found (+20) or only
//! one side is (+10), and drops to 10 when nothing is found. Each runway
//! lined up with the reported wind adds 5. The result is capped at 100.

use std::fmt;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::report::ParseResult;
use crate::runway::RunwayDesignator;

const BASE_CONFIDENCE: u8 = 50;
const EMPTY_CONFIDENCE: u8 = 10;

lazy_static! {
    static ref SURFACE_WIND: Regex = Regex::new(r"\b(\d{3})\d{2}(?:G\d{2})?KT\b").unwrap();
}

/// Why the score came out the way it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchSource {
    BothFound,
    PartialFound,
    /// Weather groups made up more than half of the broadcast.
    HeavyWeatherFiltering,
    WindAligned(RunwayDesignator),
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchSource::BothFound => f.write_str("BOTH_FOUND"),
            MatchSource::PartialFound => f.write_str("PARTIAL_FOUND"),
            MatchSource::HeavyWeatherFiltering => f.write_str("HEAVY_WEATHER_FILTERING"),
            MatchSource::WindAligned(rwy) => write!(f, "WIND_ALIGNED:{}", rwy),
        }
    }
}

impl Serialize for MatchSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseWarning {
    EmptyText,
    NoRunways,
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            ParseWarning::EmptyText => "Empty ATIS text",
            ParseWarning::NoRunways => "No runways parsed from ATIS",
        })
    }
}

impl Serialize for ParseWarning {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// 0 to 100.
    pub confidence: u8,
    pub match_sources: Vec<MatchSource>,
    pub warnings: Vec<ParseWarning>,
}

impl Diagnostics {
    pub fn empty_text() -> Diagnostics {
        Diagnostics {
            confidence: 0,
            match_sources: Vec::new(),
            warnings: vec![ParseWarning::EmptyText],
        }
    }

    /// Scores `result`, parsed from `raw`, which normalized to `normalized`.
    pub fn assess(raw: &str, normalized: &str, result: &ParseResult) -> Diagnostics {
        let mut diag = Diagnostics::default();
        let mut confidence = BASE_CONFIDENCE;

        match (result.landing.is_empty(), result.departing.is_empty()) {
            (false, false) => {
                confidence += 20;
                diag.match_sources.push(MatchSource::BothFound);
            }
            (true, true) => {
                confidence = EMPTY_CONFIDENCE;
                diag.warnings.push(ParseWarning::NoRunways);
            }
            _ => {
                confidence += 10;
                diag.match_sources.push(MatchSource::PartialFound);
            }
        }

        let raw = raw.to_uppercase();
        let kept = normalized.split_whitespace().join(" ");
        if kept.chars().count() * 2 < raw.chars().count() {
            diag.match_sources.push(MatchSource::HeavyWeatherFiltering);
        }

        if let Some(heading) = wind_direction(&raw) {
            for &rwy in result.landing.union(&result.departing) {
                if lines_up(rwy, heading) {
                    confidence = confidence.saturating_add(5);
                    diag.match_sources.push(MatchSource::WindAligned(rwy));
                }
            }
        }

        diag.confidence = confidence.min(100);
        diag
    }
}

fn wind_direction(text: &str) -> Option<u16> {
    SURFACE_WIND.captures(text)?[1].parse().ok()
}

/// Whether the runway points into or straight away from the wind.
fn lines_up(rwy: RunwayDesignator, heading: u16) -> bool {
    let into = heading / 10;
    let away = ((heading + 180) % 360) / 10;
    let number = u16::from(rwy.number());
    number == into || number == away
}
