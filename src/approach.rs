use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use log::trace;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::rules::ONE;
use crate::runway::RunwayDesignator;
use crate::tokens::extract_tokens;

/// Approach procedure kinds an ATIS may advertise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApproachType {
    Ils,
    Rnav,
    Gps,
    Rnp,
    Visual,
    Vor,
    Ndb,
    Loc,
    Lda,
}

impl ApproachType {
    pub fn as_str(self) -> &'static str {
        match self {
            ApproachType::Ils => "ILS",
            ApproachType::Rnav => "RNAV",
            ApproachType::Gps => "GPS",
            ApproachType::Rnp => "RNP",
            ApproachType::Visual => "VISUAL",
            ApproachType::Vor => "VOR",
            ApproachType::Ndb => "NDB",
            ApproachType::Loc => "LOC",
            ApproachType::Lda => "LDA",
        }
    }
}

impl fmt::Display for ApproachType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApproachType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_uppercase().as_str() {
            "ILS" => ApproachType::Ils,
            "RNAV" => ApproachType::Rnav,
            "GPS" => ApproachType::Gps,
            "RNP" => ApproachType::Rnp,
            "VISUAL" => ApproachType::Visual,
            "VOR" => ApproachType::Vor,
            "NDB" => ApproachType::Ndb,
            "LOC" => ApproachType::Loc,
            "LDA" => ApproachType::Lda,
            _ => return Err(()),
        })
    }
}

/// Approach types per runway, each list in first-seen order without repeats.
pub type ApproachMap = BTreeMap<RunwayDesignator, Vec<ApproachType>>;

lazy_static! {
    static ref APPROACH_REGEX: Regex = Regex::new(&format!(
        r"\b(ILS|RNAV|GPS|RNP|VISUAL|VOR|NDB|LOC|LDA)\s+(?:APPROACH(?:ES)?\s+)?(?:RWYS?\s*|RUNWAYS?\s+)?({one}(?:\s*(?:AND|OR|,|/|&)\s*(?:RWYS?\s*|RUNWAYS?\s+)?(?:{one}|(?:LEFT|RIGHT|CENTER|[LRC])\b))*)",
        one = ONE
    ))
    .unwrap();
}

/// Maps `ILS RWY 27L`, `VISUAL APPROACH RWY 24R`, `EXPECT ILS RWY 4L OR RWY 4R`
/// and the like to the runways they name.
///
/// Runs on normalized text and does not care which role the runway has.
pub fn extract_approaches(text: &str) -> ApproachMap {
    let mut approaches = ApproachMap::new();

    for cap in APPROACH_REGEX.captures_iter(text) {
        let kind = match cap[1].parse::<ApproachType>() {
            Ok(kind) => kind,
            Err(()) => continue,
        };
        for rwy in extract_tokens(&cap[2].replace(" OR ", " AND ")) {
            trace!("approach {} on runway {}", kind, rwy);
            let kinds = approaches.entry(rwy).or_insert_with(Vec::new);
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
    }

    approaches
}
