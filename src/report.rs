use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::approach::{ApproachMap, ApproachType};
use crate::runway::RunwayDesignator;

/// Runway configuration extracted from one ATIS, ordered by designator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub landing: BTreeSet<RunwayDesignator>,
    pub departing: BTreeSet<RunwayDesignator>,
    pub approaches: ApproachMap,
}

/// Deduplicates and orders the runway lists and attaches the approach map.
pub fn assemble<L, D>(landing: L, departing: D, approaches: ApproachMap) -> ParseResult
where
    L: IntoIterator<Item = RunwayDesignator>,
    D: IntoIterator<Item = RunwayDesignator>,
{
    ParseResult {
        landing: landing.into_iter().collect(),
        departing: departing.into_iter().collect(),
        approaches,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunwayUse {
    #[serde(rename = "ARR")]
    Arrival,
    #[serde(rename = "DEP")]
    Departure,
    #[serde(rename = "BOTH")]
    Both,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayConfig {
    pub runway_id: RunwayDesignator,
    pub runway_use: RunwayUse,
    pub approach_type: Option<ApproachType>,
}

impl ParseResult {
    pub fn is_empty(&self) -> bool {
        self.landing.is_empty() && self.departing.is_empty()
    }

    /// `L:24R/25L D:24/25`, with `-` standing in for an empty side.
    pub fn summary(&self) -> String {
        fn side(rwys: &BTreeSet<RunwayDesignator>) -> String {
            if rwys.is_empty() {
                "-".to_string()
            } else {
                rwys.iter().join("/")
            }
        }
        format!("L:{} D:{}", side(&self.landing), side(&self.departing))
    }

    /// One record per distinct runway, in designator order.
    pub fn runway_configs(&self) -> Vec<RunwayConfig> {
        self.landing
            .union(&self.departing)
            .map(|&rwy| {
                let runway_use = match (self.landing.contains(&rwy), self.departing.contains(&rwy)) {
                    (true, false) => RunwayUse::Arrival,
                    (false, true) => RunwayUse::Departure,
                    _ => RunwayUse::Both,
                };
                RunwayConfig {
                    runway_id: rwy,
                    runway_use,
                    approach_type: self
                        .approaches
                        .get(&rwy)
                        .and_then(|kinds| kinds.first().cloned()),
                }
            })
            .collect()
    }

    pub fn records_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.runway_configs())
    }
}
