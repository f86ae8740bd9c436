//! Runway assignments from ATIS broadcast text.
//!
//! ```
//! let result = atis_runways::parse_atis("LDG RWYS 4L AND 4R. DEP RWYS 31L AND 31R. EXPECT ILS RWY 4L OR RWY 4R");
//! assert_eq!(result.summary(), "L:04L/04R D:31L/31R");
//! ```
#![deny(clippy::all)]
#![forbid(unsafe_code)]

use log::debug;
use serde::Serialize;

pub mod approach;
pub mod diagnostics;
pub mod error;
pub mod normalize;
pub mod report;
pub mod rules;
pub mod runway;
pub mod tokens;

pub use approach::{extract_approaches, ApproachMap, ApproachType};
pub use diagnostics::{Diagnostics, MatchSource, ParseWarning};
pub use normalize::normalize;
pub use report::{assemble, ParseResult, RunwayConfig, RunwayUse};
pub use rules::{extract_roles, Assignments, Role, RoleMatch};
pub use runway::{normalize_runway, RunwayDesignator, RunwaySide};
pub use tokens::extract_tokens;

/// Parses an ATIS body into landing runways, departing runways and approach
/// types.
///
/// Never fails: text with no recognizable runway information, including
/// empty text, yields an empty result.
pub fn parse_atis(text: &str) -> ParseResult {
    if text.trim().is_empty() {
        return ParseResult::default();
    }
    parse_normalized(&normalize(text))
}

/// A parse together with how far it can be trusted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DetailedParse {
    #[serde(flatten)]
    pub result: ParseResult,
    pub diagnostics: Diagnostics,
}

/// Like [`parse_atis`], but also scores the result.
pub fn parse_atis_detailed(text: &str) -> DetailedParse {
    if text.trim().is_empty() {
        return DetailedParse {
            result: ParseResult::default(),
            diagnostics: Diagnostics::empty_text(),
        };
    }

    let normalized = normalize(text);
    let result = parse_normalized(&normalized);
    let diagnostics = Diagnostics::assess(text, &normalized, &result);
    debug!(
        "confidence {} sources [{}]",
        diagnostics.confidence,
        itertools::join(&diagnostics.match_sources, ", ")
    );
    DetailedParse { result, diagnostics }
}

fn parse_normalized(text: &str) -> ParseResult {
    let assignments = Assignments::resolve(&extract_roles(text));
    let approaches = extract_approaches(text);
    let result = assemble(assignments.landing, assignments.departing, approaches);

    debug!(
        "parsed ATIS ({} chars): {} approaches={}",
        text.chars().count(),
        result.summary(),
        result.approaches.len()
    );
    result
}
