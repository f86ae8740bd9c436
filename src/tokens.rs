use lazy_static::lazy_static;
use regex::Regex;

use crate::runway::RunwayDesignator;

lazy_static! {
    static ref LEADING_KEYWORD: Regex = Regex::new(r"^(?:RWYS?|RUNWAYS?)\s*").unwrap();
    static ref DETACHED_SIDE: Regex =
        Regex::new(r"(\d)\s+(LEFT|RIGHT|CENTER|L|R|C)\b").unwrap();
    static ref SEPARATOR: Regex = Regex::new(r"\s*(?:AND|,|/|&)\s*|\s{2,}").unwrap();
    static ref RUNWAY_TOKEN: Regex =
        Regex::new(r"^(?:RWYS?)?([0-3]?\d)\s*(L(?:EFT)?|R(?:IGHT)?|C(?:ENTER)?)?$").unwrap();
    static ref BARE_SIDE: Regex = Regex::new(r"^(L(?:EFT)?|R(?:IGHT)?|C(?:ENTER)?)$").unwrap();
}

/// Splits a matched runway list such as `27L AND 27R` or `10L 10C 10R` into
/// designators, in the order they appear.
///
/// A bare side word continues the last number seen, so `17R AND LEFT` gives
/// `17R` then `17L`. Duplicates are kept; the assembler dedups.
pub fn extract_tokens(matched: &str) -> Vec<RunwayDesignator> {
    let upper = matched.trim().to_uppercase();
    let text = LEADING_KEYWORD.replace(&upper, "");
    let text = DETACHED_SIDE.replace_all(&text, "${1}${2}");

    let mut runways = Vec::new();
    let mut last_number: Option<String> = None;

    for part in SEPARATOR.split(&text) {
        for token in part.split_whitespace() {
            if let Some(cap) = RUNWAY_TOKEN.captures(token) {
                if let Some(rwy) =
                    RunwayDesignator::from_parts(&cap[1], cap.get(2).map(|m| m.as_str()))
                {
                    runways.push(rwy);
                    last_number = Some(cap[1].to_string());
                }
            } else if let Some(number) = &last_number {
                if BARE_SIDE.is_match(token) {
                    if let Some(rwy) = RunwayDesignator::from_parts(number, Some(token)) {
                        runways.push(rwy);
                    }
                }
            }
        }
    }

    runways
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        extract_tokens(s).iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn mixed_separators() {
        assert_eq!(tokens("27L AND 27R"), vec!["27L", "27R"]);
        assert_eq!(tokens("26L, 27R"), vec!["26L", "27R"]);
        assert_eq!(tokens("16L/17R"), vec!["16L", "17R"]);
        assert_eq!(tokens("4 & 8"), vec!["04", "08"]);
    }

    #[test]
    fn space_separated_list() {
        assert_eq!(tokens("10L 10C 10R"), vec!["10L", "10C", "10R"]);
        assert_eq!(tokens("27 36"), vec!["27", "36"]);
    }

    #[test]
    fn bare_side_continues_last_number() {
        assert_eq!(tokens("17R AND LEFT"), vec!["17R", "17L"]);
        assert_eq!(tokens("27 RIGHT AND LEFT"), vec!["27R", "27L"]);
    }

    #[test]
    fn bare_side_without_a_number_is_dropped() {
        assert!(tokens("LEFT").is_empty());
    }

    #[test]
    fn leading_keyword_and_glued_prefix() {
        assert_eq!(tokens("RWYS 24 AND 25"), vec!["24", "25"]);
        assert_eq!(tokens("runway 9 left"), vec!["09L"]);
        assert_eq!(tokens("24R AND RWY 25L"), vec!["24R", "25L"]);
        assert_eq!(tokens("RWY32L/RWY32R"), vec!["32L", "32R"]);
    }

    #[test]
    fn junk_tokens_are_discarded() {
        assert_eq!(tokens("27L, "), vec!["27L"]);
        assert_eq!(tokens("28R ANDREWS"), vec!["28R"]);
        assert!(tokens("IN PROG").is_empty());
        assert!(tokens("").is_empty());
    }

    #[test]
    fn keeps_duplicates_for_the_assembler() {
        assert_eq!(tokens("9L AND 09L"), vec!["09L", "09L"]);
    }
}
