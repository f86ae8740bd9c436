//! Ordered rule table that finds runway lists and decides what they are used for.
//!
//! Rules run strictly in table order. Fixed-role rules always add their
//! runways. Rules whose role has to be guessed from surrounding text only fall
//! back to "both" when nothing earlier in the table classified a runway, and
//! the final `RWY IN USE` rule only fires on an otherwise empty result.

use lazy_static::lazy_static;
use log::trace;
use regex::{Captures, Regex};

use crate::runway::RunwayDesignator;
use crate::tokens::extract_tokens;

/// How far back to look for arrival/departure cues, in characters.
const CONTEXT_WINDOW: usize = 100;

/// One runway, optionally followed by its side (`27`, `4L`, `09 LEFT`, `27 L`).
pub(crate) const ONE: &str = r"[0-3]?\d(?:\s?(?:LEFT|RIGHT|CENTER|[LRC]))?\b";

const LANDING_KEYWORD: &str = r"(?:LDG|LNDG|LANDING|ARR(?:IV(?:ING|ALS?))?)";
const DEPARTING_KEYWORD: &str =
    r"(?:DEP(?:ART(?:ING|URES?)?)?|DEPTG|DEPG|DPTG|TKOF|TAKEOFF)";
const ROLE_WORD: &str = r"(?:ARR(?:IVAL)?S?|DEP(?:ARTURE)?S?|LANDINGS?|TAKE-?OFFS?)";
const RUNWAY_WORD: &str = r"(?:RWYS?\s*|RUNWAYS?\s+)";

const LANDING_CUES: &[&str] = &["ARRIVAL", "ARR ", "APCH"];
const DEPARTING_CUES: &[&str] = &["DEPARTURE", "DEP "];

lazy_static! {
    /// A runway list: `27L AND 27R`, `16L/17R`, `10L 10C 10R`, `17R AND LEFT`,
    /// `24R AND RWY 25L`.
    static ref LIST: String = format!(
        r"{one}(?:\s*(?:AND|,|/|&)\s*{rw}?(?:{one}|(?:LEFT|RIGHT|CENTER|[LRC])\b)?|\s+[0-3]\d[LRC]?\b)*",
        one = ONE,
        rw = RUNWAY_WORD,
    );

    static ref RULES: Vec<Rule> = build_rules();
}

/// What a rule knows about the runways it matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RuleRole {
    Landing,
    Departing,
    Both,
    /// Role named by a `role` capture inside the match; behaves like
    /// `Context` when the capture is absent or names no role.
    Keyword,
    /// Like `Keyword`, but landing when no role is named.
    KeywordOrLanding,
    /// Role inferred from the text before the match.
    Context,
    /// `land` and `dep` captures carry one runway each.
    Split,
    /// Generic catch-all; only used when nothing else matched.
    LastResort,
}

struct Rule {
    name: &'static str,
    pattern: Regex,
    role: RuleRole,
    window: usize,
}

impl Rule {
    fn new(name: &'static str, pattern: String, role: RuleRole) -> Rule {
        Rule {
            name,
            pattern: Regex::new(&pattern).unwrap(),
            role,
            window: CONTEXT_WINDOW,
        }
    }

    fn window(mut self, window: usize) -> Rule {
        self.window = window;
        self
    }
}

fn build_rules() -> Vec<Rule> {
    use RuleRole::*;

    let one = ONE;
    let list = LIST.as_str();
    let rw = RUNWAY_WORD;

    vec![
        // LDG RWY 27L / ARRIVAL RWYS 4L AND 4R
        Rule::new(
            "landing keyword",
            format!(r"\b{}\s+{}?(?P<rwy>{})", LANDING_KEYWORD, rw, list),
            Landing,
        ),
        // DEP RWY 28R / DEPTG RWYS 25R AND 24L
        Rule::new(
            "departing keyword",
            format!(r"\b{}\s+{}?(?P<rwy>{})", DEPARTING_KEYWORD, rw, list),
            Departing,
        ),
        // LDG/DEPTG RWY 27, LDG AND DEP 4/8
        Rule::new(
            "landing and departing keyword",
            format!(
                r"\b(?:{l}\s*(?:AND|/|&)\s*{d}|{d}\s*(?:AND|/|&)\s*{l})\s+{rw}?(?P<rwy>{list})",
                l = LANDING_KEYWORD,
                d = DEPARTING_KEYWORD,
                rw = rw,
                list = list,
            ),
            Both,
        ),
        // RWY 03 FOR ARR, RUNWAY IN USE 09 FOR ARRIVALS AND DEPARTURES
        Rule::new(
            "runway for role",
            format!(
                r"\b(?:RWYS?|RUNWAYS?)\s+(?:IN\s+USE\s+)?(?P<rwy>{list})\s+(?:IN\s+USE\s+)?FOR\s+(?P<role>{w}(?:\s*(?:AND|/|&)\s*{w})?|BOTH|ALL\s+OP(?:ERATION)?S)\b",
                list = list,
                w = ROLE_WORD,
            ),
            Keyword,
        ),
        // Australian: [RWY] 16R ARR, [RWY] 11
        Rule::new(
            "bracketed runway",
            format!(
                r"\[RWY\]\s*(?P<rwy>{})(?:\s+(?P<role>ARR(?:IVALS?)?|DEP(?:ARTURES?)?)\b)?",
                one
            ),
            Keyword,
        )
        .window(50),
        // SIMUL VIS APCHS IN USE RWY 27, RNP APCHS IN PROG RWY 24R, DEPARTURES IN PROG RWYS 24 AND 25
        Rule::new(
            "simultaneous operations",
            format!(
                r"\b(?:SIMUL(?:TANEOUS)?\s+)?(?:(?:VIS(?:UAL)?|INSTR?|PARALLEL)\s+)?(?P<role>APCHS?|APPROACH(?:ES)?|ARR(?:IVAL)?S|DEPS?|DEPARTURES?)\s+(?:ARE\s+)?IN\s+(?:USE|PROG(?:RESS)?)\s+(?:TO\s+)?{}?(?P<rwy>{})",
                rw, list
            ),
            Keyword,
        ),
        Rule::new(
            "runways in use",
            format!(r"\bRUNWAYS?\s+(?:IN\s+USE|ACTIVE)\s+(?P<rwy>{})", list),
            Context,
        ),
        // RWY 27 AND RWY 28 IN USE
        Rule::new(
            "paired runways in use",
            format!(
                r"\bRWYS?\s+(?P<rwy>{one}\s+(?:AND\s+)?RWY\s+{one})\s+IN\s+USE\b",
                one = one
            ),
            Context,
        ),
        // Scandinavian: ILS RWY 22 IN USE, RUNWAY 04 IN USE
        Rule::new(
            "runway in use",
            format!(
                r"(?:\b(?P<role>ILS)\s+)?\b(?:RWY|RUNWAY)\s+(?P<rwy>{})\s+IN\s+USE\b",
                one
            ),
            Keyword,
        ),
        // Vietnamese: LDG RWY 25R AND DPTG RWY 25L
        Rule::new(
            "split landing and departing",
            format!(
                r"\bLDG\s+(?:RWY\s+)?(?P<land>{one})\s+AND\s+DPT?G\s+(?:RWY\s+)?(?P<dep>{one})",
                one = one
            ),
            Split,
        ),
        // Middle East: ARRDEP RWY 30L, ARR DEP RWY 12
        Rule::new(
            "arrival departure",
            format!(r"\bARR\s*DEP\s+(?:RWYS?\s*)?(?P<rwy>{})", list),
            Both,
        ),
        Rule::new(
            "radar vectors",
            format!(
                r"\bEXPECT\s+(?:RADAR\s+)?VECTORS?\s+(?:FOR\s+)?[^.]*?\bRWY\s+(?P<rwy>{})",
                one
            ),
            Landing,
        ),
        Rule::new(
            "expected approach runway",
            format!(r"\bEXPECT\s+[^.]*?\bAPPROACH\s+RUNWAY\s+(?P<rwy>{})", list),
            Landing,
        ),
        Rule::new(
            "departure runway",
            format!(r"\bDEPARTURES?\s+RUNWAY\s+(?P<rwy>{})", one),
            Departing,
        ),
        // Japanese: USING RWY 34R, USING RWY32L/32R, IN USE RWY 34R
        Rule::new(
            "using runway",
            format!(
                r"(?:\b(?P<role>APCHS?|ARR(?:IVAL)?S?|DEPS?|DEPARTURES?)\s+(?:ARE\s+)?IN\s+)?\b(?:USING|USE)\s+RWYS?\s*(?P<rwy>{})",
                list
            ),
            KeywordOrLanding,
        ),
        // (APCH) ILS RWY32L
        Rule::new(
            "approach procedure runway",
            format!(
                r"\b(?:APCH|APPROACH)\b[^.]*?\b(?:ILS|RNAV|VOR)\s+RWY\s*(?P<rwy>{})",
                one
            ),
            Landing,
        ),
        // European: ILS DME APCH RWY IN USE 26
        Rule::new(
            "approach runway in use",
            format!(r"\bAPCHS?\s+RWYS?\s+IN\s+USE\s+(?P<rwy>{})", list),
            Landing,
        ),
        // Polish: FOR ILS CAT I APPROACH RUNWAY 29
        Rule::new(
            "approach runway",
            format!(
                r"\bFOR\s+(?:ILS|RNAV|VOR)\b[^.]*?\bAPPROACH\s+RUNWAY\s+(?P<rwy>{})",
                one
            ),
            Landing,
        ),
        Rule::new(
            "arrival runway",
            format!(
                r"\bARRIVALS?\s+(?:FOR\s+)?(?:[^.]*?\s)?RUNWAY\s+(?P<rwy>{})",
                one
            ),
            Landing,
        ),
        // Philippines: ARRS EXPECT ILS RWY 06 APPR
        Rule::new(
            "arrivals expect",
            format!(
                r"\bARRS?\s+EXP(?:ECT)?\s+[^.]*?\bRWY\s+(?P<rwy>{})\s+(?:APPROACH|APPR?)\b",
                one
            ),
            Landing,
        ),
        Rule::new(
            "runway in use, last resort",
            format!(r"\bRWYS?\s+IN\s+USE\s+(?P<rwy>{})", list),
            LastResort,
        ),
    ]
}

/// The role a matched runway list plays, as far as the matching rule can tell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Landing,
    Departing,
    Both,
    /// Decided from the preceding context, or defaulted to both when no
    /// earlier rule classified anything.
    Ambiguous,
    LastResort,
}

/// A runway list found in the text together with what is known about its role.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleMatch<'t> {
    pub rule: &'static str,
    /// Position of the rule in the table; lower runs first.
    pub priority: usize,
    pub runways: &'t str,
    pub role: Role,
    /// Text immediately before the match.
    pub context: &'t str,
}

/// Runs every rule over normalized `text` and returns the matches in rule order.
pub fn extract_roles(text: &str) -> Vec<RoleMatch<'_>> {
    let mut matches = Vec::new();

    for (priority, rule) in RULES.iter().enumerate() {
        for cap in rule.pattern.captures_iter(text) {
            let start = cap.get(0).map_or(0, |m| m.start());
            let context = preceding(text, start, rule.window);

            let mut found = Vec::with_capacity(2);
            match rule.role {
                RuleRole::Split => {
                    if let Some(land) = cap.name("land") {
                        found.push((land.as_str(), Role::Landing));
                    }
                    if let Some(dep) = cap.name("dep") {
                        found.push((dep.as_str(), Role::Departing));
                    }
                }
                role => {
                    if let Some(runways) = cap.name("rwy") {
                        found.push((runways.as_str(), match_role(role, &cap)));
                    }
                }
            }

            for (runways, role) in found {
                trace!("rule {:?} matched {:?} as {:?}", rule.name, runways, role);
                matches.push(RoleMatch {
                    rule: rule.name,
                    priority,
                    runways,
                    role,
                    context,
                });
            }
        }
    }

    matches
}

fn match_role(role: RuleRole, cap: &Captures) -> Role {
    match role {
        RuleRole::Landing => Role::Landing,
        RuleRole::Departing => Role::Departing,
        RuleRole::Both | RuleRole::Split => Role::Both,
        RuleRole::Keyword => cap
            .name("role")
            .and_then(|m| keyword_role(m.as_str()))
            .unwrap_or(Role::Ambiguous),
        RuleRole::KeywordOrLanding => cap
            .name("role")
            .and_then(|m| keyword_role(m.as_str()))
            .unwrap_or(Role::Landing),
        RuleRole::Context => Role::Ambiguous,
        RuleRole::LastResort => Role::LastResort,
    }
}

fn keyword_role(keyword: &str) -> Option<Role> {
    if keyword.contains("BOTH") || keyword.starts_with("ALL") {
        return Some(Role::Both);
    }
    let landing = ["ARR", "APCH", "APPROACH", "ILS", "LAND", "LDG"]
        .iter()
        .any(|k| keyword.contains(k));
    let departing = ["DEP", "TKOF", "TAKE"].iter().any(|k| keyword.contains(k));
    match (landing, departing) {
        (true, true) => Some(Role::Both),
        (true, false) => Some(Role::Landing),
        (false, true) => Some(Role::Departing),
        (false, false) => None,
    }
}

/// Up to `window` characters of `text` ending at byte offset `end`.
fn preceding(text: &str, end: usize, window: usize) -> &str {
    let before = &text[..end];
    if window == 0 {
        return "";
    }
    match before.char_indices().rev().nth(window - 1) {
        Some((i, _)) => &before[i..],
        None => before,
    }
}

/// Landing or departing, from whichever cue sits closest to the match.
fn context_role(context: &str) -> Option<Role> {
    let nearest = |cues: &[&str]| cues.iter().filter_map(|c| context.rfind(c)).max();
    match (nearest(LANDING_CUES), nearest(DEPARTING_CUES)) {
        (Some(l), Some(d)) if d > l => Some(Role::Departing),
        (Some(_), _) => Some(Role::Landing),
        (None, Some(_)) => Some(Role::Departing),
        (None, None) => None,
    }
}

/// Landing and departing runways gathered by the rules, in discovery order
/// and possibly repeated.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignments {
    pub landing: Vec<RunwayDesignator>,
    pub departing: Vec<RunwayDesignator>,
}

impl Assignments {
    pub fn is_empty(&self) -> bool {
        self.landing.is_empty() && self.departing.is_empty()
    }

    /// Folds role matches, in rule order, into landing/departing lists.
    ///
    /// Whether a runway "has been classified" is judged against the state
    /// before the current rule started, so every match of one generic rule is
    /// treated alike.
    pub fn resolve(matches: &[RoleMatch]) -> Assignments {
        let mut acc = Assignments::default();
        let mut current_rule = None;
        let mut classified = false;

        for m in matches {
            if current_rule != Some(m.priority) {
                current_rule = Some(m.priority);
                classified = !acc.is_empty();
            }

            let role = match m.role {
                Role::Ambiguous => match context_role(m.context) {
                    Some(role) => role,
                    None if !classified => Role::Both,
                    None => {
                        trace!("rule {:?}: no context for {:?}, skipped", m.rule, m.runways);
                        continue;
                    }
                },
                Role::LastResort if classified => continue,
                Role::LastResort => Role::Both,
                role => role,
            };

            acc.add(role, extract_tokens(m.runways));
        }

        acc
    }

    fn add(&mut self, role: Role, runways: Vec<RunwayDesignator>) {
        match role {
            Role::Landing => self.landing.extend(runways),
            Role::Departing => self.departing.extend(runways),
            _ => {
                self.landing.extend(runways.iter().cloned());
                self.departing.extend(runways);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn roles(text: &str) -> Vec<(&'static str, String, Role)> {
        extract_roles(text)
            .into_iter()
            .map(|m| (m.rule, m.runways.trim().to_string(), m.role))
            .collect()
    }

    // Sorted and deduplicated, the way the assembler will present them.
    fn resolved(text: &str) -> (Vec<String>, Vec<String>) {
        let acc = Assignments::resolve(&extract_roles(text));
        let show = |v: &[RunwayDesignator]| {
            v.iter()
                .map(|r| r.to_string())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        (show(&acc.landing), show(&acc.departing))
    }

    #[test]
    fn explicit_keywords() {
        assert_eq!(
            roles("LDG RWY 27L, DEP RWY 28R"),
            vec![
                ("landing keyword", "27L,".to_string(), Role::Landing),
                ("departing keyword", "28R".to_string(), Role::Departing),
            ]
        );
    }

    #[test]
    fn compound_keyword_is_both() {
        let (landing, departing) = resolved("LDG/DEPTG RWY 27");
        assert_eq!(landing, vec!["27"]);
        assert_eq!(departing, vec!["27"]);
    }

    #[test]
    fn trailing_role_keyword() {
        let (landing, departing) = resolved("RWY 03 FOR ARR. RWY 21 FOR DEP.");
        assert_eq!(landing, vec!["03"]);
        assert_eq!(departing, vec!["21"]);
    }

    #[test]
    fn bracketed_runways_take_the_following_keyword() {
        let (landing, departing) = resolved("[RWY] 16R ARR [RWY] 16L DEP");
        assert_eq!(landing, vec!["16R"]);
        assert_eq!(departing, vec!["16L"]);
    }

    #[test]
    fn in_use_reads_preceding_context() {
        let (landing, departing) = resolved("FOR ARRIVAL RUNWAYS IN USE 25R AND 25L");
        assert_eq!(landing, vec!["25L", "25R"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn nearest_cue_wins() {
        assert_eq!(context_role("ARRIVAL INFO A. DEPARTURE "), Some(Role::Departing));
        assert_eq!(context_role("DEPARTURE FREQ 121.9. APCH "), Some(Role::Landing));
        assert_eq!(context_role("INFO B "), None);
    }

    #[test]
    fn ambiguous_in_use_defers_to_earlier_rules() {
        let (landing, departing) = resolved("LDG RWY 27. RUNWAY IN USE 09");
        assert_eq!(landing, vec!["27"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn ambiguous_in_use_alone_is_both() {
        let (landing, departing) = resolved("RUNWAYS IN USE 22L AND 22R");
        assert_eq!(landing, vec!["22L", "22R"]);
        assert_eq!(departing, vec!["22L", "22R"]);
    }

    #[test]
    fn ils_marks_runway_in_use_as_landing() {
        let (landing, departing) = resolved("ILS RWY 22 IN USE");
        assert_eq!(landing, vec!["22"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn split_form() {
        let (landing, departing) = resolved("LDG RWY 25R AND DPTG RWY 25L");
        assert!(landing.contains(&"25R".to_string()));
        assert!(!landing.contains(&"25L".to_string()));
        assert_eq!(departing, vec!["25L"]);
    }

    #[test]
    fn last_resort_only_on_empty_result() {
        let (landing, departing) = resolved("RWY IN USE 30");
        assert_eq!(landing, vec!["30"]);
        assert_eq!(departing, vec!["30"]);

        let (landing, departing) = resolved("DEP RWY 12. RWY IN USE 30");
        assert!(landing.is_empty());
        assert_eq!(departing, vec!["12"]);
    }

    #[test]
    fn every_match_of_a_generic_rule_sees_the_same_state() {
        let (landing, departing) = resolved("RUNWAY IN USE 27. RUNWAY IN USE 09");
        assert_eq!(landing, vec!["09", "27"]);
        assert_eq!(departing, vec!["09", "27"]);
    }

    fn fired(text: &str, rule: &str) -> bool {
        extract_roles(text).iter().any(|m| m.rule == rule)
    }

    #[test]
    fn paired_runways_in_use() {
        let text = "RWY 27 AND RWY 28 IN USE";
        assert!(fired(text, "paired runways in use"));
        let (landing, departing) = resolved(text);
        assert_eq!(landing, vec!["27", "28"]);
        assert_eq!(departing, vec!["27", "28"]);

        let (landing, departing) = resolved("DEPARTURE ATIS. RWY 27 AND RWY 28 IN USE");
        assert!(landing.is_empty());
        assert_eq!(departing, vec!["27", "28"]);
    }

    #[test]
    fn runways_active() {
        let text = "RUNWAYS ACTIVE 09L AND 09R";
        assert!(fired(text, "runways in use"));
        let (landing, departing) = resolved(text);
        assert_eq!(landing, vec!["09L", "09R"]);
        assert_eq!(departing, vec!["09L", "09R"]);

        let (landing, departing) = resolved("FOR DEPARTURE RUNWAY ACTIVE 33");
        assert!(landing.is_empty());
        assert_eq!(departing, vec!["33"]);
    }

    #[test]
    fn arrival_runway() {
        let text = "ALL ARRIVALS PLAN RUNWAY 36";
        assert!(fired(text, "arrival runway"));
        let (landing, departing) = resolved(text);
        assert_eq!(landing, vec!["36"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn approach_procedure_runway() {
        let text = "EXPECT APPROACH VIA ILS RWY32L.";
        assert!(fired(text, "approach procedure runway"));
        let (landing, departing) = resolved(text);
        assert_eq!(landing, vec!["32L"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn runway_in_use_takes_cue_from_context() {
        let (landing, departing) = resolved("APCH INFO. RWY 27 IN USE");
        assert_eq!(landing, vec!["27"]);
        assert!(departing.is_empty());

        let (landing, departing) = resolved("DEP FREQ 121.9. RWY 09 IN USE");
        assert!(landing.is_empty());
        assert_eq!(departing, vec!["09"]);
    }

    #[test]
    fn use_runway_is_landing() {
        let (landing, departing) = resolved("RJAA ATIS A. IN USE RWY 34R.");
        assert_eq!(landing, vec!["34R"]);
        assert!(departing.is_empty());

        let (landing, departing) = resolved("EXPECT ILS APPROACH. USE RWY 16R.");
        assert_eq!(landing, vec!["16R"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn use_runway_keeps_a_named_role() {
        let (landing, departing) = resolved("DEPS IN USE RWY 1L AND 1R");
        assert!(landing.is_empty());
        assert_eq!(departing, vec!["01L", "01R"]);
    }

    #[test]
    fn detached_side_letters() {
        let (landing, departing) = resolved("LDG RWY 27 L AND 27 R");
        assert_eq!(landing, vec!["27L", "27R"]);
        assert!(departing.is_empty());
    }

    #[test]
    fn preceding_is_char_safe() {
        assert_eq!(preceding("ÄÖÜ RWY", 7, 2), "Ü ");
        assert_eq!(preceding("AB", 2, 100), "AB");
        assert_eq!(preceding("AB", 2, 0), "");
    }
}
