//! Weather scrubbing.
//!
//! ATIS bodies carry METAR-style groups whose digits look a lot like runway
//! numbers (`09012KT` is not runway 09). Everything here runs before any rule
//! sees the text.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    // A METAR/SPECI appended after the broadcast proper, through end of text.
    static ref INLINE_METAR: Regex =
        Regex::new(r"(?s)\.\s*(?:METAR|SPECI)\s+\d{6}Z.*$").unwrap();
    static ref REMARKS: Regex = Regex::new(r"(?s)\s+RMK\s+.*$").unwrap();

    // A trend section runs until the next runway keyword or end of text.
    static ref TREND: Regex = Regex::new(r"\b(?:NOSIG|BECMG|TEMPO)\b").unwrap();
    static ref TREND_END: Regex = Regex::new(r"\b(?:LDG|ARR|DEP|RWY|LAND|RUNWAY)").unwrap();

    // Order matters: RVR carries a runway number and must go before anything
    // that would eat part of it.
    static ref WEATHER_GROUPS: Vec<Regex> = [
        // Runway visual range: R27L/0800, R09/P2000FT
        r"\bR\d{2}[LRC]?/[PM]?\d{4}(?:V\d{4})?(?:FT)?[UDN]?\b",
        // Wind shear: WS020/27045KT
        r"\bWS\d{3}/\w{3}\d{2}(?:G\d{2,3})?(?:KT|MPS|KM/H)\b",
        // Wind: 09012KT, 27015G25KT, VRB03KT, 24008MPS
        r"\b(?:VRB|\d{3})\d{2}(?:G\d{2,3})?(?:KT|MPS|KM/H)\b",
        // Wind variation: 250V310
        r"\b\d{3}V\d{3}\b",
        // Spoken wind: 270 AT 15, 090@8
        r"\b(?:[0-2]\d{2}|3[0-5]\d|360)\s*(?:AT|@)\s*\d+\b",
        // Observation time: 121856Z, 0718Z
        r"\b\d{4,6}Z\b",
        // Altimeter: A2992, Q1013, QNH1013
        r"\b(?:QNH|[AQ])\s*\d{4}\b",
        // Temperature/dew point: 15/12, M02/M05
        r"\bM?\d{2}/M?\d{2}\b",
        // Visibility: 10SM, P6SM, 1/2SM
        r"\b[PM]?\d+(?:/\d+)?SM\b",
        // Directional visibility: 2000SW
        r"\b\d{4}(?:NE|NW|SE|SW|N|E|S|W)\b",
        // Cloud layers: FEW020, BKN080CB, VV003, CAVOK
        r"\b(?:FEW|SCT|BKN|OVC|VV|CLR|SKC|NSC|NCD|CAVOK)\d{0,3}(?:CB|TCU)?\b",
        // Weather phenomena: -RA, +TSRA, VCSH, BR
        r"[-+]?\b(?:VC)?(?:MI|PR|BC|DR|BL|SH|TS|FZ)?(?:DZ|RA|SN|SG|IC|PL|GR|GS|UP|BR|FG|FU|VA|DU|SA|HZ|PY|PO|SQ|FC|SS|DS)+\b",
    ]
    .iter()
    .map(|re| Regex::new(re).unwrap())
    .collect();

    // Metric visibility, unless it reads as a runway: 9999, 0800
    static ref METRIC_VISIBILITY: Regex = Regex::new(
        r"(?P<rwy>\b(?:RWYS?|RUNWAY)\s)?\b(?:9999|[0-8]\d{3})\b(?P<side>\s*(?:LEFT|RIGHT|CENTER|[LRC])\b)?"
    )
    .unwrap();
}

/// Upper-cases `text` and removes weather groups, trend sections and trailing
/// METAR/remarks blocks.
///
/// Passes repeat until nothing more is removed, so feeding the output back in
/// is a no-op.
pub fn normalize(text: &str) -> String {
    let mut current = text.to_uppercase();
    loop {
        let next = scrub(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn scrub(text: &str) -> String {
    let mut out = INLINE_METAR.replace(text, " ").into_owned();
    out = REMARKS.replace(&out, " ").into_owned();
    out = strip_trends(&out);
    for group in WEATHER_GROUPS.iter() {
        out = group.replace_all(&out, "").into_owned();
    }
    METRIC_VISIBILITY
        .replace_all(&out, |cap: &Captures| {
            if cap.name("rwy").is_some() || cap.name("side").is_some() {
                cap[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

fn strip_trends(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(trend) = TREND.find(rest) {
        out.push_str(&rest[..trend.start()]);
        out.push(' ');
        rest = match TREND_END.find_at(rest, trend.end()) {
            Some(end) => &rest[end.start()..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_the_four_classic_groups() {
        assert_eq!(
            normalize("wind 09012kt vis 10sm temp 15/12 alt a2992"),
            "WIND  VIS  TEMP  ALT "
        );
        assert_eq!(normalize("M02/M05 Q1013"), " ");
    }

    #[test]
    fn keeps_runway_text() {
        assert_eq!(normalize("ldg rwy 27l, dep rwy 28r"), "LDG RWY 27L, DEP RWY 28R");
        assert_eq!(normalize("RWYS 16L/17R"), "RWYS 16L/17R");
    }

    #[test]
    fn drops_trailing_metar_and_remarks() {
        assert_eq!(
            normalize("LDG RWY 22L. METAR 121856Z 27015KT 10SM FEW250"),
            "LDG RWY 22L "
        );
        assert_eq!(normalize("DEP RWY 9 RMK AO2 SLP098\nT01830161"), "DEP RWY 9 ");
    }

    #[test]
    fn strips_rvr_before_it_can_look_like_a_runway() {
        assert_eq!(normalize("R27L/0800 R09/P2000FT LDG 27L"), "  LDG 27L");
    }

    #[test]
    fn strips_trend_sections_up_to_the_runway_keyword() {
        assert_eq!(
            normalize("Q1013 BECMG 4000 -SHRA RWY 27 IN USE"),
            "  RWY 27 IN USE"
        );
        assert_eq!(normalize("LDG RWY 09 NOSIG"), "LDG RWY 09  ");
        assert_eq!(
            normalize("TEMPO 0800 FG DEP RWY 27 TEMPO 3000"),
            " DEP RWY 27  "
        );
    }

    #[test]
    fn strips_clouds_phenomena_and_metric_visibility() {
        assert_eq!(normalize("9999 FEW020 BKN080CB -TSRA BR"), "    ");
        assert_eq!(normalize("2000SW 0800 CAVOK"), "  ");
    }

    #[test]
    fn four_digits_next_to_runway_words_survive() {
        assert_eq!(normalize("RWY 0800"), "RWY 0800");
        assert_eq!(normalize("0800 L"), "0800 L");
    }

    #[test]
    fn strips_spoken_wind_and_wind_shear() {
        assert_eq!(normalize("WIND 270 AT 15. LDG RWY 27"), "WIND . LDG RWY 27");
        assert_eq!(normalize("WS020/27045KT LDG RWY 27"), " LDG RWY 27");
    }

    #[test]
    fn empty_in_empty_out() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn second_pass_is_a_no_op() {
        // Removing the visibility group exposes an altimeter setting.
        let once = normalize("A 5SM 3002 LDG RWY 4");
        assert_eq!(once, normalize(&once));
        assert!(!once.contains("3002"));
    }
}
