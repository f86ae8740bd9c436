use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::InvalidDesignator;

lazy_static! {
    static ref DESIGNATOR_REGEX: Regex =
        Regex::new(r"^([0-3]?\d)\s*(L(?:EFT)?|R(?:IGHT)?|C(?:ENTER)?)?$").unwrap();
}

// Variant order follows the suffix letters so designators sort like their strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunwaySide {
    Center,
    Left,
    Right,
}

impl RunwaySide {
    pub fn from_word(word: &str) -> Option<Self> {
        match word.trim_start().chars().next()?.to_ascii_uppercase() {
            'L' => Some(RunwaySide::Left),
            'R' => Some(RunwaySide::Right),
            'C' => Some(RunwaySide::Center),
            _ => None,
        }
    }

    pub fn letter(self) -> char {
        match self {
            RunwaySide::Left => 'L',
            RunwaySide::Right => 'R',
            RunwaySide::Center => 'C',
        }
    }
}

/// A canonical runway designator such as `09L` or `27`.
///
/// The number is whatever one or two digits the text carried (`0`..=`39`);
/// it is not checked against the 01-36 compass range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunwayDesignator {
    number: u8,
    side: Option<RunwaySide>,
}

impl RunwayDesignator {
    pub fn new(number: u8, side: Option<RunwaySide>) -> Self {
        RunwayDesignator { number, side }
    }

    pub fn number(self) -> u8 {
        self.number
    }

    pub fn side(self) -> Option<RunwaySide> {
        self.side
    }

    pub(crate) fn from_parts(number: &str, side: Option<&str>) -> Option<Self> {
        let number = number.trim().parse().ok()?;
        let side = match side {
            Some(word) => Some(RunwaySide::from_word(word)?),
            None => None,
        };
        Some(RunwayDesignator { number, side })
    }
}

impl fmt::Display for RunwayDesignator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}", self.number)?;
        if let Some(side) = self.side {
            write!(f, "{}", side.letter())?;
        }
        Ok(())
    }
}

impl FromStr for RunwayDesignator {
    type Err = InvalidDesignator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_uppercase();
        DESIGNATOR_REGEX
            .captures(&raw)
            .and_then(|cap| {
                RunwayDesignator::from_parts(&cap[1], cap.get(2).map(|m| m.as_str()))
            })
            .ok_or_else(|| InvalidDesignator { raw: s.to_string() })
    }
}

impl Serialize for RunwayDesignator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RunwayDesignator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Pads the number to two digits and collapses the suffix word to its letter.
/// Anything that does not look like a runway comes back unchanged.
pub fn normalize_runway(raw: &str) -> String {
    match raw.parse::<RunwayDesignator>() {
        Ok(rwy) => rwy.to_string(),
        Err(_) => raw.to_string(),
    }
}
