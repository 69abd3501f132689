//! Price filter grammar
//!
//! Accepted forms (each number is 1 to 7 ASCII digits, one `-` at most):
//! - `N`   exact price
//! - `A-B` inclusive range
//! - `A-`  lower bound only
//! - `-B`  upper bound only

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PRICE_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?P<exact>[0-9]{1,7})|(?P<min>[0-9]{1,7})?-(?P<max>[0-9]{1,7})?)$")
        .expect("price range pattern must compile")
});

/// Parsed price filter.
///
/// `Between` keeps its bounds as given; an inverted range is valid and simply
/// matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    Exact(u32),
    Between(u32, u32),
    AtLeast(u32),
    AtMost(u32),
}

impl PriceRange {
    /// Parse after trimming surrounding whitespace. `None` when the grammar is not met.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = PRICE_RANGE.captures(input.trim())?;
        let number = |name: &str| -> Option<Option<u32>> {
            match caps.name(name) {
                Some(m) => m.as_str().parse::<u32>().ok().map(Some),
                None => Some(None),
            }
        };

        if let Some(exact) = number("exact")? {
            return Some(Self::Exact(exact));
        }
        match (number("min")?, number("max")?) {
            (Some(min), Some(max)) => Some(Self::Between(min, max)),
            (Some(min), None) => Some(Self::AtLeast(min)),
            (None, Some(max)) => Some(Self::AtMost(max)),
            (None, None) => None,
        }
    }

    /// Inclusive `(lower, upper)` bounds; `None` means unbounded.
    pub fn bounds(self) -> (Option<u32>, Option<u32>) {
        match self {
            Self::Exact(n) => (Some(n), Some(n)),
            Self::Between(min, max) => (Some(min), Some(max)),
            Self::AtLeast(min) => (Some(min), None),
            Self::AtMost(max) => (None, Some(max)),
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "{n}"),
            Self::Between(min, max) => write!(f, "{min}-{max}"),
            Self::AtLeast(min) => write!(f, "{min}-"),
            Self::AtMost(max) => write!(f, "-{max}"),
        }
    }
}
