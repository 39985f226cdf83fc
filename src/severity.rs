//! Severity scale and ordered range queries.
//!
//! Ordering is the position of a member in [`OrderedScale::MEMBERS`], never the
//! numeric discriminant, so re-declaring the member list re-orders every
//! relation consistently.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Lazy, restartable sequence of scale members in declaration order.
///
/// Clone the iterator to walk the same range again.
pub type Members<S> = std::iter::Copied<std::slice::Iter<'static, S>>;

/// A closed, linearly ordered enumeration.
pub trait OrderedScale: Copy + PartialEq + 'static {
    /// Every member, in ascending order.
    const MEMBERS: &'static [Self];

    /// Position of `self` in [`Self::MEMBERS`].
    fn ordinal(self) -> usize {
        Self::MEMBERS
            .iter()
            .position(|member| *member == self)
            .unwrap_or(Self::MEMBERS.len())
    }

    fn compare(self, other: Self) -> Ordering {
        self.ordinal().cmp(&other.ordinal())
    }

    fn lowest() -> Option<Self> {
        Self::MEMBERS.first().copied()
    }

    fn highest() -> Option<Self> {
        Self::MEMBERS.last().copied()
    }
}

fn slice<S: OrderedScale>(start: usize, end: usize) -> Members<S> {
    let len = S::MEMBERS.len();
    let end = end.min(len);
    let start = start.min(end);
    S::MEMBERS[start..end].iter().copied()
}

/// Members strictly after `pivot`.
pub fn all_greater_than<S: OrderedScale>(pivot: S) -> Members<S> {
    slice(pivot.ordinal() + 1, S::MEMBERS.len())
}

/// `pivot` and every member after it.
pub fn all_greater_or_equal<S: OrderedScale>(pivot: S) -> Members<S> {
    slice(pivot.ordinal(), S::MEMBERS.len())
}

/// Members strictly before `pivot`.
pub fn all_less_than<S: OrderedScale>(pivot: S) -> Members<S> {
    slice(0, pivot.ordinal())
}

/// Every member up to and including `pivot`.
pub fn all_less_or_equal<S: OrderedScale>(pivot: S) -> Members<S> {
    slice(0, pivot.ordinal() + 1)
}

/// Members between `min` and `max`, both inclusive. Empty when `min > max`.
pub fn all_between<S: OrderedScale>(min: S, max: S) -> Members<S> {
    slice(min.ordinal(), max.ordinal() + 1)
}

/// Outcome severity of a validation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; passing results carry this level
    Info,
    /// The lowest failing level
    #[serde(alias = "warn")]
    Warning,
    /// Rule faults and unresolved markers land here
    Error,
}

impl OrderedScale for Severity {
    const MEMBERS: &'static [Self] = &[Severity::Info, Severity::Warning, Severity::Error];
}

impl Severity {
    /// Level assigned to a failure that does not name its own severity.
    pub const LOWEST_FAILING: Severity = Severity::Warning;

    /// Top of the scale.
    pub fn highest() -> Severity {
        <Severity as OrderedScale>::highest().unwrap_or(Severity::Error)
    }

    pub fn is_failing(self) -> bool {
        self >= Severity::LOWEST_FAILING
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(*other)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!(
                "Unknown severity: '{}'. Valid severities: info, warning, error",
                s
            )),
        }
    }
}
