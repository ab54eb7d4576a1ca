//! Representation options
//!
//! Callers at the transport boundary pass a comma-separated option list
//! (`options=keyValues,append`). [`OptionSet`] is its parsed form; it selects
//! the representation converters and the append-only write path.

use std::fmt;
use std::str::FromStr;

/// A single representation option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Opt {
    /// Flat `{id, type, name: value}` representation
    KeyValues,
    /// Bare array of attribute values
    Values,
    /// Report the number of matches
    Count,
    /// Drop repeated values
    Unique,
    /// Strict append: fail on attributes that already exist
    Append,
}

impl Opt {
    /// All options, in bit order
    pub const ALL: [Opt; 5] = [Opt::KeyValues, Opt::Values, Opt::Count, Opt::Unique, Opt::Append];

    /// Name as written in option lists
    pub fn as_str(self) -> &'static str {
        match self {
            Opt::KeyValues => "keyValues",
            Opt::Values => "values",
            Opt::Count => "count",
            Opt::Unique => "unique",
            Opt::Append => "append",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Opt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an option name that is not recognised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOpt(pub String);

impl fmt::Display for UnknownOpt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOpt {}

impl FromStr for Opt {
    type Err = UnknownOpt;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Opt::ALL
            .into_iter()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| UnknownOpt(s.to_string()))
    }
}

/// Set of options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct OptionSet(u8);

impl OptionSet {
    /// Empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option (builder pattern)
    pub fn with(mut self, opt: Opt) -> Self {
        self.set(opt);
        self
    }

    /// Add an option
    pub fn set(&mut self, opt: Opt) {
        self.0 |= opt.bit();
    }

    /// Whether an option is present
    pub fn get(&self, opt: Opt) -> bool {
        self.0 & opt.bit() != 0
    }

    /// Whether no option is present
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Parse a comma-separated list
    ///
    /// Entries are trimmed; unknown and empty entries are ignored.
    pub fn parse(list: &str) -> Self {
        list.split(',')
            .filter_map(|s| s.trim().parse::<Opt>().ok())
            .fold(Self::new(), Self::with)
    }

    /// Options present, in name order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = Opt::ALL
            .into_iter()
            .filter(|o| self.get(*o))
            .map(Opt::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Display for OptionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(" "))
    }
}

impl FromIterator<Opt> for OptionSet {
    fn from_iter<I: IntoIterator<Item = Opt>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}
