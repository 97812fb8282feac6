//! Grouping keys: protocols, test identifiers and the keys built from them

use serde::{Serialize, Serializer};
use std::fmt;

/// DNS transport variant a result file was recorded with
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    /// Plain DNS over UDP
    Udp,
    /// DNS-over-HTTPS using GET requests
    DohGet,
    /// DNS-over-HTTPS using POST requests
    DohPost,
    /// Any other transport label found in a command line (never charted)
    Other(String),
}

impl Protocol {
    /// Protocols that appear in the comparison charts, in plotting order
    pub fn charted() -> [Protocol; 3] {
        [Protocol::Udp, Protocol::DohGet, Protocol::DohPost]
    }

    /// Label used for grouping and file names (`udp`, `doh-GET`, `doh-POST`)
    pub fn label(&self) -> &str {
        match self {
            Protocol::Udp => "udp",
            Protocol::DohGet => "doh-GET",
            Protocol::DohPost => "doh-POST",
            Protocol::Other(label) => label,
        }
    }

    /// Inverse of [`Protocol::label`]
    pub fn from_label(label: &str) -> Self {
        match label {
            "udp" => Protocol::Udp,
            "doh-GET" => Protocol::DohGet,
            "doh-POST" => Protocol::DohPost,
            other => Protocol::Other(other.to_string()),
        }
    }

    /// Legend text used on charts
    pub fn display_name(&self) -> &str {
        match self {
            Protocol::Udp => "UDP",
            Protocol::DohGet => "HTTPS GET",
            Protocol::DohPost => "HTTPS POST",
            Protocol::Other(label) => label,
        }
    }

    pub fn is_charted(&self) -> bool {
        !matches!(self, Protocol::Other(_))
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Protocol {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// One of the eight fixed benchmark test cases, `test1` through `test8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TestId(u8);

impl TestId {
    /// Number of predefined test cases
    pub const COUNT: u8 = 8;

    /// Create a test id from its number (1-based)
    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::COUNT).contains(&number).then_some(Self(number))
    }

    /// All test ids in ascending order
    pub fn all() -> impl Iterator<Item = TestId> {
        (1..=Self::COUNT).map(TestId)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    /// Identifier as it appears in result paths
    pub fn name(&self) -> String {
        format!("test{}", self.0)
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "test{}", self.0)
    }
}

impl Serialize for TestId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Key every result file is bucketed under
///
/// The resolver is only present when the run was configured with a resolver
/// list; it splits each protocol into one series per resolver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupingKey {
    pub protocol: Protocol,
    pub test: TestId,
    pub resolver: Option<String>,
}

impl GroupingKey {
    pub fn new(protocol: Protocol, test: TestId) -> Self {
        Self { protocol, test, resolver: None }
    }

    pub fn with_resolver(mut self, resolver: impl Into<String>) -> Self {
        self.resolver = Some(resolver.into());
        self
    }

    /// Key after dropping the test element
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            protocol: self.protocol.clone(),
            resolver: self.resolver.clone(),
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolver {
            Some(resolver) => write!(f, "({}, {}, {})", self.protocol, self.test, resolver),
            None => write!(f, "({}, {})", self.protocol, self.test),
        }
    }
}

/// Aggregated series key: protocol, or protocol and resolver
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SeriesKey {
    pub protocol: Protocol,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
}

impl SeriesKey {
    pub fn protocol(protocol: Protocol) -> Self {
        Self { protocol, resolver: None }
    }

    pub fn with_resolver(protocol: Protocol, resolver: impl Into<String>) -> Self {
        Self { protocol, resolver: Some(resolver.into()) }
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resolver {
            Some(resolver) => write!(f, "{}@{}", self.protocol, resolver),
            None => write!(f, "{}", self.protocol),
        }
    }
}
