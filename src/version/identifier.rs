//! CPython release identifiers (`3.12.4`, `v3.13.0rc1`, ...)

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::version::error::ParseVersionError;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:(a|b|rc)(\d+))?$")
        .expect("version pattern is valid")
});

static RELEASE_LINE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v?(\d+)\.(\d+)$").expect("release line pattern is valid"));

/// Pre-release stage, ordered so that a final release sorts above every
/// pre-release of the same micro version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreKind {
    Alpha,
    Beta,
    ReleaseCandidate,
    Final,
}

impl PreKind {
    fn suffix(self) -> &'static str {
        match self {
            PreKind::Alpha => "a",
            PreKind::Beta => "b",
            PreKind::ReleaseCandidate => "rc",
            PreKind::Final => "",
        }
    }
}

/// A parsed release version.
///
/// Field order matters: the derived ordering compares major, minor, micro,
/// pre-release stage and pre-release number in that order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
    pub pre_kind: PreKind,
    pub pre_number: u32,
}

impl Version {
    /// Creates a final release version
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            pre_kind: PreKind::Final,
            pre_number: 0,
        }
    }

    pub const fn pre_release(major: u32, minor: u32, micro: u32, kind: PreKind, n: u32) -> Self {
        Self {
            major,
            minor,
            micro,
            pre_kind: kind,
            pre_number: n,
        }
    }

    pub fn is_pre_release(&self) -> bool {
        self.pre_kind != PreKind::Final
    }

    /// `MAJOR.MINOR.MICRO` without any pre-release suffix
    pub fn release(&self) -> String {
        format!("{}.{}.{}", self.major, self.minor, self.micro)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)?;
        if self.is_pre_release() {
            write!(f, "{}{}", self.pre_kind.suffix(), self.pre_number)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = ParseVersionError;

    /// Parses `[v]MAJOR[.MINOR[.MICRO]][{a|b|rc}N]`; missing components are zero.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(input.to_string());
        let caps = VERSION_PATTERN.captures(input.trim()).ok_or_else(invalid)?;

        let number = |index: usize| -> Result<u32, ParseVersionError> {
            caps.get(index)
                .map_or(Ok(0), |m| m.as_str().parse().map_err(|_| invalid()))
        };

        let pre_kind = match caps.get(4).map(|m| m.as_str()) {
            Some("a") => PreKind::Alpha,
            Some("b") => PreKind::Beta,
            Some("rc") => PreKind::ReleaseCandidate,
            _ => PreKind::Final,
        };

        Ok(Self {
            major: number(1)?,
            minor: number(2)?,
            micro: number(3)?,
            pre_kind,
            pre_number: number(5)?,
        })
    }
}

/// A `MAJOR.MINOR` pair naming a release line, e.g. `3.12`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseLine {
    pub major: u32,
    pub minor: u32,
}

impl fmt::Display for ReleaseLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ReleaseLine {
    type Err = ParseVersionError;

    /// Accepts exactly `MAJOR.MINOR`; a micro or pre-release component is rejected.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseVersionError(input.to_string());
        let caps = RELEASE_LINE_PATTERN
            .captures(input.trim())
            .ok_or_else(invalid)?;

        Ok(Self {
            major: caps[1].parse().map_err(|_| invalid())?,
            minor: caps[2].parse().map_err(|_| invalid())?,
        })
    }
}
