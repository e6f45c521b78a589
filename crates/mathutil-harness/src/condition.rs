//! Enablement conditions evaluated before a case runs

use semver::{Comparator, Op, Prerelease, Version, VersionReq};
use std::fmt;
use std::str::FromStr;

/// Host operating system
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Os {
    Linux,
    MacOs,
    Windows,
    FreeBsd,
    Other(String),
}

impl Os {
    /// The operating system this binary was compiled for.
    pub fn current() -> Self {
        Self::from_name(std::env::consts::OS)
    }

    fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "linux" => Os::Linux,
            "macos" | "mac" | "darwin" => Os::MacOs,
            "windows" | "win" => Os::Windows,
            "freebsd" => Os::FreeBsd,
            other => Os::Other(other.to_string()),
        }
    }
}

impl FromStr for Os {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Os::Linux => write!(f, "linux"),
            Os::MacOs => write!(f, "macos"),
            Os::Windows => write!(f, "windows"),
            Os::FreeBsd => write!(f, "freebsd"),
            Os::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Parse a runtime version, accepting `1` and `1.70` shorthands.
pub fn parse_runtime_version(text: &str) -> Result<Version, semver::Error> {
    let text = text.trim();
    match text.matches('.').count() {
        0 => Version::parse(&format!("{}.0.0", text)),
        1 => Version::parse(&format!("{}.0", text)),
        _ => Version::parse(text),
    }
}

/// Facts about the host that conditions are evaluated against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub os: Os,
    /// The Rust toolchain version the workspace targets
    pub runtime: Version,
}

impl Environment {
    pub fn new(os: Os, runtime: Version) -> Self {
        Self { os, runtime }
    }

    /// Detect the host OS and the workspace's `rust-version`.
    pub fn detect() -> Self {
        let runtime = option_env!("CARGO_PKG_RUST_VERSION")
            .and_then(|v| parse_runtime_version(v).ok())
            .unwrap_or_else(|| Version::new(0, 0, 0));
        Self::new(Os::current(), runtime)
    }

    pub fn with_runtime(mut self, runtime: Version) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_os(mut self, os: Os) -> Self {
        self.os = os;
        self
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::detect()
    }
}

/// A predicate that must hold for a case to run
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Never run
    Disabled { reason: Option<String> },
    /// Run only on one of these operating systems
    EnabledOnOs(Vec<Os>),
    /// Run only when the runtime version matches
    EnabledOnRuntime(VersionReq),
}

impl Condition {
    pub fn disabled() -> Self {
        Condition::Disabled { reason: None }
    }

    pub fn on_os(systems: impl IntoIterator<Item = Os>) -> Self {
        Condition::EnabledOnOs(systems.into_iter().collect())
    }

    /// Runtime in `[min, below)`.
    pub fn runtime_range(min: Version, below: Version) -> Self {
        let bound = |op, v: Version| Comparator {
            op,
            major: v.major,
            minor: Some(v.minor),
            patch: Some(v.patch),
            pre: Prerelease::EMPTY,
        };
        Condition::EnabledOnRuntime(VersionReq {
            comparators: vec![bound(Op::GreaterEq, min), bound(Op::Less, below)],
        })
    }

    /// `None` if the case may run, otherwise the reason it is skipped.
    pub fn skip_reason(&self, env: &Environment) -> Option<String> {
        match self {
            Condition::Disabled { reason } => {
                Some(reason.clone().unwrap_or_else(|| "disabled".to_string()))
            }
            Condition::EnabledOnOs(systems) => {
                if systems.contains(&env.os) {
                    None
                } else {
                    Some(format!("Disabled on operating system: {}", env.os))
                }
            }
            Condition::EnabledOnRuntime(req) => {
                if req.matches(&env.runtime) {
                    None
                } else {
                    Some(format!(
                        "Disabled on runtime version: {} (requires {})",
                        env.runtime, req
                    ))
                }
            }
        }
    }
}

/// First unmet condition wins.
pub(crate) fn first_skip_reason(conditions: &[Condition], env: &Environment) -> Option<String> {
    conditions.iter().find_map(|c| c.skip_reason(env))
}
