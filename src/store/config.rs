use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// When a newly registered subscriber is called with the current value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Immediate {
    /// Every successful registration fires once right away.
    #[default]
    Always,
    /// Fire only when the caller asks for it with
    /// [`Subscribe::subscribe_immediate`](crate::Subscribe::subscribe_immediate).
    OnRequest,
    /// Never fire on registration.
    Never,
}

impl Immediate {
    /// Whether a registration with the given per-call request fires.
    pub fn fires(self, requested: bool) -> bool {
        match self {
            Immediate::Always => true,
            Immediate::OnRequest => requested,
            Immediate::Never => false,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Immediate::Always => "always",
            Immediate::OnRequest => "on-request",
            Immediate::Never => "never",
        }
    }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Immediate {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "always" => Ok(Immediate::Always),
            "on-request" | "on_request" => Ok(Immediate::OnRequest),
            "never" => Ok(Immediate::Never),
            _ => Err(ConfigError::UnknownImmediate(s.to_string())),
        }
    }
}

/// Settings copied into every store a factory builds.
///
/// # Examples
///
/// ```
/// use storekit::{Immediate, StoreConfig};
///
/// let config = StoreConfig::default().immediate(Immediate::Never);
/// assert_eq!(config.immediate, Immediate::Never);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "kebab-case"))]
pub struct StoreConfig {
    /// Immediate-fire policy for new subscribers.
    pub immediate: Immediate,
}

impl StoreConfig {
    /// Set the immediate-fire policy.
    pub fn immediate(mut self, immediate: Immediate) -> Self {
        self.immediate = immediate;
        self
    }
}
