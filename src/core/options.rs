// jpg2png/src/core/options.rs
use super::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A pipeline stage a request may ask for.
///
/// Variant order is the canonical execution order: denoise before enhancing
/// (sharpening amplifies residual noise), and size optimization last so
/// compression sees the final pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProcessingOption {
    ReduceNoise,
    ImproveQuality,
    OptimizeSize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptionInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

impl ProcessingOption {
    pub const ALL: [ProcessingOption; 3] = [
        ProcessingOption::ReduceNoise,
        ProcessingOption::ImproveQuality,
        ProcessingOption::OptimizeSize,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ProcessingOption::ReduceNoise => "reduce-noise",
            ProcessingOption::ImproveQuality => "improve-quality",
            ProcessingOption::OptimizeSize => "optimize-size",
        }
    }

    pub fn info(self) -> OptionInfo {
        match self {
            ProcessingOption::ReduceNoise => OptionInfo {
                id: self.id(),
                name: "Reduce noise",
                description: "Removes visual noise from the image",
                category: "quality",
            },
            ProcessingOption::ImproveQuality => OptionInfo {
                id: self.id(),
                name: "Improve quality",
                description: "Improves sharpness and contrast",
                category: "quality",
            },
            ProcessingOption::OptimizeSize => OptionInfo {
                id: self.id(),
                name: "Optimize size",
                description: "Reduces file size while keeping visual quality",
                category: "optimization",
            },
        }
    }

    /// Every option with its display information, in canonical order.
    pub fn catalogue() -> Vec<OptionInfo> {
        Self::ALL.iter().map(|option| option.info()).collect()
    }
}

impl fmt::Display for ProcessingOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ProcessingOption {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.id() == s.trim())
            .ok_or_else(|| ConvertError::InvalidParameter(format!("Unknown processing option: {s}")))
    }
}

/// Requested stages. Membership only; iteration is always canonical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProcessingOptions(BTreeSet<ProcessingOption>);

impl ProcessingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        ProcessingOption::ALL.into_iter().collect()
    }

    pub fn with(mut self, option: ProcessingOption) -> Self {
        self.0.insert(option);
        self
    }

    pub fn contains(&self, option: ProcessingOption) -> bool {
        self.0.contains(&option)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = ProcessingOption> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<ProcessingOption> {
        self.iter().collect()
    }

    /// Parses option identifiers, rejecting anything outside the known set.
    pub fn parse<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|id| id.as_ref().parse::<ProcessingOption>())
            .collect()
    }
}

impl FromIterator<ProcessingOption> for ProcessingOptions {
    fn from_iter<T: IntoIterator<Item = ProcessingOption>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
