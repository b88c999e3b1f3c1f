//! Age policies: a threshold in whole years and a comparison direction.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Which side of the threshold satisfies the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
  /// Satisfied when the calendar age is at least the threshold.
  AtLeast,
  /// Satisfied when the calendar age is strictly below the threshold.
  Under,
}

impl PolicyKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::AtLeast => "at_least",
      Self::Under => "under",
    }
  }
}

impl fmt::Display for PolicyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PolicyKind {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "at_least" | "at-least" | "atleast" => Ok(Self::AtLeast),
      "under" => Ok(Self::Under),
      other => Err(Error::UnknownPolicyKind(other.to_string())),
    }
  }
}

/// An age-eligibility rule, e.g. "at least 21" or "under 18".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Policy {
  pub kind:            PolicyKind,
  pub threshold_years: u32,
}

impl Policy {
  /// The over-21 rule.
  pub const OVER_21: Policy = Policy::at_least(21);
  /// The under-18 rule.
  pub const UNDER_18: Policy = Policy::under(18);

  pub const fn at_least(threshold_years: u32) -> Self {
    Self {
      kind: PolicyKind::AtLeast,
      threshold_years,
    }
  }

  pub const fn under(threshold_years: u32) -> Self {
    Self {
      kind: PolicyKind::Under,
      threshold_years,
    }
  }

  /// Named presets accepted by [`Policy::from_str`].
  pub fn presets() -> [(&'static str, Policy); 2] {
    [("over21", Self::OVER_21), ("under18", Self::UNDER_18)]
  }

  /// Short stable label: `over_21` for `at_least(21)`, `under_18` for
  /// `under(18)`.
  pub fn label(&self) -> String {
    match self.kind {
      PolicyKind::AtLeast => format!("over_{}", self.threshold_years),
      PolicyKind::Under => format!("under_{}", self.threshold_years),
    }
  }

  /// Whether a calendar age satisfies this policy.
  pub fn admits(&self, age_years: u32) -> bool {
    match self.kind {
      PolicyKind::AtLeast => age_years >= self.threshold_years,
      PolicyKind::Under => age_years < self.threshold_years,
    }
  }
}

impl fmt::Display for Policy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.kind, self.threshold_years)
  }
}

/// Accepts a preset name (`over21`, `under18`) or `<kind>:<years>`
/// (`at_least:21`, `under:18`).
impl FromStr for Policy {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    if let Some((_, policy)) = Self::presets()
      .into_iter()
      .find(|(name, _)| name.eq_ignore_ascii_case(s))
    {
      return Ok(policy);
    }

    let (kind, years) = s
      .split_once(':')
      .ok_or_else(|| Error::UnknownPolicyKind(s.to_string()))?;
    let kind: PolicyKind = kind.parse()?;
    let threshold_years = years
      .trim()
      .parse::<u32>()
      .map_err(|_| Error::InvalidThreshold(years.trim().to_string()))?;

    Ok(Self {
      kind,
      threshold_years,
    })
  }
}
