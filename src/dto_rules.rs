//! Request-body inference rules.
//!
//! A write operation (POST, PUT, PATCH) is linked to a DTO schema by walking an ordered rule
//! list. A rule fires when its matcher accepts the route *and* the DTO it names exists in the
//! scanned model; otherwise the next rule is tried. Rules are plain data and can be loaded from
//! a YAML or JSON file:
//!
//! ```yaml
//! rules:
//!   - path_contains: booking
//!     dto: BookingPickupDTO
//!   - controller: partner
//!     dto: RequestPickupDTO
//! ```

use crate::error::{Error, Result};
use crate::extractor::{Dto, Route};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// What a rule looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatcher {
    /// Case-insensitive substring of the route path
    PathContains(String),
    /// Exact controller name
    Controller(String),
}

/// One rule: matcher plus the DTO it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleDefinition", into = "RuleDefinition")]
pub struct DtoRule {
    pub matcher: RuleMatcher,
    pub dto: String,
}

/// Serialized shape of a rule; exactly one matcher key must be present.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RuleDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path_contains: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    controller: Option<String>,
    dto: String,
}

impl TryFrom<RuleDefinition> for DtoRule {
    type Error = Error;

    fn try_from(def: RuleDefinition) -> Result<Self> {
        let matcher = match (def.path_contains, def.controller) {
            (Some(fragment), None) => RuleMatcher::PathContains(fragment.to_lowercase()),
            (None, Some(controller)) => RuleMatcher::Controller(controller),
            (Some(_), Some(_)) => {
                return Err(Error::InvalidRules(format!(
                    "rule for {} sets both path_contains and controller",
                    def.dto
                )))
            }
            (None, None) => {
                return Err(Error::InvalidRules(format!(
                    "rule for {} needs path_contains or controller",
                    def.dto
                )))
            }
        };

        Ok(DtoRule { matcher, dto: def.dto })
    }
}

impl From<DtoRule> for RuleDefinition {
    fn from(rule: DtoRule) -> Self {
        let (path_contains, controller) = match rule.matcher {
            RuleMatcher::PathContains(fragment) => (Some(fragment), None),
            RuleMatcher::Controller(controller) => (None, Some(controller)),
        };
        RuleDefinition {
            path_contains,
            controller,
            dto: rule.dto,
        }
    }
}

impl DtoRule {
    pub fn path_contains(fragment: &str, dto: &str) -> Self {
        Self {
            matcher: RuleMatcher::PathContains(fragment.to_lowercase()),
            dto: dto.to_string(),
        }
    }

    pub fn controller(controller: &str, dto: &str) -> Self {
        Self {
            matcher: RuleMatcher::Controller(controller.to_string()),
            dto: dto.to_string(),
        }
    }

    /// Whether the matcher accepts the route, regardless of DTO availability.
    pub fn matches(&self, route: &Route) -> bool {
        match &self.matcher {
            RuleMatcher::PathContains(fragment) => route.path.to_lowercase().contains(fragment.as_str()),
            RuleMatcher::Controller(controller) => route.controller.as_deref() == Some(controller.as_str()),
        }
    }
}

/// Ordered list of inference rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtoRuleSet {
    pub rules: Vec<DtoRule>,
}

impl Default for DtoRuleSet {
    /// Built-in table: path fragments first, then controller names.
    fn default() -> Self {
        Self {
            rules: vec![
                DtoRule::path_contains("request", "RequestPickupDTO"),
                DtoRule::path_contains("booking", "BookingPickupDTO"),
                DtoRule::path_contains("confirm", "ConfirmPickupDTO"),
                DtoRule::path_contains("cancel", "CancelPickupDTO"),
                DtoRule::path_contains("tiktok", "TikTokRequestPickupDTO"),
                DtoRule::path_contains("lazada", "LazadaRequestPickupDTO"),
                DtoRule::controller("partner", "RequestPickupDTO"),
                DtoRule::controller("tiktok", "TikTokRequestPickupDTO"),
            ],
        }
    }
}

impl DtoRuleSet {
    pub fn new(rules: Vec<DtoRule>) -> Self {
        Self { rules }
    }

    /// An empty rule set: every request body falls back to an inline object.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Parse rules from YAML (JSON is accepted as well, being a YAML subset).
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let rules: DtoRuleSet = serde_yaml::from_str(text)?;
        Ok(rules)
    }

    /// Load rules from a YAML or JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading DTO rules from {}", path.display());
        let text = fs::read_to_string(path)?;
        let rules = Self::from_yaml_str(&text)?;
        debug!("Loaded {} DTO rules", rules.rules.len());
        Ok(rules)
    }

    /// Name of the DTO the first applicable rule points to, if any.
    pub fn resolve<'a>(&'a self, route: &Route, dtos: &IndexMap<String, Dto>) -> Option<&'a str> {
        self.rules
            .iter()
            .find(|rule| rule.matches(route) && dtos.contains_key(&rule.dto))
            .map(|rule| rule.dto.as_str())
    }
}
