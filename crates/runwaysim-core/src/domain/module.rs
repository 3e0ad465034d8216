//! Project modules and team roster.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Work category of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Frontend,
    Backend,
    Data,
    Infra,
    Business,
    Legal,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Frontend,
        Category::Backend,
        Category::Data,
        Category::Infra,
        Category::Business,
        Category::Legal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Frontend => "frontend",
            Category::Backend => "backend",
            Category::Data => "data",
            Category::Infra => "infra",
            Category::Business => "business",
            Category::Legal => "legal",
        }
    }

    /// Lenient parse: anything unrecognised becomes [`Category::Backend`].
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Category::Backend)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}

/// Team role. Shares its vocabulary with [`Category`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Frontend,
    Backend,
    Data,
    Infra,
    Business,
    Legal,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Frontend => "frontend",
            Role::Backend => "backend",
            Role::Data => "data",
            Role::Infra => "infra",
            Role::Business => "business",
            Role::Legal => "legal",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seniority of a team member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Junior,
    Mid,
    Senior,
}

/// A single person on the team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: Role,
    pub level: Level,
}

impl TeamMember {
    pub fn new(name: impl Into<String>, role: Role, level: Level) -> Self {
        Self {
            name: name.into(),
            role,
            level,
        }
    }
}

/// One unit of project work.
///
/// Deserialization is lenient the same way the intake layer is: an unknown
/// category becomes `backend`, and a complexity or uncertainty outside
/// `1..=5` becomes `3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(deserialize_with = "lenient_category")]
    pub category: Category,
    #[serde(deserialize_with = "lenient_score")]
    pub complexity: u8,
    #[serde(deserialize_with = "lenient_score")]
    pub uncertainty: u8,
    #[serde(default)]
    pub external_dependencies: Vec<String>,
    #[serde(default)]
    pub risk_drivers: Vec<String>,
    /// Ids of modules this one waits on. `None` lets the resolver decide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<String>>,
}

impl Module {
    /// Build a module with no tags and no explicit dependencies.
    pub fn new(id: impl Into<String>, category: Category, complexity: u8, uncertainty: u8) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category,
            complexity: normalize_score(i64::from(complexity)),
            uncertainty: normalize_score(i64::from(uncertainty)),
            external_dependencies: Vec::new(),
            risk_drivers: Vec::new(),
            dependencies: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_external_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.external_dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_risk_drivers<I, S>(mut self, drivers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.risk_drivers = drivers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(deps.into_iter().map(Into::into).collect());
        self
    }

    /// Declared dependency ids, empty when none are set.
    pub fn dependency_ids(&self) -> &[String] {
        self.dependencies.as_deref().unwrap_or(&[])
    }

    pub fn has_explicit_dependencies(&self) -> bool {
        !self.dependency_ids().is_empty()
    }
}

/// Map an out-of-range 1–5 score to the neutral value 3.
pub fn normalize_score(raw: i64) -> u8 {
    match raw {
        1..=5 => raw as u8,
        _ => 3,
    }
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(raw
        .as_str()
        .map(Category::parse_lenient)
        .unwrap_or(Category::Backend))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    let parsed = match &raw {
        serde_json::Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(parsed.map(normalize_score).unwrap_or(3))
}
