//! Rol de la parte que ejecuta un task y stage del pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guest,
    Host,
    Arbiter,
    Local,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Guest, Role::Host, Role::Arbiter, Role::Local];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "guest",
            Role::Host => "host",
            Role::Arbiter => "arbiter",
            Role::Local => "local",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Train,
    Predict,
    CrossValidation,
    Default,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Train, Stage::Predict, Stage::CrossValidation, Stage::Default];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Train => "train",
            Stage::Predict => "predict",
            Stage::CrossValidation => "cross_validation",
            Stage::Default => "default",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL.into_iter()
                 .find(|r| r.as_str() == s.trim().to_ascii_lowercase())
                 .ok_or_else(|| format!("unknown role `{s}`"))
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL.into_iter()
                  .find(|st| st.as_str() == s.trim().to_ascii_lowercase())
                  .ok_or_else(|| format!("unknown stage `{s}`"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_and_stage_parse_case_insensitive() {
        assert_eq!("Guest".parse::<Role>().unwrap(), Role::Guest);
        assert_eq!(" arbiter ".parse::<Role>().unwrap(), Role::Arbiter);
        assert_eq!("cross_validation".parse::<Stage>().unwrap(), Stage::CrossValidation);
        assert!("party".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Role::Host).unwrap(), "\"host\"");
        assert_eq!(serde_json::to_string(&Stage::CrossValidation).unwrap(), "\"cross_validation\"");
        let st: Stage = serde_json::from_str("\"predict\"").unwrap();
        assert_eq!(st, Stage::Predict);
    }
}
