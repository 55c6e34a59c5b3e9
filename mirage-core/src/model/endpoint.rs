use crate::error::UnknownModel;
use crate::utils::{LUCY_ENDPOINT, MIRAGE_ENDPOINT};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Remote transformation model the session talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// World-style restyling of the whole scene.
    #[default]
    Mirage,
    /// Edit-style instructions applied to the subject.
    Lucy,
}

impl ModelChoice {
    pub fn from_use_lucy(use_lucy: bool) -> Self {
        if use_lucy { Self::Lucy } else { Self::Mirage }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Mirage => "Mirage",
            Self::Lucy => "Lucy",
        }
    }

    pub fn default_url(&self) -> &'static str {
        match self {
            Self::Mirage => MIRAGE_ENDPOINT,
            Self::Lucy => LUCY_ENDPOINT,
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelChoice {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mirage" => Ok(Self::Mirage),
            "lucy" => Ok(Self::Lucy),
            _ => Err(UnknownModel(s.to_owned())),
        }
    }
}

/// Signaling URL paired with the model it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalingEndpoint {
    pub url: String,
    pub model: ModelChoice,
}

impl SignalingEndpoint {
    pub fn new(url: impl Into<String>, model: ModelChoice) -> Self {
        Self {
            url: url.into(),
            model,
        }
    }

    pub fn default_for(model: ModelChoice) -> Self {
        Self::new(model.default_url(), model)
    }
}
