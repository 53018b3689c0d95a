//! Parsed user-agent results, as returned by a parser under test.

use serde::{Deserialize, Serialize};

/// Family reported when nothing more specific matched.
pub const OTHER_FAMILY: &str = "Other";

/// Browser (or other client) identified in a user-agent string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    pub family: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
}

/// Operating system identified in a user-agent string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Os {
    pub family: String,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub patch: Option<String>,
    pub patch_minor: Option<String>,
}

/// Device identified in a user-agent string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub family: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

/// Everything a user-agent parser extracts from one input string.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientInfo {
    pub user_agent: UserAgent,
    pub os: Os,
    pub device: Device,
}

impl Default for UserAgent {
    fn default() -> Self {
        UserAgent {
            family: OTHER_FAMILY.to_string(),
            major: None,
            minor: None,
            patch: None,
        }
    }
}

impl Default for Os {
    fn default() -> Self {
        Os {
            family: OTHER_FAMILY.to_string(),
            major: None,
            minor: None,
            patch: None,
            patch_minor: None,
        }
    }
}

impl Default for Device {
    fn default() -> Self {
        Device {
            family: OTHER_FAMILY.to_string(),
            brand: None,
            model: None,
        }
    }
}

impl UserAgent {
    pub fn new(family: impl Into<String>) -> Self {
        UserAgent {
            family: family.into(),
            ..Default::default()
        }
    }

    /// Set major/minor/patch from an iterator of version parts.
    pub fn with_version<'a>(mut self, parts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut parts = parts.into_iter().map(str::to_string);
        self.major = parts.next();
        self.minor = parts.next();
        self.patch = parts.next();
        self
    }
}

impl Os {
    pub fn new(family: impl Into<String>) -> Self {
        Os {
            family: family.into(),
            ..Default::default()
        }
    }

    /// Set major/minor/patch/patch_minor from an iterator of version parts.
    pub fn with_version<'a>(mut self, parts: impl IntoIterator<Item = &'a str>) -> Self {
        let mut parts = parts.into_iter().map(str::to_string);
        self.major = parts.next();
        self.minor = parts.next();
        self.patch = parts.next();
        self.patch_minor = parts.next();
        self
    }
}

impl Device {
    pub fn new(family: impl Into<String>) -> Self {
        Device {
            family: family.into(),
            ..Default::default()
        }
    }

    pub fn with_brand_model(mut self, brand: Option<&str>, model: Option<&str>) -> Self {
        self.brand = brand.map(str::to_string);
        self.model = model.map(str::to_string);
        self
    }
}
