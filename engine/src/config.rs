use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_BASE_URL, ImgModBox,
    image_model::{OpenAIImages, Resolution},
};

#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub organization: Option<String>,
    pub api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            organization: None,
            api_key: api_key.into(),
        }
    }

    /// The organization header value, if one is set.
    pub fn organization(&self) -> Option<&str> {
        self.organization
            .as_deref()
            .map(str::trim)
            .filter(|org| !org.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("organization", &self.organization)
            .field("api_key", &if self.api_key.is_empty() { "" } else { "***" })
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageModelConfig {
    pub credentials: Credentials,
    pub resolution: Resolution,
    /// Sent as `model` when set, otherwise the API picks its default.
    pub model: Option<String>,
    pub base_url: String,
}

impl Default for ImageModelConfig {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            resolution: Resolution::default(),
            model: None,
            base_url: DEFAULT_BASE_URL.into(),
        }
    }
}

impl ImageModelConfig {
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(api_key),
            ..Default::default()
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.credentials.api_key.trim().is_empty()
    }

    pub fn make(&self) -> ImgModBox {
        Box::new(OpenAIImages::new(self))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blank_organization_is_not_sent() {
        let mut creds = Credentials::new("sk-test");
        assert_eq!(creds.organization(), None);

        creds.organization = Some("   ".into());
        assert_eq!(creds.organization(), None);

        creds.organization = Some(" Personal ".into());
        assert_eq!(creds.organization(), Some("Personal"));
    }

    #[test]
    fn debug_hides_api_key() {
        let creds = Credentials::new("sk-very-secret");
        assert!(!format!("{creds:?}").contains("sk-very-secret"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: ImageModelConfig =
            serde_json::from_str(r#"{"credentials":{"organization":null,"api_key":"sk-x"}}"#)
                .unwrap();
        assert_eq!(cfg.resolution, Resolution::Medium);
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.has_api_key());
        assert!(!ImageModelConfig::default().has_api_key());
    }
}
