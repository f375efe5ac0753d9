//! Institution settings used by the templates
//!
//! Several templates stamp the owning institution onto the nodes they build
//! (identifier sources, role vocabularies, the shelf address of physical
//! items). These values are configuration, not data, so they live here.

use crate::core::error::{PbcoreError, PbcoreResult};

/// Default institution name
pub const DEFAULT_INSTITUTION: &str = "Rock and Roll Hall of Fame and Museum";
/// Default vocabulary for creator and contributor roles
pub const DEFAULT_RELATOR: &str = "MARC relator terms";
/// Default postal address for physical instantiations
pub const DEFAULT_ADDRESS: &str = "Rock and Roll Hall of Fame and Museum,\n2809 Woodland Ave.,\nCleveland, OH, 44115\n216-515-1956\nlibrary@rockhall.org";

/// Values stamped onto template output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TemplateSettings {
    /// `source` of institution-issued identifiers
    pub institution: String,
    /// `source` of creator and contributor roles
    pub relator: String,
    /// Location text of physical instantiations
    pub address: String,
}

impl TemplateSettings {
    /// Create settings for an institution, keeping the default relator and address
    pub fn new(institution: impl Into<String>) -> Self {
        Self {
            institution: institution.into(),
            ..Self::default()
        }
    }

    /// Builder: set the role vocabulary
    pub fn with_relator(mut self, relator: impl Into<String>) -> Self {
        self.relator = relator.into();
        self
    }

    /// Builder: set the postal address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Reject settings that would produce attribute-less identifiers
    pub fn validate(&self) -> PbcoreResult<()> {
        if self.institution.trim().is_empty() {
            return Err(PbcoreError::ConfigError(
                "institution must not be empty".to_string(),
            ));
        }
        if self.relator.trim().is_empty() {
            return Err(PbcoreError::ConfigError(
                "relator must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load settings from JSON; missing keys fall back to defaults
    ///
    /// ```rust
    /// use pbcorekit::TemplateSettings;
    ///
    /// let settings = TemplateSettings::from_json(r#"{"institution": "WGBH"}"#).unwrap();
    /// assert_eq!(settings.institution, "WGBH");
    /// assert_eq!(settings.relator, "MARC relator terms");
    /// ```
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> PbcoreResult<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| PbcoreError::ConfigError(format!("Invalid template settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            institution: DEFAULT_INSTITUTION.to_string(),
            relator: DEFAULT_RELATOR.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
        }
    }
}
