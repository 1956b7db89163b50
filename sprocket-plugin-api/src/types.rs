//! Plugin metadata structures

use serde::Serialize;
use serde_json::Value;

use crate::error::PluginError;

/// Metadata for one plugin, read from its descriptor file.
///
/// The descriptor is a JSON object whose keys are all optional:
///
/// ```json
/// {"title": "Hello", "author": "Jane", "authorURL": "https://example.org",
///  "description": "Says hello", "version": "1.0"}
/// ```
///
/// `name` is not part of the document; it is the plugin's directory name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginDescriptor {
    /// Plugin name (directory name and unique key)
    #[serde(skip)]
    pub name: String,
    /// Human-readable title
    pub title: String,
    /// Plugin author
    pub author: String,
    /// Author homepage
    #[serde(rename = "authorURL")]
    pub author_url: String,
    /// Human-readable description
    pub description: String,
    /// Plugin version, free-form
    pub version: String,
}

impl PluginDescriptor {
    /// Descriptor with every metadata field empty.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse raw descriptor file contents.
    ///
    /// Keys that are missing, empty, or not strings become `""`. Content that
    /// is not UTF-8 JSON or not an object is an error; callers decide whether
    /// to degrade.
    pub fn parse(
        name: impl Into<String>,
        contents: impl AsRef<[u8]>,
    ) -> Result<Self, PluginError> {
        let doc: Value = serde_json::from_slice(contents.as_ref())?;
        let Value::Object(fields) = doc else {
            return Err(PluginError::Json(
                "descriptor must be a JSON object".to_string(),
            ));
        };

        let field = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Ok(Self {
            name: name.into(),
            title: field("title"),
            author: field("author"),
            author_url: field("authorURL"),
            description: field("description"),
            version: field("version"),
        })
    }
}
