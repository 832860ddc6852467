//! Attribute schemas the host uses to validate configuration blocks.

use serde::{Deserialize, Serialize};

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// A UTF-8 string.
    String,
}

/// Declaration of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSchema {
    /// Attribute name as written in configuration.
    pub name: &'static str,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: AttributeType,
    /// Must be set by the user (directly or through `env_var`).
    pub required: bool,
    /// May be set by the user.
    pub optional: bool,
    /// Filled in by the provider.
    pub computed: bool,
    /// Must be hidden in plans and logs.
    pub sensitive: bool,
    /// Environment variable consulted when the attribute is unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_var: Option<&'static str>,
    /// Value used when neither the attribute nor `env_var` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    /// Human-readable description.
    pub description: String,
}

impl AttributeSchema {
    /// A required string attribute.
    pub fn required(name: &'static str, description: impl Into<String>) -> Self {
        Self::string(name, description).with_flags(true, false, false)
    }

    /// An optional string attribute.
    pub fn optional(name: &'static str, description: impl Into<String>) -> Self {
        Self::string(name, description).with_flags(false, true, false)
    }

    /// A string attribute set only by the provider.
    pub fn computed(name: &'static str, description: impl Into<String>) -> Self {
        Self::string(name, description).with_flags(false, false, true)
    }

    /// Mark the attribute as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Fall back to an environment variable.
    pub fn env(mut self, var: &'static str) -> Self {
        self.env_var = Some(var);
        self
    }

    /// Fall back to a fixed value.
    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    fn string(name: &'static str, description: impl Into<String>) -> Self {
        Self {
            name,
            kind: AttributeType::String,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            env_var: None,
            default: None,
            description: description.into(),
        }
    }

    fn with_flags(mut self, required: bool, optional: bool, computed: bool) -> Self {
        self.required = required;
        self.optional = optional;
        self.computed = computed;
        self
    }
}

/// Schema of a provider block or a resource type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Attributes in declaration order.
    pub attributes: Vec<AttributeSchema>,
}

impl Schema {
    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        self.attributes.iter().find(|a| a.name == name)
    }
}
