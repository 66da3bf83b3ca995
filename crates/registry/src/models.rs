use std::collections::BTreeSet;

use selftape_types::{NavItemTemplate, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dynamic_path::has_placeholders;

/// The compiled-in master catalog.
pub const EMBEDDED_CATALOG: &str = include_str!("../catalog/navigation.json");

/// Errors raised while loading or validating a template catalog.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate template id '{0}'")]
    DuplicateId(String),
    #[error("template id '{id}' does not match its path '{path}'")]
    IdPathMismatch { id: String, path: String },
    #[error("template '{0}' lists no eligible roles")]
    NoEligibleRoles(String),
    #[error("template '{id}' declares isDynamic={declared} but its path disagrees")]
    DynamicMismatch { id: String, declared: bool },
    #[error("template '{0}' references an empty flag name")]
    EmptyFlagName(String),
}

/// The master template registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRegistry {
    /// Catalog version; bumped whenever templates are added, removed or changed.
    pub version: u32,
    /// Every navigation entry in catalog order.
    pub templates: Vec<NavItemTemplate>,
}

impl TemplateRegistry {
    /// Loads the catalog embedded at compile time.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selftape_registry::TemplateRegistry;
    ///
    /// let registry = TemplateRegistry::embedded().expect("load embedded catalog");
    /// println!("catalog v{} with {} templates", registry.version, registry.templates.len());
    /// ```
    pub fn embedded() -> Result<Self, RegistryError> {
        Self::from_json_str(EMBEDDED_CATALOG)
    }

    pub fn from_json_str(content: &str) -> Result<Self, RegistryError> {
        let registry: TemplateRegistry = serde_json::from_str(content)?;
        registry.validate()?;
        debug!(version = registry.version, templates = registry.templates.len(), "loaded navigation catalog");
        Ok(registry)
    }

    /// Builds a registry from templates, validating them the same way the
    /// embedded catalog is validated.
    pub fn new(version: u32, templates: Vec<NavItemTemplate>) -> Result<Self, RegistryError> {
        let registry = Self { version, templates };
        registry.validate()?;
        Ok(registry)
    }

    /// Templates offered to `role`, in catalog order.
    pub fn list_templates_for_role(&self, role: Role) -> Vec<&NavItemTemplate> {
        self.templates.iter().filter(|template| template.is_eligible(role)).collect()
    }

    pub fn template(&self, id: &str) -> Option<&NavItemTemplate> {
        self.templates.iter().find(|template| template.id == id)
    }

    /// Every publication flag any template depends on.
    pub fn referenced_flags(&self) -> BTreeSet<&str> {
        let mut flags = BTreeSet::new();
        for template in &self.templates {
            if let Some(flag) = template.available_when.as_deref() {
                flags.insert(flag);
            }
            if let Some(rule) = template.publication_override.as_ref() {
                flags.insert(rule.flag.as_str());
            }
        }
        flags
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = BTreeSet::new();
        for template in &self.templates {
            if !seen.insert(template.id.as_str()) {
                return Err(RegistryError::DuplicateId(template.id.clone()));
            }
            if template.id != template.path {
                return Err(RegistryError::IdPathMismatch {
                    id: template.id.clone(),
                    path: template.path.clone(),
                });
            }
            if template.eligible_roles.is_empty() {
                return Err(RegistryError::NoEligibleRoles(template.id.clone()));
            }
            if template.is_dynamic != has_placeholders(&template.path) {
                return Err(RegistryError::DynamicMismatch {
                    id: template.id.clone(),
                    declared: template.is_dynamic,
                });
            }
            let gate_is_empty = template.available_when.as_deref().is_some_and(|flag| flag.trim().is_empty());
            let rule_is_empty = template.publication_override.as_ref().is_some_and(|rule| rule.flag.trim().is_empty());
            if gate_is_empty || rule_is_empty {
                return Err(RegistryError::EmptyFlagName(template.id.clone()));
            }
        }
        Ok(())
    }
}
