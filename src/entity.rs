use crate::error::{GithubInfoError, Result};
use crate::github::types::Slug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

pub const PROJECT_SLUG_ANNOTATION: &str = "github.com/project-slug";
const DEFAULT_NAMESPACE: &str = "default";

/// Catalog descriptor, as found in `catalog-info.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    #[serde(default)]
    pub api_version: Option<String>,
    pub kind: String,
    pub metadata: EntityMetadata,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityMetadata {
    pub name: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub annotations: BTreeMap<String, String>,
}

impl Entity {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Picks the first document carrying the project-slug annotation,
    /// falling back to the first document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut first = None;
        for document in serde_yaml::Deserializer::from_str(content) {
            let entity = Entity::deserialize(document)
                .map_err(|e| GithubInfoError::Entity(e.to_string()))?;
            if entity.metadata.annotations.contains_key(PROJECT_SLUG_ANNOTATION) {
                return Ok(entity);
            }
            first.get_or_insert(entity);
        }
        first.ok_or_else(|| GithubInfoError::Entity("no entity document found".to_string()))
    }

    /// Stand-in entity when the repository is given directly on the command line.
    pub fn for_slug(slug: &Slug) -> Self {
        let mut annotations = BTreeMap::new();
        annotations.insert(PROJECT_SLUG_ANNOTATION.to_string(), slug.to_string());
        Self {
            api_version: None,
            kind: "Component".to_string(),
            metadata: EntityMetadata {
                name: slug.repo.clone(),
                namespace: None,
                annotations,
            },
        }
    }

    pub fn entity_ref(&self) -> String {
        format!(
            "{}:{}/{}",
            self.kind.to_lowercase(),
            self.metadata.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE),
            self.metadata.name
        )
    }

    /// `None` when the annotation is missing or blank: nothing is rendered.
    pub fn project_slug(&self) -> Result<Option<Slug>> {
        match self.metadata.annotations.get(PROJECT_SLUG_ANNOTATION) {
            Some(value) if !value.trim().is_empty() => value.parse().map(Some),
            _ => Ok(None),
        }
    }
}
