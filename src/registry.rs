use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    config::ProjectConfig,
    foundation::error::{AegisError, AegisResult},
};

/// One launchable scene: a class inside a renderer source file.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SceneDescriptor {
    pub id: String,
    pub title: String,
    pub description: String,
    pub file_path: PathBuf,
    pub class_name: String,
}

/// Ordered scene catalog as read from the registry file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    scenes: Vec<SceneDescriptor>,
}

impl Registry {
    pub fn new(scenes: Vec<SceneDescriptor>) -> Self {
        Self { scenes }
    }

    /// First existing registry path among the configured candidates.
    pub fn locate(cfg: &ProjectConfig) -> AegisResult<PathBuf> {
        let candidates = cfg.registry_candidates();
        match candidates.iter().find(|p| p.is_file()) {
            Some(found) => Ok(found.clone()),
            None => Err(AegisError::RegistryNotFound { candidates }),
        }
    }

    /// Locate and load the registry for `cfg`.
    pub fn discover(cfg: &ProjectConfig) -> AegisResult<Self> {
        let path = Self::locate(cfg)?;
        Self::load(&path)
    }

    pub fn load(path: &Path) -> AegisResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read registry '{}'", path.display()))?;
        let registry = Self::from_json(&text)
            .map_err(|e| AegisError::serde(format!("registry '{}': {e}", path.display())))?;
        tracing::debug!(
            path = %path.display(),
            scenes = registry.len(),
            "loaded scene registry"
        );
        Ok(registry)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let scenes: Vec<SceneDescriptor> = serde_json::from_str(text)?;

        let mut seen = HashSet::new();
        for scene in &scenes {
            if !seen.insert(scene.id.as_str()) {
                tracing::warn!(id = %scene.id, "duplicate scene id; the first entry wins");
            }
        }

        Ok(Self { scenes })
    }

    pub fn scenes(&self) -> &[SceneDescriptor] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// First scene whose id equals `id`; failing that, the first one matching without ASCII case.
    pub fn find(&self, id: &str) -> Option<&SceneDescriptor> {
        self.scenes
            .iter()
            .find(|s| s.id == id)
            .or_else(|| self.scenes.iter().find(|s| s.id.eq_ignore_ascii_case(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SCENES: &str = r#"[
        {"id":"ECO1","title":"Supply Demand","description":"Static curves",
         "file_path":"scenes/economics_static.py","class_name":"SupplyDemandScene"},
        {"id":"GEO1","title":"Shapes","description":"Basic geometry",
         "file_path":"scenes/basic_geometry.py","class_name":"ShapesScene"}
    ]"#;

    #[test]
    fn parses_in_file_order() {
        let reg = Registry::from_json(TWO_SCENES).unwrap();
        let ids: Vec<_> = reg.scenes().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["ECO1", "GEO1"]);
        assert_eq!(
            reg.scenes()[0].file_path,
            PathBuf::from("scenes/economics_static.py")
        );
    }

    #[test]
    fn find_prefers_exact_id_over_case_variant() {
        let json = r#"[
            {"id":"eco1","title":"lower","description":"","file_path":"lower.py","class_name":"LowerScene"},
            {"id":"ECO1","title":"upper","description":"","file_path":"upper.py","class_name":"SupplyDemandScene"}
        ]"#;
        let reg = Registry::from_json(json).unwrap();
        assert_eq!(reg.find("ECO1").unwrap().class_name, "SupplyDemandScene");
        assert_eq!(reg.find("eco1").unwrap().class_name, "LowerScene");
        assert_eq!(reg.find("Eco1").unwrap().class_name, "LowerScene");
        assert!(reg.find("zz").is_none());
    }

    #[test]
    fn exact_duplicate_ids_keep_first_entry() {
        let json = r#"[
            {"id":"A","title":"first","description":"","file_path":"a.py","class_name":"A1"},
            {"id":"A","title":"second","description":"","file_path":"b.py","class_name":"A2"}
        ]"#;
        let reg = Registry::from_json(json).unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.find("A").unwrap().title, "first");
        assert_eq!(reg.find("a").unwrap().title, "first");
    }

    #[test]
    fn missing_required_key_is_rejected() {
        let json = r#"[{"id":"A","title":"t","description":"","file_path":"a.py"}]"#;
        let err = Registry::from_json(json).unwrap_err();
        assert!(err.to_string().contains("class_name"));
    }
}
