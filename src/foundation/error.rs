use std::path::PathBuf;

pub type AegisResult<T> = Result<T, AegisError>;

#[derive(thiserror::Error, Debug)]
pub enum AegisError {
    #[error("registry not found (looked in {})", display_paths(.candidates))]
    RegistryNotFound { candidates: Vec<PathBuf> },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("not implemented: {0}")]
    Unimplemented(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AegisError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn unimplemented(msg: impl Into<String>) -> Self {
        Self::Unimplemented(msg.into())
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| format!("'{}'", p.display()))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            AegisError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            AegisError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
        assert!(AegisError::render("x").to_string().contains("render error:"));
        assert!(
            AegisError::unimplemented("x")
                .to_string()
                .contains("not implemented:")
        );
    }

    #[test]
    fn registry_not_found_lists_every_candidate() {
        let err = AegisError::RegistryNotFound {
            candidates: vec![PathBuf::from("a/reg.json"), PathBuf::from("b/reg.json")],
        };
        let msg = err.to_string();
        assert!(msg.contains("'a/reg.json'"));
        assert!(msg.contains("'b/reg.json'"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = AegisError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
