//! Where Whisper model files live.
//!
//! A configured model id is either one of [`COMMAND_MODELS`] (mapped to its
//! GGML file name) or a bare file stem (`<id>.bin`).

use std::path::PathBuf;

/// English-only Whisper models suited to command recognition, as
/// `(id, file name)`.
pub const COMMAND_MODELS: &[(&str, &str)] = &[
    ("tiny.en", "ggml-tiny.en.bin"),
    ("base.en", "ggml-base.en.bin"),
    ("small.en", "ggml-small.en.bin"),
];

#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub models_dir: PathBuf,
}

impl ModelPaths {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn resolve(&self, id: &str) -> PathBuf {
        let file = COMMAND_MODELS
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, file)| (*file).to_string())
            .unwrap_or_else(|| format!("{id}.bin"));
        self.models_dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_resolve_to_ggml_files() {
        let paths = ModelPaths::new("/models");
        assert_eq!(paths.resolve("base.en"), PathBuf::from("/models/ggml-base.en.bin"));
        assert_eq!(paths.resolve("tiny.en"), PathBuf::from("/models/ggml-tiny.en.bin"));
    }

    #[test]
    fn unknown_id_is_used_as_file_stem() {
        let paths = ModelPaths::new("/models");
        assert_eq!(paths.resolve("my-tuned"), PathBuf::from("/models/my-tuned.bin"));
    }
}
