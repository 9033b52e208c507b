use std::path::Path;

use super::types::Pattern;
use crate::error::{AppError, AppResult};

const BUILTIN_CATALOG: &str = include_str!("../../patterns/catalog.json");

/// Static catalog of chart formations used to prompt the model and to
/// validate the names it reports.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    patterns: Vec<Pattern>,
}

impl PatternCatalog {
    pub fn builtin() -> AppResult<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn from_json(json: &str) -> AppResult<Self> {
        let patterns: Vec<Pattern> = serde_json::from_str(json)?;
        if patterns.is_empty() {
            return Err(AppError::Config("Pattern catalog is empty".to_string()));
        }
        Ok(Self { patterns })
    }

    /// Rebases relative image paths onto `root` where the file exists there.
    /// Anything else stays relative to the working directory.
    pub fn resolve_images(&mut self, root: &Path) {
        for pattern in &mut self.patterns {
            let relative = Path::new(&pattern.image_path);
            if relative.is_absolute() {
                continue;
            }
            let candidate = root.join(relative);
            if candidate.exists() {
                pattern.image_path = candidate.display().to_string();
            }
        }
    }

    pub fn all(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn find(&self, name: &str) -> Option<&Pattern> {
        let needle = name.trim();
        self.patterns
            .iter()
            .find(|p| p.name == needle || p.name.to_lowercase() == needle.to_lowercase())
    }

    pub fn lowercase_names(&self) -> Vec<String> {
        self.patterns.iter().map(|p| p.name.to_lowercase()).collect()
    }

    /// One `- name: description` line per pattern, as listed in the analysis prompt.
    pub fn summary(&self) -> String {
        self.patterns
            .iter()
            .map(|p| format!("- {}: {}", p.name, p.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = PatternCatalog::builtin().unwrap();
        assert!(catalog.len() >= 10);
        assert!(catalog.find("Голова и плечи").is_some());
        assert!(catalog.all().iter().all(|p| !p.description.is_empty()));
    }

    #[test]
    fn find_ignores_case_and_whitespace() {
        let catalog = PatternCatalog::builtin().unwrap();
        let p = catalog.find("  двойное ДНО ").unwrap();
        assert_eq!(p.name, "Двойное дно");
        assert!(catalog.find("Бриллиант").is_none());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            PatternCatalog::from_json("[]"),
            Err(AppError::Config(_))
        ));
        assert!(matches!(
            PatternCatalog::from_json("{not json"),
            Err(AppError::Json(_))
        ));
    }

    #[test]
    fn builtin_images_ship_with_the_crate() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR"));
        let mut catalog = PatternCatalog::builtin().unwrap();
        catalog.resolve_images(root);
        for p in catalog.all() {
            assert!(Path::new(&p.image_path).is_absolute(), "{} not resolved", p.name);
        }
    }

    #[test]
    fn unresolved_images_stay_relative() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.png"), b"x").unwrap();
        let mut catalog = PatternCatalog::from_json(
            r#"[{"name":"Флаг","description":"d","image_path":"a.png"},
                {"name":"Вымпел","description":"d","image_path":"missing.png"}]"#,
        )
        .unwrap();
        catalog.resolve_images(dir.path());

        assert_eq!(
            catalog.all()[0].image_path,
            dir.path().join("a.png").display().to_string()
        );
        assert_eq!(catalog.all()[1].image_path, "missing.png");
    }

    #[test]
    fn summary_lists_every_pattern() {
        let catalog = PatternCatalog::from_json(
            r#"[{"name":"Флаг","description":"Продолжение","image_path":"a.png"},
                {"name":"Вымпел","description":"Тоже продолжение","image_path":"b.png"}]"#,
        )
        .unwrap();
        assert_eq!(
            catalog.summary(),
            "- Флаг: Продолжение\n- Вымпел: Тоже продолжение"
        );
    }
}
