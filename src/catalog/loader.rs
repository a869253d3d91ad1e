//! Catalog loader
//!
//! Collects catalog documents from disk or from code and builds the immutable
//! [`Catalog`]:
//! - a single JSON file, or a directory of `*.json` files read in file name order
//! - documents registered programmatically (tests, embedding hosts)
//! - an id may be registered once; a second registration is rejected (FATAL)
//! - `build` resolves ordinals and runs the integrity validator

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::ids::{AchievementId, CourseId, LessonId};

use super::errors::{CatalogError, CatalogResult};
use super::store::Catalog;
use super::types::{Achievement, CatalogDocument, Course, CourseDef, Lesson};
use super::validator::validate_catalog;

/// Accumulates catalog definitions until `build` is called.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    courses: BTreeMap<CourseId, CourseDef>,
    lesson_ids: BTreeSet<LessonId>,
    achievements: BTreeMap<AchievementId, Achievement>,
    /// Files read so far, in load order
    sources: Vec<PathBuf>,
}

impl CatalogLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a file, or every `*.json` file of a directory.
    pub fn load_path(&mut self, path: &Path) -> CatalogResult<()> {
        if path.is_dir() {
            self.load_dir(path)
        } else {
            self.load_file(path)
        }
    }

    /// Loads every `*.json` file in a directory, sorted by file name.
    pub fn load_dir(&mut self, dir: &Path) -> CatalogResult<()> {
        let entries = fs::read_dir(dir).map_err(|e| {
            CatalogError::malformed(
                dir.display().to_string(),
                format!("Failed to read catalog directory: {}", e),
            )
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                CatalogError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            files.push(path);
        }
        files.sort();

        for path in files {
            self.load_file(&path)?;
        }
        Ok(())
    }

    /// Loads a single catalog document file.
    pub fn load_file(&mut self, path: &Path) -> CatalogResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            CatalogError::malformed(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let document: CatalogDocument = serde_json::from_str(&content).map_err(|e| {
            CatalogError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        self.add_document(document)?;
        self.sources.push(path.to_path_buf());
        Ok(())
    }

    /// Parses and registers a document held in memory.
    pub fn load_str(&mut self, json: &str) -> CatalogResult<()> {
        let document: CatalogDocument = serde_json::from_str(json)
            .map_err(|e| CatalogError::malformed("<in-memory>", format!("Invalid JSON: {}", e)))?;
        self.add_document(document)
    }

    /// Registers every course and achievement of a document.
    pub fn add_document(&mut self, document: CatalogDocument) -> CatalogResult<()> {
        for course in document.courses {
            self.register_course(course)?;
        }
        for achievement in document.achievements {
            self.register_achievement(achievement)?;
        }
        Ok(())
    }

    /// Registers a course together with its lessons.
    pub fn register_course(&mut self, course: CourseDef) -> CatalogResult<()> {
        if self.courses.contains_key(&course.id) {
            return Err(CatalogError::immutable("Course", &course.id));
        }

        let mut seen = BTreeSet::new();
        for lesson in &course.lessons {
            if self.lesson_ids.contains(&lesson.id) || !seen.insert(&lesson.id) {
                return Err(CatalogError::immutable("Lesson", &lesson.id));
            }
        }

        self.lesson_ids
            .extend(course.lessons.iter().map(|l| l.id.clone()));
        self.courses.insert(course.id.clone(), course);
        Ok(())
    }

    /// Registers an achievement definition.
    pub fn register_achievement(&mut self, achievement: Achievement) -> CatalogResult<()> {
        if self.achievements.contains_key(&achievement.id) {
            return Err(CatalogError::immutable("Achievement", &achievement.id));
        }
        self.achievements.insert(achievement.id.clone(), achievement);
        Ok(())
    }

    /// Files loaded so far.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Resolves lesson ordinals, validates, and freezes the catalog.
    pub fn build(self) -> CatalogResult<Catalog> {
        let mut courses = BTreeMap::new();
        let mut lessons = BTreeMap::new();

        for (course_id, def) in self.courses {
            let mut resolved: Vec<Lesson> = def
                .lessons
                .into_iter()
                .enumerate()
                .map(|(position, l)| Lesson {
                    ordinal: l.ordinal.unwrap_or(position as u32),
                    id: l.id,
                    course_id: course_id.clone(),
                    title: l.title,
                    duration_minutes: l.duration_minutes,
                })
                .collect();
            resolved.sort_by(|a, b| a.ordinal.cmp(&b.ordinal).then_with(|| a.id.cmp(&b.id)));

            let course = Course {
                id: course_id.clone(),
                name: def.name,
                lessons: resolved.iter().map(|l| l.id.clone()).collect(),
                metadata: def.metadata,
            };

            for lesson in resolved {
                lessons.insert(lesson.id.clone(), lesson);
            }
            courses.insert(course_id, course);
        }

        let plan = validate_catalog(&courses, &lessons, &self.achievements)?;
        Ok(Catalog::from_parts(courses, lessons, self.achievements, plan))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::errors::CatalogErrorCode;
    use tempfile::TempDir;

    const WEB: &str = r#"{
        "courses": [{
            "id": "web",
            "name": "Web Development",
            "lessons": [
                {"id": "html", "title": "HTML", "duration_minutes": 15},
                {"id": "css", "title": "CSS", "duration_minutes": 20}
            ]
        }]
    }"#;

    const BADGES: &str = r#"{
        "achievements": [{
            "id": "first-steps",
            "title": "First Steps",
            "rarity": "common",
            "points": 50,
            "rule": {"kind": "lessons_completed", "at_least": 1}
        }]
    }"#;

    #[test]
    fn test_load_dir_in_name_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("20_badges.json"), BADGES).unwrap();
        fs::write(temp.path().join("10_web.json"), WEB).unwrap();
        fs::write(temp.path().join("notes.txt"), "ignored").unwrap();

        let mut loader = CatalogLoader::new();
        loader.load_path(temp.path()).unwrap();
        let names: Vec<_> = loader
            .sources()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["10_web.json", "20_badges.json"]);

        let catalog = loader.build().unwrap();
        assert_eq!(catalog.lesson_count(), 2);
        assert_eq!(catalog.achievement_count(), 1);
    }

    #[test]
    fn test_malformed_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let mut loader = CatalogLoader::new();
        let err = loader.load_file(&path).unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::CurioCatalogMalformed);
        assert!(err.is_fatal());
        assert!(err.details().unwrap().contains("broken.json"));
    }

    #[test]
    fn test_duplicate_course_is_immutable() {
        let mut loader = CatalogLoader::new();
        loader.load_str(WEB).unwrap();
        let err = loader.load_str(WEB).unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::CurioCatalogImmutable);
    }

    #[test]
    fn test_duplicate_lesson_across_courses() {
        let mut loader = CatalogLoader::new();
        loader.load_str(WEB).unwrap();
        let other = r#"{"courses": [{"id": "other", "name": "Other",
            "lessons": [{"id": "html", "title": "Again"}]}]}"#;
        let err = loader.load_str(other).unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::CurioCatalogImmutable);
        assert_eq!(err.subject(), Some("html"));
    }

    #[test]
    fn test_duplicate_achievement_is_immutable() {
        let mut loader = CatalogLoader::new();
        loader.load_str(BADGES).unwrap();
        assert!(loader.load_str(BADGES).is_err());
    }

    #[test]
    fn test_explicit_ordinals_reorder_lessons() {
        let json = r#"{"courses": [{"id": "c", "name": "C", "lessons": [
            {"id": "second", "title": "2", "ordinal": 1},
            {"id": "first", "title": "1", "ordinal": 0}
        ]}]}"#;
        let mut loader = CatalogLoader::new();
        loader.load_str(json).unwrap();
        let catalog = loader.build().unwrap();
        let course = catalog.get_course(&CourseId::from("c")).unwrap();
        assert_eq!(course.lessons, vec![LessonId::from("first"), LessonId::from("second")]);
    }

    #[test]
    fn test_duplicate_ordinal_fails_build() {
        let json = r#"{"courses": [{"id": "c", "name": "C", "lessons": [
            {"id": "a", "title": "A", "ordinal": 0},
            {"id": "b", "title": "B", "ordinal": 0}
        ]}]}"#;
        let mut loader = CatalogLoader::new();
        loader.load_str(json).unwrap();
        let err = loader.build().unwrap_err();
        assert_eq!(err.code(), CatalogErrorCode::CurioCatalogInvalid);
    }
}
