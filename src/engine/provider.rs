// src/engine/provider.rs

use std::{collections::HashMap, path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::AppError,
    models::{
        exam::{Exam, ExamSummary},
        exam_record::LeaderboardEntry,
    },
};

const DEMO_CATALOG: &str = include_str!("../../data/demo_catalog.json");

/// Source of exam definitions.
#[async_trait]
pub trait ExamProvider: Send + Sync {
    async fn load_exam(&self, exam_id: &str) -> Result<Arc<Exam>, AppError>;

    async fn list_exams(&self) -> Vec<ExamSummary>;
}

/// On-disk catalog layout: exam definitions plus optional leaderboard seeds.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub exams: Vec<Exam>,
    #[serde(default)]
    pub leaderboards: HashMap<String, Vec<LeaderboardEntry>>,
}

impl Catalog {
    pub fn parse(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub async fn load(path: &Path) -> Result<Self, AppError> {
        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::InternalServerError(format!(
                "Failed to read catalog {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&raw)
    }

    /// The catalog bundled with the binary.
    pub fn demo() -> Result<Self, AppError> {
        Self::parse(DEMO_CATALOG)
    }
}

/// In-memory provider over a validated list of exams, kept in catalog order.
#[derive(Debug)]
pub struct CatalogProvider {
    exams: Vec<Arc<Exam>>,
}

impl CatalogProvider {
    pub fn new(exams: Vec<Exam>) -> Result<Self, AppError> {
        let mut loaded: Vec<Arc<Exam>> = Vec::with_capacity(exams.len());
        for exam in exams {
            exam.check()?;
            if loaded.iter().any(|e| e.id == exam.id) {
                return Err(AppError::Conflict(format!(
                    "Exam '{}' is defined twice",
                    exam.id
                )));
            }
            loaded.push(Arc::new(exam));
        }

        tracing::info!("Loaded {} exams into the catalog", loaded.len());
        Ok(Self { exams: loaded })
    }
}

#[async_trait]
impl ExamProvider for CatalogProvider {
    async fn load_exam(&self, exam_id: &str) -> Result<Arc<Exam>, AppError> {
        self.exams
            .iter()
            .find(|e| e.id == exam_id)
            .cloned()
            .ok_or(AppError::NotFound(format!("Exam '{}' not found", exam_id)))
    }

    async fn list_exams(&self) -> Vec<ExamSummary> {
        self.exams.iter().map(|e| ExamSummary::from(e.as_ref())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_catalog_loads() {
        let catalog = Catalog::demo().unwrap();
        assert!(!catalog.exams.is_empty());

        let provider = CatalogProvider::new(catalog.exams).unwrap();
        let listed = provider.list_exams().await;
        assert_eq!(listed[0].id, "rust-fundamentals");
        assert_eq!(listed[0].question_count, 5);

        let exam = provider.load_exam("rust-fundamentals").await.unwrap();
        assert_eq!(exam.time_limit_seconds, 1800);
    }

    #[tokio::test]
    async fn test_unknown_exam_not_found() {
        let provider = CatalogProvider::new(Catalog::demo().unwrap().exams).unwrap();
        assert!(matches!(
            provider.load_exam("nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_exam_rejected() {
        let catalog = Catalog::parse(
            r#"{"exams": [{"id": "x", "title": "X", "time_limit_seconds": 0,
                "questions": [{"id": "1", "prompt": "?", "options": ["a", "b"], "correct_option_index": 0}]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            CatalogProvider::new(catalog.exams),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_duplicate_exam_rejected() {
        let mut exams = Catalog::demo().unwrap().exams;
        exams.push(exams[0].clone());
        assert!(matches!(
            CatalogProvider::new(exams),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_malformed_catalog_is_bad_request() {
        assert!(matches!(
            Catalog::parse("{\"exams\": 3}"),
            Err(AppError::BadRequest(_))
        ));
    }
}
