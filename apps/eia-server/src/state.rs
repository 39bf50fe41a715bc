//! Application state and in-memory repositories
//!
//! Projects and assessments live in process memory for the lifetime of
//! the server. Both stores sit behind traits so a durable backend can be
//! swapped in without touching the handlers.

use std::collections::HashMap;
use std::sync::Arc;

use assessment_engine::AssessmentEngine;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eia_types::{AssessmentSummary, ProjectRecord};
use tokio::sync::RwLock;

/// A completed assessment as kept by the server
#[derive(Debug, Clone)]
pub struct StoredAssessment {
    pub id: String,
    pub project_id: String,
    pub summary: AssessmentSummary,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn insert(&self, project: ProjectRecord);
    async fn get(&self, id: &str) -> Option<ProjectRecord>;
}

#[async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn insert(&self, assessment: StoredAssessment);
    async fn get(&self, id: &str) -> Option<StoredAssessment>;
    /// Most recently created assessment of a project
    async fn latest_for_project(&self, project_id: &str) -> Option<StoredAssessment>;
    async fn count(&self) -> usize;
}

#[derive(Default)]
pub struct InMemoryProjectStore {
    projects: Arc<RwLock<HashMap<String, ProjectRecord>>>,
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn insert(&self, project: ProjectRecord) {
        self.projects.write().await.insert(project.id.clone(), project);
    }

    async fn get(&self, id: &str) -> Option<ProjectRecord> {
        self.projects.read().await.get(id).cloned()
    }
}

#[derive(Default)]
pub struct InMemoryAssessmentStore {
    assessments: Arc<RwLock<HashMap<String, StoredAssessment>>>,
}

#[async_trait]
impl AssessmentStore for InMemoryAssessmentStore {
    async fn insert(&self, assessment: StoredAssessment) {
        self.assessments
            .write()
            .await
            .insert(assessment.id.clone(), assessment);
    }

    async fn get(&self, id: &str) -> Option<StoredAssessment> {
        self.assessments.read().await.get(id).cloned()
    }

    async fn latest_for_project(&self, project_id: &str) -> Option<StoredAssessment> {
        self.assessments
            .read()
            .await
            .values()
            .filter(|a| a.project_id == project_id)
            .max_by_key(|a| a.created_at)
            .cloned()
    }

    async fn count(&self) -> usize {
        self.assessments.read().await.len()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AssessmentEngine>,
    pub projects: Arc<dyn ProjectStore>,
    pub assessments: Arc<dyn AssessmentStore>,
}

impl AppState {
    /// State with the standard engine and in-memory stores
    pub fn in_memory() -> Self {
        Self {
            engine: Arc::new(AssessmentEngine::new()),
            projects: Arc::new(InMemoryProjectStore::default()),
            assessments: Arc::new(InMemoryAssessmentStore::default()),
        }
    }
}
