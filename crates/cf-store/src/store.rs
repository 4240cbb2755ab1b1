//! # ProjectStore
//!
//! The single authoritative collection of Projects for one profile.
//! Every mutation rewrites the whole list and awaits `save()` before it
//! returns, so a completed call is always durable (or logged as not).

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cf_core::error::{AppError, Result};
use cf_core::format::display_stem;
use cf_core::models::{NewProject, Project, ProjectId, ProjectPatch, ProjectStatus};
use cf_core::traits::ProjectPersistence;
use chrono::Utc;
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, error, info, warn};

pub struct ProjectStore {
    persistence: Arc<dyn ProjectPersistence>,
    /// Most recent first
    projects: Mutex<Vec<Project>>,
    initialized: OnceCell<()>,
    loading: AtomicBool,
}

impl ProjectStore {
    /// The store starts in the loading state; the persisted list is read on first use.
    pub fn new(persistence: Arc<dyn ProjectPersistence>) -> Self {
        Self {
            persistence,
            projects: Mutex::new(Vec::new()),
            initialized: OnceCell::new(),
            loading: AtomicBool::new(true),
        }
    }

    /// Loads the persisted list exactly once. Absent or unreadable data
    /// leaves the store empty; neither case is reported to the caller.
    pub async fn initialize(&self) {
        self.initialized
            .get_or_init(|| async {
                let loaded = match self.persistence.load().await {
                    Ok(Some(projects)) => {
                        info!(count = projects.len(), "loaded persisted projects");
                        projects
                    }
                    Ok(None) => {
                        debug!("no persisted projects, starting empty");
                        Vec::new()
                    }
                    Err(err) => {
                        warn!(error = %err, "discarding persisted projects");
                        Vec::new()
                    }
                };
                *self.projects.lock().await = loaded;
                self.loading.store(false, Ordering::Release);
            })
            .await;
    }

    /// `true` until `initialize` has completed.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    /// Snapshot of all projects, most recent first.
    pub async fn projects(&self) -> Vec<Project> {
        self.initialize().await;
        self.projects.lock().await.clone()
    }

    pub async fn project(&self, id: ProjectId) -> Option<Project> {
        self.initialize().await;
        self.projects.lock().await.iter().find(|p| p.id == id).cloned()
    }

    /// Creates a Project from a finished pipeline run and puts it in front.
    pub async fn add_project(&self, data: NewProject) -> Result<Project> {
        let mut seen = HashSet::new();
        if let Some(dup) = data.shorts.iter().find(|s| !seen.insert(s.id)) {
            return Err(AppError::Validation(format!("duplicate short id {}", dup.id)));
        }

        self.initialize().await;
        let mut projects = self.projects.lock().await;

        let title = data
            .title
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                let stem = display_stem(&data.file_name);
                (!stem.trim().is_empty()).then(|| stem.to_string())
            })
            .unwrap_or_else(|| format!("Project {}", Utc::now().timestamp_millis()));
        let project = Project {
            id: ProjectId::new(),
            title,
            original_video: data.file_name,
            file_size: format!("{} MB", data.file_size),
            upload_date: Utc::now().date_naive(),
            status: ProjectStatus::Completed,
            shorts: data.shorts,
        };

        projects.insert(0, project.clone());
        self.persist(&projects).await;
        info!(project_id = %project.id, shorts = project.shorts.len(), "project added");
        Ok(project)
    }

    /// Removes the project and every short it owns. Unknown ids are ignored.
    pub async fn delete_project(&self, id: ProjectId) -> bool {
        self.initialize().await;
        let mut projects = self.projects.lock().await;

        let before = projects.len();
        projects.retain(|p| p.id != id);
        let removed = projects.len() != before;

        self.persist(&projects).await;
        debug!(project_id = %id, removed, "delete project");
        removed
    }

    /// Removes one short from one project. Unknown ids are ignored.
    pub async fn delete_short(&self, project_id: ProjectId, short_id: u32) -> bool {
        self.initialize().await;
        let mut projects = self.projects.lock().await;

        let removed = match projects.iter_mut().find(|p| p.id == project_id) {
            Some(project) => {
                let before = project.shorts.len();
                project.shorts.retain(|s| s.id != short_id);
                project.shorts.len() != before
            }
            None => false,
        };

        self.persist(&projects).await;
        debug!(project_id = %project_id, short_id, removed, "delete short");
        removed
    }

    /// Shallow-merges `patch` into the project. Returns the updated project, if any.
    pub async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Option<Project> {
        self.initialize().await;
        let mut projects = self.projects.lock().await;

        let updated = projects.iter_mut().find(|p| p.id == id).map(|project| {
            patch.apply(project);
            project.clone()
        });

        self.persist(&projects).await;
        debug!(project_id = %id, found = updated.is_some(), "update project");
        updated
    }

    async fn persist(&self, projects: &[Project]) {
        if let Err(err) = self.persistence.save(projects).await {
            error!(error = %err, count = projects.len(), "failed to persist projects");
        }
    }
}
