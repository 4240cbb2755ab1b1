//! # Studio
//!
//! Coordinates the flow between the dashboard's actions and the core pieces:
//! session gate, pipeline run, hand-off to the project store, reports.

use std::sync::Arc;

use cf_core::error::{AppError, Result};
use cf_core::models::{NewProject, Project, ProjectId, ProjectPatch, User, VideoFile};
use cf_core::traits::SessionProvider;
use cf_pipeline::{Pipeline, ProgressSender, RunOutput};
use cf_report::ShortsReport;
use cf_store::ProjectStore;

use crate::share::{share_intent, ShareIntent, SharePlatform};
use tracing::{info, warn};

/// A finished generation: the stored project plus the raw run output.
#[derive(Debug, Clone)]
pub struct Generation {
    pub project: Project,
    pub output: RunOutput,
}

impl Generation {
    pub fn report(&self) -> ShortsReport {
        ShortsReport::from_run(&self.output.summary, &self.output.shorts)
    }
}

/// Shared by every view of the dashboard. Built once by the composition root.
pub struct Studio {
    store: Arc<ProjectStore>,
    pipeline: Arc<Pipeline>,
    session: Arc<dyn SessionProvider>,
}

impl Studio {
    pub fn new(store: Arc<ProjectStore>, pipeline: Arc<Pipeline>, session: Arc<dyn SessionProvider>) -> Self {
        Self {
            store,
            pipeline,
            session,
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn session(&self) -> &dyn SessionProvider {
        self.session.as_ref()
    }

    fn require_user(&self) -> Result<User> {
        self.session
            .current_user()
            .ok_or_else(|| AppError::Unauthorized("sign in to use the dashboard".to_string()))
    }

    /// Feedback for a file picker or drop target; nothing is started.
    pub fn select(&self, file: &VideoFile) -> Result<()> {
        Pipeline::validate_selection(file).inspect_err(|err| {
            warn!(file = %file.name, error = %err, "selection rejected");
        })
    }

    /// Runs the pipeline on `file` and stores the result as a new project.
    pub async fn generate(&self, file: &VideoFile, progress: Option<&ProgressSender>) -> Result<Generation> {
        let user = self.require_user()?;
        let output = self.pipeline.run(file, progress).await?;

        let project = self
            .store
            .add_project(NewProject::from_run(&output.summary, output.shorts.clone()))
            .await?;

        info!(user_id = %user.id, project_id = %project.id, "shorts generated");
        Ok(Generation { project, output })
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.require_user()?;
        Ok(self.store.projects().await)
    }

    pub async fn project(&self, id: ProjectId) -> Result<Project> {
        self.require_user()?;
        self.store
            .project(id)
            .await
            .ok_or_else(|| AppError::NotFound("project".to_string(), id.to_string()))
    }

    pub async fn update_project(&self, id: ProjectId, patch: ProjectPatch) -> Result<Option<Project>> {
        self.require_user()?;
        Ok(self.store.update_project(id, patch).await)
    }

    pub async fn delete_project(&self, id: ProjectId) -> Result<bool> {
        self.require_user()?;
        Ok(self.store.delete_project(id).await)
    }

    pub async fn delete_short(&self, project_id: ProjectId, short_id: u32) -> Result<bool> {
        self.require_user()?;
        Ok(self.store.delete_short(project_id, short_id).await)
    }

    pub async fn project_report(&self, id: ProjectId) -> Result<ShortsReport> {
        let project = self.project(id).await?;
        Ok(ShortsReport::from_project(&project))
    }

    /// Share link for one short of a project, or for the project as a whole
    /// when `short_id` is `None`.
    pub async fn share(
        &self,
        platform: SharePlatform,
        project_id: ProjectId,
        short_id: Option<u32>,
        page_url: &str,
    ) -> Result<ShareIntent> {
        let project = self.project(project_id).await?;
        let short = match short_id {
            Some(short_id) => Some(
                project
                    .short(short_id)
                    .ok_or_else(|| AppError::NotFound("short".to_string(), short_id.to_string()))?,
            ),
            None => None,
        };
        info!(%platform, project_id = %project_id, short_id, "share");
        Ok(share_intent(platform, short, page_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_auth_simple::SimpleSessionProvider;
    use cf_core::traits::MockSessionProvider;
    use cf_pipeline::PipelineConfig;
    use cf_storage_memory::MemoryKeyValueStore;
    use cf_store::{JsonProjectPersistence, DEFAULT_STORAGE_KEY};

    const MIB: u64 = 1024 * 1024;

    fn studio_with(session: Arc<dyn SessionProvider>, kv: MemoryKeyValueStore) -> Studio {
        let persistence = JsonProjectPersistence::with_default_key(Arc::new(kv));
        let store = Arc::new(ProjectStore::new(Arc::new(persistence)));
        let pipeline = Arc::new(Pipeline::new(PipelineConfig {
            seed: Some(5),
            ..Default::default()
        }));
        Studio::new(store, pipeline, session)
    }

    async fn signed_in() -> Arc<dyn SessionProvider> {
        let auth = SimpleSessionProvider::new();
        auth.sign_up("ada@example.com", "hunter22").await.unwrap();
        Arc::new(auth)
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_stores_project() {
        let kv = MemoryKeyValueStore::new();
        let studio = studio_with(signed_in().await, kv.clone());

        let file = VideoFile::new("trip.mp4", 30 * MIB, "video/mp4");
        let generation = studio.generate(&file, None).await.unwrap();

        assert_eq!(generation.project.title, "trip");
        assert_eq!(generation.project.file_size, "30.00 MB");
        assert_eq!(generation.project.shorts, generation.output.shorts);
        assert_eq!(studio.projects().await.unwrap(), vec![generation.project.clone()]);
        assert!(kv.raw(DEFAULT_STORAGE_KEY).unwrap().contains("trip - Short 3"));

        let text = generation.report().to_text().unwrap();
        assert!(text.contains("Total Shorts Generated: 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_signed_out_is_refused() {
        let mut session = MockSessionProvider::new();
        session.expect_current_user().returning(|| None);
        let studio = studio_with(Arc::new(session), MemoryKeyValueStore::new());

        let file = VideoFile::new("trip.mp4", 30 * MIB, "video/mp4");
        assert!(matches!(studio.generate(&file, None).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(studio.projects().await, Err(AppError::Unauthorized(_))));
        assert!(matches!(studio.delete_project(ProjectId::new()).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(
            studio.share(SharePlatform::Twitter, ProjectId::new(), None, "https://clipforge.local").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_share_uses_the_stored_short() {
        let studio = studio_with(signed_in().await, MemoryKeyValueStore::new());
        let file = VideoFile::new("trip.mp4", 30 * MIB, "video/mp4");
        let project = studio.generate(&file, None).await.unwrap().project;
        let page = "https://clipforge.local/dashboard";

        let ShareIntent::Url(url) = studio.share(SharePlatform::WhatsApp, project.id, Some(2), page).await.unwrap() else {
            panic!("whatsapp should produce a link");
        };
        let hashtag = project
            .short(2)
            .unwrap()
            .hashtags
            .iter()
            .find(|tag| tag.is_ascii())
            .unwrap()
            .trim_start_matches('#');
        assert!(url.starts_with("https://wa.me/?text="));
        assert!(url.contains(&format!("%23{hashtag}")));

        let intent = studio.share(SharePlatform::Twitter, project.id, None, page).await.unwrap();
        assert_eq!(intent, share_intent(SharePlatform::Twitter, None, page));

        assert!(matches!(
            studio.share(SharePlatform::Twitter, project.id, Some(9), page).await,
            Err(AppError::NotFound(_, _))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_file_leaves_store_untouched() {
        let kv = MemoryKeyValueStore::new();
        let studio = studio_with(signed_in().await, kv.clone());

        let file = VideoFile::new("cover.png", MIB, "image/png");
        assert!(matches!(studio.select(&file), Err(AppError::Validation(_))));
        assert!(matches!(studio.generate(&file, None).await, Err(AppError::Validation(_))));
        assert!(studio.projects().await.unwrap().is_empty());
        assert_eq!(kv.raw(DEFAULT_STORAGE_KEY), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_project_report_tracks_deletions() {
        let studio = studio_with(signed_in().await, MemoryKeyValueStore::new());
        let file = VideoFile::new("long.mp4", 50 * MIB, "video/mp4");
        let generation = studio.generate(&file, None).await.unwrap();
        let id = generation.project.id;

        assert!(studio.delete_short(id, 1).await.unwrap());
        let report = studio.project_report(id).await.unwrap();
        assert_eq!(report.total_shorts, 4);
        assert!(!report.to_text().unwrap().contains("long - Short 1\n"));

        assert!(studio.delete_project(id).await.unwrap());
        assert!(matches!(studio.project_report(id).await, Err(AppError::NotFound(_, _))));
    }
}
