//! # cf-report
//!
//! Plain-text "shorts analysis" report, offered as a local download.

use std::path::{Path, PathBuf};

use askama::Template;
use cf_core::error::{AppError, Result};
use cf_core::format::format_time;
use cf_core::models::{Project, RunSummary, Short};
use chrono::Local;
use tokio::fs;
use tracing::info;

/// One block of the report, already formatted for display.
pub struct ReportEntry {
    pub title: String,
    pub duration: String,
    pub start: String,
    pub end: String,
    pub caption: String,
    pub hashtags: String,
}

impl From<&Short> for ReportEntry {
    fn from(short: &Short) -> Self {
        Self {
            title: short.title.clone(),
            duration: format_time(short.duration),
            start: format_time(short.start_time),
            end: format_time(short.end_time),
            caption: short.caption.clone(),
            hashtags: short.hashtags.join(" "),
        }
    }
}

#[derive(Template)]
#[template(path = "report.txt")]
pub struct ShortsReport {
    pub file_name: String,
    /// MiB, without unit
    pub file_size: String,
    pub total_shorts: usize,
    pub processed_on: String,
    pub entries: Vec<ReportEntry>,
}

impl ShortsReport {
    /// Report for a run that just finished.
    pub fn from_run(summary: &RunSummary, shorts: &[Short]) -> Self {
        Self {
            file_name: summary.file_name.clone(),
            file_size: summary.file_size.clone(),
            total_shorts: summary.total_shorts,
            processed_on: summary
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            entries: shorts.iter().map(ReportEntry::from).collect(),
        }
    }

    /// Report rebuilt from a stored project. Reflects shorts deleted since the run.
    pub fn from_project(project: &Project) -> Self {
        let file_size = project
            .file_size
            .strip_suffix(" MB")
            .unwrap_or(&project.file_size)
            .to_string();
        Self {
            file_name: project.original_video.clone(),
            file_size,
            total_shorts: project.shorts.len(),
            processed_on: project.upload_date.format("%Y-%m-%d").to_string(),
            entries: project.shorts.iter().map(ReportEntry::from).collect(),
        }
    }

    /// `shorts-analysis-<file>.txt`, with path separators neutralised.
    pub fn download_name(&self) -> String {
        let safe: String = self
            .file_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("shorts-analysis-{safe}.txt")
    }

    pub fn to_text(&self) -> Result<String> {
        self.render().map_err(|e| AppError::Internal(format!("report template: {e}")))
    }

    /// Writes the report into `dir` and returns the file's path.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let text = self.to_text()?;
        fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Persistence(format!("creating {}: {e}", dir.display())))?;

        let path = dir.join(self.download_name());
        fs::write(&path, text)
            .await
            .map_err(|e| AppError::Persistence(format!("writing {}: {e}", path.display())))?;

        info!(path = %path.display(), shorts = self.entries.len(), "report written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cf_core::models::{ProjectId, ProjectStatus, ShortStatus};
    use chrono::{NaiveDate, Utc};

    fn short(id: u32, start: u32, duration: u32) -> Short {
        Short {
            id,
            title: format!("trip - Short {id}"),
            start_time: start,
            duration,
            end_time: start + duration,
            caption: format!("caption {id}"),
            hashtags: vec!["#viral".to_string(), "#fyp".to_string()],
            thumbnail: String::new(),
            video_url: None,
            status: ShortStatus::Ready,
        }
    }

    fn summary(total: usize) -> RunSummary {
        RunSummary {
            file_name: "trip.mp4".to_string(),
            file_size: "30.00".to_string(),
            total_shorts: total,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_header_and_blocks() {
        let shorts = vec![short(1, 5, 20), short(2, 65, 17)];
        let text = ShortsReport::from_run(&summary(2), &shorts).to_text().unwrap();

        assert!(text.starts_with("Video Shorts Analysis Report\n\nFile: trip.mp4\nSize: 30.00 MB\n"));
        assert!(text.contains("Total Shorts Generated: 2\n"));
        assert!(text.contains("\nSHORTS DETAILS:\ntrip - Short 1\n"));
        assert!(text.contains("Duration: 0:20\nTimeline: 0:05 - 0:25\nCaption: caption 1\nHashtags: #viral #fyp\n"));
        assert!(text.contains("Hashtags: #viral #fyp\n\n---\n\ntrip - Short 2\n"));
        assert!(text.contains("Timeline: 1:05 - 1:22\n"));
        assert_eq!(text.matches("\n---\n").count(), 1);
    }

    #[test]
    fn test_single_short_has_no_separator() {
        let text = ShortsReport::from_run(&summary(1), &[short(1, 0, 15)]).to_text().unwrap();
        assert!(!text.contains("---"));
    }

    #[test]
    fn test_from_project_uses_stored_fields() {
        let project = Project {
            id: ProjectId::new(),
            title: "trip".to_string(),
            original_video: "trip.mp4".to_string(),
            file_size: "30.00 MB".to_string(),
            upload_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            status: ProjectStatus::Completed,
            shorts: vec![short(3, 10, 20)],
        };
        let report = ShortsReport::from_project(&project);
        assert_eq!(report.file_size, "30.00");
        assert_eq!(report.total_shorts, 1);

        let text = report.to_text().unwrap();
        assert!(text.contains("Size: 30.00 MB\n"));
        assert!(text.contains("Processed on: 2024-05-01\n"));
    }

    #[test]
    fn test_download_name() {
        let mut report = ShortsReport::from_run(&summary(0), &[]);
        assert_eq!(report.download_name(), "shorts-analysis-trip.mp4.txt");
        report.file_name = "a/b.mp4".to_string();
        assert_eq!(report.download_name(), "shorts-analysis-a_b.mp4.txt");
    }

    #[tokio::test]
    async fn test_write_to_dir() {
        let dir = std::env::temp_dir().join(format!("cf-report-{}", uuid::Uuid::new_v4()));
        let report = ShortsReport::from_run(&summary(1), &[short(1, 0, 15)]);

        let path = report.write_to(&dir).await.unwrap();
        assert_eq!(path, dir.join("shorts-analysis-trip.mp4.txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, report.to_text().unwrap());

        std::fs::remove_dir_all(dir).unwrap();
    }
}
