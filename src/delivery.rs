//! Hand-off of the finished digest to the note-taking platform.
//!
//! A configured webhook is tried first. When there is none, or the request
//! fails, the note is written to `<output_dir>/<YYYYMMDD>/` together with
//! copies of the cards and an import guide, so nothing is lost. Only a
//! failure of that local save is reported as an error.

use crate::config::DeliveryConfig;
use crate::error::DeliveryError;
use chrono::{Local, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument, warn};

/// Value of the `source` field in webhook payloads.
pub const NOTE_SOURCE: &str = "科技新闻自动化";

pub const NOTE_FILE: &str = "note.txt";
pub const GUIDE_FILE: &str = "导入指南.txt";

/// How the note reached its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Webhook,
    LocalSave,
}

/// Outcome of [`NoteSender::send`], embedded verbatim in the run report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub success: bool,
    pub method: DeliveryMethod,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize)]
struct WebhookNote<'a> {
    title: &'a str,
    content: &'a str,
    created_at: String,
    source: &'static str,
}

pub struct NoteSender {
    client: Client,
    webhook_url: Option<String>,
    api_key: Option<String>,
    output_dir: PathBuf,
}

impl NoteSender {
    pub fn new(client: Client, config: &DeliveryConfig, output_dir: impl Into<PathBuf>) -> Self {
        let non_blank = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            client,
            webhook_url: non_blank(&config.webhook_url),
            api_key: non_blank(&config.api_key),
            output_dir: output_dir.into(),
        }
    }

    /// Deliver one note with its images.
    #[instrument(level = "info", skip(self, content, images), fields(images = images.len()))]
    pub async fn send(
        &self,
        title: &str,
        content: &str,
        images: &[PathBuf],
    ) -> Result<DeliveryReport, DeliveryError> {
        if let Some(url) = &self.webhook_url {
            match self.post_webhook(url, title, content).await {
                Ok(()) => {
                    info!("Note delivered via webhook");
                    return Ok(DeliveryReport {
                        success: true,
                        method: DeliveryMethod::Webhook,
                        message: "笔记已成功发送到Get笔记".to_string(),
                        note_dir: None,
                        instructions: None,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Webhook delivery failed; saving note locally");
                }
            }
        }

        let note_dir = self
            .save_locally(title, content, images, Local::now().naive_local())
            .await?;
        Ok(DeliveryReport {
            success: true,
            method: DeliveryMethod::LocalSave,
            message: format!("笔记已保存到本地: {}", note_dir.display()),
            note_dir: Some(note_dir),
            instructions: Some(format!("请按照{GUIDE_FILE}中的步骤手动导入Get笔记")),
        })
    }

    async fn post_webhook(&self, url: &str, title: &str, content: &str) -> Result<(), DeliveryError> {
        let note = WebhookNote {
            title,
            content,
            created_at: Local::now().to_rfc3339(),
            source: NOTE_SOURCE,
        };

        let mut request = self.client.post(url).json(&note);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request.send().await?.error_for_status()?;
        Ok(())
    }

    /// Write the note, image copies and import guide into a dated folder.
    #[instrument(level = "info", skip(self, content, images))]
    pub async fn save_locally(
        &self,
        title: &str,
        content: &str,
        images: &[PathBuf],
        now: NaiveDateTime,
    ) -> Result<PathBuf, DeliveryError> {
        let note_dir = self.output_dir.join(now.format("%Y%m%d").to_string());
        fs::create_dir_all(&note_dir).await.map_err(local_save(&note_dir))?;

        let note_path = note_dir.join(NOTE_FILE);
        let note = format!(
            "标题: {title}\n时间: {}\n{}\n\n{content}",
            now.format("%Y-%m-%d %H:%M:%S"),
            "=".repeat(50)
        );
        fs::write(&note_path, note).await.map_err(local_save(&note_path))?;

        let mut copied = Vec::new();
        for (i, image) in images.iter().enumerate() {
            if !fs::try_exists(image).await.unwrap_or(false) {
                warn!(path = %image.display(), "Image missing; not copied");
                continue;
            }
            let name = match image.extension() {
                Some(ext) => format!("image_{}.{}", i + 1, ext.to_string_lossy()),
                None => format!("image_{}", i + 1),
            };
            let target = note_dir.join(&name);
            fs::copy(image, &target).await.map_err(local_save(&target))?;
            copied.push(name);
        }

        let guide_path = note_dir.join(GUIDE_FILE);
        fs::write(&guide_path, import_guide(&copied))
            .await
            .map_err(local_save(&guide_path))?;

        info!(path = %note_dir.display(), images = copied.len(), "Saved note locally");
        Ok(note_dir)
    }
}

fn local_save(path: &Path) -> impl FnOnce(std::io::Error) -> DeliveryError {
    move |source| DeliveryError::LocalSave {
        path: path.to_path_buf(),
        source,
    }
}

fn import_guide(images: &[String]) -> String {
    let mut guide = format!("Get笔记导入指南\n{}\n\n", "=".repeat(50));
    guide.push_str("1. 打开Get笔记APP或网页版\n");
    guide.push_str("2. 点击新建笔记\n");
    guide.push_str(&format!("3. 复制{NOTE_FILE}中的内容\n"));
    guide.push_str("4. 添加图片（按顺序选择image_1, image_2, image_3）\n");
    guide.push_str("5. 保存笔记\n\n");
    guide.push_str("图片文件:\n");
    for name in images {
        guide.push_str(&format!("  - {name}\n"));
    }
    guide
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sender(webhook_url: Option<String>, api_key: Option<&str>, output_dir: &Path) -> NoteSender {
        let client = crate::sources::http_client(Duration::from_secs(5)).unwrap();
        NoteSender::new(
            client,
            &DeliveryConfig {
                webhook_url,
                api_key: api_key.map(str::to_string),
            },
            output_dir,
        )
    }

    fn at_0830() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 5, 6)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_webhook_success_skips_local_save() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hook"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({
                "title": "🚀 全球科技早报 | 05月06日",
                "content": "body",
                "source": NOTE_SOURCE
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let report = sender(Some(format!("{}/hook", server.uri())), Some("secret"), dir.path())
            .send("🚀 全球科技早报 | 05月06日", "body", &[])
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.method, DeliveryMethod::Webhook);
        assert!(report.note_dir.is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_webhook_failure_falls_back_to_local_save() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let report = sender(Some(server.uri()), None, dir.path())
            .send("title", "body", &[])
            .await
            .unwrap();

        assert!(report.success);
        assert_eq!(report.method, DeliveryMethod::LocalSave);
        let note_dir = report.note_dir.unwrap();
        assert!(note_dir.join(NOTE_FILE).is_file());
        assert!(note_dir.join(GUIDE_FILE).is_file());
    }

    #[tokio::test]
    async fn test_no_webhook_saves_locally() {
        let dir = tempfile::tempdir().unwrap();
        let report = sender(Some("   ".to_string()), None, dir.path())
            .send("title", "body", &[])
            .await
            .unwrap();

        assert_eq!(report.method, DeliveryMethod::LocalSave);
        assert!(report.message.starts_with("笔记已保存到本地: "));
        assert!(report.instructions.unwrap().contains(GUIDE_FILE));
    }

    #[tokio::test]
    async fn test_local_save_layout() {
        let dir = tempfile::tempdir().unwrap();
        let cover = dir.path().join("tech_news_cover.svg");
        let summary = dir.path().join("tech_news_summary.svg");
        std::fs::write(&cover, "<svg/>").unwrap();
        std::fs::write(&summary, "<svg/>").unwrap();
        let images = vec![cover, dir.path().join("missing.svg"), summary];

        let out = dir.path().join("notes");
        let note_dir = sender(None, None, &out)
            .save_locally("标题一", "第一行\n第二行", &images, at_0830())
            .await
            .unwrap();

        assert_eq!(note_dir, out.join("20250506"));
        let note = std::fs::read_to_string(note_dir.join(NOTE_FILE)).unwrap();
        assert_eq!(
            note,
            format!("标题: 标题一\n时间: 2025-05-06 08:30:00\n{}\n\n第一行\n第二行", "=".repeat(50))
        );

        assert!(note_dir.join("image_1.svg").is_file());
        assert!(!note_dir.join("image_2.svg").exists());
        assert!(note_dir.join("image_3.svg").is_file());

        let guide = std::fs::read_to_string(note_dir.join(GUIDE_FILE)).unwrap();
        assert!(guide.starts_with("Get笔记导入指南\n"));
        assert!(guide.ends_with("图片文件:\n  - image_1.svg\n  - image_3.svg\n"));
    }

    #[tokio::test]
    async fn test_local_save_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        let err = sender(None, None, &blocker)
            .send("title", "body", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DeliveryError::LocalSave { .. }));
    }

    #[test]
    fn test_report_serializes_snake_case_method() {
        let report = DeliveryReport {
            success: true,
            method: DeliveryMethod::LocalSave,
            message: "ok".to_string(),
            note_dir: None,
            instructions: None,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["method"], "local_save");
        assert!(json.get("note_dir").is_none());
    }
}
