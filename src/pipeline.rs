//! The daily run: fetch → render → deliver, then write the run report.
//!
//! Stages run strictly in sequence. A rendering failure ends the run
//! before delivery and marks it failed; so does a delivery error (which
//! can only be a failed local save).

use crate::aggregator::NewsAggregator;
use crate::delivery::NoteSender;
use crate::outputs::report::{self, RunReport, SendStep, StepReport};
use crate::outputs::{cards, digest};
use chrono::Local;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

pub struct Pipeline {
    aggregator: NewsAggregator,
    sender: NoteSender,
    output_dir: PathBuf,
    count: usize,
}

impl Pipeline {
    pub fn new(
        aggregator: NewsAggregator,
        sender: NoteSender,
        output_dir: impl Into<PathBuf>,
        count: usize,
    ) -> Self {
        Self {
            aggregator,
            sender,
            output_dir: output_dir.into(),
            count,
        }
    }

    /// Run every stage once. Delivery is skipped when `skip_send` is set.
    #[instrument(level = "info", skip(self), fields(count = self.count, output_dir = %self.output_dir.display()))]
    pub async fn run(&mut self, skip_send: bool) -> RunReport {
        let started = Local::now();
        let today = started.date_naive();
        let mut report = RunReport::started_at(started);

        // ---- Step 1: fetch ----
        let news = self.aggregator.fetch_news(self.count).await;
        info!(count = news.len(), "Fetched headlines");
        for (i, item) in news.iter().take(5).enumerate() {
            info!(rank = i + 1, category = %item.category, hot_score = item.hot_score, title = %item.title, "Top headline");
        }
        report.steps.fetch_news = Some(StepReport::fetched(news.len()));

        // ---- Step 2: cards ----
        let images = match cards::render_all(&news, today, &self.output_dir).await {
            Ok(images) => {
                info!(count = images.len(), "Rendered cards");
                report.steps.generate_images = Some(StepReport::rendered(images.clone()));
                images
            }
            Err(e) => {
                error!(error = %e, "Card rendering failed; skipping delivery");
                report.steps.generate_images = Some(StepReport::failed(&e));
                report.success = false;
                self.write(&report, started).await;
                return report;
            }
        };

        // ---- Step 3: delivery ----
        if skip_send {
            info!("Delivery skipped");
            report.steps.send_to_getnote = Some(SendStep::skipped());
        } else {
            let title = digest::digest_title(today);
            let content = digest::format_for_digest(&news, today);
            match self.sender.send(&title, &content, &images).await {
                Ok(delivered) => {
                    info!(method = ?delivered.method, message = %delivered.message, "Digest delivered");
                    report.steps.send_to_getnote = Some(SendStep::Delivered(delivered));
                }
                Err(e) => {
                    error!(error = %e, "Delivery failed");
                    report.steps.send_to_getnote = Some(SendStep::failed(&e));
                    report.success = false;
                }
            }
        }

        self.write(&report, started).await;
        report
    }

    async fn write(&self, report: &RunReport, at: chrono::DateTime<Local>) {
        if let Err(e) = report::write_report(report, &self.output_dir, at).await {
            warn!(error = %e, "Failed to write run report");
        }
    }
}
