//! Portrait story cards (1080×1920 SVG) for the day's headlines.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── tech_news_cover.svg    # banner + 2×2 grid of the top four
//! ├── tech_news_detail.svg   # numbered list of the top six
//! └── tech_news_summary.svg  # fixed trend cards + closing quote
//! ```
//!
//! Cards are assembled as SVG markup; every piece of headline text is
//! XML-escaped before it is embedded.

use crate::models::{Category, NewsItem};
use crate::utils::{ellipsize, truncate_chars, wrap_chars};
use chrono::NaiveDate;
use quick_xml::escape::escape;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

pub const COVER_FILE: &str = "tech_news_cover.svg";
pub const DETAIL_FILE: &str = "tech_news_detail.svg";
pub const SUMMARY_FILE: &str = "tech_news_summary.svg";

const WIDTH: u32 = 1080;
const HEIGHT: u32 = 1920;

const BG_TOP: &str = "#FFF5FA";
const BG_BOTTOM: &str = "#F0F8FF";
const PRIMARY: &str = "#FF6B6B";
const SECONDARY: &str = "#4ECDC4";
const TEXT_DARK: &str = "#2D3446";
const TEXT_LIGHT: &str = "#787878";
const WHITE: &str = "#FFFFFF";
const QUOTE_BG: &str = "#FFFAF0";

const FONT_STACK: &str = "'Noto Sans CJK SC', 'PingFang SC', 'Microsoft YaHei', sans-serif";

fn category_color(category: Category) -> &'static str {
    match category {
        Category::Ai => "#9370DB",
        Category::Hardware => "#FF8C42",
        Category::AutonomousDriving => "#32CD32",
        Category::Chip => "#1E90FF",
        Category::Metaverse => "#FF69B4",
        Category::Aerospace => "#4682B4",
        _ => PRIMARY,
    }
}

/// Horizontal anchor of a text run.
#[derive(Clone, Copy)]
enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Minimal SVG document builder.
struct Canvas {
    body: String,
}

impl Canvas {
    fn new() -> Self {
        let mut body = String::new();
        body.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="{FONT_STACK}">"#
        ));
        body.push_str(&format!(
            r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="0" y2="1"><stop offset="0%" stop-color="{BG_TOP}"/><stop offset="100%" stop-color="{BG_BOTTOM}"/></linearGradient></defs>"#
        ));
        body.push_str(&format!(
            r#"<rect x="0" y="0" width="{WIDTH}" height="{HEIGHT}" fill="url(#bg)"/>"#
        ));
        Self { body }
    }

    fn rounded_rect(&mut self, x: u32, y: u32, w: u32, h: u32, radius: u32, fill: &str) {
        self.body.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{radius}" ry="{radius}" fill="{fill}"/>"#
        ));
    }

    fn rect(&mut self, x: u32, y: u32, w: u32, h: u32, fill: &str) {
        self.body.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#
        ));
    }

    fn circle(&mut self, cx: u32, cy: u32, r: u32, fill: &str) {
        self.body.push_str(&format!(
            r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/>"#
        ));
    }

    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, x: u32, y: u32, size: u32, bold: bool, fill: &str, anchor: Anchor, content: &str) {
        let weight = if bold { "bold" } else { "normal" };
        self.body.push_str(&format!(
            r#"<text x="{x}" y="{y}" font-size="{size}" font-weight="{weight}" fill="{fill}" text-anchor="{}" dominant-baseline="middle">{}</text>"#,
            anchor.as_str(),
            escape(content)
        ));
    }

    fn finish(mut self) -> String {
        self.body.push_str("</svg>\n");
        self.body
    }
}

/// Category pill with the label centered inside.
#[allow(clippy::too_many_arguments)]
fn category_pill(canvas: &mut Canvas, x: u32, y: u32, w: u32, h: u32, category: Category, size: u32) {
    canvas.rounded_rect(x, y, w, h, h / 2, category_color(category));
    canvas.text(x + w / 2, y + h / 2, size, false, WHITE, Anchor::Middle, category.label());
}

/// Title banner plus a 2×2 grid of the four hottest headlines.
pub fn cover_svg(news: &[NewsItem], date: NaiveDate) -> String {
    let mut canvas = Canvas::new();

    let banner_y = 80;
    canvas.rounded_rect(60, banner_y, WIDTH - 120, 200, 30, WHITE);
    canvas.text(WIDTH / 2, banner_y + 60, 72, true, TEXT_DARK, Anchor::Middle, "▶ 全球科技早报");
    let day = date.format("%Y年%m月%d日").to_string();
    canvas.text(WIDTH / 2, banner_y + 140, 40, false, TEXT_LIGHT, Anchor::Middle, &day);

    let grid_y = banner_y + 280;
    let margin = 40;
    let card_w = (WIDTH - margin * 3) / 2;
    for (i, item) in news.iter().take(4).enumerate() {
        let (row, col) = (i as u32 / 2, i as u32 % 2);
        let x = margin + col * (card_w + margin);
        let y = grid_y + row * 320;

        canvas.rounded_rect(x, y, card_w, 280, 20, WHITE);
        category_pill(&mut canvas, x + 20, y + 20, 100, 35, item.category, 22);
        canvas.text(
            x + card_w - 20,
            y + 37,
            20,
            false,
            PRIMARY,
            Anchor::End,
            &format!("🔥{}", item.hot_score),
        );
        canvas.text(x + 20, y + 95, 28, true, TEXT_DARK, Anchor::Start, &ellipsize(&item.title, 18));
        canvas.text(
            x + 20,
            y + 145,
            22,
            false,
            TEXT_LIGHT,
            Anchor::Start,
            &format!("{}...", truncate_chars(&item.summary, 35)),
        );
        canvas.text(
            x + 20,
            y + 250,
            20,
            false,
            TEXT_LIGHT,
            Anchor::Start,
            &format!("📰 {}", item.source),
        );
    }

    canvas.text(WIDTH / 2, HEIGHT - 120, 28, false, TEXT_LIGHT, Anchor::Middle, "↓ 滑动查看更多科技资讯");
    canvas.finish()
}

/// Numbered cards for the six hottest headlines; the top three in coral.
pub fn detail_svg(news: &[NewsItem]) -> String {
    let mut canvas = Canvas::new();
    canvas.text(WIDTH / 2, 60, 56, true, TEXT_DARK, Anchor::Middle, "◆ 今日科技详情");

    let margin = 40;
    let item_h = 200;
    let card_x = margin + 70;
    let card_w = WIDTH - card_x - margin;
    let mut y = 140;

    for (i, item) in news.iter().take(6).enumerate() {
        let badge = if i < 3 { PRIMARY } else { SECONDARY };
        canvas.circle(margin + 25, y + 25, 25, badge);
        canvas.text(margin + 25, y + 25, 28, true, WHITE, Anchor::Middle, &(i + 1).to_string());

        canvas.rounded_rect(card_x, y, card_w, item_h, 15, WHITE);
        category_pill(&mut canvas, card_x + 15, y + 15, 85, 30, item.category, 20);
        canvas.text(
            card_x + card_w - 15,
            y + 30,
            20,
            false,
            PRIMARY,
            Anchor::End,
            &format!("HOT {}", item.hot_score),
        );
        canvas.text(card_x + 15, y + 80, 30, true, TEXT_DARK, Anchor::Start, &item.title);
        for (j, line) in wrap_chars(&item.summary, 32).iter().take(2).enumerate() {
            canvas.text(card_x + 15, y + 122 + j as u32 * 35, 24, false, TEXT_LIGHT, Anchor::Start, line);
        }
        canvas.text(
            card_x + 15,
            y + item_h - 22,
            20,
            false,
            TEXT_LIGHT,
            Anchor::Start,
            &format!("• {}", item.source),
        );

        y += item_h + 20;
    }

    canvas.finish()
}

/// Fixed trend overview; independent of the day's headlines.
pub fn summary_svg() -> String {
    let trends = [
        ("AI AI革命", "大模型能力持续突破，多模态成为标配", Category::Ai),
        ("● 智能驾驶", "自动驾驶技术加速落地，L4级即将商用", Category::AutonomousDriving),
        ("■ 芯片战争", "AI芯片算力竞赛白热化，3nm成主流", Category::Chip),
        ("◎ AR/VR", "空间计算时代来临，头显设备轻量化", Category::Hardware),
    ];

    let mut canvas = Canvas::new();
    canvas.text(WIDTH / 2, 100, 64, true, TEXT_DARK, Anchor::Middle, "★ 科技趋势洞察");

    let card_h = 180;
    let gap = 50;
    for (i, (title, desc, category)) in trends.iter().enumerate() {
        let y = 250 + i as u32 * (card_h + gap);
        canvas.rounded_rect(80, y, WIDTH - 160, card_h, 25, WHITE);
        canvas.rect(80, y, 20, card_h, category_color(*category));
        canvas.text(130, y + 60, 40, true, TEXT_DARK, Anchor::Start, title);
        canvas.text(130, y + 114, 28, false, TEXT_LIGHT, Anchor::Start, desc);
    }

    let quote_y = HEIGHT - 200;
    canvas.rounded_rect(80, quote_y, WIDTH - 160, 150, 20, QUOTE_BG);
    canvas.text(WIDTH / 2, quote_y + 40, 32, false, TEXT_DARK, Anchor::Middle, "\"科技改变世界，创新引领未来\"");
    canvas.text(WIDTH / 2, quote_y + 100, 24, false, TEXT_LIGHT, Anchor::Middle, "每天3分钟，掌握全球科技动态 ▶");

    canvas.finish()
}

/// Write all three cards into `output_dir`, returning their paths in
/// cover, detail, summary order.
#[instrument(level = "info", skip(news), fields(output_dir = %output_dir.display(), items = news.len()))]
pub async fn render_all(news: &[NewsItem], date: NaiveDate, output_dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir).await?;

    let cards = [
        (COVER_FILE, cover_svg(news, date)),
        (DETAIL_FILE, detail_svg(news)),
        (SUMMARY_FILE, summary_svg()),
    ];

    let mut paths = Vec::with_capacity(cards.len());
    for (name, svg) in cards {
        let path = output_dir.join(name);
        fs::write(&path, svg).await?;
        info!(path = %path.display(), "Wrote card");
        paths.push(path);
    }
    Ok(paths)
}
