//! Plain-text digest posted as the note body.
//!
//! The layout is a fixed template: a header with the day, the five hottest
//! headlines, up to two titles per category (categories in the order they
//! first appear in the ranked list), and a closing blurb with hashtags.

use crate::models::NewsItem;
use crate::utils::truncate_chars;
use chrono::NaiveDate;
use itertools::Itertools;
use std::fmt;

const RULE: &str = "====================";
const TOP_N: usize = 5;
const PER_CATEGORY: usize = 2;
const SUMMARY_CHARS: usize = 50;

/// Note title for `date`, e.g. `🚀 全球科技早报 | 05月06日`.
pub fn digest_title(date: NaiveDate) -> String {
    format!("🚀 全球科技早报 | {}", date.format("%m月%d日"))
}

/// Render the digest body for `news`, already ranked.
pub fn format_for_digest(news: &[NewsItem], date: NaiveDate) -> String {
    Digest { news, date }.to_string()
}

struct Digest<'a> {
    news: &'a [NewsItem],
    date: NaiveDate,
}

impl fmt::Display for Digest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "▶ 全球科技早报 | {}", self.date.format("%m月%d日"))?;
        writeln!(f, "{RULE}\n")?;

        writeln!(f, "HOT 今日热点 TOP 5\n")?;
        for (i, item) in self.news.iter().take(TOP_N).enumerate() {
            writeln!(f, "{}. {}", i + 1, item.title)?;
            writeln!(f, "   {}...", truncate_chars(&item.summary, SUMMARY_CHARS))?;
            writeln!(f, "   热度: {}/100 | 来源: {}\n", item.hot_score, item.from_api)?;
        }
        writeln!(f, "{RULE}\n")?;

        for category in self.news.iter().map(|n| n.category).unique() {
            writeln!(f, "# {category}")?;
            for item in self
                .news
                .iter()
                .filter(|n| n.category == category)
                .take(PER_CATEGORY)
            {
                writeln!(f, "• {}", item.title)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "{RULE}\n")?;
        writeln!(f, "今日思考")?;
        writeln!(f, "科技改变世界，每一天都有新的突破。保持关注，把握未来趋势！\n")?;
        writeln!(f, "#科技新闻 #AI #人工智能 #科技早报")?;
        write!(f, "#硅谷 #特斯拉 #OpenAI #谷歌 #微软")
    }
}
