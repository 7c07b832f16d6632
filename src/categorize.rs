//! Keyword-table headline categorizer.
//!
//! Two fixed tables map keywords to a [`Category`]: one for English
//! headlines (matched on the lowercased title) and one for Chinese headlines
//! (matched exactly, since the keywords mix scripts and casing matters for
//! acronyms like `AI`). Tables are scanned in declaration order and the
//! first category with any keyword hit wins, so a headline mentioning both
//! an AI and a chip keyword is always filed under AI.

use crate::models::{Category, Script};

type KeywordTable = [(Category, &'static [&'static str])];

const LATIN_TABLE: &KeywordTable = &[
    (
        Category::Ai,
        &[
            "ai",
            "artificial intelligence",
            "gpt",
            "chatgpt",
            "openai",
            "llm",
            "machine learning",
            "deep learning",
            "neural",
            "google gemini",
            "claude",
        ],
    ),
    (
        Category::Chip,
        &[
            "chip",
            "gpu",
            "cpu",
            "semiconductor",
            "nvidia",
            "intel",
            "amd",
            "tsmc",
            "3nm",
            "5nm",
        ],
    ),
    (
        Category::AutonomousDriving,
        &[
            "tesla",
            "self-driving",
            "autonomous",
            "fsd",
            "electric vehicle",
            "ev",
            "car",
        ],
    ),
    (
        Category::Hardware,
        &[
            "iphone",
            "apple",
            "vision pro",
            "meta quest",
            "vr",
            "ar",
            "headset",
            "smartphone",
        ],
    ),
    (
        Category::Metaverse,
        &[
            "metaverse",
            "virtual reality",
            "augmented reality",
            "vr",
            "ar",
            "meta",
        ],
    ),
    (
        Category::Aerospace,
        &[
            "spacex",
            "space",
            "rocket",
            "mars",
            "satellite",
            "starlink",
            "nasa",
        ],
    ),
    (
        Category::Blockchain,
        &["bitcoin", "crypto", "blockchain", "ethereum", "nft", "web3"],
    ),
    (
        Category::Cloud,
        &["cloud", "aws", "azure", "google cloud", "server"],
    ),
];

const CJK_TABLE: &KeywordTable = &[
    (
        Category::Ai,
        &[
            "AI", "人工智能", "GPT", "ChatGPT", "大模型", "OpenAI", "文心", "通义", "讯飞",
        ],
    ),
    (
        Category::Chip,
        &[
            "芯片", "GPU", "CPU", "半导体", "英伟达", "英特尔", "AMD", "台积电", "光刻",
        ],
    ),
    (
        Category::AutonomousDriving,
        &[
            "特斯拉",
            "自动驾驶",
            "FSD",
            "电动车",
            "新能源汽车",
            "比亚迪",
            "蔚来",
        ],
    ),
    (
        Category::Hardware,
        &[
            "iPhone",
            "苹果",
            "Vision Pro",
            "Meta",
            "VR",
            "AR",
            "头显",
            "手机",
            "小米",
        ],
    ),
    (
        Category::Metaverse,
        &["元宇宙", "虚拟现实", "增强现实", "VR", "AR"],
    ),
    (
        Category::Aerospace,
        &[
            "SpaceX", "航天", "火箭", "火星", "卫星", "星链", "NASA", "中国航天",
        ],
    ),
    (
        Category::Blockchain,
        &["比特币", "加密货币", "区块链", "以太坊", "NFT", "Web3"],
    ),
    (
        Category::Cloud,
        &["云计算", "阿里云", "腾讯云", "AWS", "服务器"],
    ),
];

/// Map a headline to its category using the table for `script`.
///
/// Always returns a label; [`Category::Tech`] when nothing matches.
pub fn categorize(title: &str, script: Script) -> Category {
    match script {
        Script::Latin => scan(LATIN_TABLE, &title.to_lowercase()),
        Script::Cjk => scan(CJK_TABLE, title),
    }
}

fn scan(table: &KeywordTable, haystack: &str) -> Category {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| haystack.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}
