//! Built-in headlines used when no live source returns anything.
//!
//! The list is only ever a complete substitute for live results. It can be
//! replaced through the `fallback` key of the config file.

use crate::models::{ApiTag, Category, NewsItem};

fn mock(title: &str, summary: &str, source: &str, category: Category, hot_score: u32) -> NewsItem {
    NewsItem {
        title: title.to_string(),
        summary: summary.to_string(),
        source: source.to_string(),
        category,
        hot_score,
        url: String::new(),
        published_at: String::new(),
        from_api: ApiTag::Mock,
    }
}

/// The eight default fallback items, already in descending score order.
pub fn default_dataset() -> Vec<NewsItem> {
    vec![
        mock(
            "OpenAI发布GPT-5，多模态能力大幅提升",
            "OpenAI今日发布新一代大模型GPT-5，支持文本、图像、音频、视频多模态输入，推理能力较前代提升40%。",
            "TechCrunch",
            Category::Ai,
            98,
        ),
        mock(
            "苹果Vision Pro 2代曝光：更轻更薄，价格减半",
            "据供应链消息，苹果第二代Vision Pro头显设备重量将减轻30%，售价有望降至1999美元起。",
            "Bloomberg",
            Category::Hardware,
            95,
        ),
        mock(
            "特斯拉FSD V13实现完全无人驾驶，马斯克称即将全球推送",
            "特斯拉宣布FSD V13版本在内部测试中实现零干预驾驶，计划下月向美国用户全面推送。",
            "Reuters",
            Category::AutonomousDriving,
            92,
        ),
        mock(
            "英伟达发布H200 GPU，AI算力再翻倍",
            "英伟达在GTC大会上发布新一代AI芯片H200，采用3nm工艺，训练大模型速度提升2.5倍。",
            "The Verge",
            Category::Chip,
            90,
        ),
        mock(
            "微软Copilot整合GPT-5，Office套件全面AI化",
            "微软宣布将GPT-5深度整合进Office 365，Word、Excel、PPT将迎来革命性AI功能升级。",
            "Wired",
            Category::Ai,
            88,
        ),
        mock(
            "谷歌Gemini 2.0挑战GPT-5，多语言支持领先",
            "谷歌发布Gemini 2.0，支持超过100种语言，在代码生成和数学推理方面表现优异。",
            "Ars Technica",
            Category::Ai,
            85,
        ),
        mock(
            "Meta元宇宙部门首次盈利，VR用户破千万",
            "Meta Reality Labs季度营收首次超过成本，Quest系列VR头显全球销量突破1000万台。",
            "CNBC",
            Category::Metaverse,
            82,
        ),
        mock(
            "SpaceX星舰第五次试飞成功，火星计划提速",
            "星舰成功完成第五次轨道试飞，马斯克表示2026年载人火星任务准备就绪。",
            "SpaceNews",
            Category::Aerospace,
            80,
        ),
    ]
}
