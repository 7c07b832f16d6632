//! Everything the pipeline writes or posts after aggregation.
//!
//! # Submodules
//!
//! - [`digest`]: Plain-text note body and title
//! - [`cards`]: The three SVG story cards
//! - [`report`]: Per-run JSON report
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── tech_news_cover.svg
//! ├── tech_news_detail.svg
//! ├── tech_news_summary.svg
//! ├── report_20250506_083001.json
//! └── 20250506/              # only when the note was saved locally
//!     ├── note.txt
//!     ├── image_1.svg
//!     └── 导入指南.txt
//! ```

pub mod cards;
pub mod digest;
pub mod report;
