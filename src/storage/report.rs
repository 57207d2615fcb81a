//! Report rendering.
//!
//! The on-disk layout follows the established report format: one
//! paragraph per reference, one block per article with literal
//! `链接/标题/摘要/全文链接` fields and an 80-dash separator after each
//! block. Missing fields render as fixed "not found" strings.

use crate::models::CitationReport;

const SEPARATOR_WIDTH: usize = 80;

const MISSING_ARTICLE: &str = "没有找到相关论文";
const MISSING_TITLE: &str = "没有找到标题内容";
const MISSING_ABSTRACT: &str = "没有找到摘要内容";
const MISSING_FULL_TEXT: &str = "没有找到全文链接";

/// Render all citation groups into the report text.
///
/// Every group emits exactly as many blocks as it holds records, so the
/// report layout always matches the progress accounting.
pub fn render_report(groups: &[CitationReport]) -> String {
    let mut out = String::new();

    for (i, group) in groups.iter().enumerate() {
        out.push_str(&format!("引用信息 {}:\n{}\n\n", i + 1, group.citation.text));

        for (j, record) in group.records.iter().enumerate() {
            out.push_str(&format!("论文 {}.{}:\n", i + 1, j + 1));
            out.push_str(&format!(
                "链接: {}\n",
                record.url.as_deref().unwrap_or(MISSING_ARTICLE)
            ));
            out.push_str(&format!(
                "标题: {}\n",
                record.title.as_deref().unwrap_or(MISSING_TITLE)
            ));
            out.push_str(&format!(
                "摘要: {}\n",
                record.abstract_text.as_deref().unwrap_or(MISSING_ABSTRACT)
            ));
            out.push_str(&format!(
                "全文链接: {}\n",
                record.full_text_url.as_deref().unwrap_or(MISSING_FULL_TEXT)
            ));
            out.push_str(&format!("\n{}\n\n", "-".repeat(SEPARATOR_WIDTH)));
        }
    }

    out
}
