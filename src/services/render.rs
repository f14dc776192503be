//! 生成结果渲染
//!
//! 先把题目集合转换为类型化的渲染树，再由具体的渲染器输出 HTML 或纯文本。
//! 所有转义只发生在 HTML 渲染器中。

use serde::Serialize;

use crate::models::generation::{QuestionItem, QuestionSet};
use crate::models::question::QuestionType;

/// HTML 转义
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// 单道题目节点
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemNode {
    pub text: String,
    pub options: Vec<String>,
}

impl From<&QuestionItem> for ItemNode {
    fn from(item: &QuestionItem) -> Self {
        Self {
            text: item.text.clone(),
            options: item.options.clone().unwrap_or_default(),
        }
    }
}

/// 一个题型分组
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySection {
    pub category: QuestionType,
    pub title: &'static str,
    pub items: Vec<ItemNode>,
}

impl CategorySection {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// 渲染树：每个题型一个分组，顺序固定
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedSet {
    pub sections: Vec<CategorySection>,
}

impl RenderedSet {
    pub fn from_question_set(set: &QuestionSet) -> Self {
        let sections = QuestionType::ALL
            .iter()
            .map(|&category| CategorySection {
                category,
                title: category.label(),
                items: set.items(category).iter().map(ItemNode::from).collect(),
            })
            .collect();

        Self { sections }
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(CategorySection::count).sum()
    }

    pub fn render_with<R: Renderer + ?Sized>(&self, renderer: &R) -> String {
        renderer.render(self)
    }
}

/// 渲染器
pub trait Renderer {
    fn render(&self, set: &RenderedSet) -> String;
}

/// 输出 HTML 片段，所有文本都经过转义
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, set: &RenderedSet) -> String {
        let mut html = String::new();
        for section in &set.sections {
            html.push_str(&format!(
                "<h4 class=\"ai-title\">{} <small>({})</small></h4>",
                escape_html(section.title),
                section.count()
            ));
            html.push_str("<ol class=\"ai-list\">");
            for item in &section.items {
                html.push_str("<li>");
                html.push_str(&escape_html(&item.text));
                if !item.options.is_empty() {
                    html.push_str("<ul class=\"ai-options\">");
                    for option in &item.options {
                        html.push_str(&format!("<li>{}</li>", escape_html(option)));
                    }
                    html.push_str("</ul>");
                }
                html.push_str("</li>");
            }
            html.push_str("</ol>");
        }
        html
    }
}

/// 输出终端可读的纯文本
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    fn render(&self, set: &RenderedSet) -> String {
        let mut lines = Vec::new();
        for section in &set.sections {
            lines.push(format!("{} ({})", section.title, section.count()));
            for (i, item) in section.items.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, item.text));
                for (j, option) in item.options.iter().enumerate() {
                    lines.push(format!("     {}) {}", option_label(j), option));
                }
            }
        }
        lines.join("\n")
    }
}

fn option_label(index: usize) -> char {
    char::from_u32('A' as u32 + (index % 26) as u32).unwrap_or('?')
}
