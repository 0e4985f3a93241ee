// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ExtractionConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

/// 段落分隔符
///
/// 三重换行是全链路统一的段落边界（双换行保留给段落内软换行），
/// 存储与下游消费方均以它切分段落。
pub const PARAGRAPH_SEPARATOR: &str = "\n\n\n";

static P_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());
static A_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").unwrap());
static SOFT_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{2,}").unwrap());

/// 从容器元素按段落粒度收集正文
///
/// 逐个 `<p>` 元素收集文本并应用噪声过滤，绝不把容器当作
/// 一整块不透明文本。
pub fn harvest(container: ElementRef, config: &ExtractionConfig) -> Vec<String> {
    let mut candidates = Vec::new();

    for p in container.select(&P_SELECTOR) {
        let text = normalize_whitespace(&p.text().collect::<String>());
        if text.is_empty() {
            continue;
        }
        if has_caption_ancestor(p, config) {
            continue;
        }
        if is_promo_link_block(p, &text) {
            continue;
        }
        candidates.push(text);
    }

    apply_length_filter(candidates, config.min_paragraph_len)
}

/// 从纯文本块（如 JSON-LD 的 articleBody）切分段落
///
/// 噪声过滤同样适用于正文候选段落，与所在层无关；
/// 纯文本没有元素上下文，因此只应用长度过滤。
pub fn from_text_block(raw: &str, config: &ExtractionConfig) -> Vec<String> {
    let candidates: Vec<String> = SOFT_BREAKS
        .split(raw)
        .map(normalize_whitespace)
        .filter(|p| !p.is_empty())
        .collect();

    apply_length_filter(candidates, config.min_paragraph_len)
}

/// 将过滤后的段落重建为正文
pub fn reconstruct(paragraphs: &[String]) -> String {
    paragraphs.join(PARAGRAPH_SEPARATOR)
}

/// 将正文重新切分为段落（reconstruct 的逆操作）
pub fn split_body(body: &str) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split(PARAGRAPH_SEPARATOR).map(String::from).collect()
}

/// 长度过滤：短于阈值的段落被丢弃，除非它是唯一的段落
fn apply_length_filter(candidates: Vec<String>, min_len: usize) -> Vec<String> {
    if candidates.len() == 1 {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|p| p.chars().count() >= min_len)
        .collect()
}

/// 判断段落是否位于媒体说明容器内
///
/// 说明文字在视觉上从属于媒体而非正文。检查元素祖先链中
/// 是否存在 figure/figcaption 或配置的说明类名。
fn has_caption_ancestor(p: ElementRef, config: &ExtractionConfig) -> bool {
    for ancestor in p.ancestors() {
        if let Some(el) = ElementRef::wrap(ancestor) {
            let name = el.value().name();
            if name == "figure" || name == "figcaption" {
                return true;
            }
            if el
                .value()
                .classes()
                .any(|c| config.caption_classes.iter().any(|cc| cc == c))
            {
                return true;
            }
        }
    }
    false
}

/// 判断段落是否为推广链接块
///
/// 全大写且整体等于其唯一超链接文本的段落（"RELATED: SEE ALSO"
/// 一类）可靠地命中推广块，而不会误伤正常的短标题。
fn is_promo_link_block(p: ElementRef, text: &str) -> bool {
    if !text.chars().any(|c| c.is_alphabetic()) {
        return false;
    }
    if text != text.to_uppercase() {
        return false;
    }

    let links: Vec<ElementRef> = p.select(&A_SELECTOR).collect();
    if links.len() != 1 {
        return false;
    }

    normalize_whitespace(&links[0].text().collect::<String>()) == text
}

/// 折叠空白字符
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
