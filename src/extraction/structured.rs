// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde_json::Value;

static LD_JSON_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// 结构化数据层的提取结果
///
/// 每个字段独立取第一个类型正确的匹配值。
#[derive(Debug, Default)]
pub struct StructuredFields {
    /// headline
    pub headline: Option<String>,
    /// author（字符串、对象 name 或数组首元素）
    pub author: Option<String>,
    /// datePublished 原始字符串
    pub date_published: Option<String>,
    /// articleBody 原始文本
    pub article_body: Option<String>,
}

/// 解析文档中全部 JSON-LD 块并收集文章字段
///
/// 无法解析的块被跳过；数组与 `@graph` 容器会被展开。
pub fn extract_structured(doc: &Html) -> StructuredFields {
    let mut fields = StructuredFields::default();

    for script in doc.select(&LD_JSON_SELECTOR) {
        let raw = script.text().collect::<String>();
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(_) => continue,
        };

        for object in candidate_objects(&value) {
            fill_from_object(&mut fields, object);
        }

        if fields.headline.is_some()
            && fields.author.is_some()
            && fields.date_published.is_some()
            && fields.article_body.is_some()
        {
            break;
        }
    }

    fields
}

/// 展开顶层值为候选对象列表
fn candidate_objects(value: &Value) -> Vec<&Value> {
    let mut objects = Vec::new();
    match value {
        Value::Object(map) => {
            objects.push(value);
            if let Some(Value::Array(graph)) = map.get("@graph") {
                objects.extend(graph.iter().filter(|v| v.is_object()));
            }
        }
        Value::Array(items) => {
            for item in items {
                objects.extend(candidate_objects(item));
            }
        }
        _ => {}
    }
    objects
}

/// 从单个对象填充未命中的字段
fn fill_from_object(fields: &mut StructuredFields, object: &Value) {
    if fields.headline.is_none() {
        fields.headline = non_empty_string(object.get("headline"));
    }
    if fields.author.is_none() {
        fields.author = object.get("author").and_then(author_name);
    }
    if fields.date_published.is_none() {
        fields.date_published = non_empty_string(object.get("datePublished"));
    }
    if fields.article_body.is_none() {
        fields.article_body = non_empty_string(object.get("articleBody"));
    }
}

/// 解析 author 值：字符串、{name} 对象或二者的数组
fn author_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Object(map) => map.get("name").and_then(author_name),
        Value::Array(items) => items.iter().find_map(author_name),
        _ => None,
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value.and_then(|v| v.as_str()).and_then(|s| {
        let trimmed = s.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
