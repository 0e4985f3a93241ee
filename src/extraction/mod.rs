// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提取引擎
pub mod engine;

/// 段落收集、噪声过滤与重建
pub mod paragraphs;

/// 提取规则表
pub mod rules;

/// 结构化数据层（JSON-LD）
pub mod structured;

/// 提取轨迹
pub mod trace;

use crate::config::settings::ExtractionSettings;

/// 提取配置
///
/// 噪声过滤阈值与质量阈值是可调参数，应针对实际源语料验证，
/// 不应视为硬编码常量。
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// 段落最小长度（字符），低于该值且非唯一段落时被丢弃
    pub min_paragraph_len: usize,
    /// 被视为媒体说明容器的祖先class列表
    pub caption_classes: Vec<String>,
    /// 质量评分阈值
    pub quality_threshold: u8,
    /// 轨迹中记录的匹配值前缀长度
    pub trace_prefix_len: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_paragraph_len: 30,
            caption_classes: vec![
                "caption".to_string(),
                "media-caption".to_string(),
                "video-caption".to_string(),
                "image-caption".to_string(),
            ],
            quality_threshold: 45,
            trace_prefix_len: 80,
        }
    }
}

impl From<&ExtractionSettings> for ExtractionConfig {
    fn from(settings: &ExtractionSettings) -> Self {
        Self {
            min_paragraph_len: settings.min_paragraph_len,
            caption_classes: settings.caption_classes.clone(),
            quality_threshold: settings.quality_threshold,
            trace_prefix_len: 80,
        }
    }
}
