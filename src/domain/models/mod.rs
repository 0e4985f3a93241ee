// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 抓取内容条目实体
pub mod content_item;

/// 作业日志实体
pub mod log_entry;

/// 抓取作业实体
pub mod scraping_job;

/// 信息源实体
pub mod source;
