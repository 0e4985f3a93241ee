// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 内容条目仓库接口
pub mod content_repository;

/// 作业仓库接口
pub mod job_repository;

/// 日志仓库接口
pub mod log_repository;

/// 信息源仓库接口
pub mod source_repository;
