// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 错误类型定义
pub mod errors;

/// 内容哈希工具
pub mod hash;

/// Robots.txt 检查器
pub mod robots;

/// 遥测与日志初始化
pub mod telemetry;
