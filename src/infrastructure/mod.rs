// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 基础设施层
//!
//! HTTP客户端、数据库连接与实体、仓储实现。

pub mod database;
pub mod http;
pub mod repositories;
