// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心业务实体、服务和仓库接口
pub mod domain;

/// 提取模块
///
/// 实现文章字段的三级级联提取、噪声过滤与质量评分
pub mod extraction;

/// 健康度模块
///
/// 跟踪信息源的滚动成功率、响应时间与连续失败计数
pub mod health;

/// 订阅源模块
///
/// 负责抓取与解析 RSS/Atom 订阅源并产出候选文章
pub mod ingest;

/// 基础设施模块
///
/// 提供外部服务集成，如数据库、HTTP客户端等
pub mod infrastructure;

/// 编排模块
///
/// 实现抓取作业的生命周期管理、工作池调度与计数聚合
pub mod orchestrator;

/// 表示层模块
///
/// 处理HTTP请求和响应，包括路由和处理器
pub mod presentation;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
