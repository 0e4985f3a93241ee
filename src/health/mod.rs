// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 信息源健康度模块

pub mod tracker;

pub use tracker::{HealthConfig, SourceHealthTracker};
