// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod content_item;
pub mod job_log;
pub mod scraping_job;
pub mod source;
