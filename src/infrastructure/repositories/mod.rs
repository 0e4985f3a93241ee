// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod content_repo_impl;
pub mod job_repo_impl;
pub mod log_repo_impl;
pub mod source_repo_impl;

pub use content_repo_impl::ContentRepositoryImpl;
pub use job_repo_impl::JobRepositoryImpl;
pub use log_repo_impl::LogRepositoryImpl;
pub use source_repo_impl::SourceRepositoryImpl;
