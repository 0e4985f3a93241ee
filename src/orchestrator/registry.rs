// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// 协作式取消标志
///
/// 工作协程只在检查点（文章之间、源之间）读取该标志，
/// 绝不中断进行中的请求。
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// 创建未触发的取消标志
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// 是否已请求取消
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 运行中作业注册表
///
/// 维护作业ID到取消标志的映射。作业进入终态后从注册表移除，
/// 对已移除作业的取消请求不产生任何效果。
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: DashMap<Uuid, CancelFlag>,
}

impl JobRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个开始执行的作业，返回其取消标志
    pub fn register(&self, job_id: Uuid) -> CancelFlag {
        let flag = CancelFlag::new();
        self.jobs.insert(job_id, flag.clone());
        flag
    }

    /// 请求取消一个运行中的作业
    ///
    /// 返回 false 表示该作业不在运行中。
    pub fn request_cancel(&self, job_id: Uuid) -> bool {
        match self.jobs.get(&job_id) {
            Some(flag) => {
                flag.cancel();
                true
            }
            None => false,
        }
    }

    /// 作业结束后移除注册
    pub fn remove(&self, job_id: Uuid) {
        self.jobs.remove(&job_id);
    }

    /// 作业是否在运行中
    pub fn is_running(&self, job_id: Uuid) -> bool {
        self.jobs.contains_key(&job_id)
    }
}
