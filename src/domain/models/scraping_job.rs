// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 抓取作业实体
///
/// 表示编排器对一组信息源的一次执行。作业由触发创建，
/// 仅由编排器修改，进入终态后不可再变更。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapingJob {
    /// 作业唯一标识符
    pub id: Uuid,
    /// 请求抓取的信息源ID集合
    pub source_ids: Vec<Uuid>,
    /// 每个源的目标文章数
    pub articles_per_source: u32,
    /// 作业状态
    pub status: JobStatus,
    /// 已抓取文章总数
    pub total_articles: i32,
    /// 错误总数（源级与文章级）
    pub total_errors: i32,
    /// 触发时间
    pub triggered_at: DateTime<Utc>,
    /// 开始执行时间
    pub started_at: Option<DateTime<Utc>>,
    /// 完成时间
    pub completed_at: Option<DateTime<Utc>>,
}

/// 作业状态枚举
///
/// 状态转换遵循以下流程：
/// New → InProgress → Successful/Partial/Failed，
/// 另有 InProgress → Cancelled（显式取消请求）。
/// 终态之间以及终态到非终态的转换均不允许。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 新建，尚未开始执行
    #[default]
    New,
    /// 执行中
    InProgress,
    /// 成功：所有源处理完成且零错误
    Successful,
    /// 部分成功：至少抓取到一篇文章且至少发生一次错误
    Partial,
    /// 失败：没有抓取到任何文章
    Failed,
    /// 已取消
    Cancelled,
}

impl JobStatus {
    /// 判断是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Successful | JobStatus::Partial | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    /// 根据作业计数推导终态
    ///
    /// 零错误的作业视为成功（没有候选文章不等于失败）；
    /// 有错误但抓到了文章的作业为部分成功；一篇未抓到则失败。
    pub fn terminal_for(total_articles: i32, total_errors: i32) -> JobStatus {
        if total_errors == 0 {
            JobStatus::Successful
        } else if total_articles > 0 {
            JobStatus::Partial
        } else {
            JobStatus::Failed
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::New => write!(f, "new"),
            JobStatus::InProgress => write!(f, "in_progress"),
            JobStatus::Successful => write!(f, "successful"),
            JobStatus::Partial => write!(f, "partial"),
            JobStatus::Failed => write!(f, "failed"),
            JobStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(JobStatus::New),
            "in_progress" => Ok(JobStatus::InProgress),
            "successful" => Ok(JobStatus::Successful),
            "partial" => Ok(JobStatus::Partial),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" => Ok(JobStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换，当作业状态转换不符合生命周期规则时发生
    #[error("Invalid state transition")]
    InvalidStateTransition,

    /// 验证错误，当输入数据不符合领域规则时发生
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ScrapingJob {
    /// 创建一个新的抓取作业
    ///
    /// # 参数
    ///
    /// * `source_ids` - 请求抓取的信息源ID集合
    /// * `articles_per_source` - 每个源的目标文章数
    ///
    /// # 返回值
    ///
    /// 返回新创建的作业实例（状态为 New）
    pub fn new(source_ids: Vec<Uuid>, articles_per_source: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_ids,
            articles_per_source,
            status: JobStatus::New,
            total_articles: 0,
            total_errors: 0,
            triggered_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }

    /// 启动作业
    ///
    /// 将作业状态从 New 变更为 InProgress
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapingJob)` - 成功启动的作业
    /// * `Err(DomainError)` - 状态转换失败
    pub fn start(mut self) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::New => {
                self.status = JobStatus::InProgress;
                self.started_at = Some(Utc::now());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成作业
    ///
    /// 根据最终计数将作业从 InProgress 变更为对应终态
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapingJob)` - 已进入终态的作业
    /// * `Err(DomainError)` - 状态转换失败
    pub fn finish(mut self, total_articles: i32, total_errors: i32) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::InProgress => {
                self.status = JobStatus::terminal_for(total_articles, total_errors);
                self.total_articles = total_articles;
                self.total_errors = total_errors;
                self.completed_at = Some(Utc::now());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 取消作业
    ///
    /// 将作业状态从 InProgress 变更为 Cancelled，保留已累计的计数
    ///
    /// # 返回值
    ///
    /// * `Ok(ScrapingJob)` - 已取消的作业
    /// * `Err(DomainError)` - 状态转换失败
    pub fn cancel(mut self, total_articles: i32, total_errors: i32) -> Result<Self, DomainError> {
        match self.status {
            JobStatus::InProgress => {
                self.status = JobStatus::Cancelled;
                self.total_articles = total_articles;
                self.total_errors = total_errors;
                self.completed_at = Some(Utc::now());
                Ok(self)
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }
}
