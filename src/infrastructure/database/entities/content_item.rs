// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source_id: Uuid,
    pub job_id: Uuid,
    pub source_url: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_at_raw: Option<String>,
    pub published_at: Option<ChronoDateTimeWithTimeZone>,
    pub body: String,
    pub language: String,
    pub processing_status: String,
    pub quality_score: i32,
    pub content_hash: String,
    pub created_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
