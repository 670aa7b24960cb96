//! 问题实体
//!
//! 标签、附件与投票集合以 JSON 文本存放在同一行中。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub author_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub tags: String,
    #[sea_orm(column_type = "Text")]
    pub attachments: String,
    #[sea_orm(column_type = "Text")]
    pub upvoters: String,
    #[sea_orm(column_type = "Text")]
    pub downvoters: String,
    pub is_resolved: bool,
    pub is_pinned: bool,
    pub is_active: bool,
    pub view_count: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(has_many = "super::answers::Entity")]
    Answers,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_question(self) -> crate::models::questions::entities::Question {
        use crate::models::common::VoteLedger;
        use crate::models::questions::entities::Question;
        use super::{parse_json_column, timestamp_to_datetime};

        Question {
            id: self.id,
            class_id: self.class_id,
            author_id: self.author_id,
            title: self.title,
            description: self.description,
            tags: parse_json_column(&self.tags),
            attachments: parse_json_column(&self.attachments),
            votes: VoteLedger {
                upvoters: parse_json_column(&self.upvoters),
                downvoters: parse_json_column(&self.downvoters),
            },
            is_resolved: self.is_resolved,
            is_pinned: self.is_pinned,
            is_active: self.is_active,
            view_count: self.view_count,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
