//! 回答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub question_id: i64,
    pub author_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub attachments: String,
    #[sea_orm(column_type = "Text")]
    pub upvoters: String,
    #[sea_orm(column_type = "Text")]
    pub downvoters: String,
    pub is_accepted: bool,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::answers::entities::Answer {
        use crate::models::answers::entities::Answer;
        use crate::models::common::VoteLedger;
        use super::{parse_json_column, timestamp_to_datetime};

        Answer {
            id: self.id,
            question_id: self.question_id,
            author_id: self.author_id,
            content: self.content,
            attachments: parse_json_column(&self.attachments),
            votes: VoteLedger {
                upvoters: parse_json_column(&self.upvoters),
                downvoters: parse_json_column(&self.downvoters),
            },
            is_accepted: self.is_accepted,
            is_active: self.is_active,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        }
    }
}
