//! 文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,
    pub class_id: i64,
    pub uploader_id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_stored_file(self) -> crate::models::files::entities::StoredFile {
        crate::models::files::entities::StoredFile {
            token: self.token,
            class_id: self.class_id,
            uploader_id: self.uploader_id,
            original_name: self.original_name,
            stored_name: self.stored_name,
            file_size: self.file_size,
            content_type: self.content_type,
            created_at: super::timestamp_to_datetime(self.created_at),
        }
    }
}
