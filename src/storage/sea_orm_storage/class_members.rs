//! 班级成员存储操作

use super::{SeaOrmStorage, is_unique_violation};
use crate::entity::class_members::{ActiveModel, Column, Entity as ClassMembers};
use crate::entity::users::Entity as Users;
use crate::errors::{ClassQAError, Result};
use crate::models::class_members::entities::{ClassMember, ClassMemberProfile, ClassMemberRole};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 添加班级成员
    ///
    /// (class_id, user_id) 上有唯一索引，重复加入返回 Conflict。
    pub async fn add_class_member_impl(
        &self,
        class_id: i64,
        user_id: i64,
        role: ClassMemberRole,
    ) -> Result<ClassMember> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                ClassQAError::conflict(format!("用户 {user_id} 已是班级 {class_id} 的成员"))
            } else {
                ClassQAError::database_operation(format!("加入班级失败: {e}"))
            }
        })?;

        Ok(result.into_class_member())
    }

    /// 移除班级成员
    pub async fn remove_class_member_impl(&self, class_id: i64, user_id: i64) -> Result<bool> {
        let result = ClassMembers::delete_many()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("移除班级成员失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 列出班级成员及用户资料
    pub async fn list_class_member_profiles_impl(
        &self,
        class_id: i64,
    ) -> Result<Vec<ClassMemberProfile>> {
        let rows = ClassMembers::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id)
            .find_also_related(Users)
            .all(&self.db)
            .await
            .map_err(|e| ClassQAError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(rows
            .into_iter()
            .map(|(member, user)| {
                let (username, display_name, avatar_url) = match user {
                    Some(user) => (user.username, user.display_name, user.avatar_url),
                    None => (String::new(), None, None),
                };
                ClassMemberProfile {
                    member: member.into_class_member(),
                    username,
                    display_name,
                    avatar_url,
                }
            })
            .collect())
    }
}
