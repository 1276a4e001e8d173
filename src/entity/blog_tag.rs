use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::{SoftDeleteEntity, SoftDeleteModel};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_tag")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tag_name: String,
    pub sub_tag_name: String,
    /// Inline SVG or icon URL.
    pub icon: String,
    pub color: String,

    pub is_deleted: bool,
    pub create_user_id: Option<String>,
    pub create_time: DateTimeUtc,
    pub delete_user_id: Option<String>,
    pub delete_time: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDeleteEntity for Entity {
    const KIND: &'static str = "blogtag";
    const NAME: &'static str = "Blog tag";

    fn id_col() -> Column {
        Column::Id
    }
    fn is_deleted_col() -> Column {
        Column::IsDeleted
    }
    fn create_user_id_col() -> Column {
        Column::CreateUserId
    }
    fn create_time_col() -> Column {
        Column::CreateTime
    }
    fn delete_user_id_col() -> Column {
        Column::DeleteUserId
    }
    fn delete_time_col() -> Column {
        Column::DeleteTime
    }
}

impl SoftDeleteModel for Model {
    fn id(&self) -> &str {
        &self.id
    }
    fn create_user_id(&self) -> Option<&str> {
        self.create_user_id.as_deref()
    }
}
