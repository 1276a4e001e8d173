use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::{SoftDeleteEntity, SoftDeleteModel};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "life_share")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    /// Markdown source.
    pub content: String,
    pub cover_image: Option<String>,
    /// JSON array of image URLs.
    pub images: Option<String>,
    /// One of: life/travel/food/thoughts/tech/other.
    pub category: String,
    /// Comma-separated tag names.
    pub tags: Option<String>,
    pub view_count: i32,
    pub like_count: i32,
    /// Author snapshot taken at creation so lists need no join.
    pub author_name: Option<String>,
    pub author_avatar: Option<String>,

    pub is_deleted: bool,
    pub create_user_id: Option<String>,
    pub create_time: DateTimeUtc,
    pub delete_user_id: Option<String>,
    pub delete_time: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDeleteEntity for Entity {
    const KIND: &'static str = "lifeshare";
    const NAME: &'static str = "Life share";

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
