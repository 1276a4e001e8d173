use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::store::{SoftDeleteEntity, SoftDeleteModel};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub title: String,
    pub summary: String,
    /// Markdown source.
    pub content: String,
    /// Rendered HTML, produced by the front end at save time.
    pub content_html: String,
    pub cover_image: Option<String>,
    /// Comma-separated tag names.
    pub tags: String,
    /// JSON array of attached image ids.
    pub image_ids: Option<String>,
    /// 0 = draft, 1 = published.
    pub state: i32,
    pub comment_count: i32,
    pub view_count: i32,

    pub is_deleted: bool,
    pub create_user_id: Option<String>,
    pub create_time: DateTimeUtc,
    pub delete_user_id: Option<String>,
    pub delete_time: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDeleteEntity for Entity {
    const KIND: &'static str = "blog";
    const NAME: &'static str = "Blog";

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
