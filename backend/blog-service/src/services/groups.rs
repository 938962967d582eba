use std::sync::Arc;

use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::db::GroupRepository;
use crate::dto::GroupWrite;
use crate::error::{AppError, Result};
use crate::metrics::blog::record_created;
use crate::models::{Group, NewGroup};

#[derive(Clone)]
pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>) -> Self {
        Self { groups }
    }

    pub async fn list(&self) -> Result<Vec<Group>> {
        Ok(self.groups.list().await?)
    }

    pub async fn get(&self, group_id: Uuid) -> Result<Group> {
        self.groups
            .get(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("group {}", group_id)))
    }

    /// Groups are not created over HTTP; this backs the admin command.
    pub async fn create(&self, input: GroupWrite) -> Result<Group> {
        input.validate()?;

        let group = self
            .groups
            .create(&NewGroup {
                id: Uuid::new_v4(),
                title: input.title,
                slug: input.slug,
                description: input.description,
            })
            .await?;

        record_created("group");
        info!(group_id = %group.id, slug = %group.slug, "created group");
        Ok(group)
    }
}
