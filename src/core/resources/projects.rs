use crate::core::client::GraphQLExecutor;
use crate::core::documents::GET_CURRENT_PROJECT;
use crate::domain::model::Project;
use crate::utils::error::{FirmhouseError, Result};

pub struct ProjectsResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> ProjectsResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    /// The project the access token belongs to.
    pub async fn get_current(&self) -> Result<Project> {
        let project: Option<Project> = self
            .executor
            .execute_root(&GET_CURRENT_PROJECT, &serde_json::json!({}), Vec::new())
            .await?;
        project.ok_or_else(|| FirmhouseError::not_found("No project belongs to this access token"))
    }
}
