use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{storage, Service};
use crate::contract::model::Notice;
use crate::domain::error::DomainError;

impl Service {
    #[instrument(name = "courses.service.list_notices", skip(self), fields(course_id = %course_id))]
    pub async fn list_notices(&self, course_id: Uuid) -> Result<Vec<Notice>, DomainError> {
        debug!("Listing notices");
        self.load_course(course_id).await?;
        self.notices
            .find_by_course(course_id)
            .await
            .map_err(storage)
    }

    #[instrument(name = "courses.service.create_notice", skip(self, content), fields(course_id = %course_id))]
    pub async fn create_notice(&self, course_id: Uuid, content: String) -> Result<Notice, DomainError> {
        info!("Creating notice");

        self.validate_notice(&content)?;
        self.load_course(course_id).await?;

        let now = Utc::now();
        let notice = Notice {
            id: Uuid::new_v4(),
            course_id,
            content,
            created_at: now,
            updated_at: now,
        };
        self.notices.insert(notice.clone()).await.map_err(storage)?;

        info!("Successfully created notice with id={}", notice.id);
        Ok(notice)
    }

    #[instrument(name = "courses.service.update_notice", skip(self, content), fields(notice_id = %id))]
    pub async fn update_notice(&self, id: Uuid, content: String) -> Result<Notice, DomainError> {
        info!("Updating notice");

        self.validate_notice(&content)?;
        let mut notice = self
            .notices
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::notice_not_found(id))?;

        notice.content = content;
        notice.updated_at = Utc::now();
        self.notices
            .update(notice.clone())
            .await
            .map_err(storage)?;

        Ok(notice)
    }

    #[instrument(name = "courses.service.delete_notice", skip(self), fields(notice_id = %id))]
    pub async fn delete_notice(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting notice");

        if !self.notices.delete(id).await.map_err(storage)? {
            return Err(DomainError::notice_not_found(id));
        }
        Ok(())
    }

    fn validate_notice(&self, content: &str) -> Result<(), DomainError> {
        if content.trim().is_empty() {
            return Err(DomainError::validation("content", "must not be empty"));
        }
        let len = content.chars().count();
        if len > self.config.max_notice_length {
            return Err(DomainError::validation(
                "content",
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_notice_length
                ),
            ));
        }
        Ok(())
    }
}
