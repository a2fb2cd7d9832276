use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{storage, Service};
use crate::contract::model::{Class, ClassPatch, NewClass};
use crate::domain::error::DomainError;

impl Service {
    /// List classes of one course, or of every course when `course_id` is None.
    #[instrument(name = "courses.service.list_classes", skip(self))]
    pub async fn list_classes(&self, course_id: Option<Uuid>) -> Result<Vec<Class>, DomainError> {
        debug!("Listing classes");
        if let Some(id) = course_id {
            self.load_course(id).await?;
        }
        self.classes
            .find_by_course(course_id)
            .await
            .map_err(storage)
    }

    #[instrument(name = "courses.service.get_class", skip(self), fields(class_id = %id))]
    pub async fn get_class(&self, id: Uuid) -> Result<Class, DomainError> {
        debug!("Getting class by id");
        self.load_class(id).await
    }

    #[instrument(
        name = "courses.service.create_class",
        skip(self),
        fields(course_id = %course_id, name = %new_class.name)
    )]
    pub async fn create_class(
        &self,
        course_id: Uuid,
        new_class: NewClass,
    ) -> Result<Class, DomainError> {
        info!("Creating new class");

        self.validate_name("name", &new_class.name)?;
        self.load_course(course_id).await?;

        let now = Utc::now();
        let class = Class {
            id: Uuid::new_v4(),
            course_id,
            name: new_class.name,
            date: new_class.date,
            created_at: now,
            updated_at: now,
        };

        self.classes.insert(class.clone()).await.map_err(storage)?;

        info!("Successfully created class with id={}", class.id);
        Ok(class)
    }

    #[instrument(name = "courses.service.update_class", skip(self), fields(class_id = %id))]
    pub async fn update_class(&self, id: Uuid, patch: ClassPatch) -> Result<Class, DomainError> {
        info!("Updating class");

        if let Some(ref name) = patch.name {
            self.validate_name("name", name)?;
        }

        let mut current = self.load_class(id).await?;
        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(date) = patch.date {
            current.date = date;
        }
        current.updated_at = Utc::now();

        self.classes
            .update(current.clone())
            .await
            .map_err(storage)?;

        Ok(current)
    }

    /// Delete a class together with its attendance records.
    #[instrument(name = "courses.service.delete_class", skip(self), fields(class_id = %id))]
    pub async fn delete_class(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting class");

        let deleted = self.classes.delete(id).await.map_err(storage)?;
        if !deleted {
            return Err(DomainError::class_not_found(id));
        }
        Ok(())
    }
}
