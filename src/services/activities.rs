//! Activity taxonomy service: categories and their activities

use std::collections::HashSet;

use uuid::Uuid;

use super::changes::{ChangeHub, Collection};
use crate::{
    error::{AppError, AppResult},
    models::{
        activity::{Activity, ActivityCategory, BackfillResult, BulkCreateResult},
        equipment::EnsuredRecord,
    },
    names::{clean_name, normalize_name},
    repository::Repository,
};

#[derive(Clone)]
pub struct ActivitiesService {
    repository: Repository,
    changes: ChangeHub,
}

impl ActivitiesService {
    pub fn new(repository: Repository, changes: ChangeHub) -> Self {
        Self { repository, changes }
    }

    // -----------------------------------------------------------------------
    // Categories
    // -----------------------------------------------------------------------

    pub async fn list_categories(&self) -> AppResult<Vec<ActivityCategory>> {
        self.repository.categories.list().await
    }

    pub async fn create_category(&self, name: &str) -> AppResult<ActivityCategory> {
        self.create_category_with_id(Uuid::new_v4(), name).await
    }

    pub async fn create_category_with_id(&self, id: Uuid, name: &str) -> AppResult<ActivityCategory> {
        let name = required(name, "Category name is required")?;
        let key = normalize_name(&name);
        self.ensure_category_key_free(&key, None).await?;

        let category = self.repository.categories.create(id, &name, &key).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "Category created");
        self.changes.publish(Collection::ActivityCategories);
        Ok(category)
    }

    pub async fn rename_category(&self, id: Uuid, name: &str) -> AppResult<ActivityCategory> {
        let name = required(name, "Category name is required")?;
        let key = normalize_name(&name);
        self.ensure_category_key_free(&key, Some(id)).await?;

        let category = self.repository.categories.rename(id, &name, &key).await?;
        tracing::info!(category_id = %id, name = %category.name, "Category renamed");
        self.changes.publish(Collection::ActivityCategories);
        Ok(category)
    }

    /// Delete a category and every activity in it
    pub async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        let removed = self.repository.categories.delete_with_activities(id).await?;
        tracing::info!(category_id = %id, activities_removed = removed, "Category deleted");
        self.changes.publish(Collection::ActivityCategories);
        if removed > 0 {
            self.changes.publish(Collection::Activities);
        }
        Ok(())
    }

    async fn ensure_category_key_free(&self, key: &str, exclude: Option<Uuid>) -> AppResult<()> {
        match self.repository.categories.find_by_key(key, exclude).await? {
            Some(other) => Err(AppError::Conflict(format!(
                "Category \"{}\" already exists",
                other.name
            ))),
            None => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Activities
    // -----------------------------------------------------------------------

    pub async fn list(&self, category_id: Option<Uuid>) -> AppResult<Vec<Activity>> {
        self.repository.activities.list(category_id).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Activity> {
        self.repository.activities.get_by_id(id).await
    }

    /// Uncategorized create: any activity with the same key is reused
    pub async fn create_if_not_exists(&self, name: &str) -> AppResult<EnsuredRecord> {
        let name = required(name, "Activity name is required")?;
        let key = normalize_name(&name);

        if let Some(existing) = self.repository.activities.find_by_key(&key).await? {
            return Ok(EnsuredRecord { id: existing.id, created: false });
        }

        let activity = self
            .repository
            .activities
            .create(Uuid::new_v4(), None, &name, &key)
            .await?;
        tracing::info!(activity_id = %activity.id, name = %activity.name, "Activity created");
        self.changes.publish(Collection::Activities);
        Ok(EnsuredRecord { id: activity.id, created: true })
    }

    /// Create inside a category, reusing an activity of that category with
    /// the same key
    pub async fn create_in_category(&self, category_id: Uuid, name: &str) -> AppResult<EnsuredRecord> {
        self.create_in_category_with_id(Uuid::new_v4(), category_id, name).await
    }

    pub async fn create_in_category_with_id(
        &self,
        id: Uuid,
        category_id: Uuid,
        name: &str,
    ) -> AppResult<EnsuredRecord> {
        let name = required(name, "Activity name is required")?;
        let key = normalize_name(&name);
        self.repository.categories.get_by_id(category_id).await?;

        if let Some(existing) = self
            .repository
            .activities
            .find_in_category(category_id, &key, None)
            .await?
        {
            return Ok(EnsuredRecord { id: existing.id, created: false });
        }

        let activity = self
            .repository
            .activities
            .create(id, Some(category_id), &name, &key)
            .await?;
        tracing::info!(activity_id = %activity.id, category_id = %category_id, "Activity created");
        self.changes.publish(Collection::Activities);
        Ok(EnsuredRecord { id: activity.id, created: true })
    }

    /// Add several names to a category, skipping duplicates
    pub async fn bulk_create_in_category(
        &self,
        category_id: Uuid,
        names: &[String],
    ) -> AppResult<BulkCreateResult> {
        self.repository.categories.get_by_id(category_id).await?;

        let existing: HashSet<String> = self
            .repository
            .activities
            .list(Some(category_id))
            .await?
            .into_iter()
            .map(|a| a.name_key.unwrap_or_else(|| normalize_name(&a.name)))
            .collect();

        let (to_create, skipped) = plan_bulk_create(&existing, names);
        let created = if to_create.is_empty() {
            Vec::new()
        } else {
            self.repository.activities.create_many(category_id, &to_create).await?
        };

        tracing::info!(
            category_id = %category_id,
            created = created.len(),
            skipped = skipped.len(),
            "Activities bulk created"
        );
        if !created.is_empty() {
            self.changes.publish(Collection::Activities);
        }
        Ok(BulkCreateResult { created, skipped })
    }

    /// Rename an activity (and move it to `category_id`)
    pub async fn rename_in_category(&self, id: Uuid, category_id: Uuid, name: &str) -> AppResult<Activity> {
        let name = required(name, "Activity name is required")?;
        let key = normalize_name(&name);
        self.repository.categories.get_by_id(category_id).await?;

        if let Some(other) = self
            .repository
            .activities
            .find_in_category(category_id, &key, Some(id))
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Activity \"{}\" already exists in this category",
                other.name
            )));
        }

        let activity = self.repository.activities.rename(id, category_id, &name, &key).await?;
        tracing::info!(activity_id = %id, name = %activity.name, "Activity renamed");
        self.changes.publish(Collection::Activities);
        Ok(activity)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.activities.delete(id).await?;
        tracing::info!(activity_id = %id, "Activity deleted");
        self.changes.publish(Collection::Activities);
        Ok(())
    }

    /// Recompute missing or stale keys of categories and activities
    pub async fn backfill_name_keys(&self) -> AppResult<BackfillResult> {
        let mut updated = 0;

        for category in self.repository.categories.list().await? {
            let key = normalize_name(&category.name);
            if category.name_key.as_deref() != Some(key.as_str()) {
                self.repository.categories.set_name_key(category.id, &key).await?;
                updated += 1;
            }
        }
        for activity in self.repository.activities.list(None).await? {
            let key = normalize_name(&activity.name);
            if activity.name_key.as_deref() != Some(key.as_str()) {
                self.repository.activities.set_name_key(activity.id, &key).await?;
                updated += 1;
            }
        }

        tracing::info!(updated, "Activity name keys backfilled");
        if updated > 0 {
            self.changes.publish(Collection::ActivityCategories);
            self.changes.publish(Collection::Activities);
        }
        Ok(BackfillResult { updated })
    }
}

fn required(name: &str, message: &str) -> AppResult<String> {
    clean_name(name).ok_or_else(|| AppError::Validation(message.to_string()))
}

/// Split requested names into `(name, key)` pairs to create and names to
/// skip. Blank names are ignored.
fn plan_bulk_create(existing: &HashSet<String>, names: &[String]) -> (Vec<(String, String)>, Vec<String>) {
    let mut seen = existing.clone();
    let mut to_create = Vec::new();
    let mut skipped = Vec::new();

    for name in names.iter().filter_map(|n| clean_name(n)) {
        let key = normalize_name(&name);
        if seen.insert(key.clone()) {
            to_create.push((name, key));
        } else {
            skipped.push(name);
        }
    }

    (to_create, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_bulk_create() {
        let existing: HashSet<String> = ["pozar".to_string()].into_iter().collect();
        let names = vec![
            "Požar".to_string(),
            " Tehnička ".to_string(),
            "".to_string(),
            "TEHNICKA".to_string(),
            "Poplava".to_string(),
        ];

        let (create, skipped) = plan_bulk_create(&existing, &names);

        assert_eq!(
            create,
            vec![
                ("Tehnička".to_string(), "tehnicka".to_string()),
                ("Poplava".to_string(), "poplava".to_string()),
            ]
        );
        assert_eq!(skipped, vec!["Požar".to_string(), "TEHNICKA".to_string()]);
    }

    #[test]
    fn test_required() {
        assert!(matches!(required("  ", "x"), Err(AppError::Validation(_))));
        assert_eq!(required(" Vježba ", "x").unwrap(), "Vježba");
    }
}
