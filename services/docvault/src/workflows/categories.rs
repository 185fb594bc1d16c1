//! services/docvault/src/workflows/categories.rs

use docvault_core::action::ActionState;
use docvault_core::domain::{CategoryDraft, CategoryId, DocumentCategory};
use docvault_core::ports::{ApiError, Confirm, DocumentApi};
use docvault_core::validation::validate_category;
use std::sync::Arc;
use tracing::{error, info};

use super::state::AppState;

/// Lists, creates, renames and deletes document categories, keeping the
/// local list in step with each successful call.
pub struct CategoryManager {
    api: Arc<dyn DocumentApi>,
    confirm: Arc<dyn Confirm>,
    categories: Vec<DocumentCategory>,
    load: ActionState<usize>,
    save: ActionState<DocumentCategory>,
    delete: ActionState<CategoryId>,
}

impl CategoryManager {
    pub fn new(app_state: &AppState) -> Self {
        Self {
            api: app_state.api.clone(),
            confirm: app_state.confirm.clone(),
            categories: Vec::new(),
            load: ActionState::default(),
            save: ActionState::default(),
            delete: ActionState::default(),
        }
    }

    pub async fn load(&mut self) -> &ActionState<usize> {
        if self.load.is_in_flight() {
            return &self.load;
        }
        let load = self.load.start();
        match self.api.list_categories().await {
            Ok(categories) => {
                self.categories = categories;
                load.finish(Ok::<_, ApiError>(self.categories.len()));
            }
            Err(e) => {
                error!("Failed to load categories: {:?}", e);
                load.finish(Err::<usize, _>(e));
            }
        }
        &self.load
    }

    pub async fn create(&mut self, draft: CategoryDraft) -> &ActionState<DocumentCategory> {
        self.save(None, draft).await
    }

    pub async fn update(
        &mut self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> &ActionState<DocumentCategory> {
        self.save(Some(id), draft).await
    }

    async fn save(
        &mut self,
        id: Option<CategoryId>,
        draft: CategoryDraft,
    ) -> &ActionState<DocumentCategory> {
        if self.save.is_in_flight() {
            return &self.save;
        }
        if let Err(e) = validate_category(&draft) {
            self.save.reject(e);
            return &self.save;
        }

        let save = self.save.start();
        let result = match id {
            Some(id) => self.api.update_category(id, &draft).await,
            None => self.api.create_category(&draft).await,
        };

        match result {
            Ok(saved) => {
                info!("Saved category {} '{}'", saved.id, saved.name);
                match self.categories.iter_mut().find(|c| c.id == saved.id) {
                    Some(existing) => *existing = saved.clone(),
                    None => self.categories.push(saved.clone()),
                }
                save.finish(Ok::<_, ApiError>(saved));
            }
            Err(e) => {
                error!("Failed to save category '{}': {:?}", draft.name, e);
                save.finish(Err::<DocumentCategory, _>(e));
            }
        }
        &self.save
    }

    pub async fn delete(&mut self, id: CategoryId) -> &ActionState<CategoryId> {
        if self.delete.is_in_flight() {
            return &self.delete;
        }
        if !self
            .confirm
            .confirm("Are you sure you want to delete this category?")
        {
            return &self.delete;
        }

        let delete = self.delete.start();
        match self.api.delete_category(id).await {
            Ok(()) => {
                info!("Deleted category {}", id);
                self.categories.retain(|c| c.id != id);
                delete.finish(Ok::<_, ApiError>(id));
            }
            Err(e) => {
                error!("Failed to delete category {}: {:?}", id, e);
                delete.finish(Err::<CategoryId, _>(e));
            }
        }
        &self.delete
    }

    pub fn categories(&self) -> &[DocumentCategory] {
        &self.categories
    }

    pub fn save_state(&self) -> &ActionState<DocumentCategory> {
        &self.save
    }

    pub fn dismiss_errors(&mut self) {
        self.load.dismiss();
        self.save.dismiss();
        self.delete.dismiss();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::mock::{app_state, category, MockApi, ScriptedConfirm};
    use docvault_core::{ActionError, ValidationError};

    fn manager(api: &MockApi, confirm: bool) -> CategoryManager {
        CategoryManager::new(&app_state(api.clone(), Arc::new(ScriptedConfirm::new(confirm))))
    }

    #[tokio::test]
    async fn test_load_create_and_rename() {
        let api = MockApi::with_categories(vec![category(1, "Legal")]);
        let mut manager = manager(&api, true);

        assert_eq!(manager.load().await.value(), Some(&1));

        let created = manager
            .create(CategoryDraft::new("HR", "People stuff"))
            .await
            .value()
            .cloned()
            .unwrap();
        assert_eq!(created.id, 2);

        manager.update(1, CategoryDraft::new("Contracts", "")).await;
        let names: Vec<&str> = manager.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Contracts", "HR"]);
        assert_eq!(
            api.calls(),
            vec!["list_categories", "create_category HR", "update_category 1 Contracts"]
        );
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected_locally() {
        let api = MockApi::default();
        let mut manager = manager(&api, true);

        let state = manager.create(CategoryDraft::new("   ", "desc")).await;
        assert_eq!(
            state.error(),
            Some(&ActionError::Validation(ValidationError::MissingCategoryName))
        );
        assert_eq!(state.error().unwrap().to_string(), "Category name is required");
        assert!(api.calls().is_empty());

        manager.dismiss_errors();
        assert!(manager.save_state().is_idle());
    }

    #[tokio::test]
    async fn test_delete_is_confirmation_gated() {
        let api = MockApi::with_categories(vec![category(1, "Legal"), category(2, "HR")]);

        let mut declined = manager(&api, false);
        declined.load().await;
        assert!(declined.delete(1).await.is_idle());
        assert_eq!(declined.categories().len(), 2);

        let mut accepted = manager(&api, true);
        accepted.load().await;
        assert_eq!(accepted.delete(1).await.value(), Some(&1));
        assert_eq!(accepted.categories().len(), 1);
        assert_eq!(
            api.calls(),
            vec!["list_categories", "list_categories", "delete_category 1"]
        );
    }

    #[tokio::test]
    async fn test_api_error_message_is_surfaced() {
        let api = MockApi::default();
        api.fail_next(ApiError::new("category with this name already exists.").with_code("400"));
        let mut manager = manager(&api, true);

        let state = manager.create(CategoryDraft::new("Legal", "")).await;
        assert_eq!(
            state.error().map(|e| e.to_string()).as_deref(),
            Some("category with this name already exists.")
        );
        assert!(manager.categories().is_empty());
    }
}
