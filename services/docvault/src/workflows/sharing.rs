//! services/docvault/src/workflows/sharing.rs

use docvault_core::action::ActionState;
use docvault_core::domain::{DocumentId, StatusMessage, UserId};
use docvault_core::ports::DocumentApi;
use docvault_core::selection::Selection;
use docvault_core::validation::validate_selection;
use std::sync::Arc;
use tracing::{error, info};

use super::state::AppState;

/// Grants or revokes access to one document for a set of users.
pub struct ShareDialog {
    api: Arc<dyn DocumentApi>,
    document_id: DocumentId,
    users: Selection<UserId>,
    share: ActionState<StatusMessage>,
    unshare: ActionState<StatusMessage>,
}

impl ShareDialog {
    pub fn new(app_state: &AppState, document_id: DocumentId) -> Self {
        Self {
            api: app_state.api.clone(),
            document_id,
            users: Selection::new(),
            share: ActionState::default(),
            unshare: ActionState::default(),
        }
    }

    pub fn toggle_user(&mut self, user_id: UserId) -> bool {
        self.users.toggle(user_id)
    }

    pub async fn share(&mut self) -> &ActionState<StatusMessage> {
        if self.share.is_in_flight() {
            return &self.share;
        }
        if let Err(e) = validate_selection(self.users.items(), "user") {
            self.share.reject(e);
            return &self.share;
        }

        let share = self.share.start();
        let result = self
            .api
            .share_document(self.document_id, self.users.items())
            .await;
        match &result {
            Ok(_) => {
                info!(
                    "Shared document {} with {} users",
                    self.document_id,
                    self.users.len()
                );
                self.users.clear();
            }
            Err(e) => error!("Failed to share document {}: {:?}", self.document_id, e),
        }
        share.finish(result);
        &self.share
    }

    pub async fn unshare(&mut self) -> &ActionState<StatusMessage> {
        if self.unshare.is_in_flight() {
            return &self.unshare;
        }
        if let Err(e) = validate_selection(self.users.items(), "user") {
            self.unshare.reject(e);
            return &self.unshare;
        }

        let unshare = self.unshare.start();
        let result = self
            .api
            .unshare_document(self.document_id, self.users.items())
            .await;
        match &result {
            Ok(_) => {
                info!("Removed sharing on document {}", self.document_id);
                self.users.clear();
            }
            Err(e) => error!("Failed to unshare document {}: {:?}", self.document_id, e),
        }
        unshare.finish(result);
        &self.unshare
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn users(&self) -> &Selection<UserId> {
        &self.users
    }
}
