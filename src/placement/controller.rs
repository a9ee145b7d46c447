//! Transactional editing of one plan's placement
//!
//! Edits go to a [`PlacementSession`] draft; the persisted placement only
//! changes on a successful [`PlacementController::commit`].

use super::geo::GeographicPlacement;
use super::session::PlacementSession;
use super::store::{ItemId, PlacementStore};
use crate::error::PlacementError;
use std::mem;

/// Editing state of a placement
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    /// No session; consumers see the persisted placement
    #[default]
    Idle,
    /// A session is open
    Editing(PlacementSession),
    /// The draft is being written to the store
    Committing(PlacementSession),
}

/// Owns the persisted placement of one item and at most one open session
#[derive(Debug, Clone)]
pub struct PlacementController {
    item: ItemId,
    persisted: GeographicPlacement,
    state: EditState,
}

impl PlacementController {
    pub fn new(item: ItemId, placement: GeographicPlacement) -> Self {
        PlacementController {
            item,
            persisted: placement,
            state: EditState::Idle,
        }
    }

    pub fn item(&self) -> &ItemId {
        &self.item
    }

    /// The committed placement
    pub fn placement(&self) -> &GeographicPlacement {
        &self.persisted
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// The draft under edit, if a session is open
    pub fn draft(&self) -> Option<&GeographicPlacement> {
        match &self.state {
            EditState::Editing(session) | EditState::Committing(session) => Some(session.draft()),
            EditState::Idle => None,
        }
    }

    /// Open a session on a copy of the persisted placement
    pub fn begin_edit(&mut self) -> Result<&mut PlacementSession, PlacementError> {
        if !matches!(self.state, EditState::Idle) {
            return Err(PlacementError::AlreadyEditing);
        }
        tracing::debug!(item = %self.item, "placement edit started");
        self.state = EditState::Editing(PlacementSession::new(&self.persisted));
        self.session_mut()
    }

    /// The open session
    pub fn session_mut(&mut self) -> Result<&mut PlacementSession, PlacementError> {
        match &mut self.state {
            EditState::Editing(session) => Ok(session),
            _ => Err(PlacementError::NotEditing),
        }
    }

    /// Write the draft to `store` and make it the persisted placement.
    ///
    /// If the store fails the session stays open with the draft intact.
    pub fn commit(&mut self, store: &mut dyn PlacementStore) -> Result<&GeographicPlacement, PlacementError> {
        let session = match mem::take(&mut self.state) {
            EditState::Editing(session) => session,
            other => {
                self.state = other;
                return Err(PlacementError::NotEditing);
            }
        };

        let draft = *session.draft();
        self.state = EditState::Committing(session);

        match store.save(&self.item, &draft) {
            Ok(()) => {
                self.persisted = draft;
                self.state = EditState::Idle;
                tracing::debug!(item = %self.item, bounds = %draft.bounds, "placement committed");
                Ok(&self.persisted)
            }
            Err(e) => {
                if let EditState::Committing(session) = mem::take(&mut self.state) {
                    self.state = EditState::Editing(session);
                }
                tracing::warn!(item = %self.item, error = %e, "placement commit failed");
                Err(e.into())
            }
        }
    }

    /// Drop the open session without writing anything
    pub fn discard(&mut self) -> Result<(), PlacementError> {
        match self.state {
            EditState::Editing(_) => {
                self.state = EditState::Idle;
                tracing::debug!(item = %self.item, "placement edit discarded");
                Ok(())
            }
            _ => Err(PlacementError::NotEditing),
        }
    }
}
