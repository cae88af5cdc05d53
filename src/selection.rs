use crate::document::{ConnectionId, NodeId};

/// The kind of entity that can be selected
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectedEntity {
    Node(NodeId),
    Connection(ConnectionId),
}

impl SelectedEntity {
    pub fn id(&self) -> &str {
        match self {
            SelectedEntity::Node(id) | SelectedEntity::Connection(id) => id,
        }
    }
}

/// Outcome of a selection interaction that the host must hear about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionChange {
    Selected(SelectedEntity),
}

/// Tracks the single selected node or connection
#[derive(Debug, Default)]
pub struct SelectionManager {
    selected: Option<SelectedEntity>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select an entity, replacing any previous selection
    ///
    /// Selecting the entity that is already selected toggles the selection
    /// off and reports nothing.
    pub fn select(&mut self, entity: SelectedEntity) -> Option<SelectionChange> {
        if self.selected.as_ref() == Some(&entity) {
            self.clear();
            return None;
        }
        self.selected = Some(entity.clone());
        Some(SelectionChange::Selected(entity))
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Adopt the selection supplied by the host without reporting it
    ///
    /// The id may name a node or a connection; `None` clears.
    pub fn set_selected(&mut self, entity: Option<SelectedEntity>) {
        self.selected = entity;
    }

    pub fn selected(&self) -> Option<&SelectedEntity> {
        self.selected.as_ref()
    }

    /// Check if an id is selected
    pub fn contains(&self, id: &str) -> bool {
        self.selected.as_ref().is_some_and(|e| e.id() == id)
    }

    pub fn selected_node(&self) -> Option<&str> {
        match &self.selected {
            Some(SelectedEntity::Node(id)) => Some(id),
            _ => None,
        }
    }

    pub fn selected_connection(&self) -> Option<&str> {
        match &self.selected {
            Some(SelectedEntity::Connection(id)) => Some(id),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }
}
