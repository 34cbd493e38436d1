use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use uuid::Uuid;

use crate::types::errors::TabError;
use crate::types::history::NavigationHistory;
use crate::types::tab::{LoadState, Tab, TabUpdate, NEW_TAB_TITLE};

/// Trait defining the tab management interface.
pub trait TabManagerTrait {
    fn add_tab(&mut self) -> String;
    fn close_tab(&mut self, tab_id: &str) -> Result<(), TabError>;
    fn switch_tab(&mut self, tab_id: &str) -> Result<(), TabError>;
    fn update_active_tab(&mut self, update: TabUpdate);
    fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> Result<(), TabError>;
    fn get_tab(&self, tab_id: &str) -> Option<&Tab>;
    fn get_all_tabs(&self) -> &[Tab];
    fn active_tab(&self) -> &Tab;
    fn active_tab_mut(&mut self) -> &mut Tab;
    fn tab_count(&self) -> usize;
}

/// In-memory tab manager. Always holds at least one tab and exactly one active tab.
pub struct TabManager {
    tabs: Vec<Tab>,
}

impl TabManager {
    /// Creates a manager holding a single default tab.
    pub fn new() -> Self {
        let mut tab = Self::blank_tab();
        tab.is_active = true;
        Self { tabs: vec![tab] }
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    fn blank_tab() -> Tab {
        Tab {
            id: Uuid::new_v4().to_string(),
            title: NEW_TAB_TITLE.to_string(),
            url: String::new(),
            is_active: false,
            status: LoadState::Idle,
            search_type: None,
            query: String::new(),
            history: NavigationHistory::default(),
            created_at: Self::now(),
        }
    }

    fn find_tab_index(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    /// Deactivate every tab, then activate the one at `index`.
    fn activate(&mut self, index: usize) {
        for tab in &mut self.tabs {
            tab.is_active = false;
        }
        self.tabs[index].is_active = true;
    }

    fn active_index(&self) -> usize {
        // `activate` is the only writer of `is_active`, so a match always exists.
        self.tabs.iter().position(|t| t.is_active).unwrap_or(0)
    }

    fn merge(tab: &mut Tab, update: TabUpdate) {
        if let Some(title) = update.title {
            tab.title = title;
        }
        if let Some(url) = update.url {
            tab.url = url;
        }
        if let Some(status) = update.status {
            tab.status = status;
        }
        if let Some(search_type) = update.search_type {
            tab.search_type = search_type;
        }
        if let Some(query) = update.query {
            tab.query = query;
        }
    }
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManagerTrait for TabManager {
    /// Open a blank tab and make it the active one. Returns the new tab's ID.
    fn add_tab(&mut self) -> String {
        let tab = Self::blank_tab();
        let id = tab.id.clone();
        self.tabs.push(tab);
        self.activate(self.tabs.len() - 1);
        debug!(tab_id = %id, count = self.tabs.len(), "tab added");
        id
    }

    /// Close a tab. If it was active, the neighbor that slides into its slot
    /// (or the previous tab when it was last) becomes active. Closing the
    /// final tab reinstates a default one.
    fn close_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        let idx = self
            .find_tab_index(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;

        let was_active = self.tabs[idx].is_active;
        self.tabs.remove(idx);
        debug!(tab_id, remaining = self.tabs.len(), "tab closed");

        if self.tabs.is_empty() {
            self.tabs.push(Self::blank_tab());
            self.activate(0);
            return Ok(());
        }

        if was_active {
            let next = idx.min(self.tabs.len() - 1);
            self.activate(next);
        }

        Ok(())
    }

    /// Make the given tab the active one.
    fn switch_tab(&mut self, tab_id: &str) -> Result<(), TabError> {
        let idx = self
            .find_tab_index(tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        self.activate(idx);
        debug!(tab_id, "tab switched");
        Ok(())
    }

    fn update_active_tab(&mut self, update: TabUpdate) {
        let idx = self.active_index();
        Self::merge(&mut self.tabs[idx], update);
    }

    fn update_tab(&mut self, tab_id: &str, update: TabUpdate) -> Result<(), TabError> {
        let tab = self
            .tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))?;
        Self::merge(tab, update);
        Ok(())
    }

    fn get_tab(&self, tab_id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == tab_id)
    }

    fn get_all_tabs(&self) -> &[Tab] {
        &self.tabs
    }

    fn active_tab(&self) -> &Tab {
        &self.tabs[self.active_index()]
    }

    fn active_tab_mut(&mut self) -> &mut Tab {
        let idx = self.active_index();
        &mut self.tabs[idx]
    }

    fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}
