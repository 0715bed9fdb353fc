//! Selection registry - which cleaning methods are chosen for which area
//!
//! Invariants:
//! - at most one entry per concrete area
//! - every entry has a non-empty method set (empty means "not selected" and is removed)
//!
//! Whole-bus mode is an overlay: while the whole-bus pseudo-area is focused, the
//! method set chosen for it replaces every concrete area's entry. Focusing a
//! concrete area leaves whole-bus mode but keeps the broadcast entries.

use crate::domain::types::{AreaId, CleaningMethod, Focus, MethodSet};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::debug;

/// One area together with the methods chosen for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub area: AreaId,
    pub methods: MethodSet,
}

#[derive(Debug, Default)]
pub struct SelectionRegistry {
    selections: FxHashMap<AreaId, MethodSet>,
    focus: Option<Focus>,
    /// Method set of the whole-bus overlay; empty when whole-bus mode is off
    whole_bus_methods: MethodSet,
}

impl SelectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus an area for subsequent method edits
    ///
    /// Focusing a concrete area exits whole-bus mode. Entries written by an
    /// earlier broadcast are kept.
    pub fn select_area(&mut self, focus: Focus) {
        if let Focus::Area(_) = focus {
            if !self.whole_bus_methods.is_empty() {
                debug!(area = %focus, "whole_bus_mode_exited");
            }
            self.whole_bus_methods = MethodSet::new();
        }
        self.focus = Some(focus);
    }

    /// Focus the whole-bus pseudo-area, re-broadcasting any whole-bus methods
    pub fn select_whole_bus(&mut self) {
        self.focus = Some(Focus::WholeBus);
        if !self.whole_bus_methods.is_empty() {
            let methods = self.whole_bus_methods.clone();
            self.broadcast(&methods);
        }
    }

    /// Replace the method set of the focused area
    ///
    /// Returns false (and changes nothing) when no area is focused.
    pub fn update_methods(&mut self, methods: MethodSet) -> bool {
        let Some(focus) = self.focus else {
            debug!("update_methods_without_focus");
            return false;
        };

        match focus {
            Focus::WholeBus => {
                if methods.is_empty() {
                    self.selections.clear();
                } else {
                    self.broadcast(&methods);
                }
                self.whole_bus_methods = methods;
            }
            Focus::Area(area) => {
                if methods.is_empty() {
                    self.selections.remove(&area);
                } else {
                    self.selections.insert(area, methods);
                }
            }
        }

        debug!(
            focus = %focus,
            selected_areas = %self.selections.len(),
            total_minutes = %self.total_duration_minutes(),
            "methods_updated"
        );
        true
    }

    /// Add or remove a single method on the focused area
    pub fn toggle_method(&mut self, method: CleaningMethod) -> bool {
        let Some(focus) = self.focus else {
            return false;
        };
        let next = self.selected_methods(focus).toggled(method);
        self.update_methods(next)
    }

    /// Methods shown as checked for a focus
    pub fn selected_methods(&self, focus: Focus) -> MethodSet {
        match focus {
            Focus::WholeBus => self.whole_bus_methods.clone(),
            Focus::Area(area) => self.selections.get(&area).cloned().unwrap_or_default(),
        }
    }

    /// Remove one area's selection; exits whole-bus mode
    ///
    /// Returns true if the area had a selection.
    pub fn clear(&mut self, area: AreaId) -> bool {
        let removed = self.selections.remove(&area).is_some();
        if self.focus == Some(Focus::Area(area)) {
            self.focus = None;
        }
        self.whole_bus_methods = MethodSet::new();
        removed
    }

    /// Drop every selection, the focus, and whole-bus mode
    pub fn clear_all(&mut self) {
        self.selections.clear();
        self.focus = None;
        self.whole_bus_methods = MethodSet::new();
    }

    /// Sum over all selections of their methods' durations
    pub fn total_duration_minutes(&self) -> u32 {
        self.selections.values().map(MethodSet::total_minutes).sum()
    }

    #[inline]
    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    #[inline]
    pub fn whole_bus_active(&self) -> bool {
        !self.whole_bus_methods.is_empty()
    }

    pub fn whole_bus_methods(&self) -> &MethodSet {
        &self.whole_bus_methods
    }

    pub fn get(&self, area: AreaId) -> Option<&MethodSet> {
        self.selections.get(&area)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// All selections in area catalog order
    pub fn selections(&self) -> Vec<Selection> {
        AreaId::all()
            .filter_map(|area| {
                self.selections
                    .get(&area)
                    .map(|methods| Selection { area, methods: methods.clone() })
            })
            .collect()
    }

    fn broadcast(&mut self, methods: &MethodSet) {
        self.selections = AreaId::all().map(|area| (area, methods.clone())).collect();
    }
}
