use chrono::Utc;
use std::collections::HashSet;

use crate::model::{HistoryEntry, RouteVariant, Waypoint};
use crate::normalize::normalize_text;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no route variant at index {index} ({count} available)")]
    UnknownVariant { index: usize, count: usize },

    #[error("insert position {position} out of range (list has {len} waypoints)")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("waypoint index {index} out of range (list has {len} waypoints)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{name} is already on this route")]
    AlreadyPresent { name: String },
}

/// Result of an undo: which variant was restored and what was reverted.
#[derive(Debug, Clone, PartialEq)]
pub struct Undone {
    pub agent_index: usize,
    pub action: String,
}

/// Local edits over the generated variants.
///
/// The originals are never mutated. Each variant may carry an overlay that supersedes
/// its original, and a single history shared by all variants records the full
/// pre-edit list for every change.
#[derive(Debug, Clone)]
pub struct RouteEditTracker {
    originals: Vec<RouteVariant>,
    overlays: Vec<Option<Vec<Waypoint>>>,
    history: Vec<HistoryEntry>,
}

impl RouteEditTracker {
    pub fn new(originals: Vec<RouteVariant>) -> Self {
        let overlays = vec![None; originals.len()];
        Self {
            originals,
            overlays,
            history: Vec::new(),
        }
    }

    pub fn variant_count(&self) -> usize {
        self.originals.len()
    }

    pub fn original(&self, variant_index: usize) -> Result<&RouteVariant, EditError> {
        self.originals
            .get(variant_index)
            .ok_or(EditError::UnknownVariant {
                index: variant_index,
                count: self.originals.len(),
            })
    }

    /// Effective list: overlay if present, else the original.
    pub fn waypoints(&self, variant_index: usize) -> Result<&[Waypoint], EditError> {
        let original = self.original(variant_index)?;
        Ok(self.overlays[variant_index]
            .as_deref()
            .unwrap_or(original.waypoints.as_slice()))
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Global "N changes made" counter.
    pub fn change_count(&self) -> usize {
        self.history.len()
    }

    pub fn is_modified(&self, variant_index: usize) -> bool {
        self.overlays
            .get(variant_index)
            .is_some_and(|o| o.is_some())
    }

    pub fn has_modifications(&self) -> bool {
        !self.history.is_empty() || self.overlays.iter().any(Option::is_some)
    }

    /// True when `name` does not appear in the original list of that variant.
    pub fn is_user_added(&self, variant_index: usize, name: &str) -> Result<bool, EditError> {
        let original = self.original(variant_index)?;
        let norm = normalize_text(name);
        Ok(!original.waypoints.iter().any(|w| w.name_norm() == norm))
    }

    /// Names in the effective list that were added by the user.
    pub fn user_added(&self, variant_index: usize) -> Result<Vec<&Waypoint>, EditError> {
        let original: HashSet<String> = self
            .original(variant_index)?
            .waypoints
            .iter()
            .map(Waypoint::name_norm)
            .collect();

        Ok(self
            .waypoints(variant_index)?
            .iter()
            .filter(|w| !original.contains(&w.name_norm()))
            .collect())
    }

    /// Effective variants, for "save route".
    pub fn snapshot(&self) -> Vec<RouteVariant> {
        self.originals
            .iter()
            .zip(&self.overlays)
            .map(|(orig, overlay)| RouteVariant {
                agent: orig.agent,
                waypoints: overlay.clone().unwrap_or_else(|| orig.waypoints.clone()),
            })
            .collect()
    }

    /// Splices `candidate` in at `position` and returns the action description.
    pub fn insert_city(
        &mut self,
        variant_index: usize,
        candidate: Waypoint,
        position: usize,
    ) -> Result<String, EditError> {
        let current = self.waypoints(variant_index)?.to_vec();
        if position > current.len() {
            return Err(EditError::PositionOutOfRange {
                position,
                len: current.len(),
            });
        }
        let norm = candidate.name_norm();
        if current.iter().any(|w| w.name_norm() == norm) {
            return Err(EditError::AlreadyPresent {
                name: candidate.name,
            });
        }

        let action = match position.checked_sub(1).map(|i| &current[i]) {
            Some(prev) => format!("Added {} after {}", candidate.name, prev.name),
            None => format!("Added {} at start", candidate.name),
        };

        let mut next = current.clone();
        next.insert(position, candidate);
        self.commit(variant_index, current, next, action.clone());

        Ok(action)
    }

    /// Overwrites the waypoint at `index`; length is unchanged.
    pub fn replace_city(
        &mut self,
        variant_index: usize,
        index: usize,
        candidate: Waypoint,
    ) -> Result<String, EditError> {
        let current = self.waypoints(variant_index)?.to_vec();
        let Some(replaced) = current.get(index) else {
            return Err(EditError::IndexOutOfRange {
                index,
                len: current.len(),
            });
        };

        let action = format!("Replaced {} with {}", replaced.name, candidate.name);

        let mut next = current.clone();
        next[index] = candidate;
        self.commit(variant_index, current, next, action.clone());

        Ok(action)
    }

    /// Pops the newest entry (any variant) and restores its pre-edit list as that
    /// variant's overlay. `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Undone> {
        let entry = self.history.pop()?;
        self.overlays[entry.agent_index] = Some(entry.previous_waypoints);
        Some(Undone {
            agent_index: entry.agent_index,
            action: entry.action,
        })
    }

    /// Drops every overlay and the whole history. Returns false if nothing was modified.
    pub fn reset_to_original(&mut self) -> bool {
        if !self.has_modifications() {
            return false;
        }
        self.overlays.iter_mut().for_each(|o| *o = None);
        self.history.clear();
        true
    }

    fn commit(
        &mut self,
        variant_index: usize,
        previous: Vec<Waypoint>,
        next: Vec<Waypoint>,
        action: String,
    ) {
        self.history.push(HistoryEntry {
            agent_index: variant_index,
            previous_waypoints: previous,
            action,
            timestamp: Utc::now(),
        });
        self.overlays[variant_index] = Some(next);
    }
}
