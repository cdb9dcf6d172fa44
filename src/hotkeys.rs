//! Keyboard shortcut dispatch.
//!
//! Keys are matched on physical key codes (`KeyA`, `Digit1`), so layouts do
//! not move shortcuts around. A key press runs the first matching rule in
//! priority order:
//!
//! 1. catalog toggle (checked even inside text fields)
//! 2. undo / redo
//! 3. align / distribute, when two or more nodes are selected
//! 4. save / load
//! 5. copy / paste / select all / deselect
//! 6. duplicate
//! 7. delete
//! 8. collapse toggle
//! 9. group selection or add chat node
//! 10. quick slots
//! 11. node creation keymap
//! 12. tool switches and the radial menu
//!
//! Auto-repeat is ignored for duplicate, delete and node creation.

#[cfg(test)]
#[path = "hotkeys_test.rs"]
mod hotkeys_test;

use std::mem;

use crate::align::{Alignment, Distribution};
use crate::doc::{Group, GroupId, NodeId};
use crate::engine::{Action, Command, EngineCore};
use crate::input::{Gesture, KeyInput, ModifierTier, Modifiers, Tool};

/// Title given to groups created from the selection.
pub const DEFAULT_GROUP_TITLE: &str = "Group";

fn alignment_for(code: &str) -> Option<Alignment> {
    match code {
        "KeyA" => Some(Alignment::Left),
        "KeyD" => Some(Alignment::Right),
        "KeyW" => Some(Alignment::Top),
        "KeyS" => Some(Alignment::Bottom),
        "KeyX" => Some(Alignment::CenterX),
        "KeyY" => Some(Alignment::CenterY),
        _ => None,
    }
}

fn distribution_for(code: &str) -> Option<Distribution> {
    match code {
        "KeyH" => Some(Distribution::Horizontal),
        "KeyV" => Some(Distribution::Vertical),
        _ => None,
    }
}

fn tool_for(code: &str) -> Option<Tool> {
    match code {
        "KeyE" => Some(Tool::Edit),
        "KeyM" => Some(Tool::Selection),
        "KeyC" => Some(Tool::Cutter),
        "KeyR" => Some(Tool::Reroute),
        _ => None,
    }
}

/// Zero-based quick slot for `Digit1`..`Digit9`.
fn quick_slot_index(code: &str) -> Option<usize> {
    match code.strip_prefix("Digit")?.parse::<usize>() {
        Ok(digit) if (1..=9).contains(&digit) => Some(digit - 1),
        _ => None,
    }
}

fn plain(m: Modifiers) -> bool {
    !m.any()
}

impl EngineCore {
    /// A key went down.
    pub fn on_key_down(&mut self, key: &KeyInput) -> Vec<Action> {
        let tool_before = self.effective_tool();
        let mut actions = self.dispatch_key_down(key);
        let cursor_sent = actions.iter().any(|a| matches!(a, Action::SetCursor(_)));
        if self.effective_tool() != tool_before && !cursor_sent && !key.in_text_field {
            actions.push(Action::SetCursor(self.cursor().to_owned()));
        }
        actions
    }

    /// A key was released.
    pub fn on_key_up(&mut self, key: &KeyInput) -> Vec<Action> {
        let tool_before = self.effective_tool();
        self.keys.sync(key.modifiers);
        let mut actions = Vec::new();
        match key.code.as_str() {
            "KeyZ" => self.keys.z_held = false,
            "Space" if self.keys.space_held => {
                self.keys.space_held = false;
                self.ui.radial_menu = None;
                actions.push(Action::Command(Command::CloseRadialMenu));
            }
            _ => {}
        }
        if self.effective_tool() != tool_before {
            actions.push(Action::SetCursor(self.cursor().to_owned()));
        }
        actions
    }

    /// Window blur or visibility change: forget held keys, menus and the gesture.
    pub fn on_focus_lost(&mut self) -> Vec<Action> {
        self.keys.reset();
        self.ui.clear_transient();
        let mut actions = Vec::new();
        if self.ui.radial_menu.take().is_some() {
            actions.push(Action::Command(Command::CloseRadialMenu));
        }
        let gesture = mem::take(&mut self.gesture);
        if !gesture.is_idle() {
            tracing::debug!(gesture = gesture.name(), "gesture cancelled by focus loss");
        }
        // Detaching drags skip the live refresh, so moved members may sit outside their groups.
        if let Gesture::DraggingNodes(drag) = gesture {
            actions.extend(self.refresh_groups_of(&drag.node_ids()));
        }
        actions.push(Action::SetCursor(self.cursor().to_owned()));
        actions.push(Action::RenderNeeded);
        actions
    }

    fn dispatch_key_down(&mut self, key: &KeyInput) -> Vec<Action> {
        let m = key.modifiers;
        self.keys.sync(m);

        if m.command() && key.code == "KeyK" {
            return vec![Action::Command(Command::ToggleCatalog)];
        }
        if key.in_text_field {
            return Vec::new();
        }
        if let Some(actions) = self.history_shortcut(key) {
            return actions;
        }
        if let Some(actions) = self.arrange_shortcut(key) {
            return actions;
        }
        if let Some(actions) = self.document_shortcut(key) {
            return actions;
        }
        if let Some(actions) = self.node_shortcut(key) {
            return actions;
        }
        if let Some(actions) = self.creation_shortcut(key) {
            return actions;
        }
        self.tool_shortcut(key)
    }

    fn history_shortcut(&mut self, key: &KeyInput) -> Option<Vec<Action>> {
        let m = key.modifiers;
        let code = key.code.as_str();
        if !m.command() {
            return None;
        }
        if code == "KeyY" || (code == "KeyZ" && m.shift) {
            return Some(self.redo());
        }
        (code == "KeyZ").then(|| self.undo())
    }

    /// Letter keys become align/distribute commands while two or more nodes are selected.
    fn arrange_shortcut(&mut self, key: &KeyInput) -> Option<Vec<Action>> {
        let m = key.modifiers;
        if m.command() || m.alt || self.live_selection().len() < 2 {
            return None;
        }
        if m.shift {
            distribution_for(&key.code).map(|d| self.distribute_selection(d))
        } else {
            alignment_for(&key.code).map(|a| self.align_selection(a))
        }
    }

    /// Save, load, clipboard, selection and duplicate.
    fn document_shortcut(&mut self, key: &KeyInput) -> Option<Vec<Action>> {
        let m = key.modifiers;
        let code = key.code.as_str();
        if code == "Escape" {
            let mut actions: Vec<Action> = self.set_selection(Vec::new()).into_iter().collect();
            if self.ui.radial_menu.take().is_some() {
                actions.push(Action::Command(Command::CloseRadialMenu));
            }
            return Some(actions);
        }
        if !m.command() {
            return None;
        }
        let command = match code {
            "KeyS" => Command::Save,
            "KeyO" => Command::Load,
            "KeyC" => Command::Copy { ids: self.live_selection() },
            "KeyV" => Command::Paste { world: self.creation_point() },
            "KeyA" => {
                let all: Vec<NodeId> = self.doc.nodes_bottom_up().map(|n| n.id).collect();
                return Some(self.set_selection(all).into_iter().collect());
            }
            "KeyD" => {
                let ids = self.live_selection();
                if key.repeat || ids.is_empty() {
                    return Some(Vec::new());
                }
                Command::Duplicate { ids, with_content: !m.shift }
            }
            _ => return None,
        };
        Some(vec![Action::Command(command)])
    }

    /// Delete, collapse and group, all acting on the selection.
    fn node_shortcut(&mut self, key: &KeyInput) -> Option<Vec<Action>> {
        let m = key.modifiers;
        match key.code.as_str() {
            "Delete" | "Backspace" => {
                let ids = self.live_selection();
                if key.repeat || ids.is_empty() {
                    return Some(Vec::new());
                }
                let command = if m.shift || self.config.instant_delete {
                    Command::DeleteNodes { ids }
                } else {
                    Command::ConfirmDelete { ids }
                };
                Some(vec![Action::Command(command)])
            }
            "KeyQ" if plain(m) => {
                let ids = self.live_selection();
                (!ids.is_empty()).then(|| vec![Action::Command(Command::ToggleCollapse { ids })])
            }
            "KeyG" if plain(m) => {
                let ids = self.live_selection();
                if ids.len() >= 2 {
                    Some(self.group_nodes(&ids))
                } else {
                    Some(vec![Action::Command(Command::AddChatNode { world: self.creation_point() })])
                }
            }
            _ => None,
        }
    }

    /// Quick slots, then the configured creation keymap.
    fn creation_shortcut(&mut self, key: &KeyInput) -> Option<Vec<Action>> {
        let m = key.modifiers;
        let kind = match quick_slot_index(&key.code).filter(|_| plain(m)) {
            Some(index) => match self.config.quick_slot(index) {
                Some(kind) => kind.to_owned(),
                None => return Some(Vec::new()),
            },
            None => {
                let tier = ModifierTier::of(m)?;
                self.config.creation_kind(self.ui.tool, tier, &key.code)?.to_owned()
            }
        };
        if key.repeat {
            return Some(Vec::new());
        }
        Some(vec![Action::Command(Command::CreateNode { kind, world: self.creation_point() })])
    }

    /// Tool switches, the held zoom key and the radial menu.
    fn tool_shortcut(&mut self, key: &KeyInput) -> Vec<Action> {
        if !plain(key.modifiers) {
            return Vec::new();
        }
        if let Some(tool) = tool_for(&key.code) {
            return self.set_tool(tool);
        }
        match key.code.as_str() {
            "KeyZ" => {
                self.keys.z_held = true;
                Vec::new()
            }
            "Space" if !key.repeat && !self.keys.space_held => {
                self.keys.space_held = true;
                let client = self.ui.last_pointer.unwrap_or_else(|| self.viewport.origin + self.viewport.center());
                self.ui.radial_menu = Some(client);
                vec![Action::Command(Command::OpenRadialMenu { client })]
            }
            _ => Vec::new(),
        }
    }

    /// Put `ids` into a new group, taking them out of any group they were in.
    pub fn group_nodes(&mut self, ids: &[NodeId]) -> Vec<Action> {
        let ids: Vec<NodeId> = ids.iter().copied().filter(|id| self.doc.contains_node(id)).collect();
        if ids.is_empty() {
            return Vec::new();
        }
        let mut previous: Vec<GroupId> = Vec::new();
        for id in &ids {
            for gid in self.doc.groups_containing(id) {
                if let Some(group) = self.doc.group_mut(&gid) {
                    group.node_ids.remove(id);
                }
                previous.push(gid);
            }
        }
        let group = Group::new(DEFAULT_GROUP_TITLE, ids.iter().copied());
        let new_id = group.id;
        self.doc.insert_group(group);
        tracing::debug!(group = %new_id, members = ids.len(), "group created");
        let mut actions = self.commit_groups(previous.into_iter().chain([new_id]));
        actions.push(Action::RenderNeeded);
        actions
    }
}
