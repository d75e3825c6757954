//! Reaction bar view model
//!
//! Counts row, reaction button, hover quick-pick popup and full emoji picker.
//! Holds only UI state; every reaction change goes through the controller.

use std::sync::Arc;

use serde::Serialize;

use dw_core::ReactionKind;

use crate::dto::ReactionSummaryResponse;
use crate::services::{IntentOutcome, ReactionController};

/// What the reaction button shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonView {
    pub glyph: String,
    pub label: &'static str,
    pub active: bool,
}

/// Entry in the quick-pick popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickPickOption {
    pub kind: ReactionKind,
    pub glyph: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Everything needed to draw the bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionBarView {
    pub summary: ReactionSummaryResponse,
    pub button: ButtonView,
    pub quick_pick_open: bool,
    pub quick_pick: Vec<QuickPickOption>,
    pub picker_open: bool,
}

/// User interaction with the bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionBarEvent {
    HoverEnter,
    HoverLeave,
    ButtonClicked,
    QuickPick(ReactionKind),
    OpenPicker,
    ClosePicker,
    EmojiPicked(String),
    CountClicked(ReactionKind),
}

/// View model for one post's reaction bar
#[derive(Debug)]
pub struct ReactionBar {
    controller: Arc<ReactionController>,
    quick_pick_open: bool,
    picker_open: bool,
}

impl ReactionBar {
    pub fn new(controller: Arc<ReactionController>) -> Self {
        Self {
            controller,
            quick_pick_open: false,
            picker_open: false,
        }
    }

    pub fn controller(&self) -> &Arc<ReactionController> {
        &self.controller
    }

    pub fn render(&self) -> ReactionBarView {
        let snapshot = self.controller.snapshot();
        let summary = ReactionSummaryResponse::from(&snapshot);
        let active = snapshot.active_kind();

        let button = match &summary.current {
            Some(current) => ButtonView {
                glyph: current.glyph.clone(),
                label: current.label,
                active: true,
            },
            None => ButtonView {
                glyph: ReactionKind::Like.glyph().to_string(),
                label: ReactionKind::Like.label(),
                active: false,
            },
        };

        let quick_pick = ReactionKind::ALL
            .iter()
            .map(|&kind| QuickPickOption {
                kind,
                glyph: kind.glyph(),
                label: kind.label(),
                selected: active == Some(kind),
            })
            .collect();

        ReactionBarView {
            summary,
            button,
            quick_pick_open: self.quick_pick_open,
            quick_pick,
            picker_open: self.picker_open,
        }
    }

    /// Apply an interaction; returns the intent outcome when one was issued
    pub async fn dispatch(&mut self, event: ReactionBarEvent) -> Option<IntentOutcome> {
        match event {
            ReactionBarEvent::HoverEnter => {
                self.quick_pick_open = true;
                None
            }
            ReactionBarEvent::HoverLeave => {
                self.quick_pick_open = false;
                None
            }
            ReactionBarEvent::OpenPicker => {
                self.quick_pick_open = false;
                self.picker_open = true;
                None
            }
            ReactionBarEvent::ClosePicker => {
                self.picker_open = false;
                None
            }
            ReactionBarEvent::ButtonClicked => Some(self.click_button().await),
            ReactionBarEvent::QuickPick(kind) => {
                self.quick_pick_open = false;
                Some(self.controller.select(kind).await)
            }
            ReactionBarEvent::EmojiPicked(glyph) => {
                self.picker_open = false;
                Some(self.controller.select_glyph(&glyph).await)
            }
            ReactionBarEvent::CountClicked(kind) => Some(self.controller.select(kind).await),
        }
    }

    /// Like when unreacted, otherwise take back the active reaction
    async fn click_button(&self) -> IntentOutcome {
        if self.controller.snapshot().active_kind().is_some() {
            self.controller.remove().await
        } else {
            self.controller.select(ReactionKind::Like).await
        }
    }
}
