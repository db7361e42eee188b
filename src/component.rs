//! Component trait - Interface for UI components
//!
//! Screens and dialogs each own their local UI state (cursor, scroll, text
//! being typed) and talk to the [`App`](crate::app::App) through Actions.
//! Table data, filters and settings stay in the App.

use crate::action::Action;
use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

/// Trait for UI components
///
/// 1. `handle_key_event` turns a key press into an Action
/// 2. `update` reacts to Actions the App forwards
/// 3. `draw` renders into the given area
pub trait Component {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    /// Map a key press to an Action. Components may update purely local
    /// state here (typed text, list cursor) but never App state.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    /// React to an Action, optionally producing a follow-up Action
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
