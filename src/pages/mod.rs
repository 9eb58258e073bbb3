use color_eyre::eyre::Result;
use ratatui::{layout::Rect, Frame};
use strum::Display;

use crate::{action::Action, config::KeyBindings};

pub mod game;

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy, Display)]
pub enum PageId {
    Game,
}

pub trait Page {
    fn id(&self) -> PageId;

    #[allow(unused_variables)]
    fn register_keymap(&mut self, keybindings: &KeyBindings) -> Result<()> {
        Ok(())
    }

    #[allow(unused_variables)]
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, rect: Rect) -> Result<()>;
}
