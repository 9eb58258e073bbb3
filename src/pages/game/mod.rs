pub mod bird;
pub mod collision;
pub mod ground;
pub mod pipe;
pub mod session;
pub mod sprite;

use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::{layout::Rect, Frame};
use tracing::info;

pub use self::session::{Controls, EndReason, Obstacle, Session, State};
use super::{Page, PageId};
use crate::{
    action::Action,
    assets::Assets,
    components::scene::Scene,
    config::{key_event_to_string, GameConfig, KeyBindings, PageKeyBindings},
};

pub struct GamePage {
    config: GameConfig,
    assets: Arc<Assets>,
    session: Session,
    controls: Controls,
    keymap: PageKeyBindings,
    global_keymap: PageKeyBindings,
}

impl GamePage {
    pub fn new(config: GameConfig, assets: Arc<Assets>) -> Self {
        let session = Session::new(&config, assets.clone());
        GamePage {
            config,
            assets,
            session,
            controls: Controls::default(),
            keymap: PageKeyBindings::default(),
            global_keymap: PageKeyBindings::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn restart(&mut self) {
        info!(score = self.session.score(), "restarting");
        self.session = Session::new(&self.config, self.assets.clone());
        self.controls = Controls::default();
    }

    /// Shortest key bound to `action`, page bindings first.
    fn key_for(&self, action: &Action) -> Option<String> {
        [&self.keymap, &self.global_keymap].into_iter().find_map(|keymap| {
            keymap
                .iter()
                .filter(|(_, bound)| *bound == action)
                .map(|(key, _)| key_event_to_string(key))
                .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        })
    }

    fn hint(&self) -> String {
        [(Action::Restart, "restart"), (Action::Quit, "quit")]
            .iter()
            .filter_map(|(action, label)| self.key_for(action).map(|key| format!("{key} {label}")))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl Page for GamePage {
    fn id(&self) -> PageId {
        PageId::Game
    }

    fn register_keymap(&mut self, keybindings: &KeyBindings) -> Result<()> {
        if let Some(keymap) = keybindings.pages.get(&self.id()) {
            self.keymap = keymap.clone();
        }
        self.global_keymap = keybindings.global.clone();
        Ok(())
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Flap => self.controls.impulse = true,
            Action::Tick => self.session.tick(std::mem::take(&mut self.controls)),
            Action::Restart if !self.session.is_running() => self.restart(),
            Action::Quit => self.session.quit(),
            _ => {},
        }
        Ok(None)
    }

    fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
        let scene = Scene::new(&self.session, self.config.width, self.config.height).hint(self.hint());
        f.render_widget(scene, area);
        Ok(())
    }
}
