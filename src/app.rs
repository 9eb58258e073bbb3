use std::sync::Arc;

use color_eyre::eyre::Result;
use ratatui::{
    layout::{Alignment, Margin},
    prelude::Rect,
    style::{Color, Style},
    widgets::{Block, BorderType, Borders},
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::{
    action::Action,
    assets::Assets,
    cli::Cli,
    config::Config,
    constants::TITLE,
    pages::{game::GamePage, Page},
    tui,
};

pub struct App {
    config: Config,
    should_quit: bool,
    should_suspend: bool,
    pages: Vec<Box<dyn Page>>,
    active_page_index: usize,
}

impl App {
    pub fn new(cli: Cli) -> Result<Self> {
        let mut config = Config::new()?;
        if cli.seed.is_some() {
            config.game.seed = cli.seed;
        }
        if let Some(fps) = cli.fps {
            config.game.fps = fps;
        }
        if cli.assets.is_some() {
            config.game.assets_dir = cli.assets;
        }
        config.game.validate()?;

        let assets = match &config.game.assets_dir {
            Some(dir) => Assets::load(dir)?,
            None => Assets::builtin(),
        };
        info!(seed = ?config.game.seed, fps = config.game.fps, "starting");

        let game_page = GamePage::new(config.game.clone(), Arc::new(assets));

        Ok(Self {
            config,
            should_quit: false,
            should_suspend: false,
            pages: vec![Box::new(game_page)],
            active_page_index: 0,
        })
    }

    fn get_active_page(&mut self) -> Option<&mut Box<dyn Page>> {
        self.pages.get_mut(self.active_page_index)
    }

    fn new_tui(&self) -> Result<tui::Tui> {
        let mut tui = tui::Tui::new()?;
        tui.tick_rate(self.config.game.fps);
        tui.frame_rate(self.config.game.fps);
        Ok(tui)
    }

    pub async fn run(&mut self) -> Result<()> {
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let mut tui = self.new_tui()?;
        tui.enter()?;

        for page in self.pages.iter_mut() {
            page.register_keymap(&self.config.keybindings)?;
        }

        loop {
            if let Some(e) = tui.next().await {
                match e {
                    tui::Event::Key(key) => {
                        let mut action = None;

                        if let Some(page) = self.get_active_page() {
                            let page_id = page.id();
                            if let Some(keymap) = self.config.keybindings.pages.get(&page_id) {
                                action = keymap.get(&key);
                            }
                        }
                        if let Some(act) = self.config.keybindings.global.get(&key) {
                            action = Some(act)
                        }

                        if let Some(action) = action {
                            debug!("Got action: {action:?}");
                            action_tx.send(action.clone())?;
                        }
                    },
                    event => {
                        if let Some(action) = event_action(&event) {
                            action_tx.send(action)?;
                        }
                    },
                }
            }

            while let Ok(action) = action_rx.try_recv() {
                if action != Action::Tick && action != Action::Render {
                    debug!("{action:?}");
                }
                match &action {
                    Action::Quit => self.should_quit = true,
                    Action::Suspend => self.should_suspend = true,
                    Action::Resume => self.should_suspend = false,
                    Action::Error(message) => error!("{message}"),
                    Action::Resize(w, h) => {
                        tui.resize(Rect::new(0, 0, *w, *h))?;
                        self.render(&mut tui)?;
                    },
                    Action::Render => {
                        self.render(&mut tui)?;
                    },
                    _ => {},
                }
                if let Some(page) = self.get_active_page() {
                    if let Some(action) = page.update(action)? {
                        action_tx.send(action)?
                    }
                }
            }
            if self.should_suspend {
                tui.suspend().await?;
                action_tx.send(Action::Resume)?;
                tui = self.new_tui()?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }
        tui.exit().await?;
        Ok(())
    }

    fn render(&mut self, tui: &mut tui::Tui) -> Result<()> {
        tui.draw(|f| {
            let area = f.area();

            let border = Block::default()
                .title(TITLE)
                .title_alignment(Alignment::Center)
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(Color::Black));
            f.render_widget(border, area);

            let area = area.inner(Margin { horizontal: 1, vertical: 1 });

            if let Some(page) = self.pages.get_mut(self.active_page_index) {
                if let Err(e) = page.draw(f, area) {
                    error!("Failed to draw: {e:?}");
                }
            }
        })?;

        Ok(())
    }
}

/// Action for every event that does not go through the keybindings.
fn event_action(event: &tui::Event) -> Option<Action> {
    match event {
        tui::Event::Error => Some(Action::Error("Failed to read terminal input".to_string())),
        tui::Event::Closed => Some(Action::Quit),
        tui::Event::Tick => Some(Action::Tick),
        tui::Event::Render => Some(Action::Render),
        tui::Event::Resize(x, y) => Some(Action::Resize(*x, *y)),
        tui::Event::Key(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_event_actions() {
        assert_eq!(event_action(&tui::Event::Tick), Some(Action::Tick));
        assert_eq!(event_action(&tui::Event::Render), Some(Action::Render));
        assert_eq!(event_action(&tui::Event::Resize(80, 24)), Some(Action::Resize(80, 24)));
        assert_eq!(event_action(&tui::Event::Closed), Some(Action::Quit));
        let key = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(event_action(&tui::Event::Key(key)), None);
    }

    #[test]
    fn test_input_errors_are_reported() {
        assert!(matches!(event_action(&tui::Event::Error), Some(Action::Error(_))));
    }
}
