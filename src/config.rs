use std::{collections::HashMap, path::PathBuf};

use color_eyre::eyre::{eyre, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use derive_deref::{Deref, DerefMut};
use serde::{
    de::{Deserializer, Error as _},
    Deserialize,
};

use crate::{action::Action, constants::game, pages::PageId};

pub const CONFIG: &str = include_str!("../.config/config.yaml");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// World layout and tuning shared by the simulation and the renderer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    /// Horizontal speed of both the pipes and the ground, px per frame.
    pub scroll_velocity: f32,
    pub pipe_gap: f32,
    pub pipe_min_height: u32,
    pub pipe_max_height: u32,
    pub pipe_spawn_x: f32,
    pub first_pipe_x: f32,
    pub ground_y: f32,
    pub bird_x: f32,
    pub bird_y: f32,
    pub seed: Option<u64>,
    pub assets_dir: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: game::WIN_WIDTH,
            height: game::WIN_HEIGHT,
            fps: game::FPS,
            scroll_velocity: game::SCROLL_VELOCITY,
            pipe_gap: game::PIPE_GAP,
            pipe_min_height: game::PIPE_MIN_HEIGHT,
            pipe_max_height: game::PIPE_MAX_HEIGHT,
            pipe_spawn_x: game::PIPE_SPAWN_X,
            first_pipe_x: game::FIRST_PIPE_X,
            ground_y: game::GROUND_Y,
            bird_x: game::BIRD_X,
            bird_y: game::BIRD_Y,
            seed: None,
            assets_dir: None,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(eyre!("window size must be positive, got {}x{}", self.width, self.height));
        }
        if !(self.fps > 0.0) {
            return Err(eyre!("fps must be positive, got {}", self.fps));
        }
        if !(self.scroll_velocity > 0.0) {
            return Err(eyre!("scroll_velocity must be positive, got {}", self.scroll_velocity));
        }
        if self.pipe_min_height >= self.pipe_max_height {
            return Err(eyre!(
                "pipe_min_height ({}) must be below pipe_max_height ({})",
                self.pipe_min_height,
                self.pipe_max_height
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub game: GameConfig,
}

impl Config {
    pub fn new() -> Result<Self, config::ConfigError> {
        let default_config: Config =
            serde_yaml::from_str(CONFIG).map_err(|e| config::ConfigError::Foreign(Box::new(e)))?;
        let data_dir = crate::utils::get_data_dir();
        let config_dir = crate::utils::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().as_ref())?
            .set_default("_config_dir", config_dir.to_string_lossy().as_ref())?;

        let config_files = [("config.yaml", config::FileFormat::Yaml)];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(config::File::from(config_dir.join(file)).format(*format).required(false));
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            tracing::info!("No configuration file found in {}, using defaults", config_dir.display());
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;
        cfg.merge_defaults(default_config);

        Ok(cfg)
    }

    /// Fills in every binding and page the user file leaves out.
    fn merge_defaults(&mut self, default_config: Config) {
        for (page, default_bindings) in default_config.keybindings.pages {
            let user_bindings = self.keybindings.pages.entry(page).or_default();
            for (key, action) in default_bindings.0 {
                user_bindings.entry(key).or_insert(action);
            }
        }
        for (key, action) in default_config.keybindings.global.0 {
            self.keybindings.global.entry(key).or_insert(action);
        }
    }
}

#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct PageKeyBindings(pub HashMap<KeyEvent, Action>);

#[derive(Clone, Debug, Default)]
pub struct KeyBindings {
    pub global: PageKeyBindings,
    pub pages: HashMap<PageId, PageKeyBindings>,
}

#[derive(Clone, Debug, Default, Deserialize)]
struct RawKeyBindings {
    #[serde(default)]
    global: HashMap<String, String>,
    #[serde(default)]
    pages: HashMap<String, HashMap<String, String>>,
}

impl<'de> Deserialize<'de> for KeyBindings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawKeyBindings::deserialize(deserializer)?;

        let parse_bindings = |raw: HashMap<String, String>| -> Result<PageKeyBindings, D::Error> {
            raw.into_iter()
                .map(|(key, action)| {
                    let event = parse_key_event(&key).map_err(D::Error::custom)?;
                    let action: Action = serde_yaml::from_str(&action)
                        .map_err(|e| D::Error::custom(format!("Unknown action `{action}` for `{key}`: {e}")))?;
                    Ok((event, action))
                })
                .collect::<Result<HashMap<_, _>, D::Error>>()
                .map(PageKeyBindings)
        };

        let global = parse_bindings(raw.global)?;
        let pages = raw
            .pages
            .into_iter()
            .map(|(page, bindings)| {
                let page = parse_page_id(&page).map_err(D::Error::custom)?;
                Ok((page, parse_bindings(bindings)?))
            })
            .collect::<Result<HashMap<_, _>, D::Error>>()?;

        Ok(KeyBindings { global, pages })
    }
}

fn parse_page_id(raw: &str) -> Result<PageId, String> {
    match raw.to_ascii_lowercase().as_str() {
        "game" => Ok(PageId::Game),
        _ => Err(format!("Unknown page `{raw}`")),
    }
}

pub fn parse_key_event(raw: &str) -> Result<KeyEvent, String> {
    if raw.chars().filter(|c| *c == '>').count() != raw.chars().filter(|c| *c == '<').count() {
        return Err(format!("Unable to parse `{}`", raw));
    }
    let raw = raw.trim_start_matches('<').trim_end_matches('>');

    let raw_lower = raw.to_ascii_lowercase();
    let (remaining, modifiers) = extract_modifiers(&raw_lower);
    parse_key_code_with_modifiers(remaining, modifiers)
}

fn extract_modifiers(raw: &str) -> (&str, KeyModifiers) {
    let mut modifiers = KeyModifiers::empty();
    let mut current = raw;

    loop {
        match current {
            rest if rest.starts_with("ctrl-") => {
                modifiers.insert(KeyModifiers::CONTROL);
                current = &rest[5..];
            },
            rest if rest.starts_with("alt-") => {
                modifiers.insert(KeyModifiers::ALT);
                current = &rest[4..];
            },
            rest if rest.starts_with("shift-") => {
                modifiers.insert(KeyModifiers::SHIFT);
                current = &rest[6..];
            },
            _ => break,
        };
    }

    (current, modifiers)
}

fn parse_key_code_with_modifiers(raw: &str, mut modifiers: KeyModifiers) -> Result<KeyEvent, String> {
    let c = match raw {
        "esc" => KeyCode::Esc,
        "enter" => KeyCode::Enter,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "backtab" => {
            modifiers.insert(KeyModifiers::SHIFT);
            KeyCode::BackTab
        },
        "backspace" => KeyCode::Backspace,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        "hyphen" | "minus" => KeyCode::Char('-'),
        "tab" => KeyCode::Tab,
        f if f.len() > 1 && f.starts_with('f') => match f[1..].parse::<u8>() {
            Ok(n @ 1..=12) => KeyCode::F(n),
            _ => return Err(format!("Unable to parse {raw}")),
        },
        c if c.chars().count() == 1 => {
            let mut c = c.chars().next().ok_or_else(|| format!("Unable to parse {raw}"))?;
            if modifiers.contains(KeyModifiers::SHIFT) {
                c = c.to_ascii_uppercase();
            }
            KeyCode::Char(c)
        },
        _ => return Err(format!("Unable to parse {raw}")),
    };
    Ok(KeyEvent::new(c, modifiers))
}

pub fn key_event_to_string(key_event: &KeyEvent) -> String {
    let char;
    let key_code = match key_event.code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::F(c) => {
            char = format!("f{c}");
            &char
        },
        KeyCode::Char(' ') => "space",
        KeyCode::Char(c) => {
            char = c.to_string();
            &char
        },
        KeyCode::Esc => "esc",
        _ => "",
    };

    let mut modifiers = Vec::with_capacity(3);

    if key_event.modifiers.intersects(KeyModifiers::CONTROL) {
        modifiers.push("ctrl");
    }

    if key_event.modifiers.intersects(KeyModifiers::SHIFT) {
        modifiers.push("shift");
    }

    if key_event.modifiers.intersects(KeyModifiers::ALT) {
        modifiers.push("alt");
    }

    let mut key = modifiers.join("-");

    if !key.is_empty() {
        key.push('-');
    }
    key.push_str(key_code);

    key
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn default_config() -> Config {
        serde_yaml::from_str(CONFIG).unwrap()
    }

    #[test]
    fn test_default_game_config_matches_constants() {
        let config = default_config();
        assert_eq!(config.game, GameConfig::default());
        assert_eq!(config.game.width, 500);
        assert_eq!(config.game.height, 800);
        assert_eq!(config.game.fps, 30.0);
        assert_eq!(config.game.scroll_velocity, 5.0);
        assert!(config.game.validate().is_ok());
    }

    #[test]
    fn test_default_keybindings() {
        let config = default_config();
        let game = config.keybindings.pages.get(&PageId::Game).unwrap();
        assert_eq!(game.get(&KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty())), Some(&Action::Flap));
        assert_eq!(game.get(&KeyEvent::new(KeyCode::Up, KeyModifiers::empty())), Some(&Action::Flap));
        assert_eq!(game.get(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::empty())), Some(&Action::Restart));

        let global = &config.keybindings.global;
        assert_eq!(global.get(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty())), Some(&Action::Quit));
        assert_eq!(global.get(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(&Action::Quit));
        assert_eq!(global.get(&KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL)), Some(&Action::Suspend));
    }

    #[test]
    fn test_partial_game_section_keeps_other_defaults() {
        let config: Config = serde_yaml::from_str("game:\n  seed: 7\n  scroll_velocity: 3.5\n").unwrap();
        assert_eq!(config.game.seed, Some(7));
        assert_eq!(config.game.scroll_velocity, 3.5);
        assert_eq!(config.game.pipe_gap, 200.0);
        assert_eq!(config.game.ground_y, 730.0);
    }

    #[test]
    fn test_user_bindings_win_over_defaults() {
        let mut config: Config = serde_yaml::from_str("keybindings:\n  pages:\n    Game:\n      <r>: Flap\n").unwrap();
        config.merge_defaults(default_config());

        let game = config.keybindings.pages.get(&PageId::Game).unwrap();
        assert_eq!(game.get(&KeyEvent::new(KeyCode::Char('r'), KeyModifiers::empty())), Some(&Action::Flap));
        assert_eq!(game.get(&KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty())), Some(&Action::Flap));
        assert!(config.keybindings.global.contains_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::empty())));
    }

    #[test]
    fn test_bad_binding_is_an_error() {
        let result: Result<Config, _> = serde_yaml::from_str("keybindings:\n  global:\n    <ctrl-nope>: Quit\n");
        assert!(result.is_err());

        let result: Result<Config, _> = serde_yaml::from_str("keybindings:\n  pages:\n    Menu:\n      <a>: Quit\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(GameConfig { fps: 0.0, ..GameConfig::default() }.validate().is_err());
        assert!(GameConfig { scroll_velocity: -1.0, ..GameConfig::default() }.validate().is_err());
        assert!(GameConfig { pipe_min_height: 450, ..GameConfig::default() }.validate().is_err());
    }

    #[test]
    fn test_simple_keys() {
        assert_eq!(parse_key_event("a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::empty()));

        assert_eq!(parse_key_event("<space>").unwrap(), KeyEvent::new(KeyCode::Char(' '), KeyModifiers::empty()));

        assert_eq!(parse_key_event("esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::empty()));

        assert_eq!(parse_key_event("<f5>").unwrap(), KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()));
    }

    #[test]
    fn test_with_modifiers() {
        assert_eq!(parse_key_event("ctrl-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));

        assert_eq!(parse_key_event("alt-enter").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));

        assert_eq!(parse_key_event("shift-esc").unwrap(), KeyEvent::new(KeyCode::Esc, KeyModifiers::SHIFT));
    }

    #[test]
    fn test_multiple_modifiers() {
        assert_eq!(
            parse_key_event("ctrl-alt-a").unwrap(),
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL | KeyModifiers::ALT)
        );

        assert_eq!(
            parse_key_event("ctrl-shift-enter").unwrap(),
            KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL | KeyModifiers::SHIFT)
        );
    }

    #[test]
    fn test_key_event_round_trip() {
        for raw in ["space", "ctrl-alt-a", "up", "f12", "ctrl-c", "esc"] {
            let event = parse_key_event(raw).unwrap();
            assert_eq!(key_event_to_string(&event), raw);
        }
    }

    #[test]
    fn test_invalid_keys() {
        assert!(parse_key_event("invalid-key").is_err());
        assert!(parse_key_event("ctrl-invalid-key").is_err());
        assert!(parse_key_event("<space").is_err());
        assert!(parse_key_event("f13").is_err());
    }

    #[test]
    fn test_case_insensitivity() {
        assert_eq!(parse_key_event("CTRL-a").unwrap(), KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL));

        assert_eq!(parse_key_event("AlT-eNtEr").unwrap(), KeyEvent::new(KeyCode::Enter, KeyModifiers::ALT));
    }
}
