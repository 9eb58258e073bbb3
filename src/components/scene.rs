use image::{imageops, Rgba, RgbaImage};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, BorderType, Clear, Paragraph, Widget},
};

use crate::pages::game::{EndReason, Obstacle, Session, State};

const BACKDROP: Rgba<u8> = Rgba([0, 0, 0, 255]);
const HALF_BLOCK: char = '▀';

/// Draws a session by rasterizing the world at its logical size and
/// downsampling it into half-block cells, two pixels per cell.
pub struct Scene<'a> {
    session: &'a Session,
    width: u32,
    height: u32,
    hint: Option<String>,
}

impl<'a> Scene<'a> {
    pub fn new(session: &'a Session, width: u32, height: u32) -> Self {
        Self { session, width, height, hint: None }
    }

    /// Key hint shown on the game over panel.
    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    fn render_score(&self, view: Rect, buf: &mut Buffer) {
        let text = format!("Score: {}", self.session.score());
        let x = view.right().saturating_sub(text.len() as u16 + 1).max(view.x);
        buf.set_string(x, view.y, text, Style::new().fg(Color::White).bold());
    }

    fn render_game_over(&self, reason: EndReason, view: Rect, buf: &mut Buffer) {
        let reason = match reason {
            EndReason::Collision(Obstacle::Pipe) => "hit a pipe",
            EndReason::Collision(Obstacle::Ground) => "hit the ground",
            EndReason::Quit => "quit",
        };
        let mut lines = vec![
            Line::from("GAME OVER").bold(),
            Line::from(format!("Score: {}", self.session.score())),
            Line::from(reason),
        ];
        if let Some(hint) = &self.hint {
            lines.push(Line::from(hint.as_str()).fg(Color::DarkGray));
        }

        let width = lines.iter().map(|line| line.width() as u16).max().unwrap_or(0) + 6;
        let height = lines.len() as u16 + 2;
        let [_, area, _] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(height), Constraint::Fill(1)]).areas(view);
        let [_, area, _] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(width), Constraint::Fill(1)]).areas(area);

        let block =
            Block::bordered().border_type(BorderType::Rounded).border_style(Style::new().bold().fg(Color::Cyan));
        Clear.render(area, buf);
        Paragraph::new(lines).alignment(Alignment::Center).block(block).render(area, buf);
    }
}

impl Widget for Scene<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() || self.width == 0 || self.height == 0 {
            return;
        }
        let world = compose(self.session, self.width, self.height);
        let view = paint(&world, area, buf);
        self.render_score(view, buf);
        if let State::Ended(reason) = self.session.state() {
            self.render_game_over(reason, view, buf);
        }
    }
}

/// Rasterizes the world back to front: background, pipes, ground, bird.
pub fn compose(session: &Session, width: u32, height: u32) -> RgbaImage {
    let assets = session.assets();
    let mut canvas = RgbaImage::from_pixel(width, height, BACKDROP);
    imageops::overlay(&mut canvas, assets.background.image(), 0, 0);

    for pipe in session.pipes() {
        let x = pipe.x().round() as i64;
        imageops::overlay(&mut canvas, assets.pipe_top.image(), x, pipe.top().round() as i64);
        imageops::overlay(&mut canvas, assets.pipe_bottom.image(), x, pipe.bottom().round() as i64);
    }

    let ground = session.ground();
    for x in ground.tiles() {
        imageops::overlay(&mut canvas, assets.base.image(), x.round() as i64, ground.y().round() as i64);
    }

    let pose = session.bird().pose(assets);
    imageops::overlay(&mut canvas, pose.sprite.image(), pose.x as i64, pose.y as i64);
    canvas
}

/// Writes `image` into the largest centered region of `area` that keeps its
/// aspect ratio and returns that region.
fn paint(image: &RgbaImage, area: Rect, buf: &mut Buffer) -> Rect {
    let (width, height) = image.dimensions();
    let scale = (width as f32 / area.width as f32).max(height as f32 / (area.height as f32 * 2.0));
    let cols = ((width as f32 / scale).floor() as u16).clamp(1, area.width);
    let rows = ((height as f32 / scale / 2.0).floor() as u16).clamp(1, area.height);
    let view = Rect {
        x: area.x + (area.width - cols) / 2,
        y: area.y + (area.height - rows) / 2,
        width: cols,
        height: rows,
    };

    let sample = |col: u16, py: u32| {
        let x = (((col as f32 + 0.5) * scale) as u32).min(width - 1);
        let y = (((py as f32 + 0.5) * scale) as u32).min(height - 1);
        let Rgba([r, g, b, _]) = *image.get_pixel(x, y);
        Color::Rgb(r, g, b)
    };

    for row in 0..rows {
        for col in 0..cols {
            let top = sample(col, row as u32 * 2);
            let bottom = sample(col, row as u32 * 2 + 1);
            if let Some(cell) = buf.cell_mut((view.x + col, view.y + row)) {
                cell.set_char(HALF_BLOCK).set_fg(top).set_bg(bottom);
            }
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{assets::Assets, config::GameConfig};

    fn session() -> Session {
        let config = GameConfig { seed: Some(3), ..GameConfig::default() };
        Session::new(&config, Arc::new(Assets::builtin()))
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right()).filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol())).collect()
            })
            .collect()
    }

    #[test]
    fn test_compose_layers() {
        let session = session();
        let world = compose(&session, 500, 800);
        assert_eq!(world.dimensions(), (500, 800));

        let assets = session.assets();
        let bird = assets.bird_frame(0);
        // Untilted bird at (230, 350), sampled at its center.
        let (cx, cy) = (bird.width() / 2, bird.height() / 2);
        assert_eq!(world.get_pixel(230 + cx, 350 + cy), bird.image().get_pixel(cx, cy));
        assert_eq!(world.get_pixel(10, 731), assets.base.image().get_pixel(10, 1));
    }

    #[test]
    fn test_render_fits_and_centers() {
        let session = session();
        let area = Rect::new(0, 0, 60, 40);
        let mut buf = Buffer::empty(area);
        Scene::new(&session, 500, 800).render(area, &mut buf);

        // 500x800 scaled by 10 gives 50 columns by 40 rows, centered horizontally.
        let rows = rows(&buf);
        assert_eq!(buf.cell((4, 20)).map(|cell| cell.symbol()), Some(" "));
        assert_eq!(buf.cell((5, 20)).map(|cell| cell.symbol()), Some("▀"));
        assert_eq!(buf.cell((54, 39)).map(|cell| cell.symbol()), Some("▀"));
        assert_eq!(buf.cell((55, 39)).map(|cell| cell.symbol()), Some(" "));
        assert!(rows[0].contains("Score: 0"));
        assert!(!rows.iter().any(|row| row.contains("GAME OVER")));
    }

    #[test]
    fn test_render_game_over_panel() {
        let mut session = session();
        session.quit();
        let area = Rect::new(0, 0, 60, 40);
        let mut buf = Buffer::empty(area);
        Scene::new(&session, 500, 800).hint("r restart  q quit").render(area, &mut buf);

        let rows = rows(&buf);
        assert!(rows.iter().any(|row| row.contains("GAME OVER")));
        assert!(rows.iter().any(|row| row.contains("quit")));
        assert!(rows.iter().any(|row| row.contains("r restart  q quit")));
    }

    #[test]
    fn test_render_degenerate_areas() {
        let session = session();
        let mut buf = Buffer::empty(Rect::new(0, 0, 0, 0));
        Scene::new(&session, 500, 800).render(Rect::new(0, 0, 0, 0), &mut buf);

        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        Scene::new(&session, 500, 800).render(area, &mut buf);
    }
}
