pub mod game;

pub const TITLE: &str = " flappy-rs ";
