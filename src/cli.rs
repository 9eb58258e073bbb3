use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    /// Seed for the pipe heights, random when omitted
    #[arg(short, long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Directory holding bird1.png, bird2.png, bird3.png, pipe.png, base.png and bg.png
    #[arg(short, long, value_name = "DIR")]
    pub assets: Option<PathBuf>,

    /// Simulation and render rate in frames per second
    #[arg(short, long, value_name = "FLOAT")]
    pub fps: Option<f64>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from(["flappy-rs", "--seed", "7", "--assets", "sprites", "-f", "60"]);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.assets, Some(PathBuf::from("sprites")));
        assert_eq!(cli.fps, Some(60.0));
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["flappy-rs"]);
        assert_eq!(cli.seed, None);
        assert_eq!(cli.assets, None);
        assert_eq!(cli.fps, None);
    }
}
