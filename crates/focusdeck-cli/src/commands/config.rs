use clap::Subcommand;
use focusdeck_core::palette;

use super::open_stores;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the stored theme color
    GetTheme,
    /// Store a new theme color token
    SetTheme { value: String },
    /// Print a monochromatic chart palette derived from the theme
    Palette {
        #[arg(long, default_value_t = 5)]
        n: usize,
    },
    /// Print the config file path
    Path,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, _) = open_stores()?;

    match action {
        ConfigAction::GetTheme => {
            println!("{}", config.config().theme_color);
        }
        ConfigAction::SetTheme { value } => {
            config.set_theme_color(&value)?;
            eprintln!("Theme updated: {value}");
        }
        ConfigAction::Palette { n } => {
            let base = palette::sanitize_hex(&config.config().theme_color);
            let colors = palette::monochromatic(&base, n);
            println!("{}", serde_json::to_string_pretty(&colors)?);
        }
        ConfigAction::Path => {
            println!("{}", config.path().display());
        }
    }
    Ok(())
}
