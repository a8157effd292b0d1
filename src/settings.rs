use directories::{BaseDirs, ProjectDirs};
use inquire::Text;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Where rendered invoices are written before being handed to the host.
    pub output_dir: String,
    /// Hebrew-capable font; probed from the system when unset.
    pub font_path: Option<String>,
    pub open_after_render: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            font_path: None,
            open_after_render: true,
        }
    }
}

impl AppSettings {
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.output_dir))
    }

    pub fn font_path(&self) -> Option<PathBuf> {
        self.font_path
            .as_deref()
            .map(|p| PathBuf::from(expand_home_dir(p)))
    }
}

fn default_output_dir() -> String {
    ProjectDirs::from("com", "pastry-invoice", "app")
        .map(|dirs| dirs.data_dir().join("print").to_string_lossy().to_string())
        .unwrap_or_else(|| "~/Documents/Invoices".to_string())
}

pub fn default_settings_path() -> PathBuf {
    if let Some(proj_dirs) = ProjectDirs::from("com", "pastry-invoice", "app") {
        return proj_dirs.config_dir().join("settings.toml");
    }
    PathBuf::from("settings.toml")
}

/// Missing file means defaults; a broken file is an error.
pub fn load_settings(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        info!(path = %path.display(), "no settings file, using defaults");
        return Ok(AppSettings::default());
    }
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml::to_string_pretty(settings)?)?;
    Ok(())
}

pub fn setup_config_wizard(path: &Path) -> Result<AppSettings> {
    println!("\n--- Configuration Setup ---");
    let mut settings = load_settings(path)?;

    println!("Opening folder picker...");
    let picked = rfd::FileDialog::new()
        .set_title("Select Output Directory")
        .pick_folder();

    settings.output_dir = match picked {
        Some(dir) => dir.to_string_lossy().to_string(),
        None => {
            println!("No folder selected. Falling back to manual input.");
            Text::new("Output Directory:")
                .with_default(&settings.output_dir)
                .prompt()?
        }
    };

    save_settings(path, &settings)?;
    info!(path = %path.display(), output_dir = %settings.output_dir, "settings saved");
    Ok(settings)
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}
