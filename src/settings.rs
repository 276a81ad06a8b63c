use std::path::PathBuf;

use crate::view::GridLayout;

/// Editor settings that persist across sessions
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Directory holding one file per tile
    pub tile_dir: PathBuf,
    /// Tile edge in pixels
    pub tile_dimension: usize,
    /// 3 = raw RGB, 4 = raw RGBA
    pub bytes_per_pixel: usize,
    pub tiles_across: usize,
    pub tiles_down: usize,
    /// Gap between tiles in the grid
    pub tile_padding: usize,
    /// Border around the grid inside the window
    pub window_padding: usize,
    /// Ask before writing a new order to disk
    pub confirm_save: bool,
    /// Ask before dropping unsaved edits on reload or exit
    pub confirm_discard: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tile_dir: PathBuf::from(".tiles"),
            tile_dimension: 32,
            bytes_per_pixel: 3,
            tiles_across: 16,
            tiles_down: 10,
            tile_padding: 2,
            window_padding: 32,
            confirm_save: true,
            confirm_discard: true,
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/tileseted/tileseted_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\tileseted\tileseted_settings.cfg
    /// On macOS:   ~/Library/Application Support/tileseted/tileseted_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        let dir = config_dir()?.join("tileseted");
        let _ = std::fs::create_dir_all(&dir);
        Some(dir.join("tileseted_settings.cfg"))
    }

    /// Bytes in one tile file.
    pub fn tile_bytes(&self) -> usize {
        self.tile_dimension * self.tile_dimension * self.bytes_per_pixel
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout {
            tiles_across: self.tiles_across,
            tiles_down: self.tiles_down,
            dimension: self.tile_dimension,
            padding: self.tile_padding,
        }
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "tile_dir={}\n\
             tile_dimension={}\n\
             bytes_per_pixel={}\n\
             tiles_across={}\n\
             tiles_down={}\n\
             tile_padding={}\n\
             window_padding={}\n\
             confirm_save={}\n\
             confirm_discard={}\n",
            self.tile_dir.display(),
            self.tile_dimension,
            self.bytes_per_pixel,
            self.tiles_across,
            self.tiles_down,
            self.tile_padding,
            self.window_padding,
            self.confirm_save,
            self.confirm_discard,
        )
    }

    /// Parse `key=value` lines. Unknown keys are skipped and bad values keep
    /// their defaults.
    pub fn from_config_str(content: &str) -> Self {
        let mut s = Self::default();
        let d = Self::default();
        for line in content.lines() {
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "tile_dir" => {
                    if !val.is_empty() {
                        s.tile_dir = PathBuf::from(val);
                    }
                }
                "tile_dimension" => s.tile_dimension = positive(val).unwrap_or(d.tile_dimension),
                "bytes_per_pixel" => {
                    s.bytes_per_pixel = match val {
                        "3" => 3,
                        "4" => 4,
                        _ => d.bytes_per_pixel,
                    };
                }
                "tiles_across" => s.tiles_across = positive(val).unwrap_or(d.tiles_across),
                "tiles_down" => s.tiles_down = positive(val).unwrap_or(d.tiles_down),
                "tile_padding" => s.tile_padding = val.parse().unwrap_or(d.tile_padding),
                "window_padding" => s.window_padding = val.parse().unwrap_or(d.window_padding),
                "confirm_save" => s.confirm_save = val != "false",
                "confirm_discard" => s.confirm_discard = val != "false",
                _ => {}
            }
        }
        s
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::settings_path() else { return };
        if let Err(e) = std::fs::write(&path, self.to_config_string()) {
            crate::log_warn!("Could not write settings to {}: {}", path.display(), e);
        }
    }

    /// Load settings from disk (returns default if file missing)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        let Ok(content) = std::fs::read_to_string(&path) else { return Self::default() };
        Self::from_config_str(&content)
    }
}

fn positive(val: &str) -> Option<usize> {
    val.parse().ok().filter(|&n: &usize| n > 0)
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library").join("Application Support"));
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg));
        }
        std::env::var("HOME").ok().map(|home| PathBuf::from(home).join(".config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_config_text() {
        let s = EditorSettings {
            tile_dir: PathBuf::from("/srv/game/tiles"),
            tile_dimension: 16,
            bytes_per_pixel: 4,
            confirm_save: false,
            ..EditorSettings::default()
        };
        assert_eq!(EditorSettings::from_config_str(&s.to_config_string()), s);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let s = EditorSettings::from_config_str(
            "tile_dimension=0\nbytes_per_pixel=2\ntiles_across=wide\nmystery=1\nno equals sign\n",
        );
        assert_eq!(s, EditorSettings::default());
    }

    #[test]
    fn tile_bytes_follows_dimension() {
        assert_eq!(EditorSettings::default().tile_bytes(), 32 * 32 * 3);
    }
}
