use chrono::{DateTime, Local, NaiveDate, TimeZone};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;
use uuid::Uuid;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "timetracker-dev",
            Profile::Prod => "timetracker",
        }
    }

    /// Default store location, relative to the home directory
    pub fn default_database_path(self) -> &'static str {
        match self {
            Profile::Dev => "~/.timetracker-dev.db",
            Profile::Prod => "~/.timetracker.db",
        }
    }
}

/// Get the configuration directory for the given profile
/// On macOS this resolves under ~/Library/Application Support/
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "timetracker", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// The local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Build a task id of the form `task_<pp>_<HHMM>_<suffix>`.
///
/// `<pp>` is the first two characters of the project id and `<HHMM>` the
/// creation time. The suffix is the random tail of a UUIDv7 so that tasks
/// created within the same minute get distinct ids.
pub fn generate_task_id<Tz: TimeZone>(project_id: &str, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let prefix: String = project_id.chars().take(2).collect();
    let simple = Uuid::now_v7().simple().to_string();
    let suffix = &simple[simple.len() - 8..];
    format!("task_{}_{}_{}", prefix, now.format("%H%M"), suffix)
}

/// Parsed key binding information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Check if a key event has the primary modifier (Ctrl on Windows/Linux, Option/Alt on macOS)
pub fn has_primary_modifier(modifiers: crossterm::event::KeyModifiers) -> bool {
    #[cfg(target_os = "macos")]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
            || modifiers.contains(crossterm::event::KeyModifiers::ALT)
    }

    #[cfg(not(target_os = "macos"))]
    {
        modifiers.contains(crossterm::event::KeyModifiers::CONTROL)
    }
}

/// Format a key binding string for display, showing the platform-appropriate modifier
pub fn format_key_binding_for_display(key_binding: &str) -> String {
    #[cfg(target_os = "macos")]
    {
        key_binding.replace("Ctrl+", "Opt+")
    }

    #[cfg(not(target_os = "macos"))]
    {
        key_binding.to_string()
    }
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "n", "j"), special keys ("Enter", "Space", "F1")
/// and the Ctrl modifier ("Ctrl+r")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        return Ok(ParsedKeyBinding {
            key_code: parse_key_code(key_part)?,
            requires_ctrl: true,
        });
    }

    Ok(ParsedKeyBinding {
        key_code: parse_key_code(key_str)?,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "PageUp" => Ok(KeyCode::PageUp),
        "PageDown" => Ok(KeyCode::PageDown),
        "Delete" => Ok(KeyCode::Delete),
        _ => {
            if let Some(number) = key_str.strip_prefix('F') {
                if let Ok(n) = number.parse::<u8>() {
                    if (1..=12).contains(&n) {
                        return Ok(KeyCode::F(n));
                    }
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    #[test]
    fn task_id_keeps_project_prefix_and_time() {
        let now = Local.with_ymd_and_hms(2024, 3, 21, 9, 5, 0).unwrap();
        let id = generate_task_id("proj_german", &now);
        assert!(id.starts_with("task_pr_0905_"), "{id}");
        assert_eq!(id.len(), "task_pr_0905_".len() + 8);
    }

    #[test]
    fn task_ids_created_in_the_same_minute_differ() {
        let now = Local.with_ymd_and_hms(2024, 3, 21, 9, 5, 0).unwrap();
        let first = generate_task_id("proj_german", &now);
        let second = generate_task_id("proj_german", &now);
        assert_ne!(first, second);
    }

    #[test]
    fn short_project_ids_are_not_padded() {
        let now = Local.with_ymd_and_hms(2024, 3, 21, 23, 59, 0).unwrap();
        assert!(generate_task_id("x", &now).starts_with("task_x_2359_"));
        assert!(generate_task_id("über", &now).starts_with("task_üb_2359_"));
    }

    #[test]
    fn parses_key_bindings() {
        assert_eq!(parse_key_binding("q").unwrap().key_code, KeyCode::Char('q'));
        assert_eq!(parse_key_binding("Space").unwrap().key_code, KeyCode::Char(' '));
        assert_eq!(parse_key_binding("F1").unwrap().key_code, KeyCode::F(1));
        assert_eq!(parse_key_binding("/").unwrap().key_code, KeyCode::Char('/'));
        let ctrl = parse_key_binding("Ctrl+r").unwrap();
        assert!(ctrl.requires_ctrl);
        assert_eq!(ctrl.key_code, KeyCode::Char('r'));
        assert!(parse_key_binding("Hyper").is_err());
        assert!(parse_key_binding("F13").is_err());
    }

    #[test]
    fn parses_iso_dates() {
        assert!(parse_date("2024-03-21").is_ok());
        assert!(parse_date("21/03/2024").is_err());
    }

    #[test]
    fn expands_home_relative_paths() {
        let expanded = expand_path("~/.timetracker.db");
        assert!(expanded.ends_with(".timetracker.db"));
        assert_eq!(expand_path("/tmp/x.db"), PathBuf::from("/tmp/x.db"));
    }
}
