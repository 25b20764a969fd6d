use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(self) -> &'static str {
        match self {
            Profile::Dev => "planboard-dev",
            Profile::Prod => "planboard",
        }
    }

    /// Store namespace used when the config does not name one
    pub fn default_namespace(self) -> &'static str {
        match self {
            Profile::Dev => "dev",
            Profile::Prod => "default",
        }
    }
}

/// Get the configuration directory path for planboard
/// If profile is Dev, uses "planboard-dev" instead of "planboard"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "planboard", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path for planboard
/// If profile is Dev, uses "planboard-dev" instead of "planboard"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "planboard", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
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

/// Parse a user-supplied day: `today`, `tomorrow`, `yesterday` or any form
/// accepted by [`crate::calendar::parse_date_key`]
pub fn parse_date(date_str: &str) -> Option<chrono::NaiveDate> {
    let today = today();
    match date_str.trim().to_ascii_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.succ_opt(),
        "yesterday" => today.pred_opt(),
        other => crate::calendar::parse_date_key(other),
    }
}

/// Current local calendar day
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_home_prefix_only() {
        assert_eq!(expand_path("/tmp/board.db"), PathBuf::from("/tmp/board.db"));
        if BaseDirs::new().is_some() {
            assert!(!expand_path("~/board.db").starts_with("~"));
        }
    }

    #[test]
    fn relative_day_words() {
        assert_eq!(parse_date("today"), Some(today()));
        assert_eq!(parse_date("Tomorrow"), today().succ_opt());
        assert_eq!(parse_date("2024-03-15"), chrono::NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(parse_date("someday"), None);
    }
}
