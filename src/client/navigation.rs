//! Sidebar state and menu entries.

use serde::{Deserialize, Serialize};

/// Widths strictly above this are laid out as desktop.
pub const DESKTOP_MIN_WIDTH: u32 = 1024;

/// Shown when the signed-in user has no username yet.
pub const PLACEHOLDER_NAME: &str = "Kazuki Jo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    /// Route without the leading slash; `""` is the home page.
    pub route: &'static str,
}

impl MenuItem {
    pub const fn new(label: &'static str, route: &'static str) -> Self {
        Self { label, route }
    }

    pub fn href(&self) -> String {
        format!("/{}", self.route)
    }

    pub fn is_active(&self, current_path: &str) -> bool {
        self.href() == current_path
    }
}

/// Top section of the sidebar.
pub fn primary_menu() -> [MenuItem; 3] {
    [
        MenuItem::new("Home", ""),
        MenuItem::new("Transaction", "transaction"),
        MenuItem::new("Report", "report"),
    ]
}

/// Bottom section of the sidebar, above the user summary.
pub fn secondary_menu() -> [MenuItem; 2] {
    [
        MenuItem::new("Notifications", "notifications"),
        MenuItem::new("Settings", "settings"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Narrow,
    Desktop,
}

impl Viewport {
    pub fn from_width(width: u32) -> Self {
        if width > DESKTOP_MIN_WIDTH {
            Viewport::Desktop
        } else {
            Viewport::Narrow
        }
    }

    pub fn is_desktop(self) -> bool {
        self == Viewport::Desktop
    }
}

/// Keys the overlay reacts to. Everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Escape,
    Other,
}

impl Key {
    pub fn from_name(name: &str) -> Self {
        if name == "Escape" {
            Key::Escape
        } else {
            Key::Other
        }
    }
}

/// Open/closed state of the sidebar. Closed by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sidebar {
    is_open: bool,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Hamburger click: one flip per call.
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    /// The overlay only exists while open, so clicks on it only close.
    pub fn click_overlay(&mut self) {
        if self.is_open {
            self.is_open = false;
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.is_open && key == Key::Escape {
            self.is_open = false;
        }
    }

    pub fn overlay_visible(&self, viewport: Viewport) -> bool {
        self.is_open && !viewport.is_desktop()
    }

    /// Accessible label of the hamburger control.
    pub fn toggle_label(&self) -> &'static str {
        if self.is_open {
            "Close menu"
        } else {
            "Open menu"
        }
    }
}

/// Whether the dashboard page renders next to the sidebar.
pub fn page_visible(viewport: Viewport, nav_open: bool) -> bool {
    viewport.is_desktop() || !nav_open
}

/// Identity shown at the bottom of the sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(default)]
    pub username: Option<String>,
}

impl UserSummary {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
        }
    }

    pub fn display_name(&self) -> &str {
        match self.username.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => PLACEHOLDER_NAME,
        }
    }

    /// Avatar fallback: first character of the username, if any.
    pub fn initial(&self) -> Option<char> {
        self.username.as_deref().and_then(|name| name.chars().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_menu_item() {
        let menu = primary_menu();
        let active: Vec<_> = menu
            .iter()
            .filter(|item| item.is_active("/transaction"))
            .map(|item| item.label)
            .collect();
        assert_eq!(active, vec!["Transaction"]);

        assert!(menu[0].is_active("/"));
        assert!(!menu[0].is_active("/report"));
        assert!(secondary_menu().iter().all(|item| !item.is_active("/")));
    }

    #[test]
    fn test_toggle_flips_once_per_call() {
        let mut sidebar = Sidebar::new();
        assert!(!sidebar.is_open());
        assert_eq!(sidebar.toggle_label(), "Open menu");

        sidebar.toggle();
        assert!(sidebar.is_open());
        assert_eq!(sidebar.toggle_label(), "Close menu");

        sidebar.toggle();
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_overlay_and_escape_only_close() {
        let mut sidebar = Sidebar::new();
        sidebar.click_overlay();
        sidebar.key_down(Key::Escape);
        assert!(!sidebar.is_open());

        sidebar.toggle();
        sidebar.key_down(Key::from_name("Enter"));
        assert!(sidebar.is_open());
        sidebar.key_down(Key::from_name("Escape"));
        assert!(!sidebar.is_open());

        sidebar.toggle();
        sidebar.click_overlay();
        assert!(!sidebar.is_open());
    }

    #[test]
    fn test_overlay_only_on_narrow_viewports() {
        let mut sidebar = Sidebar::new();
        sidebar.toggle();
        assert!(sidebar.overlay_visible(Viewport::Narrow));
        assert!(!sidebar.overlay_visible(Viewport::Desktop));
    }

    #[test]
    fn test_viewport_breakpoint() {
        assert_eq!(Viewport::from_width(1024), Viewport::Narrow);
        assert_eq!(Viewport::from_width(1025), Viewport::Desktop);
        assert_eq!(Viewport::from_width(375), Viewport::Narrow);
    }

    #[test]
    fn test_page_hidden_behind_open_nav_on_narrow() {
        assert!(!page_visible(Viewport::Narrow, true));
        assert!(page_visible(Viewport::Narrow, false));
        assert!(page_visible(Viewport::Desktop, true));
    }

    #[test]
    fn test_user_summary() {
        let user = UserSummary::new("ayumi");
        assert_eq!(user.display_name(), "ayumi");
        assert_eq!(user.initial(), Some('a'));

        let anonymous = UserSummary::default();
        assert_eq!(anonymous.display_name(), PLACEHOLDER_NAME);
        assert_eq!(anonymous.initial(), None);

        let empty = UserSummary::new("");
        assert_eq!(empty.display_name(), PLACEHOLDER_NAME);
        assert_eq!(empty.initial(), None);
    }
}
