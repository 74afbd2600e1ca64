//! View-model for the dashboard's navigation sidebar.
//!
//! # Responsibilities
//! - Menu entries and which one is active for the current path
//! - Sidebar open/closed state, overlay and Escape handling
//! - Page visibility on narrow viewports
//! - Logout: API call, local state reset, hard navigation to `/login`
//!
//! # Design Decisions
//! - No rendering; the UI binds to these types
//! - Logout always clears local state, even when the API call fails
//! - Logout navigation is `Navigation::Hard`, never an in-app transition

pub mod api;
pub mod logout;
pub mod navigation;

pub use api::HttpAuthApi;
pub use logout::{
    AuthApi, AuthStore, LocalAuthState, LogoutError, LogoutFlow, LogoutOutcome, Navigation,
    LOGIN_PATH,
};
pub use navigation::{
    page_visible, primary_menu, secondary_menu, Key, MenuItem, Sidebar, UserSummary, Viewport,
};
