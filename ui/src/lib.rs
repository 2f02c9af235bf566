//! Shared crate for Testwatch: the data model and processing used by the
//! fetch command, plus the dashboard views mounted by the web shell.

pub mod core;
pub mod i18n;
pub mod results;
pub mod views;

pub mod components {
    // Localized application header (components/app_navbar.rs)
    pub mod app_navbar;
    pub use app_navbar::AppNavbar;
}

#[cfg(test)]
mod tests;
