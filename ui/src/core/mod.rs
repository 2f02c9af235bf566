//! Platform-agnostic building blocks shared by the page and the fetch command.

pub mod format;
pub mod history;
pub mod model;
pub mod platform;
pub mod snapshot;
pub mod storage;
pub mod timing;
