//! Layouts that turn a logging event into text.

mod basic;
mod layout_trait;
mod pattern;
mod simple;

pub use basic::BasicLayout;
pub use layout_trait::Layout;
pub use pattern::PatternLayout;
pub use simple::SimpleLayout;
