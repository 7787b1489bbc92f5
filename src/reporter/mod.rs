//! Reporter module for output formatting

pub mod assets;
pub mod console;
pub mod html;
pub mod json;

pub use assets::ReportAssets;
pub use console::ConsoleReporter;
pub use html::{render_html, HtmlReporter};
pub use json::JsonReporter;
