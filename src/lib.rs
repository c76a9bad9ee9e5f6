#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod loader;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::FlowError;
pub use layout::{GridBuilder, Layout, compute_layout};
pub use loader::{DocumentFormat, load_document};
pub use parser::{HeaderDialect, parse_cell, parse_flow, parse_header};
pub use render::{render_html, render_markdown};
pub use theme::Theme;
