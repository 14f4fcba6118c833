#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use error::ParseError;
pub use ir::Pedigree;
pub use layout::{Layout, compute_layout};
pub use parser::parse_pedigree;
pub use render::render_svg;
pub use theme::Theme;
