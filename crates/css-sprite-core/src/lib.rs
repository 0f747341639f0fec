//! Core library for joining images into a CSS sprite sheet.
//!
//! - Layout: one strip, vertical or horizontal, in input order (no reordering, no rotation)
//! - Pipeline: `pack_images` takes decoded images and returns the RGBA sheet plus placements
//! - Exporters: `to_css` renders the stylesheet, `to_json` the placement metadata
//! - `crush`: optional external PNG recompression behind the `Compressor` trait
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use css_sprite_core::{Direction, SourceImage, pack_images, to_css};
//! # fn main() -> anyhow::Result<()> {
//! let images = vec![
//!   SourceImage::new("a.png", ImageReader::open("a.png")?.decode()?),
//!   SourceImage::new("b.png", ImageReader::open("b.png")?.decode()?),
//! ];
//! let out = pack_images(&images, Direction::Vertical)?;
//! out.rgba.save("master.png")?;
//! std::fs::write("master.css", to_css(&out.sheet, "master.png"))?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod crush;
pub mod error;
pub mod export;
pub mod export_css;
pub mod model;
pub mod pipeline;

pub use config::*;
pub use error::*;
pub use export::*;
pub use export_css::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `css_sprite_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Direction, SpriteConfig, SpriteConfigBuilder};
    pub use crate::crush::{Compressor, CrushWarning, Crushed, NoopCompressor, PngCrush};
    pub use crate::error::SpriteError;
    pub use crate::model::{Placement, Sheet, SheetStats};
    pub use crate::{
        compute_canvas_size, composite, pack_images, pack_layout, save_sheet, to_css, to_json,
        PackOutput, SourceImage,
    };
}
