//! Charts module - choropleth rasterization

pub mod colormap;
mod renderer;

pub use renderer::{ChoroplethRenderer, Projection, RenderError};
