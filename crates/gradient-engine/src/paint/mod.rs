//! Color model for gradient anchors.
//!
//! Colors are straight-alpha RGBA in `[0, 1]`, uploaded verbatim; the surface is
//! configured with a non-sRGB format by default so byte values round-trip the
//! same way the palette editor shows them.

pub mod color;

pub use color::GradientColor;
