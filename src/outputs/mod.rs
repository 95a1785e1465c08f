//! Rendering of scraped notices for delivery.
//!
//! # Submodules
//!
//! - [`html`]: Builds the HTML email digest from both sources
//!
//! # Digest Layout
//!
//! ```text
//! <!DOCTYPE html><html><body>
//! ├── ВиК section          (one block per water notice, or a placeholder)
//! ├── Енерго Про section   (one block per power notice, or a placeholder)
//! └── footer
//! </body></html>
//! ```

pub mod html;
