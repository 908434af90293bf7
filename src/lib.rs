//! pptxzero - Pure-Rust PPTX deck generator for vocabulary and phrase tables
//!
//! This crate converts tab-delimited vocabulary/phrase tables into PPTX slide
//! decks by filling the placeholder slots of a pre-built template, and renders
//! the resulting decks to PDF and JPEG preview images through external
//! converters (LibreOffice / poppler).
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pptxzero::{ContentKind, ConverterBuilder, Language};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create a converter with default settings
//!     let converter = ConverterBuilder::new(Language::Spanish, ContentKind::Vocab)
//!         .with_title("第一课")
//!         .with_template_dir("templates")
//!         .build()?;
//!
//!     // Convert the table into a deck
//!     let summary = converter.convert_file(
//!         Path::new("vocab.forpptx.csv"),
//!         Path::new("out/lesson.pptx"),
//!     )?;
//!     println!("{} records -> {} slides", summary.records, summary.slides);
//!
//!     Ok(())
//! }
//! ```
//!
//! For in-memory conversion, use readers and writers directly:
//!
//! ```rust,no_run
//! use pptxzero::{ContentKind, ConverterBuilder, Language};
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let converter = ConverterBuilder::new(Language::English, ContentKind::Vocab).build()?;
//! let source = "num\tword\tpos\tmeaning\tdict_pos\tfrom\textension\tvariations\texamples\n";
//! let template: Vec<u8> = std::fs::read("templates/vocab_english_classic.pptx")?;
//! let mut output = Cursor::new(Vec::new());
//! converter.convert(source.as_bytes(), Cursor::new(template), &mut output)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Rendering to PDF and images
//!
//! ```rust,no_run
//! use pptxzero::media::{pdf_to_images, pptx_to_pdf};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pdf = pptx_to_pdf("out/lesson.pptx", "out/pdf")?;
//!     // Rasterize the first six pages at a fixed 800px width
//!     let images = pdf_to_images(&pdf, "out/img", 0, Some(6))?;
//!     println!("{} preview images", images);
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod deck;
mod error;
pub mod media;
mod phrase;
mod pos;
mod reader;
mod record;
mod template;
mod vocab;
mod writer;

// 公開API
pub use api::{ContentKind, Genre, Language, StatisticsDisplay};
pub use builder::{Converter, ConverterBuilder, DeckSummary};
pub use error::CsvToPptxError;
pub use pos::PartOfSpeech;

#[cfg(test)]
mod tests {
    #[test]
    fn it_works() {
        // Placeholder test
        // This test always passes
    }
}
