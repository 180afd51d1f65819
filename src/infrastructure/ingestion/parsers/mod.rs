//! Document parser implementations

mod pdf;

pub use pdf::PdfParser;

#[cfg(test)]
pub(crate) use pdf::fixtures;
