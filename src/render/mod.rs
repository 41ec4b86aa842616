#[cfg(feature = "svg")]
pub mod svg;
