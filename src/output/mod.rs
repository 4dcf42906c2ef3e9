// Output generation module

pub mod emit;
pub mod figure;

pub use emit::emit;
pub use figure::{annotate, FigureRewriter, LabelRegistry};
