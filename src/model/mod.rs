//! Document model types.
//!
//! The produced interface of the crate: an ordered sequence of generic tree
//! nodes, appended through [`DocumentBuilder`]. Downstream renderers re-emit
//! these as Markdown, HTML, DOCX, etc.

mod node;
mod table;

pub use node::{DocumentBuilder, Inline, Node};
pub use table::{TableCell, TableNode, TableRow};
