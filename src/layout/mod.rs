//! Structure-recovery building blocks.

mod columns;
mod headings;
mod hyphen;
mod links;
mod tables;

pub use columns::detect_columns;
pub use headings::{FontSizeStats, HeadingLevelMap};
pub use hyphen::merge_hyphenated_text;
pub use links::resolve_links;
pub use tables::{
    detect_tables_by_ruling_lines, grid_for_region, recover_tables, TableRegion, TableSource,
};
