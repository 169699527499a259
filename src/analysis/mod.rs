pub mod filter;
pub mod grouping;
pub mod pagination;
pub mod sorting;
