#![allow(dead_code)]

mod fixtures;
mod helpers;

// Re-export
pub use assertions::{
    assert_avl_keyword_arguments, assert_sorted_by_span, assert_table_valid,
};

pub use helpers::*;

pub use fixtures::*;
