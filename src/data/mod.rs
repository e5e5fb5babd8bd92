/// Shared winnow-based parsing utilities for the 4DS container
pub mod parser_utils;
