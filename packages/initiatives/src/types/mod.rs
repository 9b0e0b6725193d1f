//! Data types for pages and ranked initiatives.

pub mod initiative;
pub mod page;
