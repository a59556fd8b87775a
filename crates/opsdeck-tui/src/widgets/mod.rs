//! Small reusable render helpers shared across screens.

pub mod sub_tabs;
