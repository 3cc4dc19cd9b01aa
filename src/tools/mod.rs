//! NutriCalc Tools module
//!
//! MCP tool implementations for recipe costing and nutrition labels.

pub mod labels;
pub mod materials;
pub mod recipes;
pub mod status;
