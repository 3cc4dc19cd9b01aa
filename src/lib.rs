//! NutriCalc Library
//!
//! Recipe costing and ANVISA nutrition labeling over a store of materials and
//! nested recipes.

pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod nutrition;
pub mod tools;
