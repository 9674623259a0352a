//! # Meal Planner
//!
//! Weekly meal planning over TheMealDB recipes, with a shopping list that
//! consolidates the ingredients of every planned meal: duplicate ingredients
//! are merged, their quantities parsed, units normalized and converted where
//! possible, and checked-off state kept across regenerations.

pub mod config;
pub mod consolidation;
pub mod errors;
pub mod ingredient_model;
pub mod meal_plan;
pub mod quantity_formatter;
pub mod quantity_parser;
pub mod recipe_api;
pub mod recipe_cache;
pub mod recipe_model;
pub mod recipe_source;
pub mod shopping_list;
pub mod shopping_service;
pub mod storage;
pub mod unit_converter;
pub mod unit_normalizer;
