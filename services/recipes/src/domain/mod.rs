pub mod image;
pub mod recipe;
pub mod repository;
pub mod shopping_list;
pub mod tag;
pub mod types;
pub mod user;
