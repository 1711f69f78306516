pub mod ingredient;
pub mod mark;
pub mod recipe;
pub mod subscription;
pub mod tag;
pub mod user;
