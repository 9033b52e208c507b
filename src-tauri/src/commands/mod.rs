pub mod analysis;
pub mod chat;
pub mod images;
pub mod patterns;
