pub mod browser;
pub mod crawler;
pub mod web;

pub use browser::{Browser, BrowserPage};
pub use crawler::{PageHandle, Renderer};
