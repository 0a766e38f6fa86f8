pub mod fetch_demo;
pub mod image_demo;
pub mod not_found;

pub use fetch_demo::FetchDemoPage;
pub use image_demo::ImageDemoPage;
pub use not_found::NotFoundPage;
