use crate::image_model::ImageModel;

pub mod config;
pub mod generator;
pub mod image_model;
pub mod photo_library;

pub type ImgModBox = Box<dyn ImageModel + Send + Sync>;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
