use std::{fmt, pin::Pin};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

pub mod error;
pub use error::GenerateError;

pub mod open_ai_images;
pub use open_ai_images::OpenAIImages;

use crate::ImgModBox;

/// Size category requested from the API. The API only accepts these three
/// square sizes for the classic images endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    Display,
    clap::ValueEnum,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
    EnumIter,
    Default,
)]
pub enum Resolution {
    #[strum(to_string = "Small (256x256)")]
    Small,
    #[default]
    #[strum(to_string = "Medium (512x512)")]
    Medium,
    #[strum(to_string = "Large (1024x1024)")]
    Large,
}

impl Resolution {
    pub fn as_size(&self) -> &'static str {
        match self {
            Resolution::Small => "256x256",
            Resolution::Medium => "512x512",
            Resolution::Large => "1024x1024",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    #[serde(rename = "url")]
    Url,
    #[default]
    #[serde(rename = "b64_json")]
    Base64Json,
}

/// Decoded bytes of one generated image.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    pub data: Bytes,
}

impl Image {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    /// File extension guessed from the magic bytes.
    pub fn extension(&self) -> &'static str {
        match self.data.as_ref() {
            [0x89, b'P', b'N', b'G', ..] => "png",
            [0xFF, 0xD8, 0xFF, ..] => "jpg",
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
            _ => "img",
        }
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("bytes", &self.data.len())
            .field("format", &self.extension())
            .finish()
    }
}

pub type ImageFuture<'a> = Pin<Box<dyn Future<Output = Result<Image, GenerateError>> + Send + 'a>>;

pub trait ImageModel {
    fn get_image<'a>(&'a self, prompt: &'a str) -> ImageFuture<'a>;
    fn clone(&self) -> ImgModBox;
}
