use std::path::PathBuf;

use color_eyre::Result;
use iced::Task;
use image_engine::{
    config::ImageModelConfig, generator::ImageGenerator, photo_library::PhotoLibrary,
};
use serde::{Deserialize, Serialize};

use crate::message::{ContextMessage, Message};

pub mod generation;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub image_model: ImageModelConfig,
    /// Where saved images go. Defaults to the platform picture directory.
    pub picture_dir: Option<PathBuf>,
}

impl Config {
    pub fn photo_library(&self) -> Result<PhotoLibrary> {
        match &self.picture_dir {
            Some(dir) => Ok(PhotoLibrary::new(dir)),
            None => PhotoLibrary::default_location(),
        }
    }
}

pub struct Context {
    pub config: Config,
    pub generation: generation::GenerationContext,
}

impl Context {
    pub fn new(config: Config, photos: PhotoLibrary) -> Self {
        let mut generator = ImageGenerator::new(config.image_model.clone());
        generator.initialize();
        Self {
            generation: generation::GenerationContext::new(generator, photos),
            config,
        }
    }

    pub fn update(&mut self, message: ContextMessage) -> Result<Task<Message>> {
        self.generation.update(message)
    }

    /// Rebuilds the image client after the config was edited.
    pub fn apply_config(&mut self) {
        self.generation.reconfigure(self.config.image_model.clone());
    }
}
