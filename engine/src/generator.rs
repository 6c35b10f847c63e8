use std::pin::Pin;

use log::{debug, warn};

use crate::{
    ImgModBox,
    config::ImageModelConfig,
    image_model::{GenerateError, Image, ImageModel},
};

pub type GenerationFuture = Pin<Box<dyn Future<Output = Result<Image, GenerateError>> + Send>>;

/// Holds the configuration and the lazily built image client. Every
/// generation goes through here.
pub struct ImageGenerator {
    config: ImageModelConfig,
    model: Option<ImgModBox>,
}

impl ImageGenerator {
    pub fn new(config: ImageModelConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    /// Uses `model` instead of building one from the config.
    pub fn with_model(config: ImageModelConfig, model: ImgModBox) -> Self {
        Self {
            config,
            model: Some(model),
        }
    }

    /// Builds the client from the current config, replacing any previous one.
    pub fn initialize(&mut self) {
        debug!("Initializing image client for {}", self.config.base_url);
        self.model = Some(self.config.make());
    }

    pub fn reconfigure(&mut self, config: ImageModelConfig) {
        self.config = config;
        self.initialize();
    }

    pub fn is_initialized(&self) -> bool {
        self.model.is_some()
    }

    #[cfg(test)]
    fn config(&self) -> &ImageModelConfig {
        &self.config
    }

    /// Requests a single image for `prompt`. The returned future owns
    /// everything it needs, so it can outlive `self`.
    pub fn generate_image(&self, prompt: impl Into<String>) -> GenerationFuture {
        let prompt = prompt.into();
        let model = self.model.as_ref().map(|m| ImageModel::clone(m.as_ref()));

        Box::pin(async move {
            let model = model.ok_or(GenerateError::NotInitialized)?;
            debug!("Requesting image for prompt: {prompt:?}");
            let result = model.get_image(&prompt).await;
            match &result {
                Err(e) if e.is_transient() => {
                    warn!("Image generation failed, may work on retry: {e}")
                }
                Err(e) => warn!("Image generation failed: {e}"),
                Ok(_) => {}
            }
            result
        })
    }
}
