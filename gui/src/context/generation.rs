use color_eyre::Result;
use iced::{Task, widget::image::Handle as ImgHandle};
use image_engine::{
    config::ImageModelConfig,
    generator::{GenerationFuture, ImageGenerator},
    image_model::{GenerateError, Image},
    photo_library::PhotoLibrary,
};
use log::{debug, error, info};

use crate::{
    StringError,
    message::{ContextMessage, Message},
};

pub type RequestId = u64;

/// Ticks for one sweep of the loading progress bar.
const PROGRESS_STEPS: u32 = 20;

/// View model of the generator screen.
///
/// Every submitted prompt gets a fresh request id and only the result of the
/// most recent request is applied. Results of older requests are dropped, so
/// quick repeated presses can't put an outdated image on screen.
pub struct GenerationContext {
    generator: ImageGenerator,
    photos: PhotoLibrary,
    prompt: String,
    image: Option<GeneratedImage>,
    pending: Option<RequestId>,
    next_request: RequestId,
    loading_ticks: u32,
}

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub image: Image,
    pub handle: ImgHandle,
}

impl GeneratedImage {
    fn new(image: Image) -> Self {
        let handle = ImgHandle::from_bytes(image.data.clone());
        Self { image, handle }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: RequestId,
    pub prompt: String,
}

#[derive(Debug)]
pub enum DisplayState<'a> {
    Idle,
    Loading,
    Result(&'a GeneratedImage),
}

impl GenerationContext {
    pub fn new(generator: ImageGenerator, photos: PhotoLibrary) -> Self {
        Self {
            generator,
            photos,
            prompt: String::new(),
            image: None,
            pending: None,
            next_request: 0,
            loading_ticks: 0,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: String) {
        self.prompt = prompt;
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Position of the loading bar in `0.0..=1.0`, sweeping while a request
    /// is in flight.
    pub fn loading_progress(&self) -> f32 {
        (self.loading_ticks % PROGRESS_STEPS) as f32 / (PROGRESS_STEPS - 1) as f32
    }

    pub fn tick(&mut self) {
        if self.is_loading() {
            self.loading_ticks = self.loading_ticks.wrapping_add(1);
        }
    }

    pub fn display(&self) -> DisplayState<'_> {
        match (&self.image, self.is_loading()) {
            (_, true) => DisplayState::Loading,
            (Some(img), false) => DisplayState::Result(img),
            (None, false) => DisplayState::Idle,
        }
    }

    /// Takes the prompt and marks a new request as the latest one. Prompts
    /// that are empty after trimming whitespace start nothing.
    pub fn submit(&mut self) -> Option<Submission> {
        if self.prompt.trim().is_empty() {
            return None;
        }

        let id = self.next_request;
        self.next_request += 1;
        self.pending = Some(id);
        self.loading_ticks = 0;
        Some(Submission {
            id,
            prompt: std::mem::take(&mut self.prompt),
        })
    }

    /// Submits the prompt and creates the one request for it.
    pub fn start(&mut self) -> Option<(RequestId, GenerationFuture)> {
        let Submission { id, prompt } = self.submit()?;
        Some((id, self.generator.generate_image(prompt)))
    }

    pub fn generate(&mut self) -> Task<Message> {
        let Some((id, request)) = self.start() else {
            return Task::none();
        };

        Task::perform(request, move |result| {
            ContextMessage::ImageReady {
                request_id: id,
                result,
            }
            .into()
        })
    }

    /// Applies the outcome of request `id`. A failure leaves no image behind.
    pub fn complete(&mut self, id: RequestId, result: Result<Image, GenerateError>) {
        if self.pending != Some(id) {
            debug!("Dropping result of superseded request {id}");
            return;
        }

        self.pending = None;
        self.image = match result {
            Ok(image) => Some(GeneratedImage::new(image)),
            Err(e) => {
                debug!("Request {id} produced no image: {e}");
                None
            }
        };
    }

    /// Writes the current image to the photo library in the background.
    pub fn save_image(&self) -> Task<Message> {
        let Some(current) = &self.image else {
            return Task::none();
        };

        let photos = self.photos.clone();
        let image = current.image.clone();
        Task::perform(
            async move { photos.save(&image).await.map_err(StringError::from) },
            |res| ContextMessage::ImageSaved(res).into(),
        )
    }

    pub fn reconfigure(&mut self, config: ImageModelConfig) {
        self.generator.reconfigure(config);
    }

    pub fn update(&mut self, message: ContextMessage) -> Result<Task<Message>> {
        match message {
            ContextMessage::ImageReady { request_id, result } => {
                self.complete(request_id, result);
            }
            ContextMessage::Tick => self.tick(),
            ContextMessage::ImageSaved(Ok(path)) => {
                info!("Image saved as {}", path.display());
            }
            ContextMessage::ImageSaved(Err(e)) => {
                error!("Saving image failed: {e}");
            }
        }
        Ok(Task::none())
    }
}
