use std::path::PathBuf;

use derive_more::{From, TryInto};
use image_engine::image_model::{GenerateError, Image};

use crate::{StringError, context::generation::RequestId};

#[derive(Debug, Clone, From, TryInto)]
pub enum Message {
    Ui(UiMessage),
    Context(ContextMessage),
}

#[derive(Debug, Clone, From, TryInto)]
pub enum UiMessage {
    Generator(ui_messages::Generator),
    OptionsMenu(ui_messages::OptionsMenu),
    MessageDialog(ui_messages::MessageDialog),
}

/// Results of background work, handled by the context regardless of the
/// active screen.
#[derive(Debug, Clone)]
pub enum ContextMessage {
    ImageReady {
        request_id: RequestId,
        result: Result<Image, GenerateError>,
    },
    ImageSaved(Result<PathBuf, StringError>),
    /// Advances the loading indicator.
    Tick,
}

pub mod ui_messages {
    use iced::widget::text_editor;
    use image_engine::image_model::Resolution;

    #[derive(Debug, Clone)]
    pub enum Generator {
        PromptChanged(String),
        Generate,
        SaveImage,
        OpenOptions,
    }

    #[derive(Debug, Clone)]
    pub enum OptionsMenu {
        ApiKeyChanged(String),
        OrganizationChanged(String),
        SelectResolution(Resolution),
        Ok,
    }

    #[derive(Debug, Clone)]
    pub enum MessageDialog {
        Confirm,
        EditAction(text_editor::Action),
    }
}
