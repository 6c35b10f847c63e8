use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use color_eyre::{
    Result,
    eyre::{WrapErr as _, eyre},
};
use iced::{
    Element, Font, Length, Subscription, Task,
    font::{self},
    padding,
    widget::{container, scrollable, text},
};
use image_engine::photo_library::PhotoLibrary;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    context::{Config, Context},
    message::{ContextMessage, Message},
    state::{Generator, Modal, OptionsMenu, State, StateExt},
};

pub mod cli;
pub mod context;
pub mod message;
pub mod state;

pub const APP_NAME: &str = "Image Maker";

const LOADING_TICK: Duration = Duration::from_millis(100);

pub struct Gui {
    state: Box<dyn State>,
    ctx: Context,
}

impl Gui {
    pub fn new(mb_config: Option<Config>, photos: PhotoLibrary) -> Self {
        match mb_config {
            Some(cfg) if cfg.image_model.has_api_key() => Gui {
                state: Generator.boxed(),
                ctx: Context::new(cfg, photos),
            },
            mb_config => Gui {
                state: Modal::message(
                    OptionsMenu.boxed(),
                    "Welcome",
                    indoc::indoc! {"
                    Hi, before you can create images, Image Maker needs an OpenAI API key.
                    The organization is optional, leave it empty unless your account
                    belongs to more than one organization.
                    "
                    },
                )
                .boxed(),
                ctx: Context::new(mb_config.unwrap_or_default(), photos),
            },
        }
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match self.try_update(message) {
            Ok(task) => task,
            Err(e) => {
                self.state = Modal::message(self.state.clone(), "Error", format!("{e:?}")).boxed();
                Task::none()
            }
        }
    }

    fn try_update(&mut self, message: Message) -> Result<Task<Message>> {
        match message {
            Message::Ui(ui_message) => {
                let cmd = self.state.update(ui_message, &mut self.ctx)?;
                if let Some(new_state) = cmd.transition {
                    self.state = new_state;
                }
                Ok(cmd.task.unwrap_or(Task::none()))
            }
            Message::Context(context_message) => self.ctx.update(context_message),
        }
    }

    /// Drives the loading indicator while a request is in flight.
    pub fn subscription(&self) -> Subscription<Message> {
        if self.ctx.generation.is_loading() {
            iced::time::every(LOADING_TICK).map(|_| Message::Context(ContextMessage::Tick))
        } else {
            Subscription::none()
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.state.view(&self.ctx).map(|m| m.into())
    }
}

/// Clonable error text for results that travel inside messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringError(pub String);

impl fmt::Display for StringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for StringError {}

impl From<color_eyre::Report> for StringError {
    fn from(e: color_eyre::Report) -> Self {
        Self(format!("{e:#}"))
    }
}

pub fn load_ron_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let src = fs::read_to_string(path)?;
    ron::from_str(&src).with_context(|| format!("parsing {}", path.display()))
}

pub fn save_ron_file<T: Serialize>(path: &Path, x: &T) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    Ok(fs::write(path, ron::ser::to_string_pretty(x, Default::default())?)?)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dirs::config_local_dir()
        .ok_or(eyre!("Couldn't get config dir"))?
        .join("image_maker.ron"))
}

pub fn load_config() -> Result<Option<Config>> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(path: &Path) -> Result<Option<Config>> {
    if !path.exists() {
        Ok(None)
    } else {
        load_ron_file(path).map(Some)
    }
}

pub fn save_config(cfg: &Config) -> Result<()> {
    save_ron_file(&config_path()?, cfg)
}

macro_rules! elem_list {
    ($($elems:expr),+ $(,)?) => {
        [$(iced::Element::from($elems)),*]
    };
}
pub(crate) use elem_list;

pub trait ElemHelper<'a, T> {
    fn into_elem(self) -> Element<'a, T>;
}

impl<'a, ElemT, T: Into<Element<'a, ElemT>>> ElemHelper<'a, ElemT> for T {
    fn into_elem(self) -> Element<'a, ElemT> {
        self.into()
    }
}

fn bold_text<'a>(t: impl text::IntoFragment<'a>) -> iced::widget::Text<'a> {
    iced::widget::text(t).font(bold_default_font())
}

fn bold_default_font() -> Font {
    Font {
        weight: font::Weight::Bold,
        ..Font::DEFAULT
    }
}

fn top_level_container<'a, T: Send + 'static>(
    elem: impl Into<Element<'a, T>>,
) -> container::Container<'a, T> {
    container(
        container(scrollable(
            container(elem).padding(padding::all(10).right(20)),
        ))
        .padding(20)
        .max_width(800),
    )
    .center(Length::Fill)
}

pub trait TryIntoExt<T> {
    fn try_into_ex(self) -> color_eyre::Result<T>;
}

impl<T, Target, E> TryIntoExt<Target> for T
where
    T: TryInto<Target, Error = E>,
    T: fmt::Debug,
    T: Clone,
    E: std::error::Error + Send + Sync + 'static,
{
    fn try_into_ex(self) -> color_eyre::Result<Target> {
        self.clone()
            .try_into()
            .with_context(|| format!("{self:#?}"))
    }
}

#[cfg(test)]
mod test {
    use image_engine::{config::ImageModelConfig, image_model::Resolution};
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn missing_config_file() -> Result<()> {
        let tmp = TempDir::new()?;
        assert_eq!(load_config_from(&tmp.path().join("image_maker.ron"))?, None);
        Ok(())
    }

    #[test]
    fn config_survives_save_and_load() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("config").join("image_maker.ron");

        let mut cfg = Config {
            image_model: ImageModelConfig::with_api_key("sk-saved"),
            picture_dir: Some(tmp.path().join("pictures")),
        };
        cfg.image_model.resolution = Resolution::Small;
        save_ron_file(&path, &cfg)?;

        assert_eq!(load_config_from(&path)?, Some(cfg));
        Ok(())
    }

    #[test]
    fn broken_config_names_the_file() -> Result<()> {
        let tmp = TempDir::new()?;
        let path = tmp.path().join("image_maker.ron");
        fs::write(&path, "(image_model: ")?;

        let err = load_config_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("image_maker.ron"));
        Ok(())
    }
}
