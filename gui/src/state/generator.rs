use color_eyre::Result;
use iced::{
    Color, Element, Length,
    alignment::{Horizontal, Vertical},
    widget::{
        self, Container, button, column, container, progress_bar, row, space, text, text_input,
    },
};

use crate::{
    APP_NAME, ElemHelper, TryIntoExt, bold_text,
    context::{Context, generation::DisplayState},
    message::{UiMessage, ui_messages::Generator as MyMessage},
    state::{OptionsMenu, State, StateCommand, cmd},
};

const IMAGE_SIZE: f32 = 300.;
const LOADING_PANEL_SIZE: f32 = 256.;

/// The main screen: prompt input, generate button and the current image.
#[derive(Debug, Clone)]
pub struct Generator;

impl State for Generator {
    fn update(&mut self, event: UiMessage, ctx: &mut Context) -> Result<StateCommand> {
        use MyMessage::*;
        match event.try_into_ex()? {
            PromptChanged(prompt) => {
                ctx.generation.set_prompt(prompt);
                cmd::none()
            }
            Generate => cmd::task(ctx.generation.generate()),
            SaveImage => cmd::task(ctx.generation.save_image()),
            OpenOptions => cmd::transition(OptionsMenu),
        }
    }

    fn view<'a>(&'a self, ctx: &'a Context) -> Element<'a, UiMessage> {
        let generation = &ctx.generation;

        let display: Element<'a, UiMessage> = match generation.display() {
            DisplayState::Idle => text("Type in prompt to create image").into_elem(),
            DisplayState::Loading => {
                mk_loading_panel(generation.loading_progress()).into_elem()
            }
            DisplayState::Result(img) => column![
                widget::image(&img.handle)
                    .width(IMAGE_SIZE)
                    .height(IMAGE_SIZE),
                button("Save Image").on_press(MyMessage::SaveImage.into())
            ]
            .spacing(10)
            .align_x(Horizontal::Center)
            .into_elem(),
        };

        let main_col = column![
            mk_header(),
            widget::rule::horizontal(2),
            space::vertical(),
            display,
            text_input("Type in prompt here...", generation.prompt())
                .on_input(|s| MyMessage::PromptChanged(s).into())
                .on_submit(MyMessage::Generate.into())
                .padding(10),
            button("Generate").on_press(MyMessage::Generate.into()),
            space::vertical(),
        ]
        .spacing(20)
        .align_x(Horizontal::Center)
        .max_width(600);

        container(main_col)
            .center_x(Length::Fill)
            .padding(20)
            .into()
    }

    fn clone(&self) -> Box<dyn State> {
        Box::new(Clone::clone(self))
    }
}

fn mk_header<'a>() -> Container<'a, UiMessage> {
    container(
        row![
            bold_text(APP_NAME).size(32),
            space::horizontal(),
            button("⚙").on_press(MyMessage::OpenOptions.into())
        ]
        .align_y(Vertical::Center),
    )
    .padding(10)
}

fn mk_loading_panel<'a>(progress: f32) -> Container<'a, UiMessage> {
    container(
        column![
            progress_bar(0.0..=1.0, progress),
            text("Loading...").color(Color::WHITE)
        ]
        .spacing(10)
        .padding(20)
        .align_x(Horizontal::Center),
    )
        .width(LOADING_PANEL_SIZE)
        .height(LOADING_PANEL_SIZE)
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .style(|_theme| container::background(Color::from_rgb(0.5, 0.2, 0.7)))
}
