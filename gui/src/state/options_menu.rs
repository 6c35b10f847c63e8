use color_eyre::{Result, eyre::ensure};
use iced::{
    Length,
    widget::{button, column, radio, row, space, text, text_input},
};
use image_engine::image_model::Resolution;
use strum::IntoEnumIterator;

use crate::{
    TryIntoExt, bold_text,
    context::Context,
    elem_list,
    message::{UiMessage, ui_messages::OptionsMenu as MyMessage},
    save_config,
    state::{Generator, State, StateCommand, cmd},
    top_level_container,
};

#[derive(Debug, Clone)]
pub struct OptionsMenu;

impl State for OptionsMenu {
    fn update(&mut self, event: UiMessage, ctx: &mut Context) -> Result<StateCommand> {
        let msg: MyMessage = event.try_into_ex()?;
        let model_cfg = &mut ctx.config.image_model;

        use MyMessage::*;
        match msg {
            ApiKeyChanged(val) => {
                model_cfg.credentials.api_key = val;
                cmd::none()
            }

            OrganizationChanged(val) => {
                model_cfg.credentials.organization = Some(val).filter(|org| !org.is_empty());
                cmd::none()
            }

            SelectResolution(resolution) => {
                model_cfg.resolution = resolution;
                cmd::none()
            }

            Ok => {
                ensure!(model_cfg.has_api_key(), "Please enter an OpenAI API key");
                save_config(&ctx.config)?;
                ctx.apply_config();
                cmd::transition(Generator)
            }
        }
    }

    fn view<'a>(&'a self, ctx: &'a Context) -> iced::Element<'a, UiMessage> {
        let model_cfg = &ctx.config.image_model;

        let items = elem_list![
            bold_text("Options").width(Length::Fill).center(),
            space().height(20),
            text("OpenAI API Key"),
            text_input("sk-...", &model_cfg.credentials.api_key)
                .secure(true)
                .on_input(|s| MyMessage::ApiKeyChanged(s).into())
                .width(Length::Fill),
            text("Organization (optional)"),
            text_input(
                "org-...",
                model_cfg.credentials.organization.as_deref().unwrap_or("")
            )
            .on_input(|s| MyMessage::OrganizationChanged(s).into())
            .width(Length::Fill),
            space().height(20),
            text("Image Size"),
            column(Resolution::iter().map(|r| {
                radio(r.to_string(), r, Some(model_cfg.resolution), |r| {
                    MyMessage::SelectResolution(r).into()
                })
                .into()
            }))
            .spacing(10),
            space().height(30),
            row![button("Ok").on_press(MyMessage::Ok.into())],
        ];

        top_level_container(
            column(items)
                .spacing(12)
                .width(Length::Fill)
                .height(Length::Fill),
        )
        .into()
    }

    fn clone(&self) -> Box<dyn State> {
        Box::new(Clone::clone(self))
    }
}
