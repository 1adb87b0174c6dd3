use std::convert::Infallible;

use iced::{
    Element, Task,
    widget::{container, text},
};

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
    widgets::{Step, layout},
};

#[derive(Debug, Clone)]
pub struct ProcessingScreen {
    pub file_name: String,
}

impl Screen for ProcessingScreen {
    type Message = Infallible;
    type ParentMessage = Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        layout(
            text(""),
            container(text(format!("Detecting shapes in {}...", self.file_name)))
                .center_x(iced::Length::Fill)
                .center_y(iced::Length::Fill),
            Step::Detect,
        )
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {}
    }
}
