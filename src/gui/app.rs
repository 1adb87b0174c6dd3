use iced::{Element, Task};

use super::{Message, AppState};
use super::screens::{Screen, ScreenData, ScreenMessage, upload::UploadScreen};

pub struct ShapeDetectorApp {
    state: AppState,
    screen: ScreenData,
}

impl ShapeDetectorApp {
    pub fn new() -> (Self, Task<Message>) {
        (
            Self {
                state: AppState::default(),
                screen: ScreenData::Upload(UploadScreen::default()),
            },
            Task::none(),
        )
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        self.screen
            .update(message, &mut self.state)
            .map(|msg| match msg {
                ScreenMessage::ScreenMessage(message) => message,
                ScreenMessage::ParentMessage(never) => match never {},
            })
    }

    pub fn view(&self) -> Element<'_, Message> {
        self.screen.view().map(|msg| match msg {
            ScreenMessage::ScreenMessage(message) => message,
            ScreenMessage::ParentMessage(never) => match never {},
        })
    }
}
