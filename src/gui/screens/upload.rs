use std::fmt;

use iced::{
    Alignment::Center,
    Element, Task,
    widget::{button, column, container, text},
};
use rfd::AsyncFileDialog;

use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
    widgets::{Step, layout},
};

/// Landing screen with the image picker
#[derive(Debug, Clone, Default)]
pub struct UploadScreen {
    /// Why the previous upload could not be processed
    pub error: Option<String>,
}

impl UploadScreen {
    pub fn with_error(error: String) -> Self {
        Self { error: Some(error) }
    }
}

#[derive(Debug, Clone)]
pub enum UploadMessage {
    PickImage,
    Cancelled,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    Uploaded(UploadedFile),
}

/// Raw contents of the picked file
#[derive(Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

impl Screen for UploadScreen {
    type Message = UploadMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let mut content = column![
            text("Shape & Area Detection").size(32),
            text("Upload an image with shapes (jpg, jpeg or png)"),
            button("Upload image").on_press(ScreenMessage::ScreenMessage(UploadMessage::PickImage)),
        ]
        .spacing(20)
        .padding(20)
        .align_x(Center);

        if let Some(error) = &self.error {
            content = content.push(text(format!("Could not process upload: {}", error)));
        }

        layout(
            text(""),
            container(content)
                .center_x(iced::Length::Fill)
                .center_y(iced::Length::Fill),
            Step::Upload,
        )
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            UploadMessage::PickImage => Task::perform(
                async {
                    let handle = AsyncFileDialog::new()
                        .set_title("Upload an image with shapes")
                        .add_filter("Images", &["jpg", "jpeg", "png"])
                        .pick_file()
                        .await?;
                    Some(UploadedFile {
                        name: handle.file_name(),
                        bytes: handle.read().await,
                    })
                },
                |file| match file {
                    Some(file) => ScreenMessage::ParentMessage(ParentMessage::Uploaded(file)),
                    None => ScreenMessage::ScreenMessage(UploadMessage::Cancelled),
                },
            ),
            UploadMessage::Cancelled => Task::none(),
        }
    }
}
