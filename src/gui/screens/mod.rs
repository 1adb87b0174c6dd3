pub mod processing;
pub mod results;
pub mod upload;

use iced::{Element, Task};

use crate::config::DetectorConfig;
use crate::detection::ShapeDetector;
use crate::gui::{AppState, Message};

#[derive(Debug, Clone)]
pub enum ScreenMessage<S: Screen> {
    ScreenMessage(S::Message),
    ParentMessage(S::ParentMessage),
}

pub trait Screen: Sized {
    type Message: std::fmt::Debug;
    type ParentMessage: std::fmt::Debug;
    fn view(&self) -> Element<'_, ScreenMessage<Self>>;
    fn update(&mut self, message: Self::Message, state: &mut AppState)
    -> Task<ScreenMessage<Self>>;
}

#[derive(Debug, Clone)]
pub enum ScreenData {
    Upload(upload::UploadScreen),
    Processing(processing::ProcessingScreen),
    Results(results::ResultsScreen),
}

impl Screen for ScreenData {
    type Message = Message;
    type ParentMessage = std::convert::Infallible;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        match self {
            ScreenData::Upload(screen) => screen.view().map(Message::Upload),
            ScreenData::Processing(screen) => screen.view().map(|msg| -> Message { match msg {
                ScreenMessage::ScreenMessage(never) | ScreenMessage::ParentMessage(never) => match never {},
            } }),
            ScreenData::Results(screen) => screen.view().map(Message::Results),
        }
        .map(ScreenMessage::ScreenMessage)
    }

    fn update(
        &mut self,
        message: Self::Message,
        state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match (self, message) {
            (x, Message::ChangeScreen(screen)) => {
                *x = screen;
                Task::none()
            }
            (x, Message::DetectionFinished(Ok(mut results))) => {
                state.processed += 1;
                results.upload_number = state.processed;
                *x = ScreenData::Results(results);
                Task::none()
            }
            (x, Message::DetectionFinished(Err(error))) => {
                *x = ScreenData::Upload(upload::UploadScreen::with_error(error));
                Task::none()
            }
            (ScreenData::Upload(page), Message::Upload(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Upload)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(upload::ParentMessage::Uploaded(file)) => {
                    let config = state.config;
                    Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                        ScreenData::Processing(processing::ProcessingScreen {
                            file_name: file.name.clone(),
                        }),
                    )))
                    .chain(Task::perform(
                        async move { process_upload(file, config) },
                        |result| ScreenMessage::ScreenMessage(Message::DetectionFinished(result)),
                    ))
                }
            },
            (ScreenData::Results(page), Message::Results(msg)) => match msg {
                ScreenMessage::ScreenMessage(msg) => page
                    .update(msg, state)
                    .map(Message::Results)
                    .map(ScreenMessage::ScreenMessage),
                ScreenMessage::ParentMessage(results::ParentMessage::UploadAnother) => {
                    Task::done(ScreenMessage::ScreenMessage(Message::ChangeScreen(
                        ScreenData::Upload(upload::UploadScreen::default()),
                    )))
                }
            },
            _ => Task::none(),
        }
    }
}

/// Decode and detect one upload, start to finish
fn process_upload(
    file: upload::UploadedFile,
    config: DetectorConfig,
) -> Result<results::ResultsScreen, String> {
    let detection = ShapeDetector::with_config(config)
        .process_bytes(&file.bytes)
        .map_err(|e| {
            tracing::warn!(file = %file.name, error = %e, "upload failed");
            e.to_string()
        })?;
    Ok(results::ResultsScreen::new(file.name, detection))
}
