use crate::gui::screens::{
    ScreenData, ScreenMessage, results::ResultsScreen, upload::UploadScreen,
};

#[derive(Debug, Clone)]
pub enum Message {
    Upload(ScreenMessage<UploadScreen>),
    Results(ScreenMessage<ResultsScreen>),
    ChangeScreen(ScreenData),
    /// Outcome of decoding and detecting one upload; errors are display strings
    DetectionFinished(Result<ResultsScreen, String>),
}
