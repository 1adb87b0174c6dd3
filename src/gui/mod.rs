mod app;
mod message;
mod state;
mod screens;
mod widgets;

pub use app::ShapeDetectorApp;
pub use message::Message;
pub use state::AppState;

/// Open the upload window and block until it is closed
pub fn run() -> iced::Result {
    iced::application(ShapeDetectorApp::new, ShapeDetectorApp::update, ShapeDetectorApp::view)
        .title("Shape & Area Detection")
        .run()
}
