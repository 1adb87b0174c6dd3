use iced::{
    Element, Length, Task,
    widget::{Column, button, column, image, row, scrollable, text},
};

use crate::detection::Detection;
use crate::gui::{
    AppState,
    screens::{Screen, ScreenMessage},
    widgets::{Step, layout},
};
use crate::models::{DetectedShape, ShapeLabel};

/// Original and annotated images side by side
#[derive(Debug, Clone)]
pub struct ResultsScreen {
    pub file_name: String,
    pub upload_number: usize,
    pub original: image::Handle,
    pub annotated: image::Handle,
    pub shapes: Vec<DetectedShape>,
}

#[derive(Debug, Clone)]
pub enum ResultsMessage {
    UploadAnother,
}

#[derive(Debug, Clone)]
pub enum ParentMessage {
    UploadAnother,
}

impl ResultsScreen {
    pub fn new(file_name: String, detection: Detection) -> Self {
        let original = detection.original.to_rgba8();
        let annotated = ::image::DynamicImage::ImageRgb8(detection.annotated).to_rgba8();

        Self {
            file_name,
            upload_number: 0,
            original: image::Handle::from_rgba(original.width(), original.height(), original.into_raw()),
            annotated: image::Handle::from_rgba(annotated.width(), annotated.height(), annotated.into_raw()),
            shapes: detection.shapes,
        }
    }

    fn count(&self, label: ShapeLabel) -> usize {
        self.shapes.iter().filter(|s| s.label == label).count()
    }

    fn sidebar(&self) -> Column<'_, ScreenMessage<Self>> {
        let counts = ShapeLabel::ALL
            .iter()
            .filter(|label| self.count(**label) > 0)
            .map(|label| text(format!("{}: {}", label, self.count(*label))).into());

        Column::with_children(counts).spacing(5).padding(10)
    }
}

impl Screen for ResultsScreen {
    type Message = ResultsMessage;
    type ParentMessage = ParentMessage;

    fn view(&self) -> Element<'_, ScreenMessage<Self>> {
        let shape_list: Column<'_, ScreenMessage<Self>> = Column::with_children(
            self.shapes
                .iter()
                .map(|shape| text(shape.annotation_text()).into()),
        )
        .spacing(5);

        let main = column![
            text(format!("Upload #{}: {}", self.upload_number, self.file_name)).size(24),
            row![
                column![
                    text("Original Image").size(20),
                    image(self.original.clone()).width(Length::Fill),
                ]
                .spacing(10)
                .width(Length::FillPortion(1)),
                column![
                    text("Detected Shapes with Areas").size(20),
                    image(self.annotated.clone()).width(Length::Fill),
                ]
                .spacing(10)
                .width(Length::FillPortion(1)),
            ]
            .spacing(20),
            text(format!("{} shapes detected", self.shapes.len())),
            shape_list,
            button("Upload another").on_press(ScreenMessage::ScreenMessage(ResultsMessage::UploadAnother)),
        ]
        .spacing(20)
        .padding(20);

        layout(self.sidebar(), scrollable(main), Step::Review)
    }

    fn update(
        &mut self,
        message: Self::Message,
        _state: &mut AppState,
    ) -> Task<ScreenMessage<Self>> {
        match message {
            ResultsMessage::UploadAnother => {
                Task::done(ScreenMessage::ParentMessage(ParentMessage::UploadAnother))
            }
        }
    }
}
