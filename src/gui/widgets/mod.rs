use iced::{
    Color, Element, Length, Theme, border,
    widget::{Column, column, container, container::{Style, bordered_box}, row, text},
};

/// Where the user is in the upload → detect → review flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Step {
    Upload,
    Detect,
    Review,
}

impl Step {
    const ALL: [Step; 3] = [Step::Upload, Step::Detect, Step::Review];

    fn title(self) -> &'static str {
        match self {
            Step::Upload => "Upload",
            Step::Detect => "Detect",
            Step::Review => "Review",
        }
    }

    fn style(self, other: Self) -> impl Fn(&Theme) -> Style {
        move |theme: &Theme| {
            let style = bordered_box(theme).border(border::width(5));
            // darken steps already reached
            if self >= other {
                let mut color_rgba = theme.palette().background.into_rgba8();
                color_rgba[0] /= 2;
                color_rgba[1] /= 2;
                color_rgba[2] /= 2;
                style.background(Color::from_rgb8(color_rgba[0], color_rgba[1], color_rgba[2]))
            } else {
                style.background(theme.palette().background)
            }
        }
    }
}

/// Step list and sidebar on the left, main content on the right
pub fn layout<'a, Message>(
    sidebar: impl Into<Element<'a, Message>>,
    main_content: impl Into<Element<'a, Message>>,
    step: Step,
) -> Element<'a, Message>
where
    Message: 'a,
{
    let steps: Column<'a, Message> = Step::ALL.into_iter().fold(Column::new(), |steps, s| {
        steps.push(container(text(s.title())).style(step.style(s)).padding(10).width(Length::Fill))
    });

    container(row![
        container(column![
            steps,
            container(sidebar.into()).height(Length::Fill),
        ]).width(Length::FillPortion(1)),
        container(main_content.into()).width(Length::FillPortion(4)),
    ])
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}
