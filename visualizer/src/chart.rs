use detectcore::views::ChartSpec;
use iced::{
    mouse,
    widget::canvas::{self, Frame, Geometry, Path, Stroke},
    Color, Pixels, Point, Rectangle, Renderer, Size, Theme, Vector,
};

/// One bar segment stacked on an x category.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub series: usize,
    pub base: u64,
    pub value: u64,
}

/// All segments sharing one x value, bottom to top.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedColumn {
    pub label: String,
    pub segments: Vec<Segment>,
    pub total: u64,
}

/// Groups the chart points by x value and stacks them in series order, the way
/// repeated timestamps are drawn on a relative bar chart.
pub fn stack_layout(spec: &ChartSpec) -> Vec<StackedColumn> {
    let mut columns: Vec<StackedColumn> = spec
        .x_categories()
        .into_iter()
        .map(|label| StackedColumn {
            label: label.to_string(),
            segments: Vec::new(),
            total: 0,
        })
        .collect();

    for (series_index, series) in spec.series.iter().enumerate() {
        for point in &series.points {
            if let Some(column) = columns.iter_mut().find(|column| column.label == point.x) {
                column.segments.push(Segment {
                    series: series_index,
                    base: column.total,
                    value: point.y,
                });
                column.total = column.total.saturating_add(point.y);
            }
        }
    }
    columns
}

/// Parses `#rrggbb`; anything else falls back to grey.
pub fn parse_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };
    match (digits.len(), channel(0..2), channel(2..4), channel(4..6)) {
        (6, Some(r), Some(g), Some(b)) => Color::from_rgb8(r, g, b),
        _ => Color::from_rgb(0.5, 0.5, 0.5),
    }
}

const MARGIN_LEFT: f32 = 64.0;
const MARGIN_RIGHT: f32 = 140.0;
const MARGIN_TOP: f32 = 44.0;
const MARGIN_BOTTOM: f32 = 90.0;

#[derive(Clone)]
pub struct BarChart {
    spec: Option<ChartSpec>,
}

impl BarChart {
    pub fn new(spec: Option<ChartSpec>) -> Self {
        Self { spec }
    }
}

fn label(content: impl Into<String>, position: Point, size: f32, color: Color) -> canvas::Text {
    canvas::Text {
        content: content.into(),
        position,
        color,
        size: Pixels(size),
        ..canvas::Text::default()
    }
}

impl<Message> canvas::Program<Message> for BarChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::WHITE);

        let Some(spec) = &self.spec else {
            frame.fill_text(label(
                "Waiting for data...",
                Point::new(MARGIN_LEFT, MARGIN_TOP),
                16.0,
                Color::from_rgb(0.4, 0.4, 0.4),
            ));
            return vec![frame.into_geometry()];
        };

        let ink = Color::from_rgb(0.16, 0.16, 0.2);
        frame.fill_text(label(spec.title.clone(), Point::new(MARGIN_LEFT, 12.0), 20.0, ink));

        let plot = Rectangle {
            x: MARGIN_LEFT,
            y: MARGIN_TOP,
            width: (bounds.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (bounds.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        };

        let axes = Path::new(|builder| {
            builder.move_to(Point::new(plot.x, plot.y));
            builder.line_to(Point::new(plot.x, plot.y + plot.height));
            builder.line_to(Point::new(plot.x + plot.width, plot.y + plot.height));
        });
        frame.stroke(&axes, Stroke::default().with_width(1.0).with_color(ink));

        frame.fill_text(label(
            spec.x_axis.label.clone(),
            Point::new(plot.x + plot.width / 2.0, bounds.height - 20.0),
            14.0,
            ink,
        ));
        frame.with_save(|frame| {
            frame.translate(Vector::new(14.0, plot.y + plot.height / 2.0 + 50.0));
            frame.rotate(-std::f32::consts::FRAC_PI_2);
            frame.fill_text(label(spec.y_axis.label.clone(), Point::ORIGIN, 14.0, ink));
        });

        let columns = stack_layout(spec);
        let max_total = columns.iter().map(|column| column.total).max().unwrap_or(0).max(1);
        let scale = plot.height / max_total as f32;

        frame.fill_text(label(
            max_total.to_string(),
            Point::new(plot.x - 28.0, plot.y - 6.0),
            12.0,
            ink,
        ));
        frame.fill_text(label(
            "0",
            Point::new(plot.x - 16.0, plot.y + plot.height - 6.0),
            12.0,
            ink,
        ));

        if !columns.is_empty() {
            let slot = plot.width / columns.len() as f32;
            let bar_width = (slot * 0.7).max(1.0);
            let tick_angle = (spec.x_axis.tick_angle as f32).to_radians();

            for (index, column) in columns.iter().enumerate() {
                let left = plot.x + slot * index as f32 + (slot - bar_width) / 2.0;
                for segment in &column.segments {
                    let stacked = segment.base.saturating_add(segment.value);
                    let top = plot.y + plot.height - stacked as f32 * scale;
                    let color = spec
                        .series
                        .get(segment.series)
                        .map(|series| parse_color(&series.color))
                        .unwrap_or(ink);
                    frame.fill_rectangle(
                        Point::new(left, top),
                        Size::new(bar_width, segment.value as f32 * scale),
                        color,
                    );
                }

                let tick = Point::new(left + bar_width / 2.0, plot.y + plot.height + 8.0);
                frame.with_save(|frame| {
                    frame.translate(Vector::new(tick.x, tick.y));
                    frame.rotate(tick_angle);
                    frame.fill_text(label(
                        column.label.clone(),
                        Point::new(-6.0 * column.label.len() as f32, 0.0),
                        11.0,
                        ink,
                    ));
                });
            }
        }

        for (index, series) in spec.series.iter().enumerate() {
            let y = plot.y + index as f32 * 20.0;
            let x = plot.x + plot.width + 16.0;
            frame.fill_rectangle(
                Point::new(x, y),
                Size::new(12.0, 12.0),
                parse_color(&series.color),
            );
            frame.fill_text(label(series.name.clone(), Point::new(x + 18.0, y - 2.0), 13.0, ink));
        }

        vec![frame.into_geometry()]
    }
}
