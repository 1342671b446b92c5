use chart::BarChart;
use detectcore::prelude::{DASHBOARD_TITLE, DEFAULT_PORT, FILTER_LABEL, REFRESH_INTERVAL};
use detectcore::views::{CategoryOption, ChartSpec};
use iced::{
    time,
    widget::{column, pick_list, row, text, Canvas, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use serde::Deserialize;

mod chart;

fn main() -> iced::Result {
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(_: &Dashboard) -> String {
    DASHBOARD_TITLE.into()
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(REFRESH_INTERVAL).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Light
}

fn server_url(path: &str) -> String {
    format!("http://127.0.0.1:{}{}", DEFAULT_PORT, path)
}

#[derive(Debug)]
struct Dashboard {
    options: Vec<CategoryOption>,
    selected: CategoryOption,
    chart: Option<ChartSpec>,
    status: String,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    OptionsFetched(Result<Vec<CategoryOption>, String>),
    /// Chart reply tagged with the selection it was requested for.
    ChartFetched(String, Result<ChartSpec, String>),
    CategorySelected(CategoryOption),
}

impl Dashboard {
    fn boot() -> (Self, Task<Message>) {
        let dashboard = Dashboard {
            options: vec![CategoryOption::all()],
            selected: CategoryOption::all(),
            chart: None,
            status: "Waiting for detections...".into(),
        };
        let refresh = dashboard.refresh();
        (dashboard, refresh)
    }

    /// Re-runs both callbacks, as every tick does.
    fn refresh(&self) -> Task<Message> {
        Task::batch([
            Task::perform(fetch_options(), Message::OptionsFetched),
            chart_task(self.selected.value.clone()),
        ])
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => state.refresh(),
            Message::OptionsFetched(Ok(options)) => {
                state.options = options;
                Task::none()
            }
            Message::ChartFetched(selected, _) if selected != state.selected.value => {
                Task::none()
            }
            Message::ChartFetched(_, Ok(chart)) => {
                state.status = format!(
                    "{} bars across {} object types",
                    chart.point_count(),
                    chart.series.len()
                );
                state.chart = Some(chart);
                Task::none()
            }
            Message::OptionsFetched(Err(err)) | Message::ChartFetched(_, Err(err)) => {
                state.status = format!("Dashboard error: {err}");
                Task::none()
            }
            Message::CategorySelected(option) => {
                state.selected = option;
                chart_task(state.selected.value.clone())
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let heading = Container::new(text(DASHBOARD_TITLE).size(32)).center_x(Length::Fill);

        let filter = Container::new(
            row![
                text(FILTER_LABEL).size(16),
                pick_list(
                    state.options.clone(),
                    Some(state.selected.clone()),
                    Message::CategorySelected
                )
                .width(Length::Fill),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .width(Length::Fixed(480.0)),
        )
        .center_x(Length::Fill);

        let chart = Canvas::new(BarChart::new(state.chart.clone()))
            .width(Length::Fill)
            .height(Length::Fixed(460.0));

        let layout = column![heading, filter, chart, text(&state.status).size(13)]
            .spacing(16)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, String> {
    if response.status().is_success() {
        response.json::<T>().await.map_err(|e| e.to_string())
    } else {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => Err(format!("{}: {}", status, body.error)),
            Err(_) => Err(status.to_string()),
        }
    }
}

async fn fetch_options() -> Result<Vec<CategoryOption>, String> {
    let response = reqwest::get(server_url("/options"))
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

fn chart_task(selected: String) -> Task<Message> {
    Task::perform(fetch_chart(selected.clone()), move |result| {
        Message::ChartFetched(selected, result)
    })
}

async fn fetch_chart(selected: String) -> Result<ChartSpec, String> {
    let response = reqwest::Client::new()
        .get(server_url("/figure"))
        .query(&[("object", selected)])
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use detectcore::views::build_chart;
    use detectcore::{DetectionRecord, DetectionTable};

    fn pets() -> DetectionTable {
        vec![
            DetectionRecord::new("t1", "cat", 3),
            DetectionRecord::new("t2", "dog", 5),
        ]
        .into_iter()
        .collect()
    }

    fn dashboard() -> Dashboard {
        Dashboard {
            options: vec![CategoryOption::all()],
            selected: CategoryOption::all(),
            chart: None,
            status: String::new(),
        }
    }

    #[test]
    fn late_reply_for_previous_selection_is_dropped() {
        let mut state = dashboard();
        let _ = Dashboard::update(
            &mut state,
            Message::CategorySelected(CategoryOption::new("cat")),
        );

        let cat_chart = build_chart(&pets(), "cat");
        let _ = Dashboard::update(
            &mut state,
            Message::ChartFetched("cat".into(), Ok(cat_chart.clone())),
        );
        let _ = Dashboard::update(
            &mut state,
            Message::ChartFetched("All".into(), Ok(build_chart(&pets(), "All"))),
        );

        assert_eq!(state.selected.value, "cat");
        assert_eq!(state.chart, Some(cat_chart));
    }

    #[test]
    fn stale_error_does_not_replace_status() {
        let mut state = dashboard();
        let _ = Dashboard::update(
            &mut state,
            Message::ChartFetched("All".into(), Ok(build_chart(&pets(), "All"))),
        );
        let status = state.status.clone();
        let _ = Dashboard::update(
            &mut state,
            Message::ChartFetched("dog".into(), Err("connection refused".into())),
        );
        assert_eq!(state.status, status);
        assert_eq!(state.chart.map(|chart| chart.series.len()), Some(2));
    }
}
