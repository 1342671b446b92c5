use crate::bridge::model::{ErrorBody, FigureQuery};
use crate::dashboard::app::DashboardApp;
use anyhow::Context;
use detectcore::prelude::FeedError;
use detectcore::telemetry::LogManager;
use std::{convert::Infallible, future::Future, net::SocketAddr, sync::Arc};
use warp::{http::StatusCode, Filter, Rejection, Reply};

#[derive(Debug)]
struct FeedRejection(String);

impl warp::reject::Reject for FeedRejection {}

fn reject(err: FeedError) -> Rejection {
    warp::reject::custom(FeedRejection(err.to_string()))
}

/// HTTP host exposing the dashboard callbacks as JSON endpoints.
///
/// `GET /options` and `GET /figure?object=..` are what the client polls on
/// every tick; `/summary` and `/status` are read-only extras.
pub struct DashboardServer {
    app: Arc<DashboardApp>,
    address: SocketAddr,
}

impl DashboardServer {
    pub fn new(app: Arc<DashboardApp>, address: SocketAddr) -> Self {
        Self { app, address }
    }

    pub fn address(&self) -> SocketAddr {
        self.address
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        let app = self.app.clone();
        let app_filter = warp::any().map(move || app.clone());

        let options_route = warp::path("options")
            .and(warp::path::end())
            .and(warp::get())
            .and(app_filter.clone())
            .and_then(|app: Arc<DashboardApp>| async move {
                app.dropdown_options()
                    .map(|options| warp::reply::json(&options))
                    .map_err(reject)
            });

        let figure_route = warp::path("figure")
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<FigureQuery>())
            .and(app_filter.clone())
            .and_then(|query: FigureQuery, app: Arc<DashboardApp>| async move {
                app.figure(query.selected())
                    .map(|chart| warp::reply::json(&chart))
                    .map_err(reject)
            });

        let summary_route = warp::path("summary")
            .and(warp::path::end())
            .and(warp::get())
            .and(app_filter.clone())
            .and_then(|app: Arc<DashboardApp>| async move {
                app.summary()
                    .map(|summary| warp::reply::json(&summary))
                    .map_err(reject)
            });

        let status_route = warp::path("status")
            .and(warp::path::end())
            .and(warp::get())
            .and(app_filter)
            .map(|app: Arc<DashboardApp>| warp::reply::json(&app.status()));

        options_route
            .or(figure_route)
            .or(summary_route)
            .or(status_route)
            .recover(handle_rejection)
            .with(warp::log("dashboard_server::http"))
    }

    /// Binds the listener and serves until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let routes = self.routes();
        let (address, server) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(self.address, shutdown)
            .with_context(|| format!("binding dashboard to {}", self.address))?;
        LogManager::new("http").record(&format!("dashboard listening on http://{}", address));
        server.await;
        Ok(())
    }
}

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, message) = if let Some(FeedRejection(message)) = err.find::<FeedRejection>() {
        (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not found".to_string())
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid query string".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("unhandled rejection: {:?}", err),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody::new(message)),
        status,
    ))
}
