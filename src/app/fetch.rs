//! Background course fetching

use super::App;
use crate::constants::COURSE_LIST_QUERY;
use crate::timeline;
use crate::types::{Course, CourseListResponse, FetchStatus};
use eframe::egui;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api returned code {0}")]
    Api(i64),
}

/// GET the course list and unwrap the `{ code, data: { items } }`
/// envelope. A non-200 application code is an error; a 200 without
/// `data` is an empty list.
async fn fetch_courses(client: &reqwest::Client, url: &str) -> Result<Vec<Course>, FetchError> {
    let response = client.get(url).send().await?;
    debug!(status = %response.status(), "Course list response received");
    let body: CourseListResponse = response.json().await?;
    if body.code != 200 {
        return Err(FetchError::Api(body.code));
    }
    Ok(body.data.map(|d| d.items).unwrap_or_default())
}

impl App {
    /// Kick off one background fetch. Overlapping fetches are allowed and
    /// never cancelled; whichever completes last owns the shared state.
    pub fn start_fetch(&mut self, ctx: &egui::Context) {
        let url = format!("{}{}", self.api_base.trim_end_matches('/'), COURSE_LIST_QUERY);
        let state = self.fetch_state.clone();
        let ctx = ctx.clone();

        {
            let mut s = state.lock().unwrap();
            s.active_count += 1;
            s.status = FetchStatus::Loading;
        }
        self.last_fetch_started = Some(std::time::Instant::now());

        info!(url = %url, "Fetching course list");
        self.runtime.spawn(async move {
            let client = reqwest::Client::new();
            let result = fetch_courses(&client, &url).await;

            let mut s = state.lock().unwrap();
            s.active_count -= 1;
            s.fetched_at = Some(timeline::local_now());
            match result {
                Ok(courses) => {
                    info!(count = courses.len(), "Course list updated");
                    s.courses = courses;
                    s.status = FetchStatus::Loaded;
                }
                Err(e) => {
                    // Degrades to an empty list; the view shows the
                    // placeholder, never an error.
                    error!(error = %e, "Course fetch failed");
                    s.courses.clear();
                    s.status = FetchStatus::Failed(e.to_string());
                }
            }
            drop(s);
            ctx.request_repaint();
        });
    }
}
