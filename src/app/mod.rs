//! App module - contains the main application state and logic

mod fetch;
mod view;

use crate::settings::Settings;
use crate::theme;
use crate::timeline;
use crate::types::FetchState;
use chrono::NaiveDate;
use eframe::egui;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::debug;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Selected day
    pub(crate) selected_date: NaiveDate,
    pub(crate) date_input: String,
    // Fetch state
    pub(crate) fetch_state: Arc<Mutex<FetchState>>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) last_fetch_started: Option<std::time::Instant>,
    pub(crate) initial_fetch_done: bool,
    pub(crate) api_base: String,
    // View settings
    pub(crate) auto_refresh: bool,
    pub(crate) show_hour_grid: bool,
    pub(crate) show_settings: bool,
    // Window geometry tracking for save on exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let today = timeline::local_today();

        Self {
            selected_date: today,
            date_input: today.format("%Y-%m-%d").to_string(),
            fetch_state: Arc::new(Mutex::new(FetchState::default())),
            runtime: tokio::runtime::Runtime::new().unwrap(),
            last_fetch_started: None,
            initial_fetch_done: false,
            api_base: settings.api_base,
            auto_refresh: settings.auto_refresh,
            show_hour_grid: settings.show_hour_grid,
            show_settings: false,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            api_base: self.api_base.clone(),
            auto_refresh: self.auto_refresh,
            show_hour_grid: self.show_hour_grid,
        };
        settings.save(&self.data_dir);
    }

    /// Change the selected date, sync the text field, and re-fetch.
    pub(crate) fn set_date(&mut self, date: NaiveDate, ctx: &egui::Context) {
        if date == self.selected_date {
            self.date_input = date.format("%Y-%m-%d").to_string();
            return;
        }
        debug!(date = %date, "Date filter changed");
        self.selected_date = date;
        self.date_input = date.format("%Y-%m-%d").to_string();
        self.start_fetch(ctx);
    }

    /// Commit the date text field. Unparseable input reverts to the
    /// currently selected date.
    pub(crate) fn commit_date_input(&mut self, ctx: &egui::Context) {
        match NaiveDate::parse_from_str(self.date_input.trim(), "%Y-%m-%d") {
            Ok(date) => self.set_date(date, ctx),
            Err(_) => {
                debug!(input = %self.date_input, "Invalid date input, reverting");
                self.date_input = self.selected_date.format("%Y-%m-%d").to_string();
            }
        }
    }
}
