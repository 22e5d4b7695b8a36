#![windows_subsystem = "windows"]
//! Course Timeline - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod constants;
mod settings;
mod theme;
mod timeline;
mod types;
mod utils;

use app::App;
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "course-timeline.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,course_timeline=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Course Timeline");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Course Timeline starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(1100.0, 640.0)))
        .with_min_inner_size([820.0, 480.0])
        .with_title("Course Timeline");

    // Window/taskbar icon rasterized from the inline SVG
    {
        let (rgba, w, h) = utils::rasterize_icon_square(64);
        let icon = egui::IconData {
            rgba,
            width: w,
            height: h,
        };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Course Timeline",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Initial fetch on first frame
        if !self.initial_fetch_done {
            self.initial_fetch_done = true;
            self.start_fetch(ctx);
        }

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        // Periodic re-fetch while the app is open
        if self.auto_refresh {
            let due = self
                .last_fetch_started
                .map_or(true, |t| t.elapsed() >= REFRESH_INTERVAL);
            if due {
                self.start_fetch(ctx);
            }
        }

        // Top bar - date controls and fetch status
        egui::TopBottomPanel::top("top_bar")
            .exact_height(46.0)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(12, 8)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(egui_phosphor::regular::CALENDAR_CHECK)
                                .size(18.0)
                                .color(theme::ACCENT),
                        )
                        .selectable(false),
                    );
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("COURSE TIMELINE")
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        )
                        .selectable(false),
                    );
                    ui.add_space(theme::SPACING_XL);

                    if icon_button(ui, egui_phosphor::regular::CARET_LEFT) {
                        if let Some(prev) = self.selected_date.pred_opt() {
                            self.set_date(prev, ctx);
                        }
                    }

                    // Date input, committed on focus loss; bad input reverts
                    egui::Frame::new()
                        .fill(theme::BG_INPUT)
                        .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                        .corner_radius(theme::RADIUS_DEFAULT)
                        .inner_margin(egui::Margin::symmetric(8, 4))
                        .show(ui, |ui| {
                            let response = ui.add(
                                egui::TextEdit::singleline(&mut self.date_input)
                                    .frame(false)
                                    .desired_width(84.0)
                                    .font(egui::FontId::proportional(theme::FONT_LABEL)),
                            );
                            if response.lost_focus() {
                                self.commit_date_input(ctx);
                            }
                        });

                    if icon_button(ui, egui_phosphor::regular::CARET_RIGHT) {
                        if let Some(next) = self.selected_date.succ_opt() {
                            self.set_date(next, ctx);
                        }
                    }
                    if text_button(ui, "Today") {
                        self.set_date(timeline::local_today(), ctx);
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if icon_button(ui, egui_phosphor::regular::GEAR) {
                            self.show_settings = true;
                        }
                        if icon_button(ui, egui_phosphor::regular::ARROWS_CLOCKWISE) {
                            self.start_fetch(ctx);
                        }
                        let (active, fetched_at) = {
                            let s = self.fetch_state.lock().unwrap();
                            (s.active_count, s.fetched_at)
                        };
                        let status = if active > 0 {
                            "fetching…".to_string()
                        } else if let Some(t) = fetched_at {
                            format!("updated {}", t.format("%H:%M:%S"))
                        } else {
                            String::new()
                        };
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(status)
                                    .size(theme::FONT_CAPTION)
                                    .color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                });
            });

        self.render_settings_modal(ctx);

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin {
                    left: 12,
                    right: 12,
                    top: 8,
                    bottom: 8,
                }),
            )
            .show(ctx, |ui| {
                self.render_timeline(ui);
            });

        // Keep the current-time marker moving while idle
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        self.save_settings();
    }
}

// ============================================================================
// SETTINGS MODAL
// ============================================================================

impl App {
    fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(120))
            .frame(
                egui::Frame::new()
                    .fill(egui::Color32::from_rgb(0x1a, 0x1a, 0x1e))
                    .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(0x2a, 0x2a, 0x2e)))
                    .corner_radius(8.0)
                    .inner_margin(egui::Margin::same(20)),
            )
            .show(ctx, |ui| {
                ui.set_width(320.0);

                // Title bar with close button
                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(egui::RichText::new("Settings").size(16.0).strong())
                            .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close_size = 24.0;
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(close_size, close_size),
                            egui::Sense::click(),
                        );
                        let close_color = if response.hovered() {
                            ui.painter()
                                .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            theme::STATUS_ERROR
                        } else {
                            theme::TEXT_DIM
                        };
                        ui.painter().text(
                            rect.center(),
                            egui::Align2::CENTER_CENTER,
                            egui_phosphor::regular::X,
                            egui::FontId::proportional(16.0),
                            close_color,
                        );
                        if response.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(theme::SPACING_SM);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — View —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("View")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                if theme::settings_checkbox(ui, self.auto_refresh, "Refresh every minute", true) {
                    self.auto_refresh = !self.auto_refresh;
                    self.save_settings();
                }
                if theme::settings_checkbox(ui, self.show_hour_grid, "Hour grid lines", true) {
                    self.show_hour_grid = !self.show_hour_grid;
                    self.save_settings();
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Course API —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Course API")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                let api_changed = egui::Frame::new()
                    .fill(theme::BG_INPUT)
                    .stroke(egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE))
                    .corner_radius(theme::RADIUS_DEFAULT)
                    .inner_margin(egui::Margin::symmetric(6, 4))
                    .show(ui, |ui| {
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.api_base)
                                .frame(false)
                                .desired_width(ui.available_width())
                                .font(egui::FontId::proportional(theme::FONT_LABEL)),
                        );
                        response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter))
                    })
                    .inner;
                if api_changed {
                    self.save_settings();
                    self.start_fetch(ctx);
                }

                ui.add_space(theme::SPACING_MD);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // — Logs —
                ui.add(
                    egui::Label::new(
                        egui::RichText::new("Logs")
                            .size(theme::FONT_LABEL)
                            .color(theme::ACCENT),
                    )
                    .selectable(false),
                );
                ui.add_space(2.0);
                let (rect, response) =
                    ui.allocate_exact_size(egui::vec2(120.0, 26.0), egui::Sense::click());
                if response.hovered() {
                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                }
                let (fill, draw_rect) = theme::button_visual(&response, theme::BTN_DEFAULT, rect);
                ui.painter()
                    .rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
                ui.painter().text(
                    draw_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    format!("{}  Open Logs", egui_phosphor::regular::FOLDER_OPEN),
                    egui::FontId::proportional(theme::FONT_SECTION),
                    egui::Color32::WHITE,
                );
                if response.clicked() {
                    let _ = open::that(self.data_dir.join("logs"));
                }
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}

// ============================================================================
// SMALL PAINTED CONTROLS
// ============================================================================

fn icon_button(ui: &mut egui::Ui, icon: &str) -> bool {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(26.0, 26.0), egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        ui.painter()
            .rect_filled(rect, theme::RADIUS_DEFAULT, theme::BG_SURFACE);
    }
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        theme::TEXT_SECONDARY,
    );
    response.clicked()
}

fn text_button(ui: &mut egui::Ui, label: &str) -> bool {
    let font = egui::FontId::proportional(theme::FONT_SECTION);
    let width = ui.fonts(|f| {
        f.layout_no_wrap(label.to_string(), font.clone(), theme::TEXT_PRIMARY)
            .size()
            .x
    }) + 20.0;
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, 26.0), egui::Sense::click());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    let (fill, draw_rect) = theme::button_visual(&response, theme::BTN_DEFAULT, rect);
    ui.painter()
        .rect_filled(draw_rect, theme::RADIUS_DEFAULT, fill);
    ui.painter().text(
        draw_rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        font,
        egui::Color32::WHITE,
    );
    response.clicked()
}
