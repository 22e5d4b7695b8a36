//! Timeline view rendering

use super::App;
use crate::constants::TICK_COUNT;
use crate::theme;
use crate::timeline::{course_on_day, local_now, tick_fraction, BarSpan, DayWindow};
use crate::types::{Course, FetchStatus};
use eframe::egui;

/// Width of the course label column left of the axis.
const LABEL_COL_WIDTH: f32 = 230.0;
/// Gap between the label column and the axis, and right-edge padding.
const AXIS_PAD: f32 = 12.0;
const HEADER_HEIGHT: f32 = 30.0;
const ROW_HEIGHT: f32 = 36.0;
const BAR_HEIGHT: f32 = 18.0;

impl App {
    pub fn render_timeline(&mut self, ui: &mut egui::Ui) {
        let window = DayWindow::for_date(self.selected_date);

        let (courses, first_load) = {
            let s = self.fetch_state.lock().unwrap();
            (
                s.courses.clone(),
                s.status == FetchStatus::Loading && s.fetched_at.is_none(),
            )
        };

        let content = ui.available_rect_before_wrap();
        let axis_left = content.left() + LABEL_COL_WIDTH;
        let axis_right = content.right() - AXIS_PAD;
        if axis_right - axis_left < 48.0 {
            return;
        }

        // Axis header: hour labels and tick marks, pinned above the rows
        let (header_rect, _) = ui.allocate_exact_size(
            egui::vec2(content.width(), HEADER_HEIGHT),
            egui::Sense::hover(),
        );
        let axis = egui::Rect::from_min_max(
            egui::pos2(axis_left, header_rect.top()),
            egui::pos2(axis_right, header_rect.bottom()),
        );
        self.draw_ticks(ui, header_rect, axis);

        let visible: Vec<Course> = courses
            .into_iter()
            .filter(|c| course_on_day(c, &window))
            .collect();

        if visible.is_empty() {
            let text = if first_load {
                "Fetching courses…"
            } else {
                "No courses on this date"
            };
            ui.add_space(48.0);
            ui.vertical_centered(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(text)
                            .size(theme::FONT_BODY)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
            });
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (idx, course) in visible.iter().enumerate() {
                    self.course_row(ui, course, &window, axis, idx);
                }
            });

        // Current-time marker, pixel-anchored to the axis rect. Hidden
        // whenever the wall clock is outside the selected day.
        let now = local_now();
        if window.contains(now) {
            let x = axis.left() + window.fraction(now) * axis.width();
            ui.painter().line_segment(
                [
                    egui::pos2(x, header_rect.bottom()),
                    egui::pos2(x, content.bottom()),
                ],
                egui::Stroke::new(theme::STROKE_MEDIUM, theme::NOW_LINE),
            );
            ui.painter().circle_filled(
                egui::pos2(x, header_rect.bottom()),
                2.5,
                theme::NOW_LINE,
            );
        }
    }

    fn draw_ticks(&self, ui: &egui::Ui, header_rect: egui::Rect, axis: egui::Rect) {
        let painter = ui.painter();
        // Thin the labels when the axis gets narrow; the 25 tick marks
        // themselves always render.
        let tick_spacing = axis.width() / (TICK_COUNT - 1) as f32;
        let label_every = if tick_spacing < 34.0 { 2 } else { 1 };

        for i in 0..TICK_COUNT {
            let x = axis.left() + tick_fraction(i) * axis.width();
            painter.line_segment(
                [
                    egui::pos2(x, header_rect.bottom() - 5.0),
                    egui::pos2(x, header_rect.bottom()),
                ],
                egui::Stroke::new(theme::STROKE_DEFAULT, theme::TICK_MARK),
            );
            if i % label_every == 0 {
                painter.text(
                    egui::pos2(x, header_rect.bottom() - 8.0),
                    egui::Align2::CENTER_BOTTOM,
                    format!("{:02}:00", i),
                    egui::FontId::proportional(theme::FONT_CAPTION),
                    theme::TEXT_DIM,
                );
            }
        }
        painter.line_segment(
            [
                egui::pos2(axis.left(), header_rect.bottom()),
                egui::pos2(axis.right(), header_rect.bottom()),
            ],
            egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT),
        );
    }

    fn course_row(
        &self,
        ui: &mut egui::Ui,
        course: &Course,
        window: &DayWindow,
        axis: egui::Rect,
        idx: usize,
    ) {
        let (rect, response) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), ROW_HEIGHT),
            egui::Sense::hover(),
        );
        if !ui.is_rect_visible(rect) {
            return;
        }
        let painter = ui.painter();

        if response.hovered() {
            painter.rect_filled(rect, 0.0, theme::BG_HOVER_SUBTLE);
        }

        // Hour grid behind the bars
        if self.show_hour_grid {
            for i in 0..TICK_COUNT {
                let x = axis.left() + tick_fraction(i) * axis.width();
                painter.line_segment(
                    [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())],
                    egui::Stroke::new(theme::STROKE_DEFAULT, theme::HOUR_GRID),
                );
            }
        }

        painter.line_segment(
            [
                egui::pos2(rect.left(), rect.bottom()),
                egui::pos2(rect.right(), rect.bottom()),
            ],
            egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_SUBTLE),
        );

        // Label column, clipped; full title available on hover
        let label_rect = egui::Rect::from_min_max(
            egui::pos2(rect.left() + 4.0, rect.top()),
            egui::pos2(axis.left() - AXIS_PAD, rect.bottom()),
        );
        painter.with_clip_rect(label_rect).text(
            label_rect.left_center(),
            egui::Align2::LEFT_CENTER,
            format!("[{}] {}", course.id, course.title),
            egui::FontId::proportional(theme::FONT_LABEL),
            theme::TEXT_SECONDARY,
        );
        ui.interact(
            label_rect,
            ui.id().with(("course_label", idx)),
            egui::Sense::hover(),
        )
        .on_hover_text(course.title.clone());

        self.bar(
            ui,
            course,
            course.sign_in_start_time.as_deref(),
            course.sign_in_end_time.as_deref(),
            window,
            axis,
            rect,
            "sign-in",
            theme::BAR_SIGN_IN_FILL,
            theme::BAR_SIGN_IN_STROKE,
            (idx, 0),
        );
        self.bar(
            ui,
            course,
            course.sign_out_start_time.as_deref(),
            course.sign_out_end_time.as_deref(),
            window,
            axis,
            rect,
            "sign-out",
            theme::BAR_SIGN_OUT_FILL,
            theme::BAR_SIGN_OUT_STROKE,
            (idx, 1),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn bar(
        &self,
        ui: &mut egui::Ui,
        course: &Course,
        start: Option<&str>,
        end: Option<&str>,
        window: &DayWindow,
        axis: egui::Rect,
        row_rect: egui::Rect,
        kind: &'static str,
        fill: egui::Color32,
        stroke: egui::Color32,
        id_salt: (usize, usize),
    ) {
        let Some(span) = BarSpan::clipped(start, end, window) else {
            return;
        };

        let x = axis.left() + span.left * axis.width();
        // Keep degenerate windows visible as a sliver
        let w = (span.width * axis.width()).max(2.0);
        let bar_rect = egui::Rect::from_min_size(
            egui::pos2(x, row_rect.center().y - BAR_HEIGHT / 2.0),
            egui::vec2(w, BAR_HEIGHT),
        );

        let painter = ui.painter();
        painter.rect_filled(bar_rect, theme::RADIUS_SMALL, fill);
        painter.rect_stroke(
            bar_rect,
            theme::RADIUS_SMALL,
            egui::Stroke::new(theme::STROKE_DEFAULT, stroke),
            egui::StrokeKind::Inside,
        );
        if bar_rect.width() >= 52.0 {
            painter.with_clip_rect(bar_rect).text(
                bar_rect.center(),
                egui::Align2::CENTER_CENTER,
                kind,
                egui::FontId::proportional(theme::FONT_CAPTION),
                egui::Color32::WHITE,
            );
        }

        let response = ui.interact(
            bar_rect,
            ui.id().with(("bar", id_salt)),
            egui::Sense::hover(),
        );
        response.on_hover_ui(|ui| {
            ui.add(
                egui::Label::new(
                    egui::RichText::new(&course.title)
                        .size(theme::FONT_LABEL)
                        .strong(),
                )
                .selectable(false),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new(kind)
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_MUTED),
                )
                .selectable(false),
            );
            ui.add(
                egui::Label::new(
                    egui::RichText::new(format!(
                        "{} → {}",
                        span.start.format("%H:%M:%S"),
                        span.end.format("%H:%M:%S")
                    ))
                    .size(theme::FONT_SMALL)
                    .color(theme::TEXT_SECONDARY),
                )
                .selectable(false),
            );
        });
    }
}
