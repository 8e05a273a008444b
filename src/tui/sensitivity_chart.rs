//! Plotters-powered sensitivity chart widget for Ratatui.
//!
//! Shows how the probability of default moves as one form field sweeps its
//! range, with the decision threshold drawn as a horizontal line. Plotters
//! output is rendered into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call; `render()`
/// only draws.
pub struct SensitivityChart<'a> {
    /// (field value, probability) pairs, sorted by field value.
    pub curve: &'a [(f64, f64)],
    /// The borrower's current (value, probability), highlighted.
    pub current: Option<(f64, f64)>,
    /// Decision threshold (y).
    pub threshold: f64,
    /// X bounds (form range of the swept field).
    pub x_bounds: [f64; 2],
    pub x_label: &'a str,
    pub fmt_x: fn(f64) -> String,
}

impl<'a> Widget for SensitivityChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to lay out a chart in a tiny area; show a hint instead.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        if !(x0.is_finite() && x1.is_finite()) || x1 <= x0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, 0.0..1.0)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc("P(default)")
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| (self.fmt_x)(*v))
                .y_label_formatter(&|v| format!("{v:.2}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let curve_color = RGBColor(0, 255, 255); // cyan
            let threshold_color = RGBColor(255, 0, 0); // red
            let current_color = RGBColor(255, 255, 0); // yellow

            chart.draw_series(LineSeries::new(
                [(x0, self.threshold), (x1, self.threshold)],
                &threshold_color,
            ))?;

            chart.draw_series(LineSeries::new(self.curve.iter().copied(), &curve_color))?;

            // `Circle` radii are mis-scaled by the ratatui backend; a pixel reads fine.
            if let Some(point) = self.current {
                chart.draw_series(std::iter::once(Pixel::new(point, current_color)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
