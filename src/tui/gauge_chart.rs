//! Plotters-powered semicircular risk gauge for Ratatui.
//!
//! The gauge is a grey half-ring with a colored sweep from the left end,
//! proportional to the risk score. Plotters output is rendered into the
//! Ratatui buffer through `plotters-ratatui-backend`.

use std::f64::consts::PI;

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Radii of the concentric arcs that make up the ring.
const RING_RADII: [f64; 5] = [0.80, 0.85, 0.90, 0.95, 1.00];
const ARC_SAMPLES: usize = 90;

/// Render-only gauge description; all values are computed by the presenter.
pub struct RiskGaugeChart {
    /// Filled share of the half-ring, in `[0, 1]`.
    pub fraction: f64,
    /// Sweep color.
    pub color: (u8, u8, u8),
}

impl Widget for RiskGaugeChart {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Plotters may fail to build a chart in a tiny area; show a hint instead.
        if area.width < 12 || area.height < 5 {
            buf.set_string(
                area.x,
                area.y,
                "Gauge area too small.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let fraction = if self.fraction.is_finite() {
            self.fraction.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let (r, g, b) = self.color;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(-1.1f64..1.1f64, -0.1f64..1.1f64)?;

            let track_color = RGBColor(90, 90, 90);
            let sweep_color = RGBColor(r, g, b);

            for radius in RING_RADII {
                chart.draw_series(LineSeries::new(arc_points(radius, 1.0), &track_color))?;
            }
            if fraction > 0.0 {
                for radius in RING_RADII {
                    chart.draw_series(LineSeries::new(arc_points(radius, fraction), &sweep_color))?;
                }
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// Points along the upper half-circle of `radius`, starting at the left end
/// (angle π) and sweeping clockwise through `fraction` of the half-turn.
fn arc_points(radius: f64, fraction: f64) -> Vec<(f64, f64)> {
    let end = fraction.clamp(0.0, 1.0);
    let steps = ((ARC_SAMPLES as f64 * end).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| {
            let theta = PI - PI * end * (i as f64 / steps as f64);
            (radius * theta.cos(), radius * theta.sin())
        })
        .collect()
}
