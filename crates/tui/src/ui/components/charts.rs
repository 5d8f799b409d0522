use std::f64::consts::TAU;

use engine::PieSlice;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Paragraph,
        canvas::{Canvas, Points},
    },
};

use crate::ui::{
    components::card::Card,
    theme::{Theme, category_color},
};

/// Renders a pie chart with a legend below it.
///
/// Slices start at 12 o'clock and run clockwise in the given order, so the
/// first slice sits at the top of the pie.
pub fn render_pie(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    slices: &[PieSlice],
    theme: &Theme,
) {
    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let amounts: Vec<f64> = slices.iter().map(|slice| slice.amount).collect();
    let fractions = slice_fractions(&amounts);
    if fractions.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nothing to chart: all amounts are zero.",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                      // Pie
            Constraint::Length(slices.len() as u16), // Legend
        ])
        .split(inner);

    let pie_area = layout[0];
    let dots_x = f64::from(pie_area.width) * 2.0;
    let dots_y = f64::from(pie_area.height) * 4.0;
    // Braille cells are 2x4 dots; one dot per unit keeps the circle round.
    let unit = (2.1 / dots_x).max(2.1 / dots_y);
    let half_width = dots_x * unit / 2.0;
    let half_height = dots_y * unit / 2.0;

    let points = pie_points(&fractions, unit);
    let colors: Vec<_> = slices
        .iter()
        .map(|slice| category_color(slice.color))
        .collect();

    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([-half_width, half_width])
        .y_bounds([-half_height, half_height])
        .paint(|ctx| {
            for (coords, color) in points.iter().zip(&colors) {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
        });
    frame.render_widget(canvas, pie_area);

    let legend: Vec<Line> = slices
        .iter()
        .zip(&fractions)
        .map(|(slice, fraction)| {
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(category_color(slice.color))),
                Span::styled(slice.name.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!(" {:.1}%", fraction * 100.0),
                    Style::default().fg(theme.dim),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(legend), layout[1]);
}

/// Normalizes amounts into fractions of the whole.
///
/// Returns an empty vector when there is nothing to draw (no positive total).
#[must_use]
pub fn slice_fractions(amounts: &[f64]) -> Vec<f64> {
    let total: f64 = amounts.iter().filter(|a| a.is_finite() && **a > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    amounts
        .iter()
        .map(|a| if a.is_finite() && *a > 0.0 { a / total } else { 0.0 })
        .collect()
}

/// Index of the slice covering `turn`, a clockwise fraction of a full turn
/// measured from 12 o'clock (`0.0..1.0`).
#[must_use]
pub fn slice_at(fractions: &[f64], turn: f64) -> Option<usize> {
    let mut end = 0.0;
    for (i, fraction) in fractions.iter().enumerate() {
        end += fraction;
        if turn < end {
            return Some(i);
        }
    }
    // Rounding can leave the last sliver uncovered.
    fractions.iter().rposition(|f| *f > 0.0)
}

/// Samples the unit disc on a grid with spacing `step` and buckets each point
/// into its slice.
#[must_use]
pub fn pie_points(fractions: &[f64], step: f64) -> Vec<Vec<(f64, f64)>> {
    let mut buckets = vec![Vec::new(); fractions.len()];
    if step <= 0.0 || fractions.is_empty() {
        return buckets;
    }

    let steps = (1.0 / step).ceil() as i64;
    for ix in -steps..=steps {
        for iy in -steps..=steps {
            let (x, y) = (ix as f64 * step, iy as f64 * step);
            if x * x + y * y > 1.0 {
                continue;
            }
            // atan2(x, y) is the clockwise angle from the positive y axis.
            let turn = x.atan2(y).rem_euclid(TAU) / TAU;
            if let Some(i) = slice_at(fractions, turn) {
                buckets[i].push((x, y));
            }
        }
    }
    buckets
}

/// Creates a simple ASCII-based horizontal bar for a share in `[0, 1]`.
///
/// Returns a string like `████████░░░░░░░░░░░░`.
#[must_use]
pub fn share_bar(share: f64, width: usize) -> String {
    let ratio = if share.is_finite() {
        share.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);

    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractions_ignore_non_positive_amounts() {
        assert_eq!(slice_fractions(&[0.0, 0.0]), Vec::<f64>::new());
        assert_eq!(slice_fractions(&[225.0, 50.0, 25.0]), [0.75, 50.0 / 300.0, 25.0 / 300.0]);
        assert_eq!(slice_fractions(&[10.0, -5.0, f64::NAN]), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn first_slice_starts_at_twelve_o_clock() {
        let fractions = [0.25, 0.75];
        assert_eq!(slice_at(&fractions, 0.0), Some(0));
        assert_eq!(slice_at(&fractions, 0.24), Some(0));
        assert_eq!(slice_at(&fractions, 0.25), Some(1));
        assert_eq!(slice_at(&fractions, 0.999_999), Some(1));
    }

    #[test]
    fn empty_slices_are_skipped() {
        assert_eq!(slice_at(&[0.0, 1.0, 0.0], 0.0), Some(1));
        assert_eq!(slice_at(&[0.0, 1.0, 0.0], 1.0), Some(1));
    }

    #[test]
    fn quarter_slice_covers_the_upper_right_quadrant() {
        let points = pie_points(&[0.25, 0.75], 0.1);
        assert!(!points[0].is_empty());
        assert!(points[0].iter().all(|(x, y)| *x >= 0.0 && *y >= 0.0));
        assert!(points[1].iter().any(|(x, _)| *x < 0.0));
    }

    #[test]
    fn points_stay_inside_the_unit_disc() {
        let points = pie_points(&[0.5, 0.5], 0.05);
        let total: usize = points.iter().map(Vec::len).sum();
        assert!(total > 0);
        assert!(
            points
                .iter()
                .flatten()
                .all(|(x, y)| x * x + y * y <= 1.0)
        );
    }

    #[test]
    fn share_bar_scales_with_share() {
        assert_eq!(share_bar(0.0, 4), "░░░░");
        assert_eq!(share_bar(0.5, 4), "██░░");
        assert_eq!(share_bar(1.5, 4), "████");
        assert_eq!(share_bar(f64::NAN, 2), "░░");
    }
}
