use colored::Colorize;

use crate::theme::Theme;

const BAR_WIDTH: usize = 40;
const LABEL_WIDTH: usize = 24;

/// Renders a horizontal bar chart, bars scaled to the largest value and
/// tinted with the theme's primary colour, values in its accent colour.
pub fn render_bar_chart(title: &str, items: &[(String, f64)], theme: Theme) -> String {
    let mut out = format!("{}\n", title.bold());
    if items.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }

    let max = items.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let label_width = items
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(LABEL_WIDTH);

    for (label, value) in items {
        let len = if max > 0.0 {
            ((value / max) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        let bar = "█".repeat(len);
        let bar = match theme.primary_rgb() {
            Some((r, g, b)) => bar.truecolor(r, g, b).to_string(),
            None => bar,
        };

        let value = match theme.accent_rgb() {
            Some((r, g, b)) => format_value(*value).truecolor(r, g, b).to_string(),
            None => format_value(*value),
        };

        out.push_str(&format!(
            "  {:<width$} {} {}\n",
            truncate(label, label_width),
            bar,
            value,
            width = label_width
        ));
    }

    out
}

fn truncate(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_string();
    }
    let mut short: String = label.chars().take(max.saturating_sub(1)).collect();
    short.push('…');
    short
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_scale_to_largest_value() {
        let items = vec![("a".to_string(), 4.0), ("b".to_string(), 2.0)];
        let chart = render_bar_chart("Plays", &items, Theme::Default);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].matches('█').count(), BAR_WIDTH);
        assert_eq!(lines[2].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[1].ends_with(" 4"));
    }

    #[test]
    fn test_empty_chart() {
        let chart = render_bar_chart("Plays", &[], Theme::Default);
        assert!(chart.contains("(no data)"));
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let label = "A".repeat(40);
        let chart = render_bar_chart("Artists", &[(label, 61.5)], Theme::Default);

        assert!(chart.contains('…'));
        assert!(chart.contains("61.5"));
    }

    #[test]
    fn test_themed_chart_keeps_layout() {
        colored::control::set_override(false);
        let items = vec![("a".to_string(), 3.0)];

        let plain = render_bar_chart("Plays", &items, Theme::Default);
        let themed = render_bar_chart("Plays", &items, Theme::NeonPurple);

        assert_eq!(plain, themed);
    }
}
