//! Terminal charts for statistics.

/// Characters for sparkline rendering.
const BAR_CHARS: [char; 8] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇'];
const FULL_BLOCK: char = '█';

/// Render a horizontal bar chart.
///
/// # Arguments
///
/// * `data` - Vec of (label, value) pairs
/// * `max_label_width` - Maximum width for labels
/// * `bar_width` - Width of the bar portion
#[must_use]
pub fn render_bar_chart(data: &[(String, usize)], max_label_width: usize, bar_width: usize) -> String {
    if data.is_empty() {
        return String::new();
    }

    let max_value = data.iter().map(|(_, v)| *v).max().unwrap_or(1).max(1);
    let mut lines = Vec::new();

    for (label, value) in data {
        let label = truncate_label(label, max_label_width);
        let bar_length = value * bar_width / max_value;
        let bar = FULL_BLOCK.to_string().repeat(bar_length);
        let padding = " ".repeat(bar_width - bar_length);

        lines.push(format!("{label:max_label_width$} |{bar}{padding} {value}"));
    }

    lines.join("\n")
}

/// Render a sparkline (compact inline chart).
#[must_use]
pub fn render_sparkline(values: &[usize]) -> String {
    let max_value = values.iter().copied().max().unwrap_or(1).max(1);

    values
        .iter()
        .map(|&v| {
            if v == 0 {
                BAR_CHARS[0]
            } else {
                BAR_CHARS[(v * 7 / max_value).clamp(1, 7)]
            }
        })
        .collect()
}

fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let keep = width.saturating_sub(3);
    let mut truncated: String = label.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_chart_empty() {
        assert!(render_bar_chart(&[], 10, 20).is_empty());
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        let data = vec![("work".to_string(), 4), ("home".to_string(), 2)];
        let chart = render_bar_chart(&data, 6, 8);
        let lines: Vec<_> = chart.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "work   |████████ 4");
        assert_eq!(lines[1], "home   |████     2");
    }

    #[test]
    fn test_bar_chart_truncates_long_labels() {
        let data = vec![("a-very-long-category".to_string(), 1)];
        let chart = render_bar_chart(&data, 8, 4);
        assert!(chart.starts_with("a-ver... |"));
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(render_sparkline(&[]), "");
        assert_eq!(render_sparkline(&[0, 7, 1]), " ▇▁");
        assert_eq!(render_sparkline(&[0, 0]), "  ");
    }
}
