use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Option key holding the "show chart on product page" flag
pub const HOOK_ACTIVE_KEY: &str = "price_history_hook_active";

/// Option key holding the chart labels object
pub const LABELS_KEY: &str = "price_history_custom_labels";

/// Free-text captions shown on the price chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub y_axis_title: String,
    pub x_axis_title: String,
    pub legend_label: String,
}

impl Default for ChartLabels {
    fn default() -> Self {
        Self {
            y_axis_title: "قیمت".to_string(),
            x_axis_title: "تاریخ".to_string(),
            legend_label: "تومان".to_string(),
        }
    }
}

impl ChartLabels {
    pub fn new(
        y_axis_title: impl Into<String>,
        x_axis_title: impl Into<String>,
        legend_label: impl Into<String>,
    ) -> Self {
        Self {
            y_axis_title: y_axis_title.into(),
            x_axis_title: x_axis_title.into(),
            legend_label: legend_label.into(),
        }
    }

    /// Copy with every label passed through [`sanitize_text`]
    pub fn sanitized(&self) -> Self {
        Self {
            y_axis_title: sanitize_text(&self.y_axis_title),
            x_axis_title: sanitize_text(&self.x_axis_title),
            legend_label: sanitize_text(&self.legend_label),
        }
    }

    /// Names of the labels that are blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.y_axis_title.trim().is_empty() {
            missing.push("y_axis_title");
        }
        if self.x_axis_title.trim().is_empty() {
            missing.push("x_axis_title");
        }
        if self.legend_label.trim().is_empty() {
            missing.push("legend_label");
        }
        missing
    }
}

/// Display configuration, loaded once and handed to consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySettings {
    pub hook_active: bool,
    pub labels: ChartLabels,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            hook_active: true,
            labels: ChartLabels::default(),
        }
    }
}

impl HistorySettings {
    /// Build from raw option values; absent or unreadable values fall back to defaults
    pub fn from_values(hook_active: Option<&Value>, labels: Option<&Value>) -> Self {
        let defaults = Self::default();

        let hook_active = hook_active
            .and_then(decode_flag)
            .unwrap_or(defaults.hook_active);

        let labels = labels
            .and_then(|v| serde_json::from_value::<ChartLabels>(v.clone()).ok())
            .unwrap_or(defaults.labels);

        Self {
            hook_active,
            labels,
        }
    }

    /// Raw option values, in (key, value) form
    pub fn to_values(&self) -> Result<Vec<(&'static str, Value)>, serde_json::Error> {
        Ok(vec![
            (HOOK_ACTIVE_KEY, Value::Bool(self.hook_active)),
            (LABELS_KEY, serde_json::to_value(&self.labels)?),
        ])
    }
}

/// Older installs stored the flag as 1/0 or "1"/"0"
fn decode_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Single-line plain text: tags dropped, whitespace runs collapsed, trimmed.
pub fn sanitize_text(raw: &str) -> String {
    let mut without_tags = String::with_capacity(raw.len());
    let mut in_tag = false;
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            // Only a tag when a name, closing slash or comment follows
            '<' if !in_tag
                && chars
                    .peek()
                    .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!')) =>
            {
                in_tag = true
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            _ if c.is_control() => without_tags.push(' '),
            _ => without_tags.push(c),
        }
    }

    without_tags.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = HistorySettings::default();
        assert!(settings.hook_active);
        assert_eq!(settings.labels.legend_label, "تومان");
    }

    #[test]
    fn test_from_values_falls_back_per_key() {
        let labels = json!({
            "y_axis_title": "Price",
            "x_axis_title": "Date",
            "legend_label": "USD"
        });
        let settings = HistorySettings::from_values(None, Some(&labels));
        assert!(settings.hook_active);
        assert_eq!(settings.labels, ChartLabels::new("Price", "Date", "USD"));

        let broken = json!({ "y_axis_title": "Price" });
        let settings = HistorySettings::from_values(Some(&json!(0)), Some(&broken));
        assert!(!settings.hook_active);
        assert_eq!(settings.labels, ChartLabels::default());
    }

    #[test]
    fn test_decode_legacy_flags() {
        assert_eq!(decode_flag(&json!(1)), Some(true));
        assert_eq!(decode_flag(&json!("0")), Some(false));
        assert_eq!(decode_flag(&json!(true)), Some(true));
        assert_eq!(decode_flag(&json!("maybe")), None);
        assert_eq!(decode_flag(&json!([1])), None);
    }

    #[test]
    fn test_to_values_round_trips_through_from_values() {
        let settings = HistorySettings {
            hook_active: false,
            labels: ChartLabels::new("Price", "Date", "EUR"),
        };
        let values = settings.to_values().unwrap();
        assert_eq!(values[0].0, HOOK_ACTIVE_KEY);
        assert_eq!(values[1].0, LABELS_KEY);

        let restored = HistorySettings::from_values(Some(&values[0].1), Some(&values[1].1));
        assert_eq!(restored, settings);
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  Price  "), "Price");
        assert_eq!(sanitize_text("<b>Price</b>\n(USD)"), "Price (USD)");
        assert_eq!(sanitize_text("a\t\tb"), "a b");
        assert_eq!(sanitize_text("<script>x</script>"), "x");
        assert_eq!(sanitize_text("   "), "");
    }

    #[test]
    fn test_sanitize_text_keeps_lone_angle_bracket() {
        assert_eq!(sanitize_text("Price (< 100 USD)"), "Price (< 100 USD)");
        assert_eq!(sanitize_text("<"), "<");
        assert_eq!(sanitize_text("a <3 b"), "a <3 b");
        assert_eq!(sanitize_text("1 < 2 <i>x</i>"), "1 < 2 x");
        assert_eq!(sanitize_text("<!-- note -->Date"), "Date");
    }

    #[test]
    fn test_missing_fields() {
        let labels = ChartLabels::new("Price", " ", "");
        assert_eq!(labels.missing_fields(), vec!["x_axis_title", "legend_label"]);
        assert!(ChartLabels::default().missing_fields().is_empty());
    }
}
