//! Number rendering for explanation messages.

use serde::{Deserialize, Serialize};

/// How `{value}` and `{bound}` are rendered in a rule's message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// Fixed decimal places, no grouping (`42.5`).
    Plain(usize),
    /// Fixed decimal places with thousands separators (`15,000.00`).
    Grouped(usize),
    /// Dollar amount, grouped, two places (`$15,000.00`).
    Currency,
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::Grouped(2)
    }
}

impl NumberFormat {
    pub fn render(self, value: f64) -> String {
        match self {
            NumberFormat::Plain(places) => fixed(value, places, "", false),
            NumberFormat::Grouped(places) => fixed(value, places, "", true),
            NumberFormat::Currency => fixed(value, 2, "$", true),
        }
    }
}

fn fixed(value: f64, places: usize, prefix: &str, group: bool) -> String {
    let digits = format!("{:.places$}", value.abs());
    let (int, frac) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    // Sign follows the rounded digits, so -0.001 at two places is "0.00".
    let rounds_to_zero = digits.bytes().all(|b| b == b'0' || b == b'.');
    let mut out = String::with_capacity(digits.len() + int.len() / 3 + 2);
    if value < 0.0 && !rounds_to_zero {
        out.push('-');
    }
    out.push_str(prefix);
    for (i, ch) in int.chars().enumerate() {
        if group && i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}
