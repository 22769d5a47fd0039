//! Width-bounded value and name layout.

use crate::value::Value;

/// Renders a value within a column width.
pub trait PrettyPrinter {
    /// Render `value` as one or more lines, each starting with `prefix` on
    /// the first line only. An empty prefix renders the bare value.
    fn pp(&self, value: &Value, width: usize, prefix: &str) -> Vec<String>;
}

/// Default pretty printer.
///
/// Values that fit on one line after the prefix stay on that line. Larger
/// lists and maps move below the prefix with one element per line; nested
/// containers stay flat whenever they fit at their own indentation.
#[derive(Debug, Clone, Copy)]
pub struct WidthPrinter {
    indent: usize,
}

impl WidthPrinter {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }
}

impl Default for WidthPrinter {
    fn default() -> Self {
        Self::new(2)
    }
}

impl PrettyPrinter for WidthPrinter {
    fn pp(&self, value: &Value, width: usize, prefix: &str) -> Vec<String> {
        let flat = value.to_string();
        let one_line = if prefix.is_empty() {
            flat
        } else {
            format!("{prefix} {flat}")
        };
        if one_line.chars().count() <= width || !value.is_container() {
            return vec![one_line];
        }

        let mut lines = Vec::new();
        let pad = if prefix.is_empty() {
            0
        } else {
            lines.push(prefix.to_string());
            self.indent
        };
        self.layout(value, pad, width, &mut lines);
        lines
    }
}

impl WidthPrinter {
    fn layout(&self, value: &Value, pad: usize, width: usize, lines: &mut Vec<String>) {
        let margin = " ".repeat(pad);
        let flat = value.to_string();
        if pad + flat.chars().count() <= width || !value.is_container() {
            lines.push(format!("{margin}{flat}"));
            return;
        }

        let inner = pad + self.indent;
        match value {
            Value::List(items) => {
                lines.push(format!("{margin}["));
                for (i, item) in items.iter().enumerate() {
                    self.layout(item, inner, width, lines);
                    if i + 1 < items.len() {
                        append_comma(lines);
                    }
                }
                lines.push(format!("{margin}]"));
            }
            Value::Map(entries) => {
                let inner_margin = " ".repeat(inner);
                lines.push(format!("{margin}{{"));
                for (i, (key, item)) in entries.iter().enumerate() {
                    let entry = format!("{inner_margin}{key:?}: {item}");
                    if entry.chars().count() <= width || !item.is_container() {
                        lines.push(entry);
                    } else {
                        lines.push(format!("{inner_margin}{key:?}:"));
                        self.layout(item, inner + self.indent, width, lines);
                    }
                    if i + 1 < entries.len() {
                        append_comma(lines);
                    }
                }
                lines.push(format!("{margin}}}"));
            }
            _ => lines.push(format!("{margin}{flat}")),
        }
    }
}

fn append_comma(lines: &mut [String]) {
    if let Some(last) = lines.last_mut() {
        last.push(',');
    }
}

/// Arrange `items` in columns, filled top to bottom then left to right, using
/// as few rows as fit within `width`. Columns are separated by two spaces.
///
/// An item wider than `width` forces a single column.
pub fn columnize<S: AsRef<str>>(items: &[S], width: usize) -> Vec<String> {
    const SEP: usize = 2;

    let lens: Vec<usize> = items.iter().map(|s| s.as_ref().chars().count()).collect();
    let n = lens.len();
    if n == 0 {
        return Vec::new();
    }

    let mut nrows = n;
    let mut col_widths = vec![lens.iter().copied().max().unwrap_or(0)];
    for rows in 1..=n {
        let ncols = (n + rows - 1) / rows;
        let widths: Vec<usize> = (0..ncols)
            .map(|c| {
                lens[c * rows..((c + 1) * rows).min(n)]
                    .iter()
                    .copied()
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let total = widths.iter().sum::<usize>() + SEP * (ncols - 1);
        if total <= width {
            nrows = rows;
            col_widths = widths;
            break;
        }
    }

    (0..nrows)
        .map(|r| {
            let mut row = String::new();
            for (c, col_width) in col_widths.iter().enumerate() {
                let idx = c * nrows + r;
                if idx >= n {
                    break;
                }
                if c > 0 {
                    row.push_str(&" ".repeat(SEP));
                }
                let item = items[idx].as_ref();
                row.push_str(item);
                row.push_str(&" ".repeat(col_width - lens[idx]));
            }
            row.trim_end().to_string()
        })
        .collect()
}
