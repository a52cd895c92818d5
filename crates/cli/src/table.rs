// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Plain-text table rendering for `status`, `explain`, `attempts`, and
//! `export-evidence` output. No TUI: one aligned, padded table per command.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Column {
    pub name: &'static str,
    pub align: Align,
}

impl Column {
    pub fn left(name: &'static str) -> Self {
        Self {
            name,
            align: Align::Left,
        }
    }

    pub fn right(name: &'static str) -> Self {
        Self {
            name,
            align: Align::Right,
        }
    }
}

/// Render `rows` under `columns`, padding every column to its widest cell.
pub fn render(columns: &[Column], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.name.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, columns.iter().map(|c| c.name.to_string()).collect(), columns, &widths);
    for row in rows {
        push_row(&mut out, row.clone(), columns, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: Vec<String>, columns: &[Column], widths: &[usize]) {
    let rendered: Vec<String> = cells
        .iter()
        .enumerate()
        .map(|(i, cell)| match columns[i].align {
            Align::Left => format!("{:<width$}", cell, width = widths[i]),
            Align::Right => format!("{:>width$}", cell, width = widths[i]),
        })
        .collect();
    out.push_str(&rendered.join("  "));
    out.push('\n');
}
