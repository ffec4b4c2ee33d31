//! ASCII table rendering for page listings, fitted to the terminal width.

use terminal_size::{terminal_size, Height, Width};

use crate::tprintln;

/// Render column headers and string rows as an ASCII table. Headers are
/// printed green, numeric-looking cells are right-aligned, and every line is
/// clipped to the detected terminal width.
pub fn print_table(columns: &[&str], rows: &[Vec<String>]) {
    let termw = get_terminal_width();
    tprintln!("[console.tableview] detected terminal width={} columns", termw);

    let mut widths: Vec<usize> = columns.iter().map(|c| c.len().min(termw)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(columns.len()) {
            let w = cell.chars().count();
            if w > widths[i] {
                widths[i] = w.min(termw);
            }
        }
    }

    let sep = build_separator(&widths);
    println!("{}", fit_line(&sep, termw));
    println!("{}", fit_line(&build_header(columns, &widths), termw));
    println!("{}", fit_line(&sep, termw));
    for r in rows {
        println!("{}", fit_line(&build_row(r, &widths), termw));
    }
    println!("{}", fit_line(&sep, termw));
}

/// Footer line under a paginated table: "rows: 20 of 134, page 1/7".
pub fn print_page_summary(shown: usize, total: u64, page: u32, pages: u32) {
    println!("rows: {} of {}, page {}/{}", shown, total, page, pages);
}

fn get_terminal_width() -> usize {
    if let Some((Width(w), Height(_h))) = terminal_size() {
        return (w.saturating_sub(4)) as usize;
    }
    80
}

fn build_separator(widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('+');
    for w in widths {
        s.push_str(&"-".repeat(*w + 2));
        s.push('+');
    }
    s
}

fn build_row(cells: &[String], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).cloned().unwrap_or_default();
        let text = truncate(&cell, *w);
        let pad = w.saturating_sub(text.chars().count());
        s.push(' ');
        if is_numeric_like(&cell) {
            s.push_str(&" ".repeat(pad));
            s.push_str(&text);
        } else {
            s.push_str(&text);
            s.push_str(&" ".repeat(pad));
        }
        s.push(' ');
        s.push('|');
    }
    s
}

// Header row with column names colored green; padding uses visible width.
fn build_header(cells: &[&str], widths: &[usize]) -> String {
    let mut s = String::new();
    s.push('|');
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).copied().unwrap_or_default();
        let text = truncate(cell, *w);
        let pad = w.saturating_sub(text.chars().count());
        s.push(' ');
        s.push_str(&format!("\x1b[32m{}\x1b[0m", text));
        s.push_str(&" ".repeat(pad));
        s.push(' ');
        s.push('|');
    }
    s
}

fn truncate(s: &str, max: usize) -> String {
    let len = s.chars().count();
    if len <= max { return s.to_string(); }
    if max <= 1 { return "…".to_string(); }
    s.chars().take(max - 1).collect::<String>() + "…"
}

fn is_numeric_like(s: &str) -> bool {
    // crude detection for aligning numbers to right
    let st = s.trim();
    if st.is_empty() { return false; }
    let mut has_digit = false;
    for ch in st.chars() {
        if ch.is_ascii_digit() { has_digit = true; continue; }
        if ".-+eE,_%".contains(ch) { continue; }
        return false;
    }
    has_digit
}

fn fit_line(s: &str, maxw: usize) -> String {
    if visible_len(s) <= maxw { return s.to_string(); }
    // Clip on a char boundary, skipping ANSI escapes when counting.
    let mut out = String::new();
    let mut count = 0usize;
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            out.push(ch);
            for esc in chars.by_ref() {
                out.push(esc);
                if esc.is_ascii_alphabetic() { break; }
            }
            continue;
        }
        if count >= maxw { break; }
        out.push(ch);
        count += 1;
    }
    // Reset color in case an open escape got clipped off
    out.push_str("\x1b[0m");
    out
}

fn visible_len(s: &str) -> usize {
    // Count visible chars, skipping ANSI escape sequences
    let mut count = 0usize;
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for esc in chars.by_ref() {
                if esc.is_ascii_alphabetic() { break; }
            }
            continue;
        }
        count += 1;
    }
    count
}
