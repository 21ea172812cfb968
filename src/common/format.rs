use colored::*;

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count: whole bytes, then one decimal in binary units
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, SIZE_UNITS[unit])
}

/// "1 file", "3 files"
pub fn format_count(count: usize) -> String {
    let noun = if count == 1 { "file" } else { "files" };
    format!("{} {}", count, noun)
}

/// Elapsed time as milliseconds, seconds or minutes+seconds
pub fn format_duration(secs: f64) -> String {
    match secs {
        s if s < 1.0 => format!("{:.0}ms", s * 1000.0),
        s if s < 60.0 => format!("{:.1}s", s),
        s => {
            let whole = s.round() as u64;
            format!("{}m {}s", whole / 60, whole % 60)
        }
    }
}

/// Bold, underlined title with blank lines around it
pub fn print_header(title: &str) {
    println!("\n{}\n", title.bold().underline());
}

/// Indented, dimmed label followed by its value
pub fn print_kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Shorten to at most `max_chars` characters, ending in "..." when cut
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some(_) if max_chars <= 3 => ".".repeat(max_chars),
        Some(_) => {
            let keep = s.chars().take(max_chars - 3).collect::<String>();
            keep + "..."
        }
    }
}
