use colored::*;

const BAR_WIDTH: usize = 30;

pub fn print_header(text: &str) {
    println!("\n{}", text.bright_cyan().bold());
    println!("{}", "=".repeat(text.chars().count()).bright_cyan());
}

pub fn print_success(text: &str) {
    println!("{}", text.green());
}

pub fn print_error(text: &str) {
    eprintln!("{}", text.red().bold());
}

pub fn print_info(text: &str) {
    println!("{}", text.blue());
}

pub fn print_prompt(text: &str) {
    print!("{}", text.yellow().bold());
}

/// Horizontal bar scaled against `max`
pub fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || !value.is_finite() || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled.clamp(1, BAR_WIDTH))
}

/// Prints `label  bar  value` rows with aligned labels
pub fn print_bar_chart(rows: &[(String, f64)], decimals: usize) {
    let max = rows.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    for (label, value) in rows {
        println!(
            "  {:<width$}  {:<bar_width$}  {:.decimals$}",
            label,
            bar(*value, max).bright_magenta(),
            value,
            width = width,
            bar_width = BAR_WIDTH,
            decimals = decimals
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(10.0, 10.0).len(), BAR_WIDTH);
        assert_eq!(bar(5.0, 10.0).len(), BAR_WIDTH / 2);
        assert_eq!(bar(0.001, 10.0).len(), 1);
        assert!(bar(0.0, 10.0).is_empty());
        assert!(bar(1.0, 0.0).is_empty());
    }
}
