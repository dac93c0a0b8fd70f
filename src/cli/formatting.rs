pub fn truncate_ellipsis(s: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let len = s.chars().count();
    if len <= width {
        return s.to_string();
    }
    if width == 1 {
        return "…".to_string();
    }
    let take = width - 1;
    let mut out = String::with_capacity(s.len().min(width + 4));
    out.extend(s.chars().take(take));
    out.push('…');
    out
}

pub fn money(amount: f64, currency: Option<&str>) -> String {
    let cur = currency.unwrap_or("EUR");
    format!("{:.0} {}", amount.round(), cur)
}

/// "1m 05s" style rendering of a seconds estimate.
pub fn eta(seconds: f64) -> String {
    let s = seconds.max(0.0).round() as u64;
    if s >= 60 {
        format!("{}m {:02}s", s / 60, s % 60)
    } else {
        format!("{}s", s)
    }
}

/// Right-aligned keys, multi-line values indented under the first line.
pub fn kv_block_lines<F>(pairs: &[(&str, String)], color_key: F) -> Vec<String>
where
    F: Fn(&str) -> String,
{
    let key_w = pairs
        .iter()
        .map(|(k, _)| k.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = Vec::new();
    for (k, v) in pairs {
        let key_padded = format!("{:>key_w$}", k, key_w = key_w);
        let key_col = color_key(&key_padded);

        let v = v.trim_end_matches('\n');
        let mut it = v.lines();
        out.push(format!("{}: {}", key_col, it.next().unwrap_or("")));
        for line in it {
            out.push(format!("{:>key_w$}  {}", "", line, key_w = key_w));
        }
    }
    out
}

pub fn print_kv_block_colored_keys<F>(pairs: &[(&str, String)], color_key: F)
where
    F: Fn(&str) -> String,
{
    for line in kv_block_lines(pairs, color_key) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_on_char_boundaries() {
        assert_eq!(truncate_ellipsis("Montpellier", 5), "Mont…");
        assert_eq!(truncate_ellipsis("Nîmes", 5), "Nîmes");
        assert_eq!(truncate_ellipsis("abc", 1), "…");
        assert_eq!(truncate_ellipsis("abc", 0), "");
    }

    #[test]
    fn eta_and_money() {
        assert_eq!(eta(65.0), "1m 05s");
        assert_eq!(eta(9.4), "9s");
        assert_eq!(money(649.6, None), "650 EUR");
    }

    #[test]
    fn kv_block_aligns_and_indents() {
        let lines = kv_block_lines(
            &[("City", "Lyon".into()), ("Highlights", "a\nb".into())],
            |k| k.to_string(),
        );
        assert_eq!(
            lines,
            [
                "      City: Lyon",
                "Highlights: a",
                "            b",
            ]
        );
    }
}
