const MAX_CHARS: usize = 120;
const FALLBACK: &str = "image";

/// Local file name for an asset path such as `/api/static/ComfyUI_0001_.png`.
///
/// Keeps only the last path segment, replaces characters that are unsafe on
/// common filesystems, and never returns an empty, `.` or `..` name.
pub fn asset_filename(path: &str) -> String {
    let without_query = path.split(&['?', '#'][..]).next().unwrap_or(path);
    let last = without_query
        .rsplit(&['/', '\\'][..])
        .next()
        .unwrap_or(without_query);

    let cleaned: String = last
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]);

    let mut compacted = String::with_capacity(cleaned.len());
    let mut prev_underscore = false;
    for c in cleaned.chars() {
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        compacted.push(c);
    }

    if compacted.is_empty() {
        return FALLBACK.to_string();
    }

    // Keep the tail so the extension survives.
    let count = compacted.chars().count();
    let mut name: String = if count > MAX_CHARS {
        compacted.chars().skip(count - MAX_CHARS).collect()
    } else {
        compacted
    };
    if is_reserved_windows_name(&name) {
        name.push('_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    let stem = name.split('.').next().unwrap_or(name);
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(stem))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_segment() {
        assert_eq!(asset_filename("/api/static/ComfyUI_0001_.png"), "ComfyUI_0001_.png");
        assert_eq!(asset_filename("/api/static/x.png?w=164"), "x.png");
    }

    #[test]
    fn traversal_and_blank_names_fall_back() {
        assert_eq!(asset_filename("/api/static/.."), "image");
        assert_eq!(asset_filename("/api/static/"), "image");
        assert_eq!(asset_filename("/api/static/..\\..\\evil.png"), "evil.png");
    }

    #[test]
    fn unsafe_characters_are_replaced() {
        assert_eq!(asset_filename("/api/static/a:b*c.png"), "a_b_c.png");
        assert_eq!(asset_filename("/api/static/a::b.png"), "a_b.png");
        assert_eq!(asset_filename("/api/static/con.png"), "con.png_");
    }

    #[test]
    fn long_names_keep_their_extension() {
        let long = format!("/api/static/{}.png", "x".repeat(300));
        let name = asset_filename(&long);
        assert_eq!(name.chars().count(), MAX_CHARS);
        assert!(name.ends_with(".png"));
    }
}
