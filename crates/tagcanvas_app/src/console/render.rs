use tagcanvas_core::{AppViewModel, JobView};

/// Renders the view model as terminal lines. Image paths are shown as
/// absolute URLs under `asset_base`.
pub(crate) fn render(view: &AppViewModel, asset_base: &str) -> Vec<String> {
    let mut lines = Vec::new();

    let search = if view.searching {
        format!("Search: {:?} (searching...)", view.fragment)
    } else {
        format!("Search: {:?}", view.fragment)
    };
    lines.push(search);

    for (index, suggestion) in view.suggestions.iter().enumerate() {
        let mut line = format!("  {:>2}. {}", index + 1, suggestion.tag);
        if let Some(score) = suggestion.score {
            line.push_str(&format!(" ({score:.2})"));
        }
        if suggestion.selected {
            line.push_str(" [selected]");
        }
        lines.push(line);
    }

    if view.selected.is_empty() {
        lines.push("Selected: (none)".to_string());
    } else {
        lines.push(format!("Selected: {}", view.selected.join(" | ")));
    }

    if view.can_generate {
        lines.push(format!("Prompt: {}", view.prompt));
    } else if !view.prompt.is_empty() {
        lines.push(format!("Prompt: {} (too short)", view.prompt));
    }

    match &view.job {
        JobView::Idle => {}
        JobView::Loading { status } => lines.push(status.clone()),
        JobView::Gallery { images } => {
            lines.push(format!("Images ({}):", images.len()));
            lines.extend(
                images
                    .iter()
                    .map(|path| format!("  {}", absolute_url(asset_base, path))),
            );
        }
        JobView::Error { headline, message } => {
            lines.push(headline.clone());
            lines.push(format!("  {message}"));
        }
    }

    lines
}

fn absolute_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
