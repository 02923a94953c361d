use mediagent_core::{AppViewModel, ResultsView, Route, UploadView};

use super::constants::*;

/// Renders the current route as terminal lines. The results route renders
/// nothing until the results view has read session storage.
pub fn render(view: &AppViewModel) -> Vec<String> {
    match view.route {
        Route::Upload => render_upload(&view.upload),
        Route::Results => view.results.as_ref().map(render_results).unwrap_or_default(),
    }
}

/// Header and help text shown once when the interactive form opens.
pub fn render_banner() -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        SUBTITLE.to_string(),
        TAGLINE.to_string(),
        String::new(),
        HOW_IT_WORKS_TITLE.to_string(),
    ];
    lines.extend(HOW_IT_WORKS.iter().map(|step| format!("  \u{2022} {step}")));
    lines.push(rule());
    lines
}

fn render_upload(upload: &UploadView) -> Vec<String> {
    let mut lines = vec![LABEL_UPLOAD.to_string()];
    match &upload.selected_file {
        Some(name) => lines.push(format!("  {LABEL_SELECTED} {name}")),
        None => lines.push(format!("  ({LABEL_FILE_HINT})")),
    }
    if let Some(error) = &upload.error {
        lines.push(format!("  ! {error}"));
    }

    let button = if upload.loading {
        format!("[ {BUTTON_PROCESSING} ]")
    } else if upload.can_submit {
        format!("[ {BUTTON_ANALYZE} ]")
    } else {
        format!("[ {BUTTON_ANALYZE} ] (select a file first)")
    };
    lines.push(button);
    lines
}

fn render_results(results: &ResultsView) -> Vec<String> {
    let Some(diagnosis) = &results.diagnosis else {
        return vec![RESULTS_TITLE.to_string(), RESULTS_EMPTY.to_string()];
    };

    let mut lines = vec![rule(), RESULTS_TITLE.to_string()];
    if let Some(filename) = &results.filename {
        lines.push(format!("{RESULTS_REPORT} {filename}"));
    }
    lines.push(rule());
    lines.extend(diagnosis.lines().map(str::to_string));
    lines.push(rule());
    lines
}

fn rule() -> String {
    "-".repeat(RULE_WIDTH)
}
