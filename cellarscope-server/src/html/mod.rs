//! Server-rendered markup: the page shell and the scan list fragment.

use cellarscope_core::ScanView;
use cellarscope_core::model::{ScanType, WineType};
use cellarscope_core::presentation::escape_html;

const LOGIN_PAGE: &str = include_str!("login.html");
const DASHBOARD_PAGE: &str = include_str!("dashboard.html");

pub const EMPTY_STATE_MESSAGE: &str = "No scans found";

pub fn login_page() -> String {
    LOGIN_PAGE.to_string()
}

pub fn dashboard_page(username: &str) -> String {
    let mut options = String::new();
    for scan_type in ScanType::known() {
        options.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            escape_html(scan_type.as_str()),
            escape_html(&scan_type.label()),
        ));
    }
    let mut wine_options = String::new();
    for wine_type in WineType::all() {
        wine_options.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            escape_html(wine_type.as_str()),
            escape_html(wine_type.label()),
        ));
    }
    DASHBOARD_PAGE
        .replace("{{USERNAME}}", &escape_html(username))
        .replace("{{TYPE_OPTIONS}}", &options)
        .replace("{{WINE_TYPE_OPTIONS}}", &wine_options)
}

/// The scan list, or the empty state when nothing matched.
pub fn scan_list(views: &[ScanView]) -> String {
    if views.is_empty() {
        return empty_state(EMPTY_STATE_MESSAGE);
    }

    let mut html = String::new();
    for view in views {
        html.push_str(&format!(
            r#"<div class="scan-item">
    <div class="scan-header">
        <div>
            <span class="scan-type {type_class}">{type_label}</span>
            <span class="scan-status {badge_class}">{badge_label}</span>
        </div>
        <div class="scan-details">{date}</div>
    </div>
    <div class="scan-details">
        <strong>User:</strong> {user}<br>
        <strong>Scan ID:</strong> {id}
    </div>
    <div class="scan-response">{preview}</div>
</div>
"#,
            type_class = escape_html(&view.scan_type),
            type_label = escape_html(&view.type_label),
            badge_class = view.badge.css_class(),
            badge_label = view.badge_label,
            date = escape_html(&view.formatted_date),
            user = escape_html(&view.short_user),
            id = escape_html(&view.id),
            preview = escape_html(&view.preview),
        ));
    }
    html
}

/// Shown in place of the list when the scans could not be loaded.
pub fn load_error(message: &str) -> String {
    empty_state(message)
}

fn empty_state(message: &str) -> String {
    format!(
        r#"<div class="empty-state"><p>{}</p></div>"#,
        escape_html(message)
    )
}
