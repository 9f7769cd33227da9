use html_escape::{encode_double_quoted_attribute, encode_text};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::animator::spotlight_script;
use crate::compare::render::{EntryView, ResultsView, SubsectionView, STOREFRONT_URL};
use crate::compare::LETTERBOXD_URL;
use crate::models::EMOJI_MAILBOX;
use crate::prefs::Theme;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;background:#fafafa;color:#222}\
body.dark-mode{background:#141414;color:#eee}\
body.dark-mode a{color:#8ab4f8}\
.hint{font-style:italic;opacity:.8}\
#theme-toggle{float:right;font-size:1.5rem;background:none;border:none;cursor:pointer}\
#spotlight{position:fixed;top:-100px;left:-100px;width:200px;height:200px;border-radius:50%;\
pointer-events:none;background:radial-gradient(rgba(255,230,150,.25),transparent 70%)}";

const SCRIPT: &str = "var toggle=document.getElementById('theme-toggle');\
function applyTheme(dark){document.body.classList.toggle('dark-mode',dark);\
toggle.textContent=dark?'\u{2600}\u{FE0F}':'\u{1F319}';}\
var saved=localStorage.getItem('theme');if(saved){applyTheme(saved==='dark');}\
toggle.addEventListener('click',function(){\
var dark=!document.body.classList.contains('dark-mode');applyTheme(dark);\
localStorage.setItem('theme',dark?'dark':'light');});\
document.querySelectorAll('button.copy').forEach(function(b){b.addEventListener('click',function(){\
navigator.clipboard.writeText(b.dataset.copy);b.textContent='Copied!';});});";

fn link(href: &str, label: &str) -> String {
    format!(
        r#"<a href="{}" target="_blank">{}</a>"#,
        encode_double_quoted_attribute(href),
        encode_text(label)
    )
}

/// Letterboxd watchlist page for a username
pub fn watchlist_url(username: &str) -> String {
    format!(
        "{}{}/watchlist/",
        LETTERBOXD_URL,
        utf8_percent_encode(username, NON_ALPHANUMERIC)
    )
}

fn entry_html(entry: &EntryView) -> String {
    let mut html = format!(
        "{} — {}",
        encode_text(&entry.label),
        link(&entry.youtube_href, "YouTube")
    );
    if let Some(url) = &entry.letterboxd_url {
        html.push_str(" | ");
        html.push_str(&link(url, "Letterboxd"));
    }
    if let Some(annotation) = &entry.annotation {
        html.push_str(&format!(" [{}]", encode_text(annotation)));
    }
    html
}

fn subsection_html(sub: &SubsectionView) -> String {
    let mut html = format!(
        "<h3>{} {}</h3>\n",
        sub.kind.marker(),
        encode_text(&sub.header)
    );

    if let Some(copy) = &sub.copy_text {
        html.push_str(&format!(
            "<button class=\"copy\" data-copy=\"{}\">📋 Copy list</button>\n",
            encode_double_quoted_attribute(copy)
        ));
    }
    if let Some(hint) = sub.hint {
        html.push_str(&format!("<p class=\"hint\">{}</p>\n", encode_text(hint)));
    }

    html.push_str("<ul>\n");
    for entry in &sub.entries {
        html.push_str(&format!("<li>{}</li>\n", entry_html(entry)));
    }
    html.push_str("</ul>\n");
    html
}

/// Standalone results page with the theme applied
pub fn render_html(view: &ResultsView, theme: Theme) -> String {
    let mut body = String::new();

    match &view.username {
        Some(username) => body.push_str(&format!(
            "<h1>Free on YouTube for {}</h1>\n",
            link(&watchlist_url(username), username)
        )),
        None => body.push_str("<h1>Free on YouTube</h1>\n"),
    }

    if view.no_matches {
        body.push_str(&format!(
            "<p>{} No matches found! Check out the {} or add more films on {}.</p>\n",
            EMOJI_MAILBOX,
            link(STOREFRONT_URL, "selection of free movies on YouTube"),
            link(LETTERBOXD_URL, "Letterboxd")
        ));
    }

    for section in &view.sections {
        if section.subsections.is_empty() {
            continue;
        }
        body.push_str(&format!("<section>\n<h2>{}</h2>\n", encode_text(section.title)));
        for sub in &section.subsections {
            body.push_str(&subsection_html(sub));
        }
        body.push_str("</section>\n");
    }

    let body_class = theme
        .body_class()
        .map(|class| format!(" class=\"{}\"", class))
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Freewatch results</title>\n<style>{}</style>\n</head>\n<body{}>\n<div id=\"spotlight\"></div>\n<button id=\"theme-toggle\">{}</button>\n{}<script>{}{}</script>\n</body>\n</html>\n",
        STYLE,
        body_class,
        theme.toggle_glyph(),
        body,
        SCRIPT,
        spotlight_script("spotlight")
    )
}
