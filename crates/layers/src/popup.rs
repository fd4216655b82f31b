use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupLogo {
    pub src: String,
    pub alt: String,
}

/// Content shown when a marker is clicked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Popup {
    pub logo: Option<PopupLogo>,
    pub title: String,
    pub desc: String,
    pub website: Option<String>,
}

impl Popup {
    pub fn new(title: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            desc: desc.into(),
            ..Self::default()
        }
    }

    /// Renders the popup markup. All text and attribute values are escaped.
    pub fn to_html(&self) -> String {
        let mut out = String::from(r#"<div class="map-popup-content">"#);
        if let Some(logo) = &self.logo {
            let _ = write!(
                out,
                r#"<img src="{}" alt="{}" class="popup-logo" />"#,
                escape_html(&logo.src),
                escape_html(&logo.alt)
            );
        }
        let _ = write!(
            out,
            "<h4>{}</h4><p>{}</p>",
            escape_html(&self.title),
            escape_html(&self.desc)
        );
        if let Some(url) = &self.website {
            let _ = write!(
                out,
                r#"<a href="{}" target="_blank" rel="noopener" class="popup-link">Visit Website →</a>"#,
                escape_html(url)
            );
        }
        out.push_str("</div>");
        out
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
