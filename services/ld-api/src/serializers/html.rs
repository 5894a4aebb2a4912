//! HTML pages for entities.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::entity::{AgeBound, Entity};

/// Escape text for use in HTML content and attribute values.
pub fn escape(s: &str) -> Cow<'_, str> {
    if s.contains(['&', '<', '>', '"', '\'']) {
        let mut escaped = String::with_capacity(s.len() + 8);
        for c in s.chars() {
            match c {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&#x27;"),
                _ => escaped.push(c),
            }
        }
        Cow::Owned(escaped)
    } else {
        Cow::Borrowed(s)
    }
}

/// Wrap body markup in a complete document.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
</head>
<body>
  <h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        body = body
    )
}

fn link(href: &str) -> String {
    let href = escape(href);
    format!("<a href=\"{}\">{}</a>", href, href)
}

fn row(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "    <tr><th>{}</th><td>{}</td></tr>", escape(label), value);
}

/// Entity page under the OGC API Features profile.
pub fn feature_page(entity: &Entity) -> String {
    let mut body = String::from("  <table>\n");
    row(&mut body, "URI", &link(&entity.uri));
    row(&mut body, "Identifier", &escape(&entity.id));
    if let Some(ref description) = entity.description {
        row(&mut body, "Description", &escape(description));
    }
    if let Some(ref dataset) = entity.is_part_of {
        row(&mut body, "Is Part Of", &link(dataset));
    }
    if let Some(ref geometry) = entity.geometry {
        row(
            &mut body,
            "Geometry",
            &format!("<code>{}</code>", escape(&geometry.wkt)),
        );
    }
    body.push_str("  </table>\n");
    page(&entity.title, &body)
}

fn bound(bound: &AgeBound) -> String {
    let (value, unit) = bound.as_quantity();
    format!("{} {}", value, link(unit))
}

/// Stratigraphic unit page under the Stratigraphic Units profile.
pub fn strat_unit_page(entity: &Entity) -> String {
    let mut body = String::from("  <table>\n");
    row(&mut body, "URI", &link(&entity.uri));
    row(&mut body, "Identifier", &escape(&entity.id));
    if let Some(ref description) = entity.description {
        row(&mut body, "Description", &escape(description));
    }
    if let Some(ref dataset) = entity.is_part_of {
        row(&mut body, "Is Part Of", &link(dataset));
    }

    if let Some(ref unit) = entity.unit {
        let uris = [
            ("Observation Method", &unit.observation_method),
            ("Geologic Unit Type", &unit.geologic_unit_type),
            ("Description Purpose", &unit.description_purpose),
            ("Stratigraphic Rank", &unit.stratigraphic_rank),
            ("Event Process", &unit.event_process),
            ("Younger Named Age", &unit.younger_named_age),
            ("Older Named Age", &unit.older_named_age),
        ];
        for (label, value) in uris {
            if let Some(value) = value {
                row(&mut body, label, &link(value));
            }
        }
        if let Some(ref younger) = unit.younger_bound {
            row(&mut body, "Younger Bound", &bound(younger));
        }
        if let Some(ref older) = unit.older_bound {
            row(&mut body, "Older Bound", &bound(older));
        }
        body.push_str("  </table>\n");

        if !unit.hierarchy_links.is_empty() {
            body.push_str("  <h2>Hierarchy</h2>\n  <ul>\n");
            for hierarchy in &unit.hierarchy_links {
                let _ = writeln!(
                    body,
                    "    <li>{} {}</li>",
                    link(&hierarchy.role),
                    link(&hierarchy.target_unit)
                );
            }
            body.push_str("  </ul>\n");
        }
    } else {
        body.push_str("  </table>\n");
    }

    page(&entity.title, &body)
}
