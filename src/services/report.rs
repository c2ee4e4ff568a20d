//! Printable event report (HTML)

use std::collections::HashMap;
use std::fmt::{self, Write};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    equipment::Equipment,
    event::{format_hmm, Event},
    member::Member,
    vehicle::Vehicle,
};

/// Linked records needed to render an event report
pub struct ReportContext<'a> {
    /// Unit name printed above the title
    pub unit: &'a str,
    pub vehicles: &'a [Vehicle],
    pub equipment: &'a [Equipment],
    pub members: &'a [Member],
}

/// Escape text for HTML element and attribute content
pub fn escape_html(s: &str) -> String {
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

/// `dd.MM.yyyy HH:mm`, or a dash when missing
pub fn format_datetime(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|| "—".to_string())
}

/// Download file name: whitespace runs become `_`
pub fn report_file_name(title: &str) -> String {
    let base = if title.trim().is_empty() { "dogadaj" } else { title.trim() };
    format!("{}.html", base.split_whitespace().collect::<Vec<_>>().join("_"))
}

fn member_label(members: &HashMap<Uuid, &Member>, id: Uuid) -> String {
    match members.get(&id) {
        Some(m) => format!("{} ({})", m.full_name(), m.role.label()),
        None => id.to_string(),
    }
}

/// Render the full HTML document for an event
pub fn render_event_report(event: &Event, ctx: &ReportContext<'_>) -> Result<String, fmt::Error> {
    let members: HashMap<Uuid, &Member> = ctx.members.iter().map(|m| (m.id, m)).collect();
    let vehicles: HashMap<Uuid, &Vehicle> = ctx.vehicles.iter().map(|v| (v.id, v)).collect();
    let equipment: HashMap<Uuid, &Equipment> = ctx.equipment.iter().map(|e| (e.id, e)).collect();

    let title = if event.title.is_empty() { "Događaj" } else { event.title.as_str() };
    let activity = match (event.activity_name.as_deref(), event.category_name.as_deref()) {
        (Some(a), Some(c)) if !a.is_empty() && !c.is_empty() => format!("{} ({})", a, c),
        _ if !event.kind.is_empty() => event.kind.clone(),
        _ => "—".to_string(),
    };

    let mut html = String::new();
    write!(
        html,
        "<!doctype html>\n<html lang=\"hr\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>body{{font-family:Helvetica,Arial,sans-serif;margin:40px}}h1{{font-size:22px}}\
         table{{border-collapse:collapse;width:100%}}td{{border-bottom:1px solid #ddd;padding:4px}}</style>\n\
         </head>\n<body>\n<p class=\"unit\">{unit}</p>\n<h1>{title}</h1>\n",
        unit = escape_html(ctx.unit),
        title = escape_html(title)
    )?;

    writeln!(html, "<p><strong>Aktivnost:</strong> {}</p>", escape_html(&activity))?;
    writeln!(
        html,
        "<p><strong>Početak:</strong> {} &nbsp; <strong>Kraj:</strong> {}</p>",
        format_datetime(event.starts_at),
        format_datetime(event.ends_at)
    )?;
    writeln!(
        html,
        "<p><strong>Lokacija:</strong> {}</p>",
        escape_html(event.location.as_deref().unwrap_or("—"))
    )?;
    if let Some(leader) = event.leader.as_deref().filter(|s| !s.is_empty()) {
        writeln!(html, "<p><strong>Voditelj / Izvjestitelj:</strong> {}</p>", escape_html(leader))?;
    }
    if let Some(description) = event.description.as_deref().filter(|s| !s.is_empty()) {
        writeln!(html, "<h2>Opis</h2>\n<p>{}</p>", escape_html(description))?;
    }

    if !event.vehicle_ids.is_empty() {
        html.push_str("<h2>Vozila</h2>\n<ul>\n");
        for id in &event.vehicle_ids {
            let label = vehicles
                .get(id)
                .map(|v| v.display_label())
                .unwrap_or_else(|| id.to_string());
            writeln!(html, "<li>{}</li>", escape_html(&label))?;
        }
        html.push_str("</ul>\n");
    }

    if !event.equipment_ids.is_empty() {
        html.push_str("<h2>Oprema</h2>\n<ul>\n");
        for id in &event.equipment_ids {
            let label = equipment
                .get(id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| id.to_string());
            writeln!(html, "<li>{}</li>", escape_html(&label))?;
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<h2>Članovi</h2>\n");
    if !event.participation.is_empty() {
        html.push_str("<table>\n");
        for p in event.participation.iter() {
            writeln!(
                html,
                "<tr><td>{}</td><td style=\"text-align:right\">{} h</td></tr>",
                escape_html(&member_label(&members, p.member_id)),
                format_hmm(p.minutes)
            )?;
        }
        writeln!(
            html,
            "<tr><td><strong>Ukupno</strong></td><td style=\"text-align:right\"><strong>{} h</strong></td></tr>",
            format_hmm(event.total_participation_minutes())
        )?;
        html.push_str("</table>\n");
    } else if !event.member_ids.is_empty() {
        html.push_str("<ul>\n");
        for id in &event.member_ids {
            writeln!(html, "<li>{}</li>", escape_html(&member_label(&members, *id)))?;
        }
        html.push_str("</ul>\n");
    } else {
        html.push_str("<p>—</p>\n");
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        enums::{MemberRole, VehicleStatus, VehicleType},
        event::{tests::event, Participation},
    };
    use sqlx::types::Json;

    fn member(id: Uuid) -> Member {
        Member {
            id,
            first_name: "Ana".to_string(),
            last_name: "Kovač".to_string(),
            role: MemberRole::Secretary,
            phone: None,
            email: None,
            birth_date: None,
            personal_id: None,
            medical_exam_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn vehicle(id: Uuid) -> Vehicle {
        Vehicle {
            id,
            vehicle_type: VehicleType::Van,
            model: "VW Crafter".to_string(),
            plate: "ZG123AB".to_string(),
            inspection_date: None,
            service_date: None,
            status: VehicleStatus::Operational,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_report_file_name() {
        assert_eq!(report_file_name("Vježba  gašenja požara"), "Vježba_gašenja_požara.html");
        assert_eq!(report_file_name("  "), "dogadaj.html");
    }

    #[test]
    fn test_format_datetime() {
        let e = event(Vec::new());
        assert_eq!(format_datetime(e.starts_at), "08.03.2025 09:00");
        assert_eq!(format_datetime(None), "—");
    }

    #[test]
    fn test_render_with_participation() {
        let (m, v) = (Uuid::new_v4(), Uuid::new_v4());
        let mut e = event(vec![m]);
        e.title = "Vježba <noćna>".to_string();
        e.vehicle_ids = vec![v];
        e.participation = Json(vec![Participation { member_id: m, minutes: 95 }]);

        let members = [member(m)];
        let vehicles = [vehicle(v)];
        let html = render_event_report(
            &e,
            &ReportContext { unit: "DVD Sveti Ivan", vehicles: &vehicles, equipment: &[], members: &members },
        )
        .unwrap();

        assert!(html.contains("<p class=\"unit\">DVD Sveti Ivan</p>"));
        assert!(html.contains("<h1>Vježba &lt;noćna&gt;</h1>"));
        assert!(html.contains("08.03.2025 09:00"));
        assert!(html.contains("08.03.2025 11:30"));
        assert!(html.contains("<li>VW Crafter (ZG123AB)</li>"));
        assert!(html.contains("Ana Kovač (Tajnik)"));
        assert!(html.contains("1:35 h"));
        assert!(!html.contains("<h2>Oprema</h2>"));
    }

    #[test]
    fn test_render_without_members() {
        let e = event(Vec::new());
        let html = render_event_report(
            &e,
            &ReportContext { unit: "DVD", vehicles: &[], equipment: &[], members: &[] },
        )
        .unwrap();
        assert!(html.contains("<h2>Članovi</h2>\n<p>—</p>"));
        assert!(html.contains("<strong>Aktivnost:</strong> —"));
    }

    #[test]
    fn test_unknown_member_shows_id() {
        let m = Uuid::new_v4();
        let e = event(vec![m]);
        let html = render_event_report(
            &e,
            &ReportContext { unit: "DVD", vehicles: &[], equipment: &[], members: &[] },
        )
        .unwrap();
        assert!(html.contains(&m.to_string()));
    }
}
