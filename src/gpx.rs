//! GPX export of workout pins, for viewing in any map tool.

use crate::utils::format_summary;
use crate::workout::Workout;
use anyhow::{Context, Result};
use chrono::SecondsFormat;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const GPX_NS: &str = "http://www.topografix.com/GPX/1/1";

/// Write every workout as a `<wpt>` in a GPX 1.1 document.
pub fn write_waypoints<W: Write>(out: W, workouts: &[Workout]) -> Result<()> {
    let mut xml = Writer::new_with_indent(out, b' ', 2);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", "1.1"));
    root.push_attribute(("creator", "mapty"));
    root.push_attribute(("xmlns", GPX_NS));
    xml.write_event(Event::Start(root))?;

    for w in workouts {
        write_waypoint(&mut xml, w)?;
    }

    xml.write_event(Event::End(BytesEnd::new("gpx")))?;
    Ok(())
}

pub fn export_to_file(path: &Path, workouts: &[Workout]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating GPX file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_waypoints(&mut out, workouts)
        .with_context(|| format!("writing GPX: {}", path.display()))?;
    out.flush().context("flushing GPX file")?;
    tracing::info!(path = %path.display(), waypoints = workouts.len(), "exported gpx");
    Ok(())
}

fn write_waypoint<W: Write>(xml: &mut Writer<W>, w: &Workout) -> Result<()> {
    let coords = w.coords();
    let lat = coords.lat.to_string();
    let lon = coords.lng.to_string();

    let mut wpt = BytesStart::new("wpt");
    wpt.push_attribute(("lat", lat.as_str()));
    wpt.push_attribute(("lon", lon.as_str()));
    xml.write_event(Event::Start(wpt))?;

    let time = w.date().to_rfc3339_opts(SecondsFormat::Secs, true);
    write_text_element(xml, "time", &time)?;
    write_text_element(xml, "name", w.describe())?;
    write_text_element(xml, "desc", &format_summary(w))?;
    write_text_element(xml, "type", w.kind().as_str())?;

    xml.write_event(Event::End(BytesEnd::new("wpt")))?;
    Ok(())
}

fn write_text_element<W: Write>(xml: &mut Writer<W>, tag: &str, text: &str) -> Result<()> {
    xml.write_event(Event::Start(BytesStart::new(tag)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workout::Coords;
    use chrono::{TimeZone, Utc};

    #[test]
    fn writes_one_waypoint_per_workout() {
        let d = Utc.with_ymd_and_hms(2024, 4, 14, 8, 0, 0).unwrap();
        let ws = vec![
            Workout::running("r".into(), Coords::new(40.7, -74.0), 5.0, 30.0, 180, d).unwrap(),
            Workout::cycling("c".into(), Coords::new(51.5, -0.09), 20.0, 60.0, 10.0, d).unwrap(),
        ];

        let mut buf = Vec::new();
        write_waypoints(&mut buf, &ws).unwrap();
        let s = String::from_utf8(buf).unwrap();

        assert!(s.starts_with("<?xml"));
        assert_eq!(s.matches("<wpt ").count(), 2);
        assert!(s.contains(r#"<wpt lat="40.7" lon="-74">"#));
        assert!(s.contains(&format!("<name>{}</name>", ws[0].describe())));
        assert!(s.contains("<type>cycling</type>"));
        assert!(s.contains("<time>2024-04-14T08:00:00Z</time>"));
        assert!(s.trim_end().ends_with("</gpx>"));
    }

    #[test]
    fn empty_list_is_valid_document() {
        let mut buf = Vec::new();
        write_waypoints(&mut buf, &[]).unwrap();
        let s = String::from_utf8(buf).unwrap();
        assert!(s.contains("<gpx "));
        assert!(!s.contains("<wpt"));
    }
}
