use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDateTime;
use quick_xml::Reader;
use quick_xml::events::Event as XmlEvent;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::io::transcript::parse_body;
use crate::models::Event;

/// Outcome of loading a transcript directory
#[derive(Debug)]
pub struct LoadSummary {
    pub events: Vec<Event>,
    pub files_total: usize,
    pub files_skipped: usize,
}

/// Load every `*.xml` file under `dir` into events.
///
/// Files are visited in sorted path order so the event collection is
/// deterministic. A file that cannot be read or parsed is skipped with a
/// warning; the batch always continues.
pub fn load_events_from_dir(dir: &Path) -> Result<LoadSummary> {
    if !dir.is_dir() {
        return Err(anyhow!("Not a directory: {:?}", dir));
    }

    let mut events = Vec::new();
    let mut files_total = 0usize;
    let mut files_skipped = 0usize;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable directory entry: {err}");
                files_skipped += 1;
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if !path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
        {
            continue;
        }

        files_total += 1;
        match parse_event_file(path) {
            Ok(event) => {
                debug!("Loaded {:?} (event id {})", path, event.id);
                events.push(event);
            }
            Err(err) => {
                warn!("Skipping {:?}: {err:#}", path);
                files_skipped += 1;
            }
        }
    }

    info!(
        "Loaded {} events from {} files ({} skipped)",
        events.len(),
        files_total,
        files_skipped
    );

    Ok(LoadSummary {
        events,
        files_total,
        files_skipped,
    })
}

/// Parse one transcript file
pub fn parse_event_file(path: &Path) -> Result<Event> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    let year_upload = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .and_then(|n| n.parse::<i32>().ok());
    parse_event_xml(&content, &path.to_string_lossy(), year_upload)
}

/// Parse a transcript XML string into an [`Event`].
///
/// Fields missing from the file keep placeholder values ("unknown", id
/// -1, a 1900 date) rather than failing the file; a malformed document
/// or an unparseable start date is an error and the file is skipped by
/// the caller.
pub fn parse_event_xml(xml: &str, source_file: &str, year_upload: Option<i32>) -> Result<Event> {
    let mut reader = Reader::from_str(xml);

    let mut event = blank_event(source_file, year_upload);
    let mut current_text = String::new();

    loop {
        match reader
            .read_event()
            .with_context(|| format!("Malformed XML in {source_file}"))?
        {
            XmlEvent::Start(start) => {
                current_text.clear();
                match start.name().as_ref() {
                    b"Event" => {
                        for attr in start.attributes() {
                            let attr = attr.context("Bad attribute on Event")?;
                            let value = attr.unescape_value().context("Bad attribute value")?;
                            match attr.key.as_ref() {
                                b"Id" => event.id = value.parse().unwrap_or(-1),
                                b"lastUpdate" => {
                                    event.last_update = parse_last_update(&value);
                                    if event.last_update.is_none() {
                                        warn!(
                                            "Unparseable lastUpdate {:?} in {}",
                                            value.as_ref(),
                                            source_file
                                        );
                                    }
                                }
                                b"eventTypeId" => {
                                    event.event_type_id = value.parse().unwrap_or(-1)
                                }
                                b"eventTypeName" => event.event_type_name = value.into_owned(),
                                _ => {}
                            }
                        }
                    }
                    b"EventStory" => {
                        for attr in start.attributes() {
                            let attr = attr.context("Bad attribute on EventStory")?;
                            let value = attr.unescape_value().context("Bad attribute value")?;
                            match attr.key.as_ref() {
                                b"action" => event.action = value.into_owned(),
                                b"storyType" => event.story_type = value.into_owned(),
                                b"version" => event.version = value.into_owned(),
                                _ => {}
                            }
                        }
                    }
                    _ => {}
                }
            }
            XmlEvent::Text(text) => {
                current_text.push_str(&text.unescape().context("Bad text node")?);
            }
            XmlEvent::CData(cdata) => {
                current_text.push_str(&String::from_utf8_lossy(&cdata));
            }
            XmlEvent::End(end) => {
                match end.name().as_ref() {
                    b"eventTitle" => event.title = current_text.trim().to_string(),
                    b"city" => event.city = current_text.trim().to_string(),
                    b"companyName" => event.company_name = current_text.trim().to_string(),
                    b"companyTicker" => event.company_ticker = current_text.trim().to_string(),
                    b"startDate" => {
                        event.date = parse_start_date(current_text.trim()).with_context(|| {
                            format!("Bad startDate {:?} in {}", current_text.trim(), source_file)
                        })?;
                    }
                    b"Body" => {
                        let body = parse_body(&current_text);
                        event.corp_participants = body.corp_participants;
                        event.conf_participants = body.conf_participants;
                        event.presentation = body.presentation;
                        event.qa = body.qa;
                    }
                    _ => {}
                }
                current_text.clear();
            }
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    Ok(event)
}

/// Placeholder event, filled in tag by tag as the document is read
fn blank_event(source_file: &str, year_upload: Option<i32>) -> Event {
    Event {
        id: -1,
        title: "unknown".to_string(),
        city: "unknown".to_string(),
        company_name: "unknown".to_string(),
        company_ticker: "unknown".to_string(),
        date: NaiveDateTime::parse_from_str("1900-01-01 00:00", "%Y-%m-%d %H:%M")
            .expect("constant date"),
        action: "unknown".to_string(),
        story_type: "unknown".to_string(),
        version: "unknown".to_string(),
        event_type_id: -1,
        event_type_name: "unknown".to_string(),
        last_update: None,
        source_file: source_file.to_string(),
        year_upload,
        corp_participants: Vec::new(),
        conf_participants: Vec::new(),
        presentation: Vec::new(),
        qa: Vec::new(),
    }
}

/// `startDate` looks like "26-Apr-22 2:00PM GMT"; chrono cannot parse
/// named timezones, so the trailing token is dropped and the naive part
/// parsed
fn parse_start_date(raw: &str) -> Result<NaiveDateTime> {
    let without_zone = strip_zone(raw);
    NaiveDateTime::parse_from_str(without_zone, "%d-%b-%y %I:%M%p")
        .map_err(|err| anyhow!("{err}"))
}

/// `lastUpdate` looks like "Tuesday, April 26, 2022 at 2:05:00PM GMT"
fn parse_last_update(raw: &str) -> Option<NaiveDateTime> {
    let without_zone = strip_zone(raw.trim());
    NaiveDateTime::parse_from_str(without_zone, "%A, %B %d, %Y at %I:%M:%S%p").ok()
}

/// Drop a trailing alphabetic timezone token ("GMT", "EST", ...)
fn strip_zone(raw: &str) -> &str {
    match raw.rsplit_once(' ') {
        Some((head, tail)) if tail.chars().all(|c| c.is_ascii_alphabetic()) && !tail.is_empty() => {
            head.trim_end()
        }
        _ => raw,
    }
}
