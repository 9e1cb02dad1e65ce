use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::models::{Participant, ParticipantSide, Section, SectionKind, SpeakerRole};

/// Minimum similarity for matching a speaker header to a roster entry
const FUZZY_MATCH_THRESHOLD: f64 = 0.85;

/// The call body split into its banner-delimited blocks and parsed into
/// rosters and speaker sections
#[derive(Debug, Clone, Default)]
pub struct ParsedBody {
    pub corp_participants: Vec<Participant>,
    pub conf_participants: Vec<Participant>,
    pub presentation: Vec<Section>,
    pub qa: Vec<Section>,
}

/// Parse the transcript body of one event.
///
/// The body is plain text with banner markers: participant rosters under
/// `=`-rule headers, the presentation (sometimes titled "Transcript") and
/// Q&A under `-`-rule headers, and speaker turns separated by dash rules
/// with `Name, Affiliation  [n]` header lines.
pub fn parse_body(body: &str) -> ParsedBody {
    // Source files use CRLF and escape ampersands
    let text = body.replace("\r\n", "\n").replace("&amp;", "&");
    let lines: Vec<&str> = text.lines().collect();

    let corp_block = block_after_header(&lines, "Corporate Participants", '=');
    let conf_block = block_after_header(&lines, "Conference Call Participants", '=');
    let presentation_block = block_after_header(&lines, "Presentation", '-')
        .or_else(|| block_after_header(&lines, "Transcript", '-'));
    let qa_block = block_after_header(&lines, "Questions and Answers", '-');

    let corp_participants =
        parse_roster(corp_block.as_deref().unwrap_or(""), ParticipantSide::Corporate);
    let conf_participants =
        parse_roster(conf_block.as_deref().unwrap_or(""), ParticipantSide::Conference);

    let presentation = presentation_block
        .map(|block| {
            parse_part(
                &block,
                SectionKind::Presentation,
                &corp_participants,
                &conf_participants,
            )
        })
        .unwrap_or_default();
    let qa = qa_block
        .map(|block| {
            parse_part(
                &block,
                SectionKind::QuestionsAndAnswers,
                &corp_participants,
                &conf_participants,
            )
        })
        .unwrap_or_default();

    ParsedBody {
        corp_participants,
        conf_participants,
        presentation,
        qa,
    }
}

/// A line that is a rule: at least ten repeats of one character
fn is_rule(line: &str, c: char) -> bool {
    let trimmed = line.trim();
    trimmed.chars().count() >= 10 && trimmed.chars().all(|x| x == c)
}

/// The text between `header` (followed by a rule of `rule_char`) and the
/// next `=`-rule, exclusive
fn block_after_header(lines: &[&str], header: &str, rule_char: char) -> Option<String> {
    let start = lines.iter().enumerate().find_map(|(i, line)| {
        if line.trim() == header
            && lines.get(i + 1).is_some_and(|next| is_rule(next, rule_char))
        {
            Some(i + 2)
        } else {
            None
        }
    })?;

    let end = (start..lines.len())
        .find(|&i| is_rule(lines[i], '='))
        .unwrap_or(lines.len());

    Some(lines[start..end].join("\n"))
}

/// Parse a `*`-bulleted roster block: each entry is a name line followed
/// by affiliation lines
fn parse_roster(block: &str, side: ParticipantSide) -> Vec<Participant> {
    block
        .split('*')
        .filter_map(|chunk| {
            let entry_lines: Vec<&str> = chunk
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect();
            let (name, rest) = entry_lines.split_first()?;
            Some(Participant {
                name: name.to_string(),
                affiliation: rest.join(",  "),
                side,
            })
        })
        .collect()
}

fn speaker_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^(.*\S)\s{2,}\[(\d+)\]$").expect("speaker header regex"))
}

fn anonymous_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[(\d+)\]$").expect("anonymous header regex"))
}

/// A speaker header parsed out of a dash-delimited block
#[derive(Debug, Clone)]
struct SpeakerHeader {
    order: u32,
    name: String,
}

/// Parse one part (presentation or Q&A) into ordered sections.
///
/// The part is split on dash rules into alternating speaker headers and
/// text blocks. Mismatched counts are repaired the way the source data
/// demands: missing texts become empty, missing speakers become unknown.
fn parse_part(
    block: &str,
    kind: SectionKind,
    corp: &[Participant],
    conf: &[Participant],
) -> Vec<Section> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in block.lines() {
        if is_rule(line, '-') {
            chunks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    chunks.push(current.join("\n"));

    let mut speakers: Vec<SpeakerHeader> = Vec::new();
    let mut texts: Vec<String> = Vec::new();

    for chunk in &chunks {
        let trimmed = chunk.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(captures) = speaker_header_re().captures(trimmed) {
            speakers.push(SpeakerHeader {
                order: captures[2].parse().unwrap_or(0),
                name: captures[1].trim().to_string(),
            });
        } else if let Some(captures) = anonymous_header_re().captures(trimmed) {
            speakers.push(SpeakerHeader {
                order: captures[1].parse().unwrap_or(0),
                name: "unknown speaker".to_string(),
            });
        } else {
            texts.push(trimmed.to_string());
        }
    }

    if speakers.is_empty() {
        warn!("No speakers present in {} part", kind.tag());
        return Vec::new();
    }
    if texts.is_empty() {
        warn!("No texts present in {} part", kind.tag());
        return Vec::new();
    }
    if speakers.len() != texts.len() {
        warn!(
            "{} part has {} speakers but {} texts; repairing",
            kind.tag(),
            speakers.len(),
            texts.len()
        );
        while texts.len() < speakers.len() {
            texts.push(String::new());
        }
        while speakers.len() < texts.len() {
            let order = speakers.last().map(|s| s.order + 1).unwrap_or(0);
            speakers.push(SpeakerHeader {
                order,
                name: "unknown speaker".to_string(),
            });
        }
    }

    speakers
        .into_iter()
        .zip(texts)
        .map(|(header, text)| {
            let name = normalize_speaker_name(&header.name, corp, conf);
            let role = speaker_role(&name, corp, conf);
            Section {
                kind,
                order: header.order,
                speaker: name,
                role,
                paragraphs: text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(str::to_string)
                    .collect(),
            }
        })
        .collect()
}

/// Clean a raw speaker header and align it with the rosters.
///
/// Trailing commas are stripped, unknown/operator variants collapsed,
/// space runs normalized, and near-matches (the source sprinkles "(ph)"
/// markers and typos) snapped to the roster entry.
fn normalize_speaker_name(raw: &str, corp: &[Participant], conf: &[Participant]) -> String {
    let mut name = raw.trim().trim_end_matches(',').trim().to_string();
    let lower = name.to_lowercase();

    if lower.starts_with("unknown") {
        return "unknown speaker".to_string();
    }
    if lower.starts_with("operator") {
        return "Operator".to_string();
    }

    name = collapse_spaces(&name);

    for participant in corp.iter().chain(conf) {
        let display = participant.display().replace("(ph)", "");
        if strsim::normalized_levenshtein(&name, display.trim()) >= FUZZY_MATCH_THRESHOLD {
            return participant.display();
        }
    }

    name
}

/// Runs of whitespace become the roster's double space
fn collapse_spaces(name: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s{2,}").expect("space run regex"));
    re.replace_all(name, "  ").to_string()
}

fn speaker_role(name: &str, corp: &[Participant], conf: &[Participant]) -> SpeakerRole {
    let lower = name.to_lowercase();
    if lower == "operator" || lower == "editor" {
        return SpeakerRole::Operator;
    }
    if corp.iter().any(|p| p.display() == name) {
        return SpeakerRole::Corporate;
    }
    if conf.iter().any(|p| p.display() == name) {
        return SpeakerRole::Conference;
    }
    SpeakerRole::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(c: char) -> String {
        c.to_string().repeat(80)
    }

    fn sample_body() -> String {
        let eq = rule('=');
        let dash = rule('-');
        format!(
            "{eq}\r\n\
             Corporate Participants\r\n{eq}\r\n\
               * Jane Roe\r\n   Acme Corp - CEO\r\n\
               * Max Mustermann\r\n   Acme Corp - CFO\r\n\
             {eq}\r\n\
             Conference Call Participants\r\n{eq}\r\n\
               * John Smith\r\n   Big Bank - Analyst\r\n\
             {eq}\r\n\
             Presentation\r\n{dash}\r\n\
             Operator  [1]\r\n{dash}\r\n\
             Welcome everyone to the Acme earnings call.\r\n{dash}\r\n\
             Jane Roe,  Acme Corp - CEO  [2]\r\n{dash}\r\n\
             Thank you. Revenue grew nicely.\r\n\
             Our outlook for Russia is cautious.\r\n\
             {eq}\r\n\
             Questions and Answers\r\n{dash}\r\n\
             John Smith,  Big Bank - Analyst  [1]\r\n{dash}\r\n\
             Could you size the Russia exposure?\r\n{dash}\r\n\
             Max Mustermann,  Acme Corp - CFO  [2]\r\n{dash}\r\n\
             It is under one percent of revenue.\r\n\
             {eq}\r\n"
        )
    }

    #[test]
    fn test_rosters_parsed() {
        let parsed = parse_body(&sample_body());
        assert_eq!(parsed.corp_participants.len(), 2);
        assert_eq!(parsed.corp_participants[0].name, "Jane Roe");
        assert_eq!(parsed.corp_participants[0].affiliation, "Acme Corp - CEO");
        assert_eq!(parsed.conf_participants.len(), 1);
        assert_eq!(parsed.conf_participants[0].side, ParticipantSide::Conference);
    }

    #[test]
    fn test_sections_attributed() {
        let parsed = parse_body(&sample_body());

        assert_eq!(parsed.presentation.len(), 2);
        assert_eq!(parsed.presentation[0].role, SpeakerRole::Operator);
        assert_eq!(parsed.presentation[0].order, 1);
        assert_eq!(parsed.presentation[1].role, SpeakerRole::Corporate);
        assert_eq!(parsed.presentation[1].paragraphs.len(), 2);

        assert_eq!(parsed.qa.len(), 2);
        assert_eq!(parsed.qa[0].role, SpeakerRole::Conference);
        assert_eq!(parsed.qa[1].role, SpeakerRole::Corporate);
        assert_eq!(
            parsed.qa[1].paragraphs,
            vec!["It is under one percent of revenue.".to_string()]
        );
    }

    #[test]
    fn test_transcript_header_accepted() {
        let body = sample_body().replace("Presentation\r\n", "Transcript\r\n");
        let parsed = parse_body(&body);
        assert_eq!(parsed.presentation.len(), 2);
    }

    #[test]
    fn test_missing_qa_yields_empty() {
        let eq = rule('=');
        let dash = rule('-');
        let body = format!(
            "{eq}\r\nPresentation\r\n{dash}\r\n\
             Jane Roe  [1]\r\n{dash}\r\n\
             Hello.\r\n{eq}\r\n"
        );
        let parsed = parse_body(&body);
        assert_eq!(parsed.presentation.len(), 1);
        assert!(parsed.qa.is_empty());
        assert!(parsed.corp_participants.is_empty());
    }

    #[test]
    fn test_fuzzy_roster_match() {
        // A header with a single space instead of the roster's double
        // space still snaps to the roster entry
        let body = sample_body().replace(
            "Jane Roe,  Acme Corp - CEO  [2]",
            "Jane Roe, Acme Corp - CEO  [2]",
        );
        let parsed = parse_body(&body);
        assert_eq!(parsed.presentation[1].speaker, "Jane Roe,  Acme Corp - CEO");
        assert_eq!(parsed.presentation[1].role, SpeakerRole::Corporate);
    }

    #[test]
    fn test_anonymous_speaker_header() {
        let eq = rule('=');
        let dash = rule('-');
        let body = format!(
            "{eq}\r\nPresentation\r\n{dash}\r\n\
             [1]\r\n{dash}\r\n\
             Somebody speaks.\r\n{eq}\r\n"
        );
        let parsed = parse_body(&body);
        assert_eq!(parsed.presentation.len(), 1);
        assert_eq!(parsed.presentation[0].speaker, "unknown speaker");
        assert_eq!(parsed.presentation[0].role, SpeakerRole::Unknown);
    }

    #[test]
    fn test_speaker_text_mismatch_repaired() {
        let eq = rule('=');
        let dash = rule('-');
        // Two speakers, one text
        let body = format!(
            "{eq}\r\nPresentation\r\n{dash}\r\n\
             Jane Roe  [1]\r\n{dash}\r\n\
             Hello.\r\n{dash}\r\n\
             Max Mustermann  [2]\r\n{dash}\r\n{eq}\r\n"
        );
        let parsed = parse_body(&body);
        assert_eq!(parsed.presentation.len(), 2);
        assert!(parsed.presentation[1].paragraphs.is_empty());
    }

    #[test]
    fn test_ampersand_unescaped() {
        let body = sample_body().replace("Big Bank", "Barnes &amp; Noble");
        let parsed = parse_body(&body);
        assert_eq!(parsed.conf_participants[0].affiliation, "Barnes & Noble - Analyst");
    }
}
