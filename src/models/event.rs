use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Which half of the call a section belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Presentation,
    QuestionsAndAnswers,
}

impl SectionKind {
    /// Short lowercase tag used in exports
    pub fn tag(&self) -> &'static str {
        match self {
            SectionKind::Presentation => "presentation",
            SectionKind::QuestionsAndAnswers => "qa",
        }
    }
}

/// Role of the person speaking in a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeakerRole {
    /// Conference operator or editor; never carries call content
    Operator,
    /// Corporate participant (management side)
    Corporate,
    /// Conference-call participant (analyst/questioner)
    Conference,
    /// Unidentified or unlisted speaker
    Unknown,
}

/// Which roster a participant was listed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticipantSide {
    Corporate,
    Conference,
}

/// A person listed in the call's participant rosters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Person's name as listed
    pub name: String,
    /// Company and/or title lines, joined
    pub affiliation: String,
    pub side: ParticipantSide,
}

impl Participant {
    /// Roster entry as it appears in speaker headers: "Name,  Affiliation"
    pub fn display(&self) -> String {
        if self.affiliation.is_empty() {
            self.name.clone()
        } else {
            format!("{},  {}", self.name, self.affiliation)
        }
    }
}

/// One speaker turn within the presentation or Q&A
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub kind: SectionKind,
    /// Appearance number from the source (the bracketed `[n]`)
    pub order: u32,
    /// Speaker header, normalized against the rosters where possible
    pub speaker: String,
    pub role: SpeakerRole,
    /// Paragraphs in source order
    pub paragraphs: Vec<String>,
}

impl Section {
    /// Full section text with paragraphs rejoined
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

/// One earnings call, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Publication id from the source file
    pub id: i64,
    pub title: String,
    pub city: String,
    pub company_name: String,
    pub company_ticker: String,
    /// Call start time (source timezone, kept naive)
    pub date: NaiveDateTime,
    /// Publication action, e.g. "publish"
    pub action: String,
    /// Story type, e.g. "transcript"
    pub story_type: String,
    /// Publication version, e.g. "Final"
    pub version: String,
    pub event_type_id: i64,
    pub event_type_name: String,
    pub last_update: Option<NaiveDateTime>,
    /// Path of the file this event was loaded from
    pub source_file: String,
    /// Year taken from the parent directory name, when it is one
    pub year_upload: Option<i32>,
    pub corp_participants: Vec<Participant>,
    pub conf_participants: Vec<Participant>,
    pub presentation: Vec<Section>,
    pub qa: Vec<Section>,
}

impl Event {
    /// Calendar year of the call
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// All corporate-speaker text from the given part, joined.
    ///
    /// Used for cheap event-level keyword checks before any per-sentence
    /// work happens.
    pub fn collapsed(&self, kind: SectionKind) -> String {
        let sections = match kind {
            SectionKind::Presentation => &self.presentation,
            SectionKind::QuestionsAndAnswers => &self.qa,
        };
        let texts: Vec<String> = sections
            .iter()
            .filter(|s| s.role == SpeakerRole::Corporate)
            .map(|s| s.text())
            .collect();
        texts.join(" ")
    }

    /// Collapsed presentation plus collapsed Q&A
    pub fn collapsed_all(&self) -> String {
        let mut text = self.collapsed(SectionKind::Presentation);
        let qa = self.collapsed(SectionKind::QuestionsAndAnswers);
        if !text.is_empty() && !qa.is_empty() {
            text.push(' ');
        }
        text.push_str(&qa);
        text
    }

    /// Whitespace-separated words of every participant name, for name
    /// scrubbing during normalization
    pub fn participant_name_words(&self) -> Vec<String> {
        let mut words = Vec::new();
        for participant in self.corp_participants.iter().chain(&self.conf_participants) {
            for word in participant.name.split_whitespace() {
                words.push(word.to_string());
            }
        }
        words
    }
}
