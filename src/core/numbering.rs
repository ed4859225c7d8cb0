use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::DocumentError;
use super::repository::DocumentStore;
use super::settings::WorkbenchSettings;
use super::types::{Document, DocumentKind};

/// What happens to the running counter when a document is dated in a
/// later year than the last one numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearRollover {
    /// Start again at 1: INV-2024-117 is followed by INV-2025-001.
    #[default]
    Restart,
    /// Keep counting: INV-2024-117 is followed by INV-2025-118.
    Continue,
}

/// Number generator for one document kind.
///
/// Numbers look like `{prefix}{year}-{counter}`, e.g. "QUO-2024-007".
/// The year comes from the document date, so a sequence only moves
/// forward in time.
#[derive(Debug, Clone)]
pub struct DocumentNumberSequence {
    kind: DocumentKind,
    prefix: String,
    padding: usize,
    rollover: YearRollover,
    year: i32,
    issued: u64,
}

impl DocumentNumberSequence {
    /// Sequence with the built-in prefix of `kind`, three-digit padding
    /// and a yearly restart.
    pub fn new(kind: DocumentKind, year: i32) -> Self {
        Self {
            kind,
            prefix: kind.number_prefix().into(),
            padding: 3,
            rollover: YearRollover::Restart,
            year,
            issued: 0,
        }
    }

    /// Sequence using the prefix, padding and rollover from settings.
    pub fn from_settings(settings: &WorkbenchSettings, kind: DocumentKind, year: i32) -> Self {
        Self {
            prefix: settings.prefix_for(kind).into(),
            padding: settings.number_padding,
            rollover: settings.year_rollover,
            ..Self::new(kind, year)
        }
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// The number the next call to [`next_number`](Self::next_number) returns.
    pub fn peek(&self) -> String {
        self.format(self.year, self.issued + 1)
    }

    /// Take the next number in the current year.
    pub fn next_number(&mut self) -> String {
        self.issued += 1;
        self.format(self.year, self.issued)
    }

    /// Take the next number for a document dated `date`.
    ///
    /// A later year rolls the sequence over according to its
    /// [`YearRollover`]. An earlier year is refused, since the number
    /// would sort before ones already issued.
    pub fn number_for(&mut self, date: NaiveDate) -> Result<String, DocumentError> {
        let year = date.year();
        if year < self.year {
            return Err(DocumentError::Numbering(format!(
                "{} dated {date} is before the current numbering year {}",
                self.kind, self.year
            )));
        }
        if year > self.year {
            debug!(kind = %self.kind, from = self.year, to = year, rollover = ?self.rollover, "numbering year rolled over");
            self.year = year;
            if self.rollover == YearRollover::Restart {
                self.issued = 0;
            }
        }
        Ok(self.next_number())
    }

    /// Continue after the highest number already used by `docs`.
    ///
    /// Only documents of this kind whose number carries this prefix count.
    /// With [`YearRollover::Restart`] only the current year matters; with
    /// [`YearRollover::Continue`] every earlier year does too.
    pub fn resume<'a>(&mut self, docs: impl IntoIterator<Item = &'a Document>) {
        let highest = docs
            .into_iter()
            .filter(|doc| doc.kind() == self.kind)
            .filter_map(|doc| self.parse(&doc.number))
            .filter(|&(year, _)| match self.rollover {
                YearRollover::Restart => year == self.year,
                YearRollover::Continue => year <= self.year,
            })
            .map(|(_, n)| n)
            .max();
        if let Some(n) = highest {
            self.issued = self.issued.max(n);
        }
    }

    /// Split a number of this sequence into year and counter.
    pub fn parse(&self, number: &str) -> Option<(i32, u64)> {
        let (year, counter) = number.strip_prefix(&self.prefix)?.split_once('-')?;
        Some((year.parse().ok()?, counter.parse().ok()?))
    }

    fn format(&self, year: i32, n: u64) -> String {
        format!("{}{year}-{n:0>width$}", self.prefix, width = self.padding)
    }
}

/// Separate invoice and quote sequences sharing one configuration.
#[derive(Debug, Clone)]
pub struct DocumentNumbers {
    invoices: DocumentNumberSequence,
    quotes: DocumentNumberSequence,
}

impl DocumentNumbers {
    pub fn from_settings(settings: &WorkbenchSettings, year: i32) -> Self {
        Self {
            invoices: DocumentNumberSequence::from_settings(settings, DocumentKind::Invoice, year),
            quotes: DocumentNumberSequence::from_settings(settings, DocumentKind::Quote, year),
        }
    }

    /// Pick up both counters from what a store already holds.
    pub fn resume_from<S: DocumentStore + ?Sized>(&mut self, store: &S) -> Result<(), DocumentError> {
        let docs = store.list()?;
        self.invoices.resume(&docs);
        self.quotes.resume(&docs);
        debug!(
            next_invoice = %self.invoices.peek(),
            next_quote = %self.quotes.peek(),
            "numbering resumed from store"
        );
        Ok(())
    }

    /// Next number for a document of `kind` dated `date`.
    pub fn next(&mut self, kind: DocumentKind, date: NaiveDate) -> Result<String, DocumentError> {
        self.sequence_mut(kind).number_for(date)
    }

    pub fn sequence(&self, kind: DocumentKind) -> &DocumentNumberSequence {
        match kind {
            DocumentKind::Invoice => &self.invoices,
            DocumentKind::Quote => &self.quotes,
        }
    }

    fn sequence_mut(&mut self, kind: DocumentKind) -> &mut DocumentNumberSequence {
        match kind {
            DocumentKind::Invoice => &mut self.invoices,
            DocumentKind::Quote => &mut self.quotes,
        }
    }
}
