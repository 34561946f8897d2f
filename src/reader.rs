use std::convert::Infallible;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use audec::auto_decompress;
use log::debug;
use thiserror::Error;

use crate::event::EventRecord;

#[derive(Debug, Error)]
pub enum CreateError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse event file `{0}`: {1}")]
    ParseError(PathBuf, serde_yaml::Error),
}

/// Reader for a single event file
///
/// Event files are YAML lists of event records, optionally compressed.
/// The whole file is parsed when the reader is created, so format errors
/// surface before the analysis starts.
pub struct EventFileReader {
    events: std::vec::IntoIter<EventRecord>,
}

impl EventFileReader {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CreateError> {
        let path = path.as_ref();
        debug!("Reading events from {path:?}");
        let file = std::fs::File::open(path)?;
        let input = auto_decompress(BufReader::new(file));
        let events: Vec<EventRecord> = serde_yaml::from_reader(input)
            .map_err(|err| CreateError::ParseError(path.to_owned(), err))?;
        Ok(Self {
            events: events.into_iter(),
        })
    }
}

impl Iterator for EventFileReader {
    type Item = Result<EventRecord, Infallible>;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.events.size_hint()
    }
}

/// Reader chaining the events of one or more files
#[derive(Default)]
pub struct CombinedReader<R> {
    readers: Vec<R>,
    current: usize,
}

impl<R> CombinedReader<R> {
    fn new(readers: Vec<R>) -> Self {
        Self {
            readers,
            current: 0,
        }
    }
}

impl<R: Iterator> Iterator for CombinedReader<R> {
    type Item = <R as Iterator>::Item;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current < self.readers.len() {
            let next = self.readers[self.current].next();
            if next.is_some() {
                return next;
            }
            self.current += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.readers[self.current..]
            .iter()
            .map(|r| r.size_hint())
            .reduce(|(accmin, accmax), (min, max)| {
                let accmax = match (accmax, max) {
                    (Some(accmax), Some(max)) => Some(accmax + max),
                    _ => None,
                };
                (accmin + min, accmax)
            })
            .unwrap_or_default()
    }
}

impl CombinedReader<EventFileReader> {
    /// Construct a new reader reading from the files with the given names
    pub fn from_files<I, P>(files: I) -> Result<Self, CreateError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let readers: Result<_, _> =
            files.into_iter().map(EventFileReader::new).collect();
        Ok(Self::new(readers?))
    }
}
