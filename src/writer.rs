use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use log::info;
use thiserror::Error;
use typed_builder::TypedBuilder;

use crate::sink::HistogramSink;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Failed to create output file: {0}")]
    CreateErr(std::io::Error),
    #[error("Failed to write histograms: {0}")]
    WriteErr(#[from] serde_yaml::Error),
}

/// Writer storing the histogram sinks of all components in a YAML file
///
/// Sinks are written under their component names, sorted by name for
/// reproducible output.
#[derive(Debug, TypedBuilder)]
pub struct HistogramWriter {
    filename: PathBuf,
}

impl HistogramWriter {
    /// Write the named histogram sinks
    pub fn write<'a, I>(&self, sinks: I) -> Result<(), WriteError>
    where
        I: IntoIterator<Item = (&'a str, &'a HistogramSink)>,
    {
        let sorted: BTreeMap<_, _> = sinks.into_iter().collect();
        let file = File::create(&self.filename).map_err(WriteError::CreateErr)?;
        serde_yaml::to_writer(BufWriter::new(file), &sorted)?;
        info!("Wrote {} histogram sinks to {:?}", sorted.len(), self.filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Axis;
    use noisy_float::prelude::*;
    use std::collections::HashMap;

    #[test]
    fn sinks_round_trip_through_a_file() {
        let mut sink = HistogramSink::new();
        sink.create(
            "hTrackHistMinBias",
            "tracks",
            vec![Axis::with_edges(
                "pt",
                [0., 1., 2.].into_iter().map(n64).collect(),
            )],
        )
        .unwrap();
        sink.fill("hTrackHistMinBias", &[n64(0.5)], n64(2.)).unwrap();

        let outfile = tempfile::NamedTempFile::new().unwrap();
        let writer = HistogramWriter::builder()
            .filename(outfile.path().to_owned())
            .build();
        writer.write([("tracks", &sink)]).unwrap();

        let written = std::fs::read_to_string(outfile.path()).unwrap();
        let read: HashMap<String, HistogramSink> =
            serde_yaml::from_str(&written).unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read["tracks"], sink);
    }
}
