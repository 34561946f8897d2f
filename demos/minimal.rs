// minimal example for a track analysis
// run with `cargo run --release --example minimal -- IN.yaml OUT.yaml`
// set the environment variable `RUST_LOG=info` for command-line output
use std::error::Error;

use trigana::prelude::*;

use env_logger;

fn main() -> Result<(), Box<dyn Error>> {
    // initialise logging from the RUST_LOG environment variable
    env_logger::init();

    // access command line arguments, ignoring the program name
    let mut args = std::env::args().skip(1);
    let infile = args.next().unwrap();
    let outfile = args.next().unwrap();

    // How to read events
    let reader = CombinedReader::from_files(vec![infile])?;

    // Analyse tracks with default settings
    // Use the builder setters to apply cuts or require MC truth
    let tracks = TrackComponent::builder().build()?;

    let mut analysis = AnalysisBuilder {
        reader,
        binning: BinningConfig::default(), // standard axis binnings
        components: vec![Box::new(tracks)],
    }
    .build();
    // Run the event loop
    analysis.run()?;

    // Where to write the accumulated histograms
    let writer = HistogramWriter::builder().filename(outfile.into()).build();
    let components = analysis.into_components();
    writer.write(components.iter().map(|c| (c.name(), c.sink())))?;
    Ok(())
}
