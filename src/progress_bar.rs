pub use crate::traits::Progress;

/// Dummy progress indicator
pub struct NoProgress {}

impl Progress for NoProgress {
    fn inc(&self, _i: u64) {}

    fn finish(&self) {}
}

/// Don't show any progress indicator
pub const NO_PROGRESS: NoProgress = NoProgress {};

enum Bar {
    None,
    Interactive(indicatif::ProgressBar),
    Log(logbar::ProgressBar),
}

/// The default progress bar
///
/// The exact format is decided at run time depending on whether we are
/// writing to an interactive terminal or a non-interactive output.
pub struct ProgressBar {
    bar: Bar,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self { bar: Bar::None }
    }
}

impl ProgressBar {
    /// A new progress bar with the given maximum progress and message
    pub fn new(len: u64, message: &str) -> Self {
        if log::max_level().to_level() != Some(log::Level::Info) {
            return ProgressBar::default();
        }
        let bar = if console::Term::stderr().features().is_attended() {
            let bar = indicatif::ProgressBar::new(len);
            bar.set_style(
                indicatif::ProgressStyle::default_bar()
                    .template("{bar:60.cyan/cyan} {msg} {pos}/{len} [{elapsed}]")
                    .unwrap(),
            );
            bar.set_message(message.to_owned());
            Bar::Interactive(bar)
        } else {
            eprintln!("{}", message);
            let style = logbar::Style::new().indicator('█');
            Bar::Log(logbar::ProgressBar::with_style(len as usize, style))
        };
        // temporarily disable logging to not overwrite the bar
        log::set_max_level(log::LevelFilter::Off);
        ProgressBar { bar }
    }
}

impl Progress for ProgressBar {
    fn inc(&self, i: u64) {
        match &self.bar {
            Bar::None => {}
            Bar::Interactive(bar) => bar.inc(i),
            Bar::Log(bar) => bar.inc(i as usize),
        }
    }

    fn finish(&self) {
        match &self.bar {
            Bar::None => return,
            Bar::Interactive(bar) => bar.finish(),
            Bar::Log(bar) => bar.finish(),
        }
        // restore logging
        log::set_max_level(log::LevelFilter::Info);
    }
}
