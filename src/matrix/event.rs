use super::AssembledRow;

/// Progress of a matrix build, yielded lazily by [`super::RowStream`].
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    /// The first year only warms up the lag features and produces no rows.
    YearSkipped { year: i32 },
    /// A year's driver layers were loaded; `available` of `drivers` have data.
    YearEntered { year: i32, available: usize, drivers: usize },
    Row(AssembledRow),
    /// Every year has been read; `rows` counts rows before filtering.
    Finished { rows: usize },
}

/// Subscriber to build progress, kept outside the assembly loop.
pub trait BuildObserver {
    fn on_event(&mut self, event: &BuildEvent);
}

impl<F: FnMut(&BuildEvent)> BuildObserver for F {
    fn on_event(&mut self, event: &BuildEvent) { self(event) }
}

/// Writes year boundaries and row counts to the `tracing` log.
#[derive(Debug, Default)]
pub struct LogObserver {
    year: Option<i32>,
    rows: usize,
    dropped: usize,
}

impl LogObserver {
    pub fn new() -> Self { Self::default() }

    fn flush_year(&mut self) {
        if let Some(year) = self.year.take() {
            tracing::debug!("year {year}: {} rows, {} dropped for missing values", self.rows, self.dropped);
        }
        self.rows = 0;
        self.dropped = 0;
    }
}

impl BuildObserver for LogObserver {
    fn on_event(&mut self, event: &BuildEvent) {
        match event {
            BuildEvent::YearSkipped { year } => {
                tracing::info!("skipping first year {year} to start up model");
            }
            BuildEvent::YearEntered { year, available, drivers } => {
                self.flush_year();
                self.year = Some(*year);
                tracing::info!("entering year {year}");
                if *available < *drivers {
                    tracing::info!("{} of {drivers} drivers have no data for {year}", drivers - available);
                }
            }
            BuildEvent::Row(row) => {
                self.rows += 1;
                if !row.is_complete() { self.dropped += 1 }
            }
            BuildEvent::Finished { .. } => {
                self.flush_year();
                tracing::info!("all data read");
            }
        }
    }
}
