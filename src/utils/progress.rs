use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

const BAR_TEMPLATE: &str = "{msg:>10} [{bar:40.cyan/blue}] {pos}/{len}";

/// Progress bar for one import phase, drawn on stderr.
pub struct PhaseProgress {
    bar: ProgressBar,
    reported: AtomicUsize,
}

impl PhaseProgress {
    pub fn new(label: &str, total: usize, enabled: bool) -> Self {
        let bar = if enabled {
            let bar = ProgressBar::with_draw_target(Some(total as u64), ProgressDrawTarget::stderr());
            let style = ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> ");
            bar.set_style(style);
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(label.to_string());

        Self {
            bar,
            reported: AtomicUsize::new(0),
        }
    }

    pub fn hidden() -> Self {
        Self::new("", 0, false)
    }

    /// Write an operator line above the bar, or straight to stderr when no
    /// bar is drawn. Independent of the log filter.
    pub fn report(&self, line: &str) {
        if self.bar.is_hidden() {
            eprintln!("{}", line);
        } else {
            self.bar.println(line);
        }
        self.reported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reported(&self) -> usize {
        self.reported.load(Ordering::Relaxed)
    }

    pub fn advance(&self) {
        self.bar.inc(1);
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish();
    }
}
