//! Card-level progress reporting for the predict stage.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress over the cards of one predict run.
///
/// Holds no bar at all when progress is disabled or there is nothing to
/// count, so call sites never branch on quiet mode themselves.
pub struct CardProgress {
    bar: Option<ProgressBar>,
}

impl CardProgress {
    /// Create a bar over `total` cards, or a silent one when disabled.
    pub fn new(total: usize, enabled: bool) -> Self {
        if !enabled || total == 0 {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:36.green/white}] {pos}/{len} cards ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        Self { bar: Some(bar) }
    }

    /// Mark one card done.
    pub fn advance(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Stop the bar, leaving `message` on the finished line.
    pub fn finish(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(message.to_string());
        }
    }
}
