//! Progress bar utilities for CLI output
//!
//! This module provides progress tracking for multi-file imports along
//! with the console output helpers the command handlers share.
//!
//! Key features:
//! - Progress bars that suspend cleanly when logging
//! - Consistent visual styling across all operations

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

// ============================================================================
// Styles - Consistent visual appearance
// ============================================================================

/// Get the progress bar style for import operations
fn progress_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  {spinner:.green} [{bar:40.cyan/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap()
        .progress_chars("━━╾─")
}

/// Get the style for completed progress bars
fn completed_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("  ✓ [{bar:40.green/dim}] {pos}/{len} ({percent}%) {msg}")
        .unwrap()
        .progress_chars("━━━")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

// ============================================================================
// Import progress tracker
// ============================================================================

/// Progress tracker for multi-file import operations
pub struct ImportProgress {
    progress_bar: ProgressBar,
    start_time: Instant,
    bytes_processed: AtomicUsize,
    current_file: Mutex<String>,
}

impl ImportProgress {
    /// Create a new import progress tracker
    pub fn new(total_files: u64) -> Self {
        let progress_bar = ProgressBar::new(total_files);
        progress_bar.set_style(progress_bar_style());
        progress_bar.enable_steady_tick(Duration::from_millis(100));
        progress_bar.set_message("Starting...");

        Self {
            progress_bar,
            start_time: Instant::now(),
            bytes_processed: AtomicUsize::new(0),
            current_file: Mutex::new(String::new()),
        }
    }

    /// Update progress for an imported file
    pub fn file_completed(&self, filename: &str, bytes: u64) {
        self.bytes_processed
            .fetch_add(bytes as usize, Ordering::Relaxed);
        if let Ok(mut current) = self.current_file.lock() {
            *current = filename.to_string();
        }
        self.progress_bar.inc(1);
        self.update_message();
    }

    /// Update progress for a file that could not be imported
    pub fn file_failed(&self, _filename: &str) {
        self.progress_bar.inc(1);
        self.update_message();
    }

    /// Update the progress message
    fn update_message(&self) {
        let bytes = self.bytes_processed.load(Ordering::Relaxed);
        let elapsed = self.start_time.elapsed().as_secs_f64();
        let rate = if elapsed > 0.0 {
            bytes as f64 / elapsed / 1024.0 / 1024.0
        } else {
            0.0
        };

        self.progress_bar.set_message(format!("{:.1} MB/s", rate));
    }

    /// Log a message while suspending the progress display
    pub fn log(&self, msg: &str) {
        self.progress_bar.suspend(|| {
            println!("  {}", msg);
        });
    }

    /// Log a warning message
    pub fn log_warning(&self, msg: &str) {
        self.progress_bar.suspend(|| {
            println!("  ⚠ {}", msg);
        });
    }

    /// Bytes written through the gallery so far
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed.load(Ordering::Relaxed) as u64
    }

    /// Finish the progress display
    pub fn finish(&self) {
        self.progress_bar.set_style(completed_style());
        let elapsed = self.start_time.elapsed();
        let bytes = self.bytes_processed.load(Ordering::Relaxed);
        self.progress_bar.finish_with_message(format!(
            "Complete ({} in {:.1}s)",
            format_bytes(bytes as u64),
            elapsed.as_secs_f64()
        ));
    }

    /// Finish with an error
    pub fn finish_with_error(&self, msg: &str) {
        self.progress_bar.abandon_with_message(format!("✗ {}", msg));
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format duration as human-readable string
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        format!("{}h {}m", hours, mins)
    } else if secs >= 60 {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{}m {}s", mins, secs)
    } else {
        format!("{:.1}s", duration.as_secs_f64())
    }
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        // Write to console
        let _ = self.console.write(buf);
        // Write to file
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================
