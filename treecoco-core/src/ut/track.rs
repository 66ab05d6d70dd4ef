// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use chrono;
use colored::*;
use kdam::{Bar, BarExt, tqdm};

/// Receives fraction-complete updates after each unit of work
///
/// Implemented for any `FnMut(completed, total)` closure so drivers can
/// forward updates wherever they need them.
pub trait Progress {
    fn update(&mut self, completed: usize, total: usize);
}

impl<F> Progress for F
where
    F: FnMut(usize, usize),
{
    fn update(&mut self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// A progress sink that discards every update
pub struct Silent;

impl Progress for Silent {
    fn update(&mut self, _completed: usize, _total: usize) {}
}

/// A terminal progress bar that follows the reported totals
pub struct ProgressBar {
    bar: Bar,
    verbose: bool,
}

impl ProgressBar {
    pub fn new(desc: &str, verbose: bool) -> Self {
        ProgressBar {
            bar: progress_bar(0, desc, verbose),
            verbose,
        }
    }
}

impl Progress for ProgressBar {
    fn update(&mut self, completed: usize, total: usize) {
        if !self.verbose {
            return;
        }

        self.bar.total = total;
        // A failed terminal write only loses the bar, never the run
        let _ = self.bar.update_to(completed);

        if completed == total {
            eprintln!();
        }
    }
}

/// A basic progress bar for tracking iterations
pub fn progress_bar(n: usize, desc: &str, verbose: bool) -> Bar {
    if !verbose {
        return tqdm!(disable = true);
    }

    tqdm!(
        total = n,
        force_refresh = false,
        desc = progress_timestamp(desc),
        bar_format =
            "{desc suffix=' '}[{percentage:.0}%] ({rate:.1}/s, eta: {remaining human=true})"
    )
}

/// A progress bar with a standardized timestamp for tracking time
pub fn progress_timestamp(desc: &str) -> String {
    let time = chrono::Local::now();
    let ymd = time.format("%Y-%m-%d").to_string();
    let hms = time.format("%H:%M:%S").to_string();
    let time = format!("{} | {}", ymd, hms);

    format!(
        "{} {} {} {} {} {}",
        "[".bold(),
        time,
        "|".bold(),
        "treecoco".truecolor(103, 194, 69).bold(),
        "]".bold(),
        desc,
    )
}

/// Print timestamped statements to console
pub fn progress_log(desc: &str, verbose: bool) {
    if !verbose {
        return;
    }

    println!("{}", progress_timestamp(desc));
}

/// Print timestamped warnings to stderr
pub fn progress_warn(desc: &str) {
    eprintln!("{} {}", progress_timestamp(&"WARNING:".yellow().bold().to_string()), desc);
}

/// Format numbers to readable thousands format
///
/// # Examples
///
/// ```
/// use treecoco_core::ut::track::thousands_format;
///
/// assert_eq!(thousands_format(589824), "589,824");
/// assert_eq!(thousands_format(1200), "1200");
/// ```
pub fn thousands_format<T>(number: T) -> String
where
    T: std::fmt::Display,
{
    let number = number.to_string();
    if number.len() > 4 {
        number
            .as_bytes()
            .rchunks(3)
            .rev()
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<String>>()
            .join(",")
    } else {
        number
    }
}
