/*
 * Copyright 2020 Nikhil Marathe <nsm.nikhil@gmail.com>
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Wall-clock timers for the stages of a generator run.
//!
//! A stage is timed by holding a [`ScopedMetric`] for its duration, usually through
//! [`scoped_metric!`]. Nothing is recorded unless [`enable`] was called first.

use once_cell::sync::Lazy;
use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard,
    },
    time::{Duration, Instant},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub name: &'static str,
    pub count: usize,
    pub total: Duration,
}

impl Stage {
    fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::default()
        } else {
            self.total.div_f64(self.count as f64)
        }
    }
}

/// Stages in the order they were first entered.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    stages: Vec<Stage>,
}

impl Report {
    pub fn record(&mut self, name: &'static str, elapsed: Duration) {
        match self.stages.iter_mut().find(|s| s.name == name) {
            Some(stage) => {
                stage.count += 1;
                stage.total += elapsed;
            }
            None => self.stages.push(Stage {
                name,
                count: 1,
                total: elapsed,
            }),
        }
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .stages
            .iter()
            .map(|s| s.name.len())
            .max()
            .unwrap_or(0)
            .max("stage".len());
        writeln!(
            f,
            "{:name_width$} {:>6} {:>10} {:>10}",
            "stage",
            "count",
            "avg (ms)",
            "total (ms)",
            name_width = name_width
        )?;
        for stage in &self.stages {
            writeln!(
                f,
                "{:name_width$} {:>6} {:>10.3} {:>10.3}",
                stage.name,
                stage.count,
                stage.average().as_secs_f64() * 1000.0,
                stage.total.as_secs_f64() * 1000.0,
                name_width = name_width
            )?;
        }
        Ok(())
    }
}

static ENABLED: AtomicBool = AtomicBool::new(false);
static REPORT: Lazy<Mutex<Report>> = Lazy::new(|| Mutex::new(Report::default()));

fn global() -> MutexGuard<'static, Report> {
    // A panic while holding the lock leaves the report usable.
    REPORT.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct ScopedMetric {
    name: &'static str,
    start: Instant,
}

impl ScopedMetric {
    /// Starts timing `name`, or returns `None` when metrics are disabled.
    pub fn start(name: &'static str) -> Option<Self> {
        if is_enabled() {
            Some(ScopedMetric {
                name,
                start: Instant::now(),
            })
        } else {
            None
        }
    }
}

impl Drop for ScopedMetric {
    fn drop(&mut self) {
        global().record(self.name, self.start.elapsed());
    }
}

/// Times the rest of the enclosing scope under the given stage name.
#[macro_export]
macro_rules! scoped_metric {
    ($name:literal) => {
        let _scoped_metric = $crate::ScopedMetric::start($name);
    };
}

pub fn enable() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// A copy of everything recorded so far.
pub fn report() -> Report {
    global().clone()
}

pub fn dump() {
    eprint!("{}", report());
}
