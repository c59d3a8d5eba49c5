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

use std::fmt::Display;

use console::{style, Term};

/// Progress and error lines on stderr. Progress is only shown when verbose.
pub struct Printer {
    term: Term,
    verbose: bool,
}

impl Printer {
    pub fn new(verbose: bool) -> Self {
        Printer {
            term: Term::stderr(),
            verbose,
        }
    }

    pub fn status<D: Display>(&self, message: D) {
        if self.verbose {
            // Nowhere left to report a failing stderr.
            let _ = self.term.write_line(&format!(
                "{} {}",
                style("ninjagen:").dim().for_stderr(),
                message
            ));
        }
    }

    /// Always shown, whatever the verbosity.
    pub fn warning<D: Display>(&self, message: D) {
        let _ = self.term.write_line(&format!(
            "{} {}",
            style("ninjagen: warning:").yellow().for_stderr(),
            message
        ));
    }

    /// Prints `err` with its whole cause chain.
    pub fn error<D: Display>(&self, err: D) {
        let _ = self.term.write_line(&format!(
            "{} {:#}",
            style("ninjagen: error:").red().bold().for_stderr(),
            err
        ));
    }
}
