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

use ninjagen::{exit_code, run, Config, Printer};

const USAGE: &str = "\
usage: ninjagen [options]

Writes a ninja build file for FontDebug using flags from pkg-config.

options:
  -C DIR              change to DIR before doing anything else
  -o FILE             write the build file to FILE [default=build.ninja]
  --pkg-config TOOL   metadata tool to query [default=pkg-config]
  -d MODE             enable debugging (use '-d list' to list modes)
  -v, --verbose       show progress
  -h, --help          print this message
  --version           print ninjagen's version
";

fn parse_args() -> Result<Option<Config>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        print!("{}", USAGE);
        return Ok(None);
    }
    if args.contains("--version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(None);
    }

    let mut config = Config::default();
    config.verbose = args.contains(["-v", "--verbose"]);
    config.execution_dir = args.opt_value_from_str("-C")?;
    if let Some(output) = args.opt_value_from_str("-o")? {
        config.output = output;
    }
    if let Some(tool) = args.opt_value_from_str("--pkg-config")? {
        config.pkg_config = tool;
    }
    while let Some(mode) = args.opt_value_from_str("-d")? {
        config.debug_modes.push(mode);
    }
    args.finish()?;
    Ok(Some(config))
}

fn main() {
    let printer = Printer::new(false);
    let config = match parse_args() {
        Ok(Some(config)) => config,
        Ok(None) => return,
        Err(e) => {
            printer.error(e);
            std::process::exit(2);
        }
    };
    if let Err(e) = run(config) {
        printer.error(&e);
        std::process::exit(exit_code(&e));
    }
}
