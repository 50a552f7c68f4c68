#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::type_complexity)]

/*
 * RANGE2RINEX converts NovAtel RANGEA logs to RINEX observations.
 * This program is shipped under Mozilla Public V2 license.
 */

extern crate gnss_rs as gnss;

use env_logger::{Builder, Target};

use log::{debug, error, info};

use std::io::BufWriter;

use hifitime::prelude::{Epoch, TimeScale};

mod cli;
mod collecter;
mod crc;
mod device;
mod error;
mod range;
mod runtime;
mod status;
mod utils;

use crate::{
    cli::Cli,
    collecter::{Collecter, fd::FileDescriptor},
    device::Device,
    error::ParsingError,
    range::Parser,
    runtime::Runtime,
};

pub fn main() {
    let mut builder = Builder::from_default_env();

    // stdout may carry the RINEX content
    builder
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();

    let t_utc = Epoch::now()
        .unwrap_or_else(|e| panic!("Failed to determine system time: {}", e))
        .to_time_scale(TimeScale::UTC);

    // cli
    let cli = Cli::new();

    // Input interface
    let user_files = cli.filepaths();

    let device = if user_files.is_empty() {
        info!("{} - reading standard input", t_utc);
        Device::stdin()
    } else {
        let mut device = Device::open_file(user_files[0])
            .unwrap_or_else(|e| panic!("Failed to open {}: {}", user_files[0], e));

        for fullpath in user_files.iter().skip(1) {
            device
                .stack_file(fullpath)
                .unwrap_or_else(|e| panic!("Failed to open {}: {}", fullpath, e));
        }

        device
    };

    let parser = Parser::new(cli.range_settings());
    debug!("{} - signal selection: {:?}", t_utc, parser.settings());
    let settings = cli.rinex_settings();

    let mut rtm = Runtime::new();
    let mut collecter = Collecter::new();

    for line in device {
        rtm.new_line();

        match parser.parse(&line) {
            Ok(Some(epoch)) => {
                rtm.new_epoch(&epoch);
                collecter.add(Some(epoch));
            },
            Ok(None) => {},
            Err(ParsingError::ChecksumMismatch) => {
                rtm.new_error(&ParsingError::ChecksumMismatch);
                error!("line #{} - checksum mismatch: message dropped", rtm.lines);
            },
            Err(e) => {
                rtm.new_error(&e);
                debug!("line #{} - malformed message: {}", rtm.lines, e);
            },
        }
    }

    info!("{} - consumed all content", t_utc);
    rtm.summary();

    let Some(t0) = collecter.first_epoch() else {
        error!("no RANGEA message collected: nothing to write");
        std::process::exit(1);
    };

    let fd = if let Some(filename) = settings.filename(t0) {
        info!("{} - generating \"{}\"", t0, filename);
        FileDescriptor::new(settings.gzip, &filename)
            .unwrap_or_else(|e| panic!("Failed to open \"{}\": {}", filename, e))
    } else if let Some(filename) = cli.output() {
        info!("{} - generating \"{}\"", t0, filename);
        FileDescriptor::new(settings.gzip, filename)
            .unwrap_or_else(|e| panic!("Failed to open \"{}\": {}", filename, e))
    } else {
        FileDescriptor::stdout()
    };

    let mut w = BufWriter::new(fd);

    if let Err(e) = collecter.format(&mut w, &settings, t_utc) {
        error!("RINEX formatting error: {}", e);
        std::process::exit(1);
    }

    let finalized = w
        .into_inner()
        .map_err(|e| e.into_error())
        .and_then(|fd| fd.finish());

    match finalized {
        Ok(_) => info!(
            "{} epochs, {} satellites, {} observations released",
            collecter.epochs().len(),
            collecter.satellites().len(),
            collecter.total_observations()
        ),
        Err(e) => {
            error!("I/O error: {}", e);
            std::process::exit(1);
        },
    }
}
