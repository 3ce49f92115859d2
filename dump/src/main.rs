//! A CLI tool for inspecting the contents of a DICOM file
//! by printing it in a human readable format,
//! followed by a summary of one of its decoded image frames.
use clap::Parser;
use dicom_lite_dump::{dump_frame_to, ColorMode, DumpOptions};
use dicom_lite_object::{OpenFileOptions, ReadPreamble};
use snafu::{Report, ResultExt, Whatever};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::Level;

/// Exit code for when an error emerged while reading the DICOM file.
const ERROR_READ: i32 = -2;
/// Exit code for when an error emerged while dumping the file.
const ERROR_PRINT: i32 = -3;
/// Exit code for when the pixel data could not be decoded.
const ERROR_DECODE: i32 = -4;

/// Dump the contents of a DICOM file and decode one of its frames
#[derive(Debug, Parser)]
#[command(version)]
struct App {
    /// The DICOM file to read
    file: PathBuf,
    /// The index of the frame to decode
    #[arg(short = 'f', long = "frame", default_value = "0")]
    frame: u32,
    /// Print more information about the decoding process
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
    /// Read the file without the 128-byte preamble
    #[arg(long = "no-preamble")]
    no_preamble: bool,
    /// The number of nested sequence levels to print
    /// (all levels by default)
    #[arg(long = "max-depth")]
    max_depth: Option<u32>,
    /// The number of decoded samples to print
    #[arg(long = "pixels", default_value = "0")]
    pixels: usize,
    /// Print text values to the end
    /// (limited to `width` by default)
    #[arg(long = "no-text-limit")]
    no_text_limit: bool,
    /// The width of the display
    /// (default is to check automatically)
    #[arg(short = 'w', long = "width")]
    width: Option<u32>,
    /// The color mode
    #[arg(long = "color", default_value = "auto")]
    color: ColorMode,
}

fn main() {
    run().unwrap_or_else(|e| {
        eprintln!("{}", Report::from_error(e));
        std::process::exit(ERROR_READ);
    });
}

fn run() -> Result<(), Whatever> {
    let App {
        file,
        frame,
        verbose,
        no_preamble,
        max_depth,
        pixels,
        no_text_limit,
        width,
        color,
    } = App::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(if verbose { Level::DEBUG } else { Level::INFO })
            .with_writer(std::io::stderr)
            .finish(),
    )
    .whatever_context("Could not set up global logging subscriber")
    .unwrap_or_else(|e: Whatever| {
        eprintln!("[ERROR] {}", Report::from_error(e));
    });

    let read_preamble = if no_preamble {
        ReadPreamble::Never
    } else {
        ReadPreamble::Always
    };

    let obj = match OpenFileOptions::new()
        .read_preamble(read_preamble)
        .open_file(&file)
    {
        Ok(obj) => obj,
        Err(e) => {
            report_error(&dicom_lite_pixeldata::Error::ReadFile { source: e });
            std::process::exit(ERROR_READ);
        }
    };

    let mut options = DumpOptions::new();
    options.no_text_limit(no_text_limit).color_mode(color);
    if let Some(width) = width {
        options.width(width);
    }
    if let Some(max_depth) = max_depth {
        options.max_depth(max_depth);
    }

    println!("{}: ", file.display());
    if let Err(ref e) = options.dump_file(&obj) {
        if e.kind() == ErrorKind::BrokenPipe {
            // handle broken pipe separately with a no-op
            return Ok(());
        }
        eprintln!("[ERROR] {}", Report::from_error(e));
        std::process::exit(ERROR_PRINT);
    }
    println!();

    match dicom_lite_pixeldata::decode_object(&obj, frame) {
        Ok(image) => {
            dump_frame_to(std::io::stdout(), frame, &image, pixels)
                .whatever_context("Could not print frame summary")?;
            Ok(())
        }
        Err(e) => {
            report_error(&e);
            std::process::exit(ERROR_DECODE);
        }
    }
}

fn report_error(e: &dicom_lite_pixeldata::Error) {
    eprintln!("[ERROR] {}", Report::from_error(e));
    if let Some(suggestion) = e.recovery_suggestion() {
        eprintln!("Suggestion: {}", suggestion);
    }
}
