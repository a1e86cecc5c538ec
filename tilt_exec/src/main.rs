//! Main tilt compensation executable entry point.
//! 
//! # Architecture
//! 
//! The general execution methodology consists of:
//! 
//!     - Create the session and initialise logging
//!     - Load the parameters, applying any command line overrides
//!     - Load the raw samples
//!     - Correct the whole trajectory for the tilt of the sensor mount
//!     - Archive the corrected records and a summary of the trajectory

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::{WrapErr, eyre}};
use log::{debug, info, warn};
use std::path::PathBuf;
use structopt::StructOpt;

// Internal
use tilt_lib::{
    tilt_corr::{Params, TiltCorr},
    traj_data::{self, TrajSummary},
};
use util::{
    archive::Archiver,
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Correct a recorded trajectory for the tilt of the position sensor mount.
#[derive(Debug, StructOpt)]
#[structopt(name = "tilt_exec")]
struct Opts {
    /// CSV file of samples with `time_s`, `x_mm`, `y_mm`, `roll_deg` and
    /// `pitch_deg` columns
    #[structopt(parse(from_os_str))]
    samples: PathBuf,

    /// Tilt correction parameter file (TOML), defaults are used if not given
    #[structopt(short = "p", long = "params", parse(from_os_str))]
    params: Option<PathBuf>,

    /// Output CSV file, defaults to `arch/corrected.csv` in the session
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    output: Option<PathBuf>,

    /// Override the sensor mount height in millimeters
    #[structopt(long = "height-mm")]
    height_mm: Option<f64>,

    /// Disable re-estimation of previous samples
    #[structopt(long = "no-recalc")]
    no_recalc: bool,

    /// Log at trace level rather than debug
    #[structopt(short = "v", long = "verbose")]
    verbose: bool,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opts = Opts::from_args();

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new(
        "tilt_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    // Initialise logger
    let level = if opts.verbose { LevelFilter::Trace } else { LevelFilter::Debug };
    logger_init(level, &session)
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Tilt Compensation Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", opts);

    // ---- LOAD PARAMETERS ----

    let mut params: Params = match opts.params {
        Some(ref path) => util::params::load(path)
            .wrap_err_with(|| format!("Could not load tilt correction params from {:?}", path))?,
        None => {
            warn!("No parameter file given, using the default parameters");
            Params::default()
        }
    };

    if let Some(height_mm) = opts.height_mm {
        params.height_mm = height_mm;
    }
    if opts.no_recalc {
        params.recalc = false;
    }

    info!(
        "Tilt correction parameters: height {} mm, recalc {}",
        params.height_mm, params.recalc
    );

    // ---- MODULE INIT ----

    let mut tilt_corr = TiltCorr::new(params)
        .wrap_err("Failed to initialise TiltCorr")?;

    // ---- LOAD SAMPLES ----

    let samples = traj_data::load_samples(&opts.samples)
        .wrap_err_with(|| format!("Could not load samples from {:?}", opts.samples))?;

    if samples.len() < 2 {
        warn!("Fewer than two samples loaded, no headings can be estimated");
    }
    info!("Loaded {} samples", samples.len());

    // ---- CORRECTION ----

    tilt_corr.correct(&samples)
        .wrap_err("Failed to correct the trajectory")?;
    let records = tilt_corr.records();

    if tilt_corr.is_awaiting_repeat() {
        warn!("No consecutive samples share the same roll, previous samples were not re-estimated");
    }

    // ---- ARCHIVE ----

    let mut archiver = match opts.output {
        Some(ref path) => Archiver::to_file(path),
        None => Archiver::from_path(&session, "corrected.csv"),
    }.wrap_err("Failed to create the output archive")?;

    let num_written = traj_data::write_records(&mut archiver, records)
        .wrap_err("Failed to write the corrected records")?;
    info!("Wrote {} corrected records to {:?}", num_written, archiver.path());

    if records.is_empty() {
        return Err(eyre!("No samples in {:?}, nothing to summarise", opts.samples));
    }

    let summary = TrajSummary::from_records(records)
        .wrap_err("Failed to summarise the trajectory")?;
    info!("Trajectory summary:\n{:#?}", summary);

    let summary_path = session.save_json("summary.json", &summary)
        .wrap_err("Failed to save the trajectory summary")?;
    info!("Summary saved to {:?}", summary_path);

    info!("End of execution");

    Ok(())
}
