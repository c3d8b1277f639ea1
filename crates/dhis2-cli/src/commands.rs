use std::io::{self, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use dhis2_api::{Dhis2Client, ServerConfig};
use dhis2_cli::output::{UidFormat, write_uids};
use dhis2_import::{ImportError, ImportOptions, Pipeline, PipelineReport, WhoSource};
use dhis2_uid::{RandomSource, SeededRandom, ThreadRandom, generate_uids};
use tracing::{debug, info, info_span};

use crate::cli::{SeedArgs, UidArgs};

pub fn run_uid(args: &UidArgs) -> Result<()> {
    let codes = match args.seed {
        Some(seed) => generate(args, SeededRandom::new(seed)),
        None => generate(args, ThreadRandom::new()),
    };
    debug!(count = codes.len(), seeded = args.seed.is_some(), "uids generated");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_uids(&mut out, &codes, UidFormat::from_flags(args.json, args.csv))?;
    out.flush().context("flush stdout")?;
    Ok(())
}

fn generate(args: &UidArgs, mut random: impl RandomSource) -> Vec<dhis2_uid::Uid> {
    generate_uids(args.limit, args.length, &mut random)
}

pub fn run_seed(args: &SeedArgs) -> std::result::Result<PipelineReport, ImportError> {
    let config = ServerConfig::from_path(&args.config)?;
    let seed_span = info_span!("seed", server = %config.server);
    let _guard = seed_span.enter();

    let client = Dhis2Client::new(&config)?;
    let source = WhoSource::new(config.timeout)?;
    let options = ImportOptions {
        organisation_units_file: args.org_units.clone(),
        start: args.from_stage.into(),
        ..ImportOptions::default()
    };
    info!(start = %options.start, "starting import");

    let start = Instant::now();
    let report = Pipeline::new(&client, &source, options).run()?;
    info!(
        stages = report.completed.len(),
        duration_ms = start.elapsed().as_millis(),
        "import complete"
    );
    Ok(report)
}
