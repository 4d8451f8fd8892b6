use std::path::PathBuf;
use anyhow::{bail, Context};
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let mut args = std::env::args_os().skip(1);
    let Some(job_path) = args.next().map(PathBuf::from) else {
        bail!("usage: eegstack <job.json>");
    };
    if args.next().is_some() {
        bail!("usage: eegstack <job.json>");
    }
    let output = eegstack::run_file(&job_path)
        .with_context(|| format!("running job {}", job_path.display()))?;
    log::info!("figure written to {}", output.display());
    Ok(())
}
