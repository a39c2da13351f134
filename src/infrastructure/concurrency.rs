/// Concurrency management for Wirecraft.
/// Configures the global rayon pool used by the scan fan-out.

use anyhow::Result;

/// Initialize the global rayon thread pool.
/// `jobs` overrides the worker count; the default is every available core,
/// since extraction is the only phase that parallelizes and the tool is a
/// batch run.
pub fn init_thread_pool(jobs: Option<usize>, verbose: bool) -> Result<()> {
    let workers = jobs.unwrap_or_else(num_cpus::get).max(1);

    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build_global()?;

    if verbose {
        println!(
            "[Wirecraft] Initialized thread pool: {} workers (system has {} cores)",
            workers,
            num_cpus::get()
        );
    }

    Ok(())
}
