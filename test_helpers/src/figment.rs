//! Running settings tests inside a [`figment::Jail`].

use anyhow::{Result, anyhow};

/// Runs `f` inside a fresh [`figment::Jail`] and returns its output.
///
/// The jail gives the closure a scratch working directory and restores the
/// environment afterwards, whether or not the closure succeeds.
///
/// # Errors
///
/// Returns an error when the jail cannot be set up or the closure fails.
///
/// # Examples
///
/// ```
/// use test_helpers::figment::with_jail;
///
/// let contents = with_jail(|jail| {
///     jail.create_file(".tn.yaml", "settings:\n  verbose: 1\n")?;
///     jail.set_env("TN_SWEEP_ONLY", "true");
///     Ok(std::fs::read_to_string(".tn.yaml").map_err(|e| e.to_string())?)
/// })?;
/// assert!(contents.contains("verbose"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn with_jail<F, T>(f: F) -> Result<T>
where
    F: FnOnce(&mut figment::Jail) -> figment::error::Result<T>,
{
    let mut output = None;
    figment::Jail::try_with(|jail| {
        output = Some(f(jail)?);
        Ok(())
    })
    .map_err(|err| anyhow!(err.to_string()))?;
    output.ok_or_else(|| anyhow!("jail closure returned no value"))
}
