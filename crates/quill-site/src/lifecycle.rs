//! Plugin lifecycle orchestration.
//!
//! A build moves through three linear phases: setup, build, render. Within
//! one phase every plugin hook is invoked concurrently and independently
//! timed; the phase completes only when all invocations have settled.
//! Reporting is deterministic regardless of execution interleaving: core
//! plugins first, lexicographically, then the rest, lexicographically.

use std::time::Instant;

use rayon::prelude::*;

use crate::error::BuildError;
use crate::plugin::{CORE_PREFIX, Fragments, HookOutcome, Plugin, PluginError};

/// One lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Before any content is generated or discovered.
    Setup,
    /// After pages are resolved, before rendering.
    Build,
    /// Final phase, receives the resolved pages and sitemap.
    Render,
}

impl Phase {
    /// Phase name as logged.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Build => "build",
            Self::Render => "render",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timing for one plugin hook that ran.
#[derive(Debug, Clone)]
pub struct PluginTiming {
    /// Plugin name.
    pub plugin: String,
    /// Hook wall time in milliseconds.
    pub elapsed_ms: f64,
}

/// What one phase produced.
#[derive(Debug, Default)]
pub struct PhaseOutput {
    /// Fragments concatenated in reporting order.
    pub fragments: Fragments,
    /// Timings of the hooks that ran, in reporting order.
    pub timings: Vec<PluginTiming>,
}

/// Convert elapsed time since `start` to milliseconds as f64.
pub(crate) fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

struct SettledHook {
    plugin: String,
    elapsed_ms: f64,
    result: Result<HookOutcome, PluginError>,
}

/// Run one phase across all plugins.
///
/// `invoke` selects the hook matching the phase. All hooks run
/// concurrently; after they settle, ran hooks are logged and their
/// fragments concatenated in reporting order. Hooks answering
/// [`HookOutcome::Skipped`] are silently ignored.
///
/// # Errors
///
/// The first failed hook in reporting order aborts the phase with
/// [`BuildError::Plugin`].
pub fn run_phase<F>(
    phase: Phase,
    plugins: &[Box<dyn Plugin>],
    invoke: F,
) -> Result<PhaseOutput, BuildError>
where
    F: Fn(&dyn Plugin) -> Result<HookOutcome, PluginError> + Sync,
{
    let mut settled: Vec<SettledHook> = plugins
        .par_iter()
        .map(|plugin| {
            let start = Instant::now();
            let result = invoke(plugin.as_ref());
            SettledHook {
                plugin: plugin.name().to_owned(),
                elapsed_ms: elapsed_ms(start),
                result,
            }
        })
        .collect();

    settled.sort_by(|a, b| {
        let a_key = (!a.plugin.starts_with(CORE_PREFIX), a.plugin.as_str());
        let b_key = (!b.plugin.starts_with(CORE_PREFIX), b.plugin.as_str());
        a_key.cmp(&b_key)
    });

    let mut output = PhaseOutput::default();
    for hook in settled {
        match hook.result {
            Ok(HookOutcome::Skipped) => {}
            Ok(HookOutcome::Ran(fragments)) => {
                tracing::debug!(
                    phase = %phase,
                    plugin = %hook.plugin,
                    elapsed_ms = hook.elapsed_ms,
                    "Plugin hook finished"
                );
                output.fragments.extend(fragments);
                output.timings.push(PluginTiming {
                    plugin: hook.plugin,
                    elapsed_ms: hook.elapsed_ms,
                });
            }
            Err(source) => {
                return Err(BuildError::Plugin {
                    phase,
                    plugin: hook.plugin,
                    source,
                });
            }
        }
    }

    Ok(output)
}
