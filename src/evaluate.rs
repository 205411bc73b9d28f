//! Single-pass stat evaluation over a timeline.
//!
//! Both evaluation modes walk the timeline the same way; they differ only in
//! how an interval's growth contribution is produced. The expected-value path
//! is closed form. The stochastic path rolls one Bernoulli trial per level so
//! a future per-level growth modifier slots in without restructuring.

use rand::Rng;

use crate::ProjectionError;
use crate::catalog::Character;
use crate::numbers::round_to_hundredths;
use crate::stats::StatKey;
use crate::timeline::{EventKind, Timeline};

/// Exact expected value of `stat` at the timeline's final level.
///
/// The result is rounded to two decimals, half away from zero. Two calls with
/// identical inputs return bit-identical output.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidTimeline`] when the timeline lacks its
/// two boundary events.
pub fn expected_stat(
    stat: StatKey,
    character: &Character,
    timeline: &Timeline,
) -> Result<f64, ProjectionError> {
    let value = walk(stat, character, timeline, |p, span| p * f64::from(span))?;
    Ok(round_to_hundredths(value))
}

/// One stochastic sample of `stat` at the timeline's final level.
///
/// Each level in an interval rolls an independent trial succeeding with the
/// interval's growth probability, so the interval total is a
/// Binomial(span, p) draw. The sample is integer-valued by construction and
/// returned unrounded.
///
/// # Errors
///
/// Returns [`ProjectionError::InvalidTimeline`] when the timeline lacks its
/// two boundary events.
pub fn sample_stat<R: Rng>(
    stat: StatKey,
    character: &Character,
    timeline: &Timeline,
    rng: &mut R,
) -> Result<f64, ProjectionError> {
    walk(stat, character, timeline, |p, span| {
        let p = p.clamp(0.0, 1.0);
        let mut gained = 0.0;
        for _ in 0..span {
            if rng.gen_bool(p) {
                gained += 1.0;
            }
        }
        gained
    })
}

/// Shared interval walk; `grow` turns (probability, span) into a growth total.
fn walk<F>(
    stat: StatKey,
    character: &Character,
    timeline: &Timeline,
    mut grow: F,
) -> Result<f64, ProjectionError>
where
    F: FnMut(f64, i32) -> f64,
{
    let events = timeline.events();
    if events.len() < 2 {
        return Err(ProjectionError::InvalidTimeline(events.len()));
    }
    let last_class = timeline
        .last_class()
        .ok_or(ProjectionError::InvalidTimeline(events.len()))?;

    // Movement is fixed by the final class, never grown.
    if stat == StatKey::Mv {
        return Ok(f64::from(last_class.movement));
    }

    let mut value = f64::from(character.base_stats.get(stat));

    for pair in events.windows(2) {
        let EventKind::Enter(class) = &pair[0].kind else {
            continue;
        };

        // Entry floor applies even when the interval turns out empty.
        value = value.max(f64::from(class.bases.get(stat)));

        let span = pair[1].level - pair[0].level;
        if span <= 0 {
            continue;
        }

        let growth = 0.01
            * f64::from(character.growths.get(stat) + class.growths.get(stat));
        value += grow(growth, span);
    }

    value += f64::from(last_class.boosts.get(stat));
    Ok(value)
}
