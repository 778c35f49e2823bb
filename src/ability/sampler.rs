//! Weighted parameter sampling
//!
//! Every integer in `[min, max]` gets weight `max(1, 10 - |v - mode|)`, so
//! values near the mode are most likely while the extremes stay reachable.

use rand::Rng;
use std::collections::BTreeMap;

use super::{AbilityConfig, GeneratedParameter, ParameterSet};
use crate::llm::prompt::Locale;

/// Weight of the mode itself; weights fall off by one per step away from it.
const PEAK_WEIGHT: i128 = 10;

/// Values closer to the mode than this have weight above the floor of 1.
const PEAK_RADIUS: i128 = PEAK_WEIGHT - 2;

fn weight(value: i128, mode: i128) -> i128 {
    (PEAK_WEIGHT - (value - mode).abs()).max(1)
}

/// Draw one value in `[min, max]` biased toward `mode`.
///
/// Bounds are swapped if reversed and `mode` is clamped into range. A
/// single-value range returns that value without touching the RNG.
pub fn sample<R: Rng>(rng: &mut R, min: i64, mode: i64, max: i64) -> i64 {
    let (min, max) = if min > max { (max, min) } else { (min, max) };
    let mode = mode.clamp(min, max);
    if min == max {
        return min;
    }

    let (lo, mode, hi) = (min as i128, mode as i128, max as i128);
    let peak_lo = (mode - PEAK_RADIUS).max(lo);
    let peak_hi = (mode + PEAK_RADIUS).min(hi);

    // Outside the peak every value weighs 1.
    let left_flat = peak_lo - lo;
    let right_flat = hi - peak_hi;
    let peak_total: i128 = (peak_lo..=peak_hi).map(|v| weight(v, mode)).sum();
    let total = left_flat + peak_total + right_flat;
    if total <= 0 {
        return mode as i64;
    }

    let mut draw = rng.gen_range(0.0..total as f64);

    if draw <= left_flat as f64 {
        return (lo + flat_offset(draw).min((left_flat - 1).max(0))) as i64;
    }
    draw -= left_flat as f64;

    let mut cumulative = 0.0;
    for v in peak_lo..=peak_hi {
        cumulative += weight(v, mode) as f64;
        if draw <= cumulative {
            return v as i64;
        }
    }
    draw -= cumulative;

    if right_flat > 0 {
        let offset = flat_offset(draw).min(right_flat - 1);
        return (peak_hi + 1 + offset) as i64;
    }

    mode as i64
}

/// Zero-based index of the first unit-weight slot whose cumulative weight
/// reaches `draw`.
fn flat_offset(draw: f64) -> i128 {
    (draw.ceil() as i128 - 1).max(0)
}

/// Look up the description closest to `value`.
///
/// Keys are scanned in ascending order and the first minimal distance wins,
/// so a tie resolves to the smaller key.
pub fn describe(value: i64, descriptions: &BTreeMap<i64, String>, locale: Locale) -> String {
    let closest = descriptions
        .iter()
        .min_by_key(|(key, _)| (**key as i128 - value as i128).abs());

    match closest {
        Some((_, text)) => text.clone(),
        None => locale.value_label(value),
    }
}

/// Sample every parameter declared by an ability configuration
pub fn generate_parameters<R: Rng>(rng: &mut R, config: &AbilityConfig, locale: Locale) -> ParameterSet {
    let mut generated = ParameterSet::with_capacity(config.parameters.len());

    for (name, param) in &config.parameters {
        let bounds = param.normalize();
        let descriptions = param.description_table();
        let value = sample(rng, bounds.min, bounds.mode, bounds.max);
        log::debug!(
            "Sampled {}={} from {}..{} (mode {})",
            name,
            value,
            bounds.min,
            bounds.max,
            bounds.mode
        );

        generated.insert(
            name.clone(),
            GeneratedParameter {
                value,
                description: describe(value, &descriptions, locale),
                raw_config: param.clone(),
            },
        );
    }

    generated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::ParameterConfig;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn table(entries: &[(i64, &str)]) -> BTreeMap<i64, String> {
        entries.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_sample_degenerate_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(sample(&mut rng, 5, 5, 5), 5);
        }
    }

    #[test]
    fn test_sample_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for (min, mode, max) in [(0, 0, 3), (0, 50, 100), (-20, -18, 40), (1, 30, 30), (-3, 0, 3)] {
            for _ in 0..2000 {
                let v = sample(&mut rng, min, mode, max);
                assert!(v >= min && v <= max, "{} outside {}..{}", v, min, max);
            }
        }
    }

    #[test]
    fn test_sample_reaches_extremes() {
        let mut rng = StdRng::seed_from_u64(11);
        let draws: Vec<i64> = (0..20_000).map(|_| sample(&mut rng, 0, 50, 100)).collect();
        assert!(draws.contains(&0));
        assert!(draws.contains(&100));
    }

    #[test]
    fn test_sample_empirical_mode() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut counts = BTreeMap::new();
        for _ in 0..50_000 {
            *counts.entry(sample(&mut rng, 0, 12, 30)).or_insert(0u32) += 1;
        }
        let (peak, _) = counts.iter().max_by_key(|(_, c)| **c).unwrap();
        assert!((11..=13).contains(peak), "peak at {}", peak);
    }

    #[test]
    fn test_sample_swapped_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..500 {
            let v = sample(&mut rng, 10, 4, 0);
            assert!((0..=10).contains(&v));
        }
    }

    #[test]
    fn test_sample_wide_range() {
        let mut rng = StdRng::seed_from_u64(9);
        let draws: Vec<i64> = (0..1000).map(|_| sample(&mut rng, i64::MIN, 0, i64::MAX)).collect();
        // Nearly all weight sits in the flat tails, so both signs show up.
        assert!(draws.iter().any(|v| *v < -1_000_000));
        assert!(draws.iter().any(|v| *v > 1_000_000));

        let draws: Vec<i64> = (0..1000)
            .map(|_| sample(&mut rng, 0, 500_000_000, 1_000_000_000))
            .collect();
        assert!(draws.iter().all(|v| (0..=1_000_000_000).contains(v)));
        assert!(draws.iter().any(|v| *v < 250_000_000));
        assert!(draws.iter().any(|v| *v > 750_000_000));
    }

    #[test]
    fn test_sample_is_reproducible_with_seed() {
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        let a: Vec<i64> = (0..50).map(|_| sample(&mut rng1, 0, 5, 20)).collect();
        let b: Vec<i64> = (0..50).map(|_| sample(&mut rng2, 0, 5, 20)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_describe_empty_table() {
        assert_eq!(describe(17, &BTreeMap::new(), Locale::En), "Value: 17");
        assert_eq!(describe(-2, &BTreeMap::new(), Locale::En), "Value: -2");
    }

    #[test]
    fn test_describe_nearest_key() {
        let descriptions = table(&[(0, "low"), (10, "high")]);
        assert_eq!(describe(7, &descriptions, Locale::En), "high");
        assert_eq!(describe(2, &descriptions, Locale::En), "low");
        assert_eq!(describe(50, &descriptions, Locale::En), "high");
    }

    #[test]
    fn test_describe_tie_prefers_smaller_key() {
        let descriptions = table(&[(10, "high"), (0, "low")]);
        assert_eq!(describe(5, &descriptions, Locale::En), "low");
    }

    #[test]
    fn test_generate_parameters_in_declaration_order() {
        let config = AbilityConfig::default()
            .with_parameter("range", ParameterConfig::new(3, None, 3).with_description(3, "short"))
            .with_parameter("damage", ParameterConfig::new(8, Some(8), 8));
        let mut rng = StdRng::seed_from_u64(1);

        let params = generate_parameters(&mut rng, &config, Locale::En);

        let names: Vec<_> = params.keys().cloned().collect();
        assert_eq!(names, vec!["range", "damage"]);
        assert_eq!(params["range"].value, 3);
        assert_eq!(params["range"].description, "short");
        assert_eq!(params["damage"].description, "Value: 8");
        assert_eq!(params["damage"].raw_config, config.parameters["damage"]);
    }
}
