use tracing::debug;

use crate::{
    error::{GenError, Result},
    model::cores::{CoreSelection, CoreSet},
};

/// Used when the user accepts the core-range prompt without typing.
pub const DEFAULT_CORE_RANGE: &str = "120-140";

const TASKSET: &str = "/usr/bin/taskset";

/// Empty input yields `default`; otherwise the text must be all digits.
pub fn validate_number(raw: &str, default: u64) -> Result<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }
    if !is_digits(raw) {
        return Err(GenError::InvalidInput(raw.to_string()));
    }
    raw.parse::<u64>()
        .map_err(|_| GenError::InvalidInput(raw.to_string()))
}

/// Frequencies, intervals and durations must be at least 1.
pub fn require_positive(value: u64, field: &str) -> Result<u64> {
    if value == 0 {
        return Err(GenError::InvalidInput(format!("{field} must be above 0")));
    }
    Ok(value)
}

/// Parses `N` or `L-R` against the host core set.
///
/// A bare number is taken as a single core and is not checked against
/// `cores`; only `L-R` ranges are bounds-checked.
pub fn validate_core_range(raw: &str, cores: &CoreSet) -> Result<CoreSelection> {
    let mut raw = raw.trim();
    if raw.is_empty() {
        raw = DEFAULT_CORE_RANGE;
    }

    if is_digits(raw) {
        let core = raw
            .parse::<u32>()
            .map_err(|_| GenError::range(format!("core index {raw} is too large")))?;
        return Ok(CoreSelection::Single(core));
    }

    let parts: Vec<&str> = raw.split('-').collect();
    let [l, r] = parts.as_slice() else {
        return Err(GenError::range(format!("{raw:?} is not split by '-'")));
    };
    let (l, r) = (l.trim(), r.trim());
    if !is_digits(l) || !is_digits(r) {
        return Err(GenError::range(format!("non-digit char detected in {raw:?}")));
    }

    let (Ok(low), Ok(high)) = (l.parse::<u32>(), r.parse::<u32>()) else {
        return Err(GenError::range(format!("{raw:?} is out of bounds")));
    };
    if low < cores.min() || high > cores.max() {
        return Err(GenError::range(format!(
            "{low}-{high} is outside available cores {}-{}",
            cores.min(),
            cores.max()
        )));
    }
    if low >= high {
        return Err(GenError::range(format!(
            "lower bound {low} must be below upper bound {high}"
        )));
    }

    Ok(CoreSelection::Range { low, high })
}

pub fn validate_command(raw: &str) -> Result<String> {
    let command = raw.trim();
    if command.is_empty() {
        return Err(GenError::MissingCommand);
    }
    Ok(command.to_string())
}

/// Matches `raw` against `choices` by name (case-insensitive) or 1-based
/// index. Empty input picks `default`.
pub fn validate_choice<'a>(raw: &str, choices: &[&'a str], default: &'a str) -> Result<&'a str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(default);
    }

    if let Some(choice) = choices.iter().copied().find(|c| c.eq_ignore_ascii_case(raw)) {
        return Ok(choice);
    }

    if is_digits(raw)
        && let Ok(idx) = raw.parse::<usize>()
        && (1..=choices.len()).contains(&idx)
    {
        return Ok(choices[idx - 1]);
    }

    Err(GenError::InvalidChoice {
        got: raw.to_string(),
        expected: choices.join(", "),
    })
}

/// Applies the taskset prefix when affinity is requested. The range is
/// only parsed when `use_taskset` is set.
pub fn build_command(
    use_taskset: bool,
    core_range: &str,
    command: &str,
    cores: &CoreSet,
) -> Result<String> {
    if !use_taskset {
        return Ok(command.to_string());
    }

    let selection = validate_core_range(core_range, cores)?;
    Ok(pin_command(&selection, command))
}

/// Wraps `command` so it only runs on the selected cores.
pub fn pin_command(selection: &CoreSelection, command: &str) -> String {
    let composed = format!("{TASKSET} -c {} {command}", selection.cpu_list());
    debug!(%composed, "pinned workload");
    composed
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cores() -> CoreSet {
        CoreSet::span(0, 7)
    }

    #[test]
    fn number_uses_default_on_empty() {
        assert_eq!(validate_number("", 999).unwrap(), 999);
        assert_eq!(validate_number("   ", 42).unwrap(), 42);
    }

    #[test]
    fn number_parses_digits() {
        assert_eq!(validate_number("1000", 1).unwrap(), 1000);
        assert_eq!(validate_number(" 0 ", 1).unwrap(), 0);
    }

    #[test]
    fn number_rejects_non_digits() {
        for raw in ["-1", "1.5", "abc", "12a", "+3"] {
            assert!(
                matches!(validate_number(raw, 1), Err(GenError::InvalidInput(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn number_rejects_overflow() {
        let raw = "99999999999999999999999";
        assert!(matches!(validate_number(raw, 1), Err(GenError::InvalidInput(_))));
    }

    #[test]
    fn zero_is_not_positive() {
        assert_eq!(require_positive(1, "freq_record").unwrap(), 1);
        let err = require_positive(0, "freq_record").unwrap_err();
        assert!(matches!(err, GenError::InvalidInput(_)));
        assert!(err.to_string().contains("freq_record"), "{err}");
    }

    #[test]
    fn range_expands_inclusive() {
        let sel = validate_core_range("2-4", &cores()).unwrap();
        assert_eq!(sel, CoreSelection::Range { low: 2, high: 4 });
        assert_eq!(sel.cores(), vec![2, 3, 4]);
    }

    #[test]
    fn range_allows_whitespace_around_bounds() {
        let sel = validate_core_range(" 0 - 7 ", &cores()).unwrap();
        assert_eq!(sel.cores(), (0..=7).collect::<Vec<_>>());
    }

    #[test]
    fn range_single_core_is_permissive() {
        assert_eq!(
            validate_core_range("5", &cores()).unwrap(),
            CoreSelection::Single(5)
        );
        // Not checked against the host core set.
        assert_eq!(
            validate_core_range("64", &cores()).unwrap(),
            CoreSelection::Single(64)
        );
    }

    #[test]
    fn range_rejects_bad_input() {
        for raw in ["4-2", "3-3", "0-8", "a-b", "1-2-3", "invalid_range", "1,2"] {
            assert!(
                matches!(validate_core_range(raw, &cores()), Err(GenError::InvalidRange(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn range_rejects_low_below_min_core() {
        let set = CoreSet::span(4, 15);
        assert!(validate_core_range("2-8", &set).is_err());
        assert!(validate_core_range("4-15", &set).is_ok());
    }

    #[test]
    fn empty_range_falls_back_to_default() {
        let big = CoreSet::span(0, 191);
        let sel = validate_core_range("", &big).unwrap();
        assert_eq!(sel, CoreSelection::Range { low: 120, high: 140 });

        // Default still has to fit the host.
        assert!(validate_core_range("", &cores()).is_err());
    }

    #[test]
    fn command_must_not_be_blank() {
        assert_eq!(validate_command("  ./bench --fast ").unwrap(), "./bench --fast");
        assert!(matches!(validate_command("   "), Err(GenError::MissingCommand)));
    }

    #[test]
    fn choice_by_name_index_or_default() {
        let choices = ["Yes", "No"];
        assert_eq!(validate_choice("yes", &choices, "No").unwrap(), "Yes");
        assert_eq!(validate_choice("2", &choices, "Yes").unwrap(), "No");
        assert_eq!(validate_choice("", &choices, "No").unwrap(), "No");
        assert!(matches!(
            validate_choice("maybe", &choices, "No"),
            Err(GenError::InvalidChoice { .. })
        ));
        assert!(validate_choice("3", &choices, "No").is_err());
    }

    #[test]
    fn build_command_without_taskset() {
        let cmd = build_command(false, "0-7", "echo test", &cores()).unwrap();
        assert_eq!(cmd, "echo test");
    }

    #[test]
    fn build_command_ignores_range_when_disabled() {
        let cmd = build_command(false, "invalid_range", "echo test", &cores()).unwrap();
        assert_eq!(cmd, "echo test");
    }

    #[test]
    fn build_command_invalid_core_range() {
        let err = build_command(true, "invalid_range", "echo test", &cores()).unwrap_err();
        assert!(matches!(err, GenError::InvalidRange(_)));
    }

    #[test]
    fn build_command_pins_every_core() {
        let cmd = build_command(true, "2-4", "./bench", &cores()).unwrap();
        assert_eq!(cmd, "/usr/bin/taskset -c 2,3,4 ./bench");

        let single = build_command(true, "6", "./bench", &cores()).unwrap();
        assert_eq!(single, "/usr/bin/taskset -c 6 ./bench");
    }
}
