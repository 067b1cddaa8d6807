use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?$")
        .expect("Invalid ISO duration regex")
});

/// Convert an ISO 8601 time duration into a display string.
///
/// `PT1H30M` becomes `1 hr 30 min`, zero components are omitted, and seconds
/// are parsed but not displayed. Anything that does not match the `PT#H#M#S`
/// shape, or that has neither hours nor minutes, is returned unchanged.
pub fn humanize_iso_duration(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(caps) = ISO_DURATION_RE.captures(trimmed) else {
        return trimmed.to_string();
    };

    let component = |idx: usize| -> u64 {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    let hours = component(1);
    let minutes = component(2);

    match (hours, minutes) {
        (0, 0) => trimmed.to_string(),
        (h, 0) => format!("{h} hr"),
        (0, m) => format!("{m} min"),
        (h, m) => format!("{h} hr {m} min"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_conversion() {
        assert_eq!(humanize_iso_duration("PT30M"), "30 min");
        assert_eq!(humanize_iso_duration("PT1H"), "1 hr");
        assert_eq!(humanize_iso_duration("PT1H30M"), "1 hr 30 min");
        assert_eq!(humanize_iso_duration("PT2H15M30S"), "2 hr 15 min");
        assert_eq!(humanize_iso_duration("pt45m"), "45 min");
    }

    #[test]
    fn test_unparsed_durations_pass_through() {
        assert_eq!(humanize_iso_duration("PT0M"), "PT0M");
        assert_eq!(humanize_iso_duration("PT45S"), "PT45S");
        assert_eq!(humanize_iso_duration("about an hour"), "about an hour");
        assert_eq!(humanize_iso_duration("P1DT2H"), "P1DT2H");
    }
}
