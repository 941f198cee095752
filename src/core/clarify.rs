use crate::types::ParsedPreferences;

/// Preference groups a useful recommendation needs at least one value from.
pub const GROUP_DESTINATION: &str = "region or destination type";
pub const GROUP_MONTH: &str = "target month";
pub const GROUP_LENGTH: &str = "budget or trip length";

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Names of the groups the user has not covered yet, in asking order.
pub fn missing_groups(preferences: &ParsedPreferences) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !present(preferences.region.as_deref()) && !present(preferences.destination_type.as_deref())
    {
        missing.push(GROUP_DESTINATION);
    }
    if preferences.month().is_none() {
        missing.push(GROUP_MONTH);
    }
    if preferences.budget_usd.is_none() && preferences.duration_days.is_none() {
        missing.push(GROUP_LENGTH);
    }
    missing
}

/// A clarifying question when at least `threshold` groups are missing.
///
/// The threshold is clamped to 1..=3.
pub fn clarifying_question(preferences: &ParsedPreferences, threshold: u8) -> Option<String> {
    let missing = missing_groups(preferences);
    let threshold = usize::from(threshold.clamp(1, 3));
    (missing.len() >= threshold)
        .then(|| format!("Quick check: could you share your {}?", missing.join(", ")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_preferences_miss_every_group() {
        let question = clarifying_question(&ParsedPreferences::default(), 3).unwrap();
        assert_eq!(
            question,
            "Quick check: could you share your region or destination type, target month, budget or trip length?"
        );
    }

    #[test]
    fn default_threshold_only_asks_when_everything_is_missing() {
        let preferences = ParsedPreferences {
            month: Some("July".to_string()),
            ..Default::default()
        };
        assert!(clarifying_question(&preferences, 3).is_none());
        assert_eq!(
            clarifying_question(&preferences, 2).as_deref(),
            Some("Quick check: could you share your region or destination type, budget or trip length?")
        );
    }

    #[test]
    fn any_member_satisfies_a_group() {
        let preferences = ParsedPreferences {
            destination_type: Some("beach".to_string()),
            duration_days: Some(5.0),
            month: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(missing_groups(&preferences), vec![GROUP_MONTH]);
        assert!(clarifying_question(&preferences, 0).is_some());
    }
}
