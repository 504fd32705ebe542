//! Named rule strings.

pub const DEFAULT_PRESET: &str = "series_3_than_2";
/// Preset name meaning "use the configured custom rule string".
pub const CUSTOMIZED: &str = "customized";

const TAIL: &str = "> shortest > reset";

pub const FILTER_STRING_SHORTEST: &str = "0.5 > 1 > 1.5 > 2 > 2.5 > 3 > 4 > 5 > 6 > 8 > 10 > 12 > reset";

pub const FILTER_STRING_CHEAPEST: &str = "Q1 > Q2 > T3 > T4 > Q0.5 > G1.5 > D2.5 > G2.5 > C6 > C8 > C12 > D0.5 \
	> D1 > D1.5 > G4 > H1 > H2 > E2 > E4 > E6 > B2 > B4 > T6 > H4 > reset";

static PRESETS: [(&str, &str); 5] = [
	(
		"series_3_than_2",
		"S3-Drake-0.5 > S3-DR-2.5 > S3-DR-5 > S3-DR-8 > S3-PRY-0.5 > S3-H1 > S3-Q0.5 > S3-DR-0.5 \
		> S2-DR-0.5 > S2-H1 > S2-Q0.5 > S3-PRY-2.5 > S2-PRY-0.5 > S2-DR-2.5 > S3-H2 > S3-Q1 \
		> S3-G1.5 > S3-D2.5 > S3-PRY-5 > S2-H2 > S2-Q1 > S3-C6 > S3-G2.5 > S3-H4",
	),
	(
		"series_3",
		"S3-Drake-0.5 > S3-DR-2.5 > S3-DR-5 > S3-DR-8 > S3-PRY-0.5 > S3-H1 > S3-Q0.5 > S3-DR-0.5 \
		> S3-PRY-2.5 > S3-H2 > S3-Q1 > S3-G1.5 > S3-D2.5 > S3-PRY-5 > S3-C6 > S3-G2.5 > S3-H4",
	),
	(
		"series_2_than_3",
		"S2-DR-0.5 > S2-DR-2.5 > S2-DR-5 > S2-PRY-0.5 > S2-H1 > S2-Q0.5 > S3-DR-0.5 > S3-PRY-0.5 \
		> S3-H1 > S3-Q0.5 > S2-PRY-2.5 > S2-H2 > S2-Q1 > S2-G1.5 > S2-D2.5 > S3-DR-2.5 > S3-H2 > S3-Q1",
	),
	(
		"series_2",
		"S2-DR-0.5 > S2-DR-2.5 > S2-DR-5 > S2-PRY-0.5 > S2-H1 > S2-Q0.5 > S2-PRY-2.5 > S2-H2 \
		> S2-Q1 > S2-G1.5 > S2-D2.5 > S2-PRY-5 > S2-C6 > S2-G2.5 > S2-H4",
	),
	(
		"series_1",
		"S1-DR-0.5 > S1-DR-2.5 > S1-PRY-0.5 > S1-H1 > S1-Q0.5 > S1-PRY-2.5 > S1-H2 > S1-Q1 \
		> S1-G1.5 > S1-D2.5 > S1-C6 > S1-G2.5 > S1-H4",
	),
];

/// Names of every built-in preset, in display order.
pub fn preset_names() -> impl Iterator<Item = &'static str> {
	PRESETS.iter().map(|(name, _)| *name)
}

/// The full rule string of a named preset, common tail included.
pub fn preset(name: &str) -> Option<String> {
	PRESETS
		.iter()
		.find(|(preset, _)| *preset == name)
		.map(|(_, rule)| format!("{rule} {TAIL}"))
}

/// Rule string for a configured preset.
///
/// [`CUSTOMIZED`] selects `custom`. Unknown presets, and an empty custom rule,
/// fall back to [`DEFAULT_PRESET`].
pub fn resolve_rule(name: &str, custom: &str) -> String {
	if name == CUSTOMIZED {
		if !custom.trim().is_empty() {
			return custom.to_owned();
		}
		tracing::warn!("customized preset without a filter string, using default preset");
	} else if let Some(rule) = preset(name) {
		return rule;
	} else {
		tracing::warn!(preset = name, "preset not found, using default preset");
	}

	preset(DEFAULT_PRESET).unwrap_or_default()
}
