// SPDX-License-Identifier: Apache-2.0

pub const FOR_COLOR: &str = "#56B200";
pub const AGAINST_COLOR: &str = "#FF4C42";
pub const ABSTAIN_COLOR: &str = "#FFBC1F";

pub const PALETTE: [&str; 8] = [
    "#69E000", "#FF4C42", "#FFCC33", "#5A9BD5", "#B07CFF", "#00C2A8", "#FF8A3D", "#9C9C9C",
];

/// Color for a choice: well-known For/Against/Abstain labels get fixed
/// colors, the rest cycle through the palette by index.
#[must_use]
pub fn choice_color(text: &str, index: usize) -> String {
    match text.trim().to_ascii_lowercase().as_str() {
        "for" | "yes" | "yae" => FOR_COLOR.to_string(),
        "against" | "no" | "nay" => AGAINST_COLOR.to_string(),
        "abstain" => ABSTAIN_COLOR.to_string(),
        _ => PALETTE[index % PALETTE.len()].to_string(),
    }
}

#[must_use]
pub fn choice_colors(choices: &[String]) -> Vec<String> {
    choices
        .iter()
        .enumerate()
        .map(|(idx, text)| choice_color(text, idx))
        .collect()
}
