use egui::Color32;

pub mod live;
pub(crate) mod panels;
pub mod replay;

pub(crate) const PALETTE_BLACK: Color32 = Color32::from_rgb(12, 12, 12);
pub(crate) const PALETTE_CARD: Color32 = Color32::from_rgb(26, 26, 26);
pub(crate) const PALETTE_TEAM_RED: Color32 = Color32::from_rgb(230, 0, 43);
pub(crate) const PALETTE_OFF_WHITE: Color32 = Color32::from_rgb(224, 224, 224);
pub(crate) const PALETTE_GAIN_GREEN: Color32 = Color32::from_rgb(57, 181, 74);

/// Parse an upstream `team_colour` hex string ("E6002B") into a colour.
/// Falls back to the team red when the payload is not parseable.
pub(crate) fn team_colour(hex: &str) -> Color32 {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return PALETTE_TEAM_RED;
    }
    match (
        u8::from_str_radix(&hex[0..2], 16),
        u8::from_str_radix(&hex[2..4], 16),
        u8::from_str_radix(&hex[4..6], 16),
    ) {
        (Ok(r), Ok(g), Ok(b)) => Color32::from_rgb(r, g, b),
        _ => PALETTE_TEAM_RED,
    }
}

/// Extract the leading signed float from formatted delta text such as
/// "+0.342s". Trailing units and whitespace are ignored; text with no
/// leading number yields None.
pub(crate) fn leading_float(text: &str) -> Option<f32> {
    let text = text.trim();
    let mut end = 0;
    for (i, c) in text.char_indices() {
        if c.is_ascii_digit() || c == '.' || ((c == '+' || c == '-') && i == 0) {
            end = i + c.len_utf8();
        } else {
            break;
        }
    }
    text[..end].parse::<f32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_colour_parses_upstream_hex() {
        assert_eq!(team_colour("E6002B"), Color32::from_rgb(230, 0, 43));
        assert_eq!(team_colour("#1abc9c"), Color32::from_rgb(26, 188, 156));
        assert_eq!(team_colour(" 000000 "), Color32::from_rgb(0, 0, 0));
    }

    #[test]
    fn test_team_colour_falls_back_on_garbage() {
        assert_eq!(team_colour(""), PALETTE_TEAM_RED);
        assert_eq!(team_colour("red"), PALETTE_TEAM_RED);
        assert_eq!(team_colour("E6002"), PALETTE_TEAM_RED);
        assert_eq!(team_colour("E6002G"), PALETTE_TEAM_RED);
    }

    #[test]
    fn test_leading_float_tolerates_upstream_formatting() {
        assert_eq!(leading_float("+0.342"), Some(0.342));
        assert_eq!(leading_float("-0.118s"), Some(-0.118));
        assert_eq!(leading_float(" 1.5 "), Some(1.5));
        // lap-time style text parses up to the first separator
        assert_eq!(leading_float("1:32.845"), Some(1.0));
    }

    #[test]
    fn test_leading_float_rejects_non_numeric_text() {
        assert_eq!(leading_float("N/A"), None);
        assert_eq!(leading_float(""), None);
        assert_eq!(leading_float("+"), None);
    }
}
