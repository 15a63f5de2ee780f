//! Text measurement and truncation.

/// Heuristic: estimate pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}

/// Truncate to fit `max_px`, ending with a single ellipsis if anything was cut.
pub fn truncate_to_width(text: &str, font_px: u32, max_px: u32) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let per_char = (font_px as f32 * 0.60).max(1.0);
    let fits = (max_px as f32 / per_char).floor() as usize;
    if fits == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(fits - 1).collect();
    out.push('…');
    out
}
