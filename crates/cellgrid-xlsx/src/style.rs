//! Style lowering: document styles into unresolved descriptors
//!
//! Lowering stays mechanical: colors are carried as [`ColorRef`] descriptors
//! and resolved later by the engine's per-walk cache, never here.

use umya_spreadsheet::{Alignment, Border, Color, EnumTrait, Style};

use cellgrid_core::color::ColorRef;
use cellgrid_core::record::{HorizontalAlign, VerticalAlign};
use cellgrid_engine::{BorderEdgeModel, BorderModel, StyleModel};

/// Lower a document style into the engine's descriptor form.
pub fn lower_style(style: &Style) -> StyleModel {
    let mut model = StyleModel::default();

    if let Some(font) = style.get_font() {
        let name = font.get_name();
        if !name.is_empty() {
            model.font_name = Some(name.to_string());
        }
        let size = *font.get_size();
        if size > 0.0 {
            model.font_size = Some(size);
        }
        model.bold = *font.get_bold();
        model.italic = *font.get_italic();
        model.underline = font.get_underline() != "none";
        model.strikethrough = *font.get_strikethrough();
        model.font_color = lower_color(font.get_color());
    }

    if let Some(fill) = style.get_fill() {
        if let Some(pattern) = fill.get_pattern_fill() {
            if let Some(fg) = pattern.get_foreground_color() {
                model.fill_color = lower_color(fg);
            }
        }
    }

    if let Some(alignment) = style.get_alignment() {
        let (horizontal, vertical, wrap) = lower_alignment(alignment);
        model.horizontal = horizontal;
        model.vertical = vertical;
        model.wrap_text = wrap;
    }

    if let Some(borders) = style.get_borders() {
        model.borders = BorderModel {
            left: lower_edge(borders.get_left()),
            right: lower_edge(borders.get_right()),
            top: lower_edge(borders.get_top()),
            bottom: lower_edge(borders.get_bottom()),
        };
    }

    model
}

/// Lower a document color into a descriptor, or nothing when it is unset.
///
/// The document type cannot distinguish "theme slot 0" from "no theme set";
/// both read back as index 0 with zero tint. A color is considered themed
/// only when the slot or tint is nonzero, which loses untinted dark-1 theme
/// colors (they render black, matching the default anyway). Palette index 0
/// has the same ambiguity and is treated the same way: an explicit legacy
/// black lowers to none, which also renders black.
pub fn lower_color(color: &Color) -> Option<ColorRef> {
    let argb = color.get_argb();
    if !argb.is_empty() {
        return Some(ColorRef::rgb(argb));
    }
    let indexed = *color.get_indexed();
    if indexed != 0 {
        return Some(ColorRef::indexed(indexed));
    }
    let theme = *color.get_theme_index();
    let tint = *color.get_tint();
    if theme != 0 || tint != 0.0 {
        return Some(ColorRef::theme(theme, tint));
    }
    None
}

fn lower_edge(border: &Border) -> Option<BorderEdgeModel> {
    let style = border.get_border_style();
    if style.is_empty() || style == "none" {
        return None;
    }
    Some(BorderEdgeModel {
        style: style.to_string(),
        color: lower_color(border.get_color()),
    })
}

fn lower_alignment(alignment: &Alignment) -> (HorizontalAlign, VerticalAlign, bool) {
    let horizontal = match alignment.get_horizontal().get_value_string() {
        "left" => HorizontalAlign::Left,
        "center" | "centerContinuous" => HorizontalAlign::Center,
        "right" => HorizontalAlign::Right,
        "fill" => HorizontalAlign::Fill,
        "justify" => HorizontalAlign::Justify,
        "distributed" => HorizontalAlign::Distributed,
        _ => HorizontalAlign::General,
    };
    let vertical = match alignment.get_vertical().get_value_string() {
        "top" => VerticalAlign::Top,
        "center" => VerticalAlign::Center,
        "justify" => VerticalAlign::Justify,
        "distributed" => VerticalAlign::Distributed,
        _ => VerticalAlign::Bottom,
    };
    (horizontal, vertical, *alignment.get_wrap_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_color_lowers_to_none() {
        let color = Color::default();
        assert!(lower_color(&color).is_none());
    }

    #[test]
    fn argb_color_lowers_to_rgb_descriptor() {
        let mut color = Color::default();
        color.set_argb("FF00AA00");
        let desc = lower_color(&color).unwrap();
        assert_eq!(desc.rgb.as_deref(), Some("FF00AA00"));
    }

    #[test]
    fn default_style_lowers_to_default_model() {
        let style = Style::default();
        assert_eq!(lower_style(&style), StyleModel::default());
    }
}
