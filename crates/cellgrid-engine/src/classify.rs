//! Cell content classification
//!
//! The presentation layer lays a cell out differently depending on whether it
//! holds text, a picture, both, or nothing. Classification looks at the
//! lowered cell plus whether any picture is anchored at the position.

use cellgrid_core::record::ContentKind;

use crate::sheet::CellModel;

/// Classify a cell's content.
///
/// `has_picture` covers both in-place and anchored pictures. A cell counts
/// as textual when it shows display text or carries a formula; comments and
/// hyperlinks do not count on their own.
pub fn classify(cell: Option<&CellModel>, has_picture: bool) -> ContentKind {
    let has_text = cell.is_some_and(|c| !c.display.is_empty() || c.formula.is_some());
    match (has_text, has_picture) {
        (false, false) => ContentKind::Empty,
        (true, false) => ContentKind::TextOnly,
        (false, true) => ContentKind::ImageOnly,
        (true, true) => ContentKind::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::{CellModel, InlineImage};

    #[test]
    fn classification_matrix() {
        let text = CellModel::text("hello");
        let empty = CellModel::default();

        assert_eq!(classify(None, false), ContentKind::Empty);
        assert_eq!(classify(Some(&empty), false), ContentKind::Empty);
        assert_eq!(classify(Some(&text), false), ContentKind::TextOnly);
        assert_eq!(classify(None, true), ContentKind::ImageOnly);
        assert_eq!(classify(Some(&text), true), ContentKind::Mixed);
    }

    #[test]
    fn formulas_count_as_text_metadata_does_not() {
        // A comment alone is not textual content.
        let commented = CellModel {
            comment: Some("note".into()),
            ..Default::default()
        };
        assert_eq!(classify(Some(&commented), false), ContentKind::Empty);

        // A formula counts even before its result is displayed.
        let formula = CellModel {
            formula: Some("A1+A2".into()),
            ..Default::default()
        };
        assert_eq!(classify(Some(&formula), false), ContentKind::TextOnly);

        let numeric = CellModel::number(3.5);
        assert_eq!(classify(Some(&numeric), false), ContentKind::TextOnly);
    }

    #[test]
    fn inline_image_cell_still_needs_flag() {
        // The caller decides picture presence; an inline image on the model
        // is reported through `has_picture`, not inferred here.
        let cell = CellModel {
            image: Some(InlineImage {
                name: "p".into(),
                data: Vec::new(),
            }),
            ..Default::default()
        };
        assert_eq!(classify(Some(&cell), true), ContentKind::ImageOnly);
    }
}
