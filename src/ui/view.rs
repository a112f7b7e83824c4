//! Gallery View Module
//!
//! Framework-agnostic view models for rendering the gallery: the photo grid,
//! per-cell render sources, and the delete-confirmation sheet. Frontends map
//! these onto their own widgets; nothing here depends on a UI toolkit.

use crate::core::photo::Photo;

// =============================================================================
// Render Sources
// =============================================================================

/// Where a cell should get its pixels from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderSource {
    /// Base64 data URL carrying the photo content
    InlineData(String),
    /// A URI the display layer can load directly
    DisplayPath(String),
    /// Nothing renderable is attached to the photo
    Missing,
}

impl RenderSource {
    /// Pick the render source for a photo
    ///
    /// Inline data wins over a display path: when both are present the
    /// inline copy is the one materialized for this runtime.
    pub fn for_photo(photo: &Photo) -> Self {
        if let Some(ref data) = photo.inline_data {
            return RenderSource::InlineData(data.clone());
        }
        if let Some(ref path) = photo.display_path {
            return RenderSource::DisplayPath(path.clone());
        }
        RenderSource::Missing
    }

    /// Whether the cell has anything to draw
    pub fn is_renderable(&self) -> bool {
        !matches!(self, RenderSource::Missing)
    }
}

// =============================================================================
// Photo Grid
// =============================================================================

/// One cell of the photo grid
#[derive(Debug, Clone)]
pub struct GridCell {
    /// The photo in this cell
    pub photo: Photo,
}

impl GridCell {
    /// Render source for this cell
    pub fn render_source(&self) -> RenderSource {
        RenderSource::for_photo(&self.photo)
    }
}

/// The gallery laid out as rows of cells, newest photo first
#[derive(Debug, Clone)]
pub struct GalleryGrid {
    columns: usize,
    rows: Vec<Vec<GridCell>>,
}

impl GalleryGrid {
    /// Columns the gallery renders with by default
    pub const DEFAULT_COLUMNS: usize = 2;

    /// Lay out photos in the default two-column grid
    pub fn new(photos: &[Photo]) -> Self {
        Self::with_columns(photos, Self::DEFAULT_COLUMNS)
    }

    /// Lay out photos with a custom column count (minimum 1)
    pub fn with_columns(photos: &[Photo], columns: usize) -> Self {
        let columns = columns.max(1);
        let rows = photos
            .chunks(columns)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|photo| GridCell {
                        photo: photo.clone(),
                    })
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    /// Number of columns the grid was laid out with
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// The laid-out rows; the last row may be partially filled
    pub fn rows(&self) -> &[Vec<GridCell>] {
        &self.rows
    }

    /// Total number of photos in the grid
    pub fn len(&self) -> usize {
        self.rows.iter().map(|row| row.len()).sum()
    }

    /// Whether the grid has no photos
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at a row/column position, if occupied
    pub fn cell_at(&self, row: usize, column: usize) -> Option<&GridCell> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}

// =============================================================================
// Delete Confirmation Sheet
// =============================================================================

/// Role a sheet button plays, mirrored by the frontend's styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonRole {
    /// Performs the deletion
    Destructive,
    /// Dismisses the sheet
    Cancel,
}

/// One button on the confirmation sheet
#[derive(Debug, Clone)]
pub struct SheetButton {
    /// Button label
    pub label: &'static str,
    /// Button role
    pub role: ButtonRole,
}

/// The delete-confirmation sheet, visible only while a photo is pending
#[derive(Debug, Clone)]
pub struct ActionSheetState {
    /// Sheet title
    pub title: &'static str,
    /// The photo whose deletion is being confirmed
    pub photo: Photo,
    /// Buttons, in display order
    pub buttons: Vec<SheetButton>,
}

impl ActionSheetState {
    /// Build the sheet for the current selection
    ///
    /// Returns `None` when nothing is pending, which is the frontend's cue
    /// to keep the sheet closed.
    pub fn for_pending(pending: Option<&Photo>) -> Option<Self> {
        let photo = pending?;
        Some(Self {
            title: "Photos",
            photo: photo.clone(),
            buttons: vec![
                SheetButton {
                    label: "Delete",
                    role: ButtonRole::Destructive,
                },
                SheetButton {
                    label: "Cancel",
                    role: ButtonRole::Cancel,
                },
            ],
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(count: usize) -> Vec<Photo> {
        (0..count)
            .map(|i| Photo::new(format!("photo_{}.jpeg", i)))
            .collect()
    }

    #[test]
    fn test_grid_chunks_into_two_columns() {
        let grid = GalleryGrid::new(&photos(5));

        assert_eq!(grid.columns(), 2);
        assert_eq!(grid.rows().len(), 3);
        assert_eq!(grid.rows()[0].len(), 2);
        assert_eq!(grid.rows()[1].len(), 2);
        assert_eq!(grid.rows()[2].len(), 1);
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_grid_preserves_order() {
        let grid = GalleryGrid::new(&photos(4));

        assert_eq!(grid.cell_at(0, 0).unwrap().photo.filepath, "photo_0.jpeg");
        assert_eq!(grid.cell_at(0, 1).unwrap().photo.filepath, "photo_1.jpeg");
        assert_eq!(grid.cell_at(1, 0).unwrap().photo.filepath, "photo_2.jpeg");
        assert!(grid.cell_at(2, 0).is_none());
    }

    #[test]
    fn test_grid_clamps_columns() {
        let grid = GalleryGrid::with_columns(&photos(3), 0);
        assert_eq!(grid.columns(), 1);
        assert_eq!(grid.rows().len(), 3);
    }

    #[test]
    fn test_empty_grid() {
        let grid = GalleryGrid::new(&[]);
        assert!(grid.is_empty());
        assert_eq!(grid.len(), 0);
    }

    #[test]
    fn test_render_source_prefers_inline_data() {
        let photo = Photo::new("167.jpeg")
            .with_display_path("asset://localhost/data/167.jpeg")
            .with_inline_data("data:image/jpeg;base64,Zm9v");

        match RenderSource::for_photo(&photo) {
            RenderSource::InlineData(data) => assert!(data.starts_with("data:")),
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_render_source_falls_back_to_display_path() {
        let photo =
            Photo::new("file:///data/167.jpeg").with_display_path("asset://localhost/data/167.jpeg");

        assert_eq!(
            RenderSource::for_photo(&photo),
            RenderSource::DisplayPath("asset://localhost/data/167.jpeg".to_string())
        );
    }

    #[test]
    fn test_render_source_missing() {
        let photo = Photo::new("167.jpeg");
        let source = RenderSource::for_photo(&photo);
        assert_eq!(source, RenderSource::Missing);
        assert!(!source.is_renderable());
    }

    #[test]
    fn test_sheet_closed_without_selection() {
        assert!(ActionSheetState::for_pending(None).is_none());
    }

    #[test]
    fn test_sheet_for_pending_photo() {
        let photo = Photo::new("file:///data/167.jpeg");
        let sheet = ActionSheetState::for_pending(Some(&photo)).unwrap();

        assert_eq!(sheet.title, "Photos");
        assert_eq!(sheet.photo.filepath, photo.filepath);
        assert_eq!(sheet.buttons.len(), 2);
        assert_eq!(sheet.buttons[0].label, "Delete");
        assert_eq!(sheet.buttons[0].role, ButtonRole::Destructive);
        assert_eq!(sheet.buttons[1].label, "Cancel");
        assert_eq!(sheet.buttons[1].role, ButtonRole::Cancel);
    }
}
