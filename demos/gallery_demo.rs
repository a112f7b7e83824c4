//! Gallery Integration Demo
//!
//! This example demonstrates how a frontend integrates the camera-roll
//! library without any real platform behind it. It shows:
//!
//! - Laying out photos with the grid view model
//! - Building the delete-confirmation sheet from a pending selection
//! - Driving loads, captures, and deletions through the controller
//! - Generating thumbnails for grid cells
//!
//! Run with: `cargo run --example gallery_demo`

use std::sync::Arc;
use std::time::Duration;

use camera_roll::core::photo::Photo;
use camera_roll::platform::StorageDirectory;
use camera_roll::testkit::{build_environment, GalleryDataGenerator, MockFileStore, ScenarioLibrary};
use camera_roll::ui::{
    ActionSheetState, GalleryController, GalleryEvent, GalleryGrid, RenderSource, ThumbnailConfig,
    ThumbnailGenerator, ThumbnailResult, UiEvent,
};

const EVENT_WAIT: Duration = Duration::from_secs(2);

fn main() {
    println!("=== Camera Roll - Gallery Demo ===\n");

    // Demo 1: Grid view model
    demo_grid();

    // Demo 2: Delete-confirmation sheet
    demo_sheet();

    // Demo 3: Controller-driven journey
    demo_controller_journey();

    // Demo 4: Thumbnails
    demo_thumbnails();

    println!("\n=== Demo Complete ===");
}

fn demo_grid() {
    println!("--- Grid Layout Demo ---\n");

    let photos: Vec<Photo> = (0..5).map(GalleryDataGenerator::direct_photo).collect();
    let grid = GalleryGrid::new(&photos);

    println!(
        "{} photos in {} columns -> {} rows",
        grid.len(),
        grid.columns(),
        grid.rows().len()
    );

    for (row_index, row) in grid.rows().iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            let source = match cell.render_source() {
                RenderSource::InlineData(_) => "inline data",
                RenderSource::DisplayPath(_) => "display path",
                RenderSource::Missing => "missing",
            };
            println!(
                "  [{},{}] {} ({})",
                row_index,
                col_index,
                cell.photo.file_name(),
                source
            );
        }
    }

    println!();
}

fn demo_sheet() {
    println!("--- Confirmation Sheet Demo ---\n");

    // No selection, no sheet
    println!(
        "Sheet without selection: {:?}",
        ActionSheetState::for_pending(None).map(|s| s.title)
    );

    // Selecting a photo opens the sheet
    let photo = GalleryDataGenerator::direct_photo(0);
    if let Some(sheet) = ActionSheetState::for_pending(Some(&photo)) {
        println!("Sheet '{}' for {}:", sheet.title, sheet.photo.file_name());
        for button in &sheet.buttons {
            println!("  [{:?}] {}", button.role, button.label);
        }
    }

    println!();
}

fn demo_controller_journey() {
    println!("--- Controller Journey Demo ---\n");

    // A mock environment with two stored photos and their files
    let scenario = ScenarioLibrary::delete_journey();
    let env = build_environment(&scenario.fixtures);
    let controller =
        GalleryController::new(Arc::new(env.store)).expect("controller creation failed");

    // Restore the gallery
    controller.load_saved();
    pump_events(&controller);
    println!("Gallery after load: {} photo(s)", controller.photos().len());

    // Select the oldest photo and confirm its deletion
    if let Some(target) = controller.photos().pop() {
        controller.select_pending_delete(Some(target));
        controller.drain_events();

        if let Some(sheet) = ActionSheetState::for_pending(controller.pending_delete().as_ref()) {
            println!(
                "Sheet open for {} with {} buttons",
                sheet.photo.file_name(),
                sheet.buttons.len()
            );
        }

        controller.confirm_pending_delete();
        pump_events(&controller);
    }

    controller.wait_idle(EVENT_WAIT);
    println!(
        "Gallery after delete: {} photo(s), files deleted: {}",
        controller.photos().len(),
        env.files.deleted().len()
    );

    println!();
}

fn pump_events(controller: &GalleryController) {
    while let Some(event) = controller.recv_event_timeout(EVENT_WAIT) {
        match event {
            UiEvent::Gallery(GalleryEvent::LoadStarted) => println!("  event: load started"),
            UiEvent::Gallery(GalleryEvent::LoadCompleted { photos, duration }) => {
                println!(
                    "  event: load completed ({} photos in {:?})",
                    photos.len(),
                    duration
                );
                return;
            }
            UiEvent::Gallery(GalleryEvent::DeleteCompleted {
                filepath,
                remaining,
            }) => {
                println!("  event: deleted {} ({} remaining)", filepath, remaining);
            }
            UiEvent::Gallery(GalleryEvent::SelectionChanged { pending }) => {
                println!("  event: selection -> {:?}", pending.map(|p| p.filepath));
                return;
            }
            other => println!("  event: {:?}", other),
        }
    }
}

fn demo_thumbnails() {
    println!("--- Thumbnail Demo ---\n");

    let runtime = tokio::runtime::Runtime::new().expect("runtime creation failed");

    let name = GalleryDataGenerator::photo_file_name(0);
    let files = MockFileStore::new().with_file(
        &name,
        StorageDirectory::Data,
        GalleryDataGenerator::generate_renderable_png(64, 48, 5),
    );

    let generator = ThumbnailGenerator::with_config(ThumbnailConfig::grid().with_dimensions(16, 16));
    let photo = Photo::new(name);

    match runtime.block_on(generator.generate(&photo, &files)) {
        ThumbnailResult::Success(thumb) => {
            println!(
                "Thumbnail {}x{} from {}x{} source ({} bytes)",
                thumb.width,
                thumb.height,
                thumb.original_width,
                thumb.original_height,
                thumb.data.len()
            );
            let url = thumb.as_data_url();
            println!("Data URL prefix: {}...", &url[..30.min(url.len())]);
        }
        other => println!("Thumbnail generation failed: {:?}", other),
    }

    let stats = generator.cache_stats();
    println!(
        "Cache: {}/{} entries ({:.0}% full)",
        stats.entries,
        stats.max_entries,
        stats.utilization()
    );
}
